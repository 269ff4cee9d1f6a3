//! This crate provides [`Slot`]s, named half-open intervals of time, and
//! [`Set`]s of possibly-overlapping slots which can be split into
//! non-overlapping "lanes" with [`Set::split_linear()`].
//!
//! This is the sort of primitive you want beneath calendar or timeline
//! rendering: given arbitrary, possibly-overlapping bookings, assign each
//! to a visual lane so that overlapping bookings never share a lane.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{DateTime, TimeDelta};
//! use timebox::{Set, Slot, SlotRef};
//!
//! let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
//! let seconds = TimeDelta::seconds;
//!
//! let mut set = Set::new();
//! set.add(SlotRef::new(Slot::new("First", now, seconds(15))));
//! set.add(SlotRef::new(Slot::new("Second", now + seconds(15), seconds(15))));
//! set.add(SlotRef::new(Slot::new("Third", now + seconds(25), seconds(15))));
//! set.add(SlotRef::new(Slot::new("Fourth", now - seconds(60), seconds(20))));
//!
//! assert_eq!(set.contains(now + seconds(15)), true);
//! assert_eq!(set.contains(now + seconds(40)), false);
//!
//! let lanes = set.split_linear();
//!
//! assert_eq!(lanes.len(), 2);
//! assert_eq!(lanes[0].len(), 3);
//! assert_eq!(lanes[1].slots(), &set.slots()[2..3]);
//!
//! for (i, lane) in lanes.iter().enumerate() {
//! 	println!("lane {i}: {lane}");
//! }
//! ```
//!
//! ## Key Understandings and Philosophies:
//!
//! ### Instants
//!
//! Slots are generic over their instant type via the [`InstantType`]
//! trait. Implementations are provided for [`chrono::DateTime<Utc>`]
//! (the default) and [`chrono::NaiveDateTime`], both with
//! [`chrono::TimeDelta`] durations at nanosecond resolution, and for the
//! signed primitive integers up to 64 bits, where the duration is the
//! next wider integer type so that the span between any two instants is
//! exact. No calendar or timezone semantics are involved: an instant is
//! just an ordered point.
//!
//! ### Containment
//!
//! A slot is half-open: its start is contained, its end is not. The start
//! is contained even if the duration is zero, in which case the start is
//! the only contained instant.
//!
//! ### Overlap
//!
//! Two slots overlap if either one's start is contained in the other.
//! This is not a general interval intersection test, see
//! [`Slot::overlaps()`].
//!
//! ### Invalid Slots
//!
//! Slots are not validated. A negative duration gives a slot whose end is
//! before its start, such a slot contains exactly its start instant and
//! nothing else. [`Slot::try_new()`] is available if you would rather
//! reject negative durations up front.
//!
//! ### Shared Slots
//!
//! A [`Set`] stores [`SlotRef`]s, reference-counted handles to slots, not
//! the slots themselves. The same slot can be in several sets at once and
//! replacing it through any handle is visible everywhere. Handles compare
//! by identity. Handles are not thread-safe, a set is meant to be used
//! from a single thread.
//!
//! ### Lanes
//!
//! [`Set::split_linear()`] is a greedy first-fit over insertion order. It
//! is deterministic but not optimal: a different insertion order can give
//! fewer lanes.
//!
//! ## Features
//!
//! - `serde`: implements `Serialize` and `Deserialize` for [`Slot`],
//!   [`SlotRef`] and [`Set`] where the instant and duration types support
//!   it. Deserializing a [`Set`] always gives fresh, unshared handles.
//!
//! ## Logging
//!
//! [`Set::split_linear()`] reports the lanes it opens through the [`log`]
//! facade at `trace` level and a summary at `debug` level. No logger is
//! installed by this crate.
//!
//! [`chrono::DateTime<Utc>`]: chrono::DateTime
//! [`log`]: https://docs.rs/log

#![cfg_attr(not(test), no_std)]
#![allow(clippy::tabs_in_doc_comments)]

extern crate alloc;

pub mod instant;
pub mod set;
pub mod slot;
pub mod slot_ref;

pub use crate::instant::InstantType;
pub use crate::set::Set;
pub use crate::slot::{NegativeDurationError, Slot};
pub use crate::slot_ref::SlotRef;
