//! A module containing [`Slot`] and [`NegativeDurationError`].

use alloc::string::String;
use core::fmt;

use chrono::{DateTime, Utc};

use crate::InstantType;

/// A named, half-open interval of time: `[start, start + duration)`.
///
/// `T` is the generic type parameter for the instant type the slot is an
/// interval over, it defaults to [`DateTime<Utc>`].
///
/// The start of a slot is always contained by it, the end never is. See
/// [`Slot::contains()`] for the exact rule.
///
/// A slot is not validated on construction: zero and negative durations
/// are both accepted by [`Slot::new()`]. Use [`Slot::try_new()`] if you
/// want negative durations rejected.
///
/// # Examples
/// ```
/// use timebox::Slot;
///
/// let slot = Slot::new("Standup", 900_i64, 15);
///
/// assert_eq!(slot.end(), 915);
/// assert_eq!(slot.contains(900), true);
/// assert_eq!(slot.contains(914), true);
/// assert_eq!(slot.contains(915), false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
	feature = "serde",
	derive(serde::Serialize, serde::Deserialize),
	serde(bound(
		serialize = "T: serde::Serialize, T::Duration: serde::Serialize",
		deserialize = "T: serde::Deserialize<'de>, T::Duration: serde::Deserialize<'de>"
	))
)]
pub struct Slot<T: InstantType = DateTime<Utc>> {
	name: String,
	start: T,
	duration: T::Duration,
}

/// The error returned by [`Slot::try_new()`] when the given duration would
/// place the end of the slot before its start. Contains the name of the
/// slot that was not created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeDurationError {
	/// The name of the slot which was not created.
	pub name: String,
}

impl fmt::Display for NegativeDurationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "slot {:?} ends before it starts", self.name)
	}
}

impl core::error::Error for NegativeDurationError {}

impl<T> Slot<T>
where
	T: InstantType,
{
	/// Makes a new slot from a name, a start instant and a duration.
	///
	/// # Examples
	/// ```
	/// use chrono::{DateTime, TimeDelta};
	/// use timebox::Slot;
	///
	/// let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
	/// let slot = Slot::new("Review", start, TimeDelta::minutes(30));
	///
	/// assert_eq!(slot.end() - slot.start(), TimeDelta::minutes(30));
	/// ```
	pub fn new(name: impl Into<String>, start: T, duration: T::Duration) -> Self {
		Slot {
			name: name.into(),
			start,
			duration,
		}
	}

	/// Makes a new slot from a name, a start instant and an end instant.
	/// The end instant is not contained in the slot.
	///
	/// If `end` comes before `start` the resulting duration is negative,
	/// this is not rejected. The duration is exact, so
	/// [`Slot::end()`] always gives back the given `end`.
	///
	/// # Examples
	/// ```
	/// use timebox::Slot;
	///
	/// let slot = Slot::from_instants("Lunch", 12_i64, 13);
	///
	/// assert_eq!(slot.duration(), 1);
	/// assert_eq!(Slot::from_instants("Backwards", 5_i64, 2).duration(), -3);
	/// ```
	pub fn from_instants(name: impl Into<String>, start: T, end: T) -> Self {
		Slot::new(name, start, end.duration_since(start))
	}

	/// Makes a new slot like [`Slot::new()`], but returns a
	/// [`NegativeDurationError`] if the duration is negative.
	///
	/// Zero durations are accepted. The check is made on the duration
	/// itself, so a negative duration is rejected even when the start is
	/// already at the earliest representable instant.
	///
	/// # Examples
	/// ```
	/// use timebox::{NegativeDurationError, Slot};
	///
	/// assert!(Slot::try_new("Ok", 0_i32, 0).is_ok());
	/// assert_eq!(
	/// 	Slot::try_new("Bad", 0_i32, -1),
	/// 	Err(NegativeDurationError {
	/// 		name: "Bad".to_string()
	/// 	})
	/// );
	/// ```
	pub fn try_new(
		name: impl Into<String>,
		start: T,
		duration: T::Duration,
	) -> Result<Self, NegativeDurationError> {
		// the end may saturate, so compare against a zero duration instead
		if duration < start.duration_since(start) {
			return Err(NegativeDurationError { name: name.into() });
		}
		Ok(Slot::new(name, start, duration))
	}

	/// Returns the name given to the slot.
	pub fn name(&self) -> &str {
		&self.name
	}
	/// Returns the start instant of the slot, which is contained in it.
	pub fn start(&self) -> T {
		self.start
	}
	/// Returns the duration of the slot.
	pub fn duration(&self) -> T::Duration {
		self.duration
	}
	/// Returns the end instant of the slot, which is not contained in it.
	pub fn end(&self) -> T {
		self.start.add_duration(self.duration)
	}

	/// Returns `true` if the slot contains no instant other than its
	/// start, which is the case for zero and negative durations.
	pub fn is_empty(&self) -> bool {
		self.end() <= self.start
	}

	/// Returns `true` if the given instant is inside the slot.
	///
	/// The start of the slot is always contained, even when the duration
	/// is zero or negative. Otherwise an instant is contained if it is
	/// strictly after the start and strictly before the end.
	///
	/// # Examples
	/// ```
	/// use timebox::Slot;
	///
	/// let slot = Slot::new("Test", 0_i64, 30);
	///
	/// assert_eq!(slot.contains(0), true);
	/// assert_eq!(slot.contains(29), true);
	/// assert_eq!(slot.contains(30), false);
	/// assert_eq!(slot.contains(-1), false);
	///
	/// let point = Slot::new("Point", 7_i64, 0);
	/// assert_eq!(point.contains(7), true);
	/// assert_eq!(point.contains(8), false);
	/// ```
	pub fn contains(&self, instant: T) -> bool {
		if instant == self.start {
			return true;
		}
		self.start < instant && instant < self.end()
	}

	/// Returns `true` if either slot's start is contained in the other.
	///
	/// Both directions are tested so this is symmetric. Note that this is
	/// deliberately a start-containment test: a zero-duration slot sitting
	/// exactly on the end of another slot does not overlap it.
	///
	/// # Examples
	/// ```
	/// use timebox::Slot;
	///
	/// let slot = Slot::new("Test", 0_i64, 30);
	///
	/// assert_eq!(slot.overlaps(&Slot::new("Later", 15, 30)), true);
	/// assert_eq!(slot.overlaps(&Slot::new("Earlier", -15, 30)), true);
	/// assert_eq!(slot.overlaps(&Slot::new("Touching", 30, 0)), false);
	/// ```
	pub fn overlaps(&self, other: &Slot<T>) -> bool {
		self.contains(other.start) || other.contains(self.start)
	}
}

impl<T> fmt::Display for Slot<T>
where
	T: InstantType + fmt::Display,
	T::Duration: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Slot{{{}, {}, {}}}", self.name, self.start, self.duration)
	}
}
