//! A module containing the [`InstantType`] trait and trait impls for the
//! `chrono` date-time types and the signed primitive integer datatypes.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// A trait for totally-ordered points in time which can be offset by a
/// signed duration. See the top-level module documentation for how
/// instants are used by [`Slot`](crate::Slot).
///
/// Both operations must be total: implementations saturate at the
/// edges of their domain rather than panicking. `duration_since` must
/// be exact for every pair of instants, so that
/// `earlier.add_duration(later.duration_since(earlier)) == later`
/// always holds. The signed integers use the next wider integer type as
/// their duration for this reason.
///
/// # Examples
/// ```
/// use timebox::InstantType;
///
/// assert_eq!(10_i64.add_duration(-4), 6);
/// assert_eq!(6_i64.duration_since(10), -4);
/// assert_eq!(i8::MAX.add_duration(1), i8::MAX);
/// assert_eq!(i8::MAX.duration_since(i8::MIN), 255_i16);
/// ```
pub trait InstantType: Ord + Copy {
	/// The signed duration type measuring the distance between two
	/// instants.
	type Duration: Ord + Copy;

	/// The instant `duration` after `self`, or before `self` if
	/// `duration` is negative.
	fn add_duration(self, duration: Self::Duration) -> Self;
	/// The signed duration from `earlier` to `self`, negative if
	/// `earlier` is actually later than `self`.
	fn duration_since(self, earlier: Self) -> Self::Duration;
}

macro_rules! impl_instant_type {
	() => {};
	($ident:ident => $wide:ident, $($t:tt)*) => {
		impl InstantType for $ident {
			type Duration = $wide;

			fn add_duration(self, duration: Self::Duration) -> Self {
				let end = (self as $wide).saturating_add(duration);
				$ident::try_from(end).unwrap_or(if end < 0 {
					$ident::MIN
				} else {
					$ident::MAX
				})
			}
			fn duration_since(self, earlier: Self) -> Self::Duration {
				self as $wide - earlier as $wide
			}
		}

		impl_instant_type!($($t)*);
	};
}

impl_instant_type!(
	i8 => i16,
	i16 => i32,
	i32 => i64,
	i64 => i128,
	isize => i128,
);

impl InstantType for DateTime<Utc> {
	type Duration = TimeDelta;

	fn add_duration(self, duration: TimeDelta) -> Self {
		self.checked_add_signed(duration).unwrap_or(
			if duration < TimeDelta::zero() {
				DateTime::<Utc>::MIN_UTC
			} else {
				DateTime::<Utc>::MAX_UTC
			},
		)
	}
	fn duration_since(self, earlier: Self) -> TimeDelta {
		self.signed_duration_since(earlier)
	}
}

impl InstantType for NaiveDateTime {
	type Duration = TimeDelta;

	fn add_duration(self, duration: TimeDelta) -> Self {
		self.checked_add_signed(duration).unwrap_or(
			if duration < TimeDelta::zero() {
				NaiveDateTime::MIN
			} else {
				NaiveDateTime::MAX
			},
		)
	}
	fn duration_since(self, earlier: Self) -> TimeDelta {
		self.signed_duration_since(earlier)
	}
}
