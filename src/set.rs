//! A module containing [`Set`].

use alloc::vec::Vec;
use core::fmt;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::{InstantType, Slot, SlotRef};

/// An ordered collection of [`SlotRef`]s which may overlap each other.
///
/// `T` is the generic type parameter for the instant type the slots are
/// over, it defaults to [`DateTime<Utc>`].
///
/// Slots are kept in insertion order and that order matters: it is the
/// order queries visit slots in and the order [`Set::split_linear()`]
/// distributes them in. The set stores handles, not copies, so the same
/// slot may appear in several sets (or several times in one set) and
/// replacing a slot through any of its handles is visible through the set.
///
/// # Examples
/// ```
/// use timebox::{Set, Slot, SlotRef};
///
/// let mut set = Set::new();
/// set.add(SlotRef::new(Slot::new("First", 0_i64, 15)));
/// set.add(SlotRef::new(Slot::new("Second", 15, 15)));
/// set.add(SlotRef::new(Slot::new("Third", 25, 15)));
///
/// assert_eq!(set.contains(15), true);
/// assert_eq!(set.contains(40), false);
///
/// let lanes = set.split_linear();
/// assert_eq!(lanes.len(), 2);
/// assert_eq!(lanes[0].slots(), &set.slots()[..2]);
/// assert_eq!(lanes[1].slots(), &set.slots()[2..]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Set<T: InstantType = DateTime<Utc>> {
	slots: SmallVec<[SlotRef<T>; 4]>,
}

impl<T> Set<T>
where
	T: InstantType,
{
	/// Makes a new, empty `Set`.
	///
	/// # Examples
	/// ```
	/// use timebox::Set;
	///
	/// let set: Set<i64> = Set::new();
	/// assert!(set.is_empty());
	/// ```
	pub fn new() -> Self {
		Set {
			slots: SmallVec::new(),
		}
	}

	/// Appends a slot to the end of the set.
	///
	/// The handle is stored as-is, so later replacements of the slot
	/// through any clone of the handle affect the set.
	pub fn add(&mut self, slot: SlotRef<T>) {
		self.slots.push(slot);
	}

	/// Returns the slots in the set in insertion order.
	pub fn slots(&self) -> &[SlotRef<T>] {
		&self.slots
	}

	/// Returns the number of slots in the set.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns `true` if the set contains no slots.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Returns an iterator over the slots in the set in insertion order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SlotRef<T>> {
		self.slots.iter()
	}

	/// Returns every slot in the set satisfying `predicate`, in insertion
	/// order. The result is empty if none do.
	///
	/// # Examples
	/// ```
	/// use timebox::{Set, Slot, SlotRef};
	///
	/// let set = Set::from_iter([
	/// 	SlotRef::new(Slot::new("First", 0_i64, 15)),
	/// 	SlotRef::new(Slot::new("Second", 15, 15)),
	/// 	SlotRef::new(Slot::new("Fourth", -60, 20)),
	/// ]);
	///
	/// let found = set.find(|slot| slot.name().starts_with('F'));
	/// assert_eq!(found, [set.slots()[0].clone(), set.slots()[2].clone()]);
	/// ```
	pub fn find<F>(&self, mut predicate: F) -> Vec<SlotRef<T>>
	where
		F: FnMut(&Slot<T>) -> bool,
	{
		self.slots
			.iter()
			.filter(|slot| predicate(&slot.borrow()))
			.cloned()
			.collect()
	}

	/// Returns `true` if any slot in the set satisfies `predicate`,
	/// stopping at the first one that does. Always `false` for an empty
	/// set.
	pub fn any<F>(&self, mut predicate: F) -> bool
	where
		F: FnMut(&Slot<T>) -> bool,
	{
		self.slots.iter().any(|slot| predicate(&slot.borrow()))
	}

	/// Returns `true` if every slot in the set satisfies `predicate`,
	/// stopping at the first one that does not. Always `true` for an
	/// empty set.
	pub fn all<F>(&self, mut predicate: F) -> bool
	where
		F: FnMut(&Slot<T>) -> bool,
	{
		self.slots.iter().all(|slot| predicate(&slot.borrow()))
	}

	/// Returns `true` if any slot in the set contains the given instant.
	///
	/// See [`Slot::contains()`] for the boundary rules.
	pub fn contains(&self, instant: T) -> bool {
		self.any(|slot| slot.contains(instant))
	}

	/// Returns `true` if any slot in the set overlaps the given slot.
	///
	/// See [`Slot::overlaps()`] for what counts as overlapping.
	pub fn overlaps(&self, slot: &Slot<T>) -> bool {
		self.any(|member| member.overlaps(slot))
	}

	/// Returns `true` if no two slots in the set overlap each other,
	/// which is the guarantee every lane from [`Set::split_linear()`]
	/// holds.
	///
	/// A set holding the same handle twice always overlaps itself.
	pub fn is_non_overlapping(&self) -> bool {
		!self
			.slots
			.iter()
			.tuple_combinations()
			.any(|(a, b)| a.borrow().overlaps(&b.borrow()))
	}

	/// Distributes the slots of the set over as many new sets ("lanes")
	/// as needed so that no lane contains two overlapping slots.
	///
	/// This is a greedy first-fit: slots are taken in insertion order and
	/// each goes into the first lane it does not overlap, or into a new
	/// lane appended to the end if it overlaps all of them. The result is
	/// deterministic for a given insertion order but is not guaranteed to
	/// use the fewest possible lanes.
	///
	/// Every slot of the set ends up in exactly one lane and lanes keep
	/// the relative insertion order of their slots. An empty set gives no
	/// lanes at all.
	///
	/// # Examples
	/// ```
	/// use timebox::{Set, Slot, SlotRef};
	///
	/// let set = Set::from_iter([
	/// 	SlotRef::new(Slot::new("First", 0_i64, 15)),
	/// 	SlotRef::new(Slot::new("Second", 15, 15)),
	/// 	SlotRef::new(Slot::new("Third", 25, 15)),
	/// 	SlotRef::new(Slot::new("Fourth", -60, 20)),
	/// ]);
	///
	/// let lanes = set.split_linear();
	///
	/// let names = lanes
	/// 	.iter()
	/// 	.map(|lane| {
	/// 		lane.iter()
	/// 			.map(|slot| slot.borrow().name().to_string())
	/// 			.collect::<Vec<_>>()
	/// 	})
	/// 	.collect::<Vec<_>>();
	///
	/// assert_eq!(
	/// 	names,
	/// 	[vec!["First", "Second", "Fourth"], vec!["Third"]]
	/// );
	/// ```
	pub fn split_linear(&self) -> Vec<Set<T>> {
		let mut lanes: Vec<Set<T>> = Vec::new();

		for slot_ref in self.slots.iter() {
			let slot = slot_ref.borrow();
			match lanes.iter_mut().find(|lane| !lane.overlaps(&slot)) {
				Some(lane) => lane.add(slot_ref.clone()),
				None => {
					trace!(
						"slot {:?} overlaps all {} lanes, opening a new lane",
						slot.name(),
						lanes.len()
					);
					let mut lane = Set::new();
					lane.add(slot_ref.clone());
					lanes.push(lane);
				}
			}
		}

		debug!(
			"split {} slots into {} lanes",
			self.slots.len(),
			lanes.len()
		);
		lanes
	}
}

// Trait Impls ==========================

impl<T> Default for Set<T>
where
	T: InstantType,
{
	fn default() -> Self {
		Set::new()
	}
}

impl<T> FromIterator<SlotRef<T>> for Set<T>
where
	T: InstantType,
{
	fn from_iter<It: IntoIterator<Item = SlotRef<T>>>(iter: It) -> Self {
		let mut set = Set::new();
		set.extend(iter);
		set
	}
}

impl<T> Extend<SlotRef<T>> for Set<T>
where
	T: InstantType,
{
	fn extend<It: IntoIterator<Item = SlotRef<T>>>(&mut self, iter: It) {
		for slot in iter {
			self.add(slot);
		}
	}
}

impl<T> IntoIterator for Set<T>
where
	T: InstantType,
{
	type Item = SlotRef<T>;
	type IntoIter = IntoIter<T>;
	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self.slots.into_iter(),
		}
	}
}

impl<'a, T> IntoIterator for &'a Set<T>
where
	T: InstantType,
{
	type Item = &'a SlotRef<T>;
	type IntoIter = core::slice::Iter<'a, SlotRef<T>>;
	fn into_iter(self) -> Self::IntoIter {
		self.slots.iter()
	}
}

/// An owning iterator over the slots of a [`Set`].
///
/// This `struct` is created by the [`into_iter`] method on
/// [`Set`] (provided by the [`IntoIterator`] trait). See
/// its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
/// [`IntoIterator`]: core::iter::IntoIterator
pub struct IntoIter<T: InstantType> {
	inner: smallvec::IntoIter<[SlotRef<T>; 4]>,
}
impl<T> Iterator for IntoIter<T>
where
	T: InstantType,
{
	type Item = SlotRef<T>;
	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next()
	}
}

impl<T> fmt::Debug for Set<T>
where
	T: InstantType,
	Slot<T>: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.slots.iter()).finish()
	}
}

impl<T> fmt::Display for Set<T>
where
	T: InstantType,
	Slot<T>: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Set[{}]", self.slots.iter().format(", "))
	}
}

#[cfg(feature = "serde")]
mod serde {
	use core::marker::PhantomData;

	use serde::de::{SeqAccess, Visitor};
	use serde::ser::SerializeSeq;
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	use crate::{InstantType, Set, Slot, SlotRef};

	impl<T> Serialize for Set<T>
	where
		T: InstantType,
		Slot<T>: Serialize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			let mut seq = serializer.serialize_seq(Some(self.len()))?;
			for slot in self.iter() {
				seq.serialize_element(slot)?;
			}
			seq.end()
		}
	}

	impl<'de, T> Deserialize<'de> for Set<T>
	where
		T: InstantType,
		Slot<T>: Deserialize<'de>,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			deserializer.deserialize_seq(SetVisitor { t: PhantomData })
		}
	}

	struct SetVisitor<T> {
		t: PhantomData<T>,
	}

	impl<'de, T> Visitor<'de> for SetVisitor<T>
	where
		T: InstantType,
		Slot<T>: Deserialize<'de>,
	{
		type Value = Set<T>;

		fn expecting(
			&self,
			formatter: &mut core::fmt::Formatter,
		) -> core::fmt::Result {
			formatter.write_str("a sequence of slots")
		}

		fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
		where
			A: SeqAccess<'de>,
		{
			let mut set = Set::new();
			while let Some(slot) = access.next_element::<SlotRef<T>>()? {
				set.add(slot);
			}
			Ok(set)
		}
	}
}

#[cfg(test)]
mod tests {
	use chrono::TimeDelta;
	use pretty_assertions::assert_eq;

	use super::*;

	fn now() -> DateTime<Utc> {
		DateTime::from_timestamp(1_700_000_000, 500_000_000).unwrap()
	}

	fn basic() -> Set {
		let now = now();
		Set::from_iter([
			SlotRef::new(Slot::new("First", now, TimeDelta::seconds(15))),
			SlotRef::new(Slot::new(
				"Second",
				now + TimeDelta::seconds(15),
				TimeDelta::seconds(15),
			)),
			SlotRef::new(Slot::new(
				"Third",
				now + TimeDelta::seconds(25),
				TimeDelta::seconds(15),
			)),
			SlotRef::new(Slot::new(
				"Fourth",
				now - TimeDelta::minutes(1),
				TimeDelta::seconds(20),
			)),
		])
	}

	fn starts_with_letter(letter: char) -> impl Fn(&Slot) -> bool {
		move |slot| slot.name().starts_with(letter)
	}

	fn picks<T: InstantType>(set: &Set<T>, indices: &[usize]) -> Vec<SlotRef<T>> {
		indices.iter().map(|&i| set.slots()[i].clone()).collect()
	}

	#[test]
	fn add_stores_the_handle() {
		let mut set = Set::new();
		let slot = SlotRef::new(Slot::new("Test", now(), TimeDelta::seconds(15)));

		set.add(slot.clone());

		assert_eq!(set.len(), 1);
		assert!(SlotRef::ptr_eq(&set.slots()[0], &slot));
	}

	#[test]
	fn add_allows_duplicates() {
		let mut set = Set::new();
		let slot = SlotRef::new(Slot::new("Twice", 0_i64, 10));

		set.add(slot.clone());
		set.add(slot.clone());

		assert_eq!(set.slots(), [slot.clone(), slot]);
		assert!(!set.is_non_overlapping());
	}

	#[test]
	fn replacing_a_slot_is_visible_through_the_set() {
		let set = basic();
		let later = now() + TimeDelta::hours(1);
		assert!(!set.contains(later));

		set.slots()[2].replace(Slot::new("Third", later, TimeDelta::seconds(1)));

		assert!(set.contains(later));
		assert!(!set.contains(now() + TimeDelta::seconds(35)));
	}

	#[test]
	fn contains_tests() {
		let set = basic();
		let now = now();
		let nanosecond = TimeDelta::nanoseconds(1);
		let minute = TimeDelta::minutes(1);

		let test_cases = [
			// start of first
			(now, true),
			// end of first, but in second
			(now + TimeDelta::seconds(15), true),
			// end of second, but in third
			(now + TimeDelta::seconds(30), true),
			// end of third
			(now + TimeDelta::seconds(40), false),
			// before first
			(now - nanosecond, false),
			// start of fourth
			(now - minute, true),
			// last nanosecond of fourth
			(now - minute + TimeDelta::seconds(20) - nanosecond, true),
			// end of fourth
			(now - minute + TimeDelta::seconds(20), false),
			// before fourth
			(now - minute - nanosecond, false),
		];

		for (instant, expected) in test_cases {
			if set.contains(instant) != expected {
				dbg!(&set, instant);
				panic!("set.contains() expected to be {expected}");
			}
		}
	}

	#[test]
	fn find_tests() {
		let set = basic();

		assert_eq!(set.find(starts_with_letter('F')), picks(&set, &[0, 3]));
		assert_eq!(
			set.find(|slot| slot.contains(now() + TimeDelta::seconds(25))),
			picks(&set, &[1, 2])
		);
		assert!(set.find(starts_with_letter('X')).is_empty());
	}

	#[test]
	fn all_and_any_tests() {
		let set = basic();

		assert!(set.any(starts_with_letter('F')));
		assert!(!set.all(starts_with_letter('F')));
		assert!(!set.any(starts_with_letter('X')));
		assert!(set.all(|slot| slot.duration() >= TimeDelta::seconds(1)));
	}

	#[test]
	fn queries_short_circuit() {
		let set = basic();

		let mut visited = 0;
		assert!(set.any(|_| {
			visited += 1;
			true
		}));
		assert_eq!(visited, 1);

		let mut visited = 0;
		assert!(!set.all(|slot| {
			visited += 1;
			slot.name() != "Second"
		}));
		assert_eq!(visited, 2);
	}

	#[test]
	fn empty_set_queries() {
		let set: Set<i64> = Set::new();

		assert!(set.all(|_| false));
		assert!(!set.any(|_| true));
		assert!(!set.contains(0));
		assert!(!set.overlaps(&Slot::new("Anything", 0, 100)));
		assert!(set.find(|_| true).is_empty());
		assert!(set.split_linear().is_empty());
		assert!(set.is_non_overlapping());
	}

	#[test]
	fn overlaps_tests() {
		let set = basic();
		let now = now();

		assert!(set.overlaps(&Slot::new("Inside", now, TimeDelta::seconds(1))));
		assert!(set.overlaps(&Slot::new(
			"Covering",
			now - TimeDelta::hours(1),
			TimeDelta::hours(2),
		)));
		assert!(!set.overlaps(&Slot::new(
			"Gap",
			now - TimeDelta::seconds(40),
			TimeDelta::seconds(10),
		)));
		assert!(!set.overlaps(&Slot::new(
			"After",
			now + TimeDelta::seconds(40),
			TimeDelta::seconds(10),
		)));
	}

	#[test]
	fn split_linear_tests() {
		let set = basic();

		let lanes = set.split_linear();

		assert_eq!(lanes.len(), 2);
		assert_eq!(lanes[0].slots(), picks(&set, &[0, 1, 3]));
		assert_eq!(lanes[1].slots(), picks(&set, &[2]));
	}

	#[test]
	fn split_linear_partitions_the_set() {
		let set: Set<i64> = Set::from_iter(
			[
				(0, 10),
				(5, 10),
				(5, 1),
				(10, 0),
				(10, 10),
				(-5, 20),
				(3, -2),
				(18, 4),
				(0, 0),
				(30, 5),
			]
			.into_iter()
			.enumerate()
			.map(|(i, (start, duration))| {
				SlotRef::new(Slot::new(format!("{i}"), start, duration))
			}),
		);

		let lanes = set.split_linear();

		for lane in lanes.iter() {
			assert!(!lane.is_empty());
			assert!(lane.is_non_overlapping(), "{lane}");
		}

		let mut distributed = lanes.iter().flat_map(Set::iter).collect::<Vec<_>>();
		assert_eq!(distributed.len(), set.len());
		for slot in set.iter() {
			let position = distributed
				.iter()
				.position(|other| SlotRef::ptr_eq(slot, other))
				.unwrap();
			distributed.swap_remove(position);
		}
		assert!(distributed.is_empty());
	}

	#[test]
	fn split_linear_is_first_fit_not_optimal() {
		// {a, d} and {c, b} would be two lanes, but a and b share the
		// first lane so c and d each need a new one
		let set = Set::from_iter([
			SlotRef::new(Slot::new("a", 0_i64, 2)),
			SlotRef::new(Slot::new("b", 6, 2)),
			SlotRef::new(Slot::new("c", 1, 3)),
			SlotRef::new(Slot::new("d", 3, 4)),
		]);

		let lanes = set.split_linear();

		assert_eq!(lanes.len(), 3);
		assert_eq!(lanes[0].slots(), picks(&set, &[0, 1]));
		assert_eq!(lanes[1].slots(), picks(&set, &[2]));
		assert_eq!(lanes[2].slots(), picks(&set, &[3]));
	}

	#[test]
	fn split_linear_is_deterministic() {
		let set = basic();

		assert_eq!(set.split_linear(), set.split_linear());
	}

	#[test]
	fn split_linear_on_a_lane_gives_that_lane() {
		let lanes = basic().split_linear();

		for lane in lanes {
			assert_eq!(lane.split_linear(), vec![lane.clone()]);
		}
	}

	#[test]
	fn split_linear_puts_duplicates_in_separate_lanes() {
		let slot = SlotRef::new(Slot::new("Twice", 0_i64, 10));
		let set = Set::from_iter([slot.clone(), slot.clone()]);

		let lanes = set.split_linear();

		assert_eq!(lanes.len(), 2);
		assert_eq!(lanes[0].slots(), [slot.clone()]);
		assert_eq!(lanes[1].slots(), [slot]);
	}

	#[test]
	fn lanes_share_handles_with_the_source() {
		let set = basic();
		let lanes = set.split_linear();
		let later = now() + TimeDelta::days(1);

		set.slots()[3].replace(Slot::new("Fourth", later, TimeDelta::seconds(1)));

		assert!(lanes[0].contains(later));
	}

	#[test]
	fn iterating_by_reference_and_by_value() {
		let set = basic();

		let mut names = Vec::new();
		for slot in &set {
			names.push(slot.borrow().name().to_string());
		}
		assert_eq!(names, ["First", "Second", "Third", "Fourth"]);

		let handles = set.clone().into_iter().collect::<Vec<_>>();
		assert_eq!(handles, set.slots());

		let reversed = set
			.iter()
			.rev()
			.map(|slot| slot.borrow().name().to_string())
			.collect::<Vec<_>>();
		assert_eq!(reversed, ["Fourth", "Third", "Second", "First"]);
	}

	#[test]
	fn display_lists_every_slot() {
		let set = Set::from_iter([
			SlotRef::new(Slot::new("a", 0_i64, 1)),
			SlotRef::new(Slot::new("b", 1, 2)),
		]);

		assert_eq!(format!("{set}"), "Set[Slot{a, 0, 1}, Slot{b, 1, 2}]");
		assert_eq!(format!("{}", Set::<i64>::new()), "Set[]");
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serde_round_trip_makes_fresh_handles() {
		let set = Set::from_iter([
			SlotRef::new(Slot::new("First", 0_i64, 15)),
			SlotRef::new(Slot::new("Second", 15, 15)),
		]);

		let json = serde_json::to_string(&set).unwrap();
		assert_eq!(
			json,
			r#"[{"name":"First","start":0,"duration":15},{"name":"Second","start":15,"duration":15}]"#
		);

		let back: Set<i64> = serde_json::from_str(&json).unwrap();

		assert_eq!(back.len(), set.len());
		for (a, b) in set.iter().zip(back.iter()) {
			assert_eq!(*a.borrow(), *b.borrow());
			assert!(!SlotRef::ptr_eq(a, b));
		}
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serde_round_trip_with_date_times() {
		let set = basic();

		let json = serde_json::to_string(&set).unwrap();
		let back: Set = serde_json::from_str(&json).unwrap();

		assert_eq!(back.len(), set.len());
		for (a, b) in set.iter().zip(back.iter()) {
			assert_eq!(*a.borrow(), *b.borrow());
			assert!(!SlotRef::ptr_eq(a, b));
		}
		assert!(back.contains(now() + TimeDelta::seconds(15)));
		assert_eq!(back.split_linear().len(), 2);
	}
}
