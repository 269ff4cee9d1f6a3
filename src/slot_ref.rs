//! A module containing [`SlotRef`].

use alloc::rc::Rc;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use chrono::{DateTime, Utc};

use crate::{InstantType, Slot};

/// A shared handle to a [`Slot`].
///
/// Cloning a `SlotRef` does not clone the slot, it makes another handle to
/// the same slot. This is how a [`Set`](crate::Set) stores its slots, so
/// one slot can be held by several sets at once and replacing it through
/// any one handle is visible through all of them.
///
/// Equality between handles is identity: two handles are equal only if
/// they point at the same slot, regardless of the slots' values.
///
/// # Examples
/// ```
/// use timebox::{Slot, SlotRef};
///
/// let a = SlotRef::new(Slot::new("Test", 0_i64, 10));
/// let b = a.clone();
/// let c = SlotRef::new(Slot::new("Test", 0_i64, 10));
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
///
/// b.replace(Slot::new("Moved", 5, 10));
/// assert_eq!(a.borrow().name(), "Moved");
/// ```
pub struct SlotRef<T: InstantType = DateTime<Utc>> {
	inner: Rc<RefCell<Slot<T>>>,
}

impl<T> SlotRef<T>
where
	T: InstantType,
{
	/// Makes a new handle owning the given slot.
	pub fn new(slot: Slot<T>) -> Self {
		SlotRef {
			inner: Rc::new(RefCell::new(slot)),
		}
	}

	/// Immutably borrows the slot behind this handle.
	///
	/// # Panics
	///
	/// Panics if the slot is currently mutably borrowed.
	pub fn borrow(&self) -> Ref<'_, Slot<T>> {
		self.inner.borrow()
	}

	/// Mutably borrows the slot behind this handle.
	///
	/// # Panics
	///
	/// Panics if the slot is currently borrowed.
	pub fn borrow_mut(&self) -> RefMut<'_, Slot<T>> {
		self.inner.borrow_mut()
	}

	/// Replaces the slot behind this handle, returning the old one.
	///
	/// # Panics
	///
	/// Panics if the slot is currently borrowed.
	pub fn replace(&self, slot: Slot<T>) -> Slot<T> {
		self.inner.replace(slot)
	}

	/// Returns `true` if both handles point at the same slot.
	pub fn ptr_eq(this: &Self, other: &Self) -> bool {
		Rc::ptr_eq(&this.inner, &other.inner)
	}
}

impl<T> Clone for SlotRef<T>
where
	T: InstantType,
{
	fn clone(&self) -> Self {
		SlotRef {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T> PartialEq for SlotRef<T>
where
	T: InstantType,
{
	fn eq(&self, other: &Self) -> bool {
		SlotRef::ptr_eq(self, other)
	}
}
impl<T> Eq for SlotRef<T> where T: InstantType {}

impl<T> From<Slot<T>> for SlotRef<T>
where
	T: InstantType,
{
	fn from(slot: Slot<T>) -> Self {
		SlotRef::new(slot)
	}
}

impl<T> fmt::Debug for SlotRef<T>
where
	T: InstantType,
	Slot<T>: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SlotRef").field(&*self.borrow()).finish()
	}
}

impl<T> fmt::Display for SlotRef<T>
where
	T: InstantType,
	Slot<T>: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&*self.borrow(), f)
	}
}

#[cfg(feature = "serde")]
mod serde {
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	use crate::{InstantType, Slot, SlotRef};

	impl<T> Serialize for SlotRef<T>
	where
		T: InstantType,
		Slot<T>: Serialize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			self.borrow().serialize(serializer)
		}
	}

	impl<'de, T> Deserialize<'de> for SlotRef<T>
	where
		T: InstantType,
		Slot<T>: Deserialize<'de>,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			Slot::deserialize(deserializer).map(SlotRef::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn clones_alias_the_same_slot() {
		let original = SlotRef::new(Slot::new("Before", 0_i64, 10));
		let alias = original.clone();

		let old = alias.replace(Slot::new("After", 20, 5));

		assert_eq!(old, Slot::new("Before", 0, 10));
		assert_eq!(*original.borrow(), Slot::new("After", 20, 5));
		assert!(SlotRef::ptr_eq(&original, &alias));
	}

	#[test]
	fn equality_is_identity() {
		let a = SlotRef::new(Slot::new("Same", 0_i64, 10));
		let b = SlotRef::new(Slot::new("Same", 0_i64, 10));

		assert_eq!(*a.borrow(), *b.borrow());
		assert_ne!(a, b);
		assert_eq!(a, a.clone());
	}

	#[test]
	fn borrow_mut_is_visible_through_aliases() {
		let a = SlotRef::from(Slot::new("Test", 0_i64, 10));
		let b = a.clone();

		*b.borrow_mut() = Slot::from_instants("Test", 0, 30);

		assert_eq!(a.borrow().end(), 30);
	}

	#[test]
	fn display_and_debug_delegate_to_slot() {
		let slot_ref = SlotRef::new(Slot::new("Test", 1_i64, 2));

		assert_eq!(format!("{slot_ref}"), "Slot{Test, 1, 2}");
		assert_eq!(
			format!("{slot_ref:?}"),
			"SlotRef(Slot { name: \"Test\", start: 1, duration: 2 })"
		);
	}
}
