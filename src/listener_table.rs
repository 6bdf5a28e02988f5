//! Reference counting of adapter-side [`Listener`] wrappers.

use crate::value::Listener;
use core::fmt::{self, Debug, Formatter};
use hashbrown::{hash_map::Entry, HashMap};
use num_traits::{CheckedAdd, CheckedSub, One, Zero};

struct Bound<C, W> {
	listener: Listener,
	count: C,
	wrapper: W,
}

/// One wrapper per distinct [`Listener`], counted per binding.
///
/// Wrappers whose count reached zero stay cached until [collected](`ListenerTable::collect`), so a listener that is
/// unbound and rebound during the same update keeps its wrapper.
///
/// Each entry holds on to its [`Listener`], so its [id](`Listener::id`) can't be reused while the entry exists.
pub(crate) struct ListenerTable<W, C = u16> {
	bound: HashMap<usize, Bound<C, W>>,
}

impl<W, C> Default for ListenerTable<W, C> {
	fn default() -> Self {
		Self { bound: HashMap::new() }
	}
}

impl<W, C: CheckedAdd + CheckedSub + One + Zero> ListenerTable<W, C> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Counts one more binding of `listener`, wrapping it first if it isn't known yet.
	pub fn bind(&mut self, listener: &Listener, wrap: impl FnOnce(&Listener) -> W) -> Result<&W, CountSaturatedError> {
		match self.bound.entry(listener.id()) {
			Entry::Occupied(occupied) => {
				let bound = occupied.into_mut();
				bound.count = bound.count.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok(&bound.wrapper)
			}
			Entry::Vacant(vacant) => {
				let bound = vacant.insert(Bound {
					listener: listener.clone(),
					count: C::one(),
					wrapper: wrap(listener),
				});
				Ok(&bound.wrapper)
			}
		}
	}

	/// Counts one binding of `listener` less. Returns its wrapper, or [`None`] if `listener` was never bound.
	pub fn unbind(&mut self, listener: &Listener) -> Result<Option<&W>, CountSaturatedError> {
		match self.bound.get_mut(&listener.id()) {
			Some(bound) => {
				bound.count = bound.count.checked_sub(&C::one()).ok_or(CountSaturatedError)?;
				Ok(Some(&bound.wrapper))
			}
			None => Ok(None),
		}
	}

	/// Drops the wrappers of listeners without bindings. Returns how many were dropped.
	pub fn collect(&mut self) -> usize {
		let before = self.bound.len();
		self.bound.retain(|_, bound| !bound.count.is_zero());
		before - self.bound.len()
	}

	/// Including wrappers that aren't bound anymore but weren't collected yet.
	pub fn len(&self) -> usize {
		self.bound.len()
	}

	pub fn capacity(&self) -> usize {
		self.bound.capacity()
	}
}

impl<W, C: Debug> Debug for ListenerTable<W, C> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.bound.values().map(|bound| (&bound.listener, &bound.count)))
			.finish()
	}
}

/// A binding count over- or underflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CountSaturatedError;

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::Cell;

	#[test]
	fn wraps_once_per_listener() {
		let wrapped = Cell::new(0);
		let f = Listener::new(|_| ());
		let mut table = ListenerTable::<usize>::new();

		for _ in 0..3 {
			let wrapper = *table
				.bind(&f, |_| {
					wrapped.set(wrapped.get() + 1);
					wrapped.get()
				})
				.unwrap();
			assert_eq!(wrapper, 1);
		}
		assert_eq!(wrapped.get(), 1);
		assert_eq!(table.len(), 1);
	}

	#[test]
	fn collects_only_unbound() {
		let f = Listener::new(|_| ());
		let g = Listener::new(|_| ());
		let unknown = Listener::new(|_| ());
		let mut table = ListenerTable::<&str>::new();
		table.bind(&f, |_| "f").unwrap();
		table.bind(&f, |_| "f").unwrap();
		table.bind(&g, |_| "g").unwrap();

		assert_eq!(table.unbind(&f).unwrap().copied(), Some("f"));
		assert_eq!(table.unbind(&g).unwrap().copied(), Some("g"));
		assert_eq!(table.unbind(&unknown).unwrap(), None);

		assert_eq!(table.collect(), 1);
		assert_eq!(table.len(), 1);
		assert_eq!(table.unbind(&f).unwrap().copied(), Some("f"));
		assert_eq!(table.collect(), 1);
		assert_eq!(table.len(), 0);
	}

	#[test]
	fn saturation_is_reported() {
		let f = Listener::new(|_| ());
		let mut table = ListenerTable::<(), u8>::new();
		table.bind(&f, |_| ()).unwrap();
		table.unbind(&f).unwrap();
		assert_eq!(table.unbind(&f).unwrap_err(), CountSaturatedError);

		for _ in 0..u8::MAX {
			table.bind(&f, |_| ()).unwrap();
		}
		assert_eq!(table.bind(&f, |_| ()).unwrap_err(), CountSaturatedError);
	}
}
