//! Append-only storage addressed by typed IDs.
//!
//! The simulator keeps its signal table in an [`Arena`]: entries are never
//! removed or reordered, so an ID handed out once stays valid. IDs minted by a
//! different arena are not detected by the type system; use
//! [`Arena::try_get`] where such an ID may show up.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A typed index into an [`Arena`].
pub trait ArenaId: Copy {
    /// Wraps a raw slot index.
    fn from_raw(index: u32) -> Self;

    /// Unwraps the raw slot index.
    fn as_raw(self) -> u32;
}

/// Dense storage of `T` keyed by `I`.
#[derive(Debug, Clone)]
pub struct Arena<I: ArenaId, T> {
    slots: Vec<T>,
    _id: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Appends `item` and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.slots.len() as u32);
        self.slots.push(item);
        id
    }

    /// Returns the entry for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this arena.
    pub fn get(&self, id: I) -> &T {
        &self.slots[id.as_raw() as usize]
    }

    /// Returns the entry for `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this arena.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.slots[id.as_raw() as usize]
    }

    /// Returns the entry for `id`, or `None` if it is out of range.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.slots.get(id.as_raw() as usize)
    }

    /// Returns the entry for `id` mutably, or `None` if it is out of range.
    pub fn try_get_mut(&mut self, id: I) -> Option<&mut T> {
        self.slots.get_mut(id.as_raw() as usize)
    }

    /// Returns the ID of the first entry matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<I> {
        self.slots
            .iter()
            .position(|item| pred(item))
            .map(|i| I::from_raw(i as u32))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing was allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(ID, &T)` in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Slot(u32);

    impl ArenaId for Slot {
        fn from_raw(index: u32) -> Self {
            Self(index)
        }

        fn as_raw(self) -> u32 {
            self.0
        }
    }

    #[test]
    fn ids_are_dense_and_stable() {
        let mut arena: Arena<Slot, &str> = Arena::new();
        let data = arena.alloc("a_data");
        let valid = arena.alloc("a_valid");
        assert_eq!((data, valid), (Slot(0), Slot(1)));
        assert_eq!(arena[data], "a_data");
        assert_eq!(arena[valid], "a_valid");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn index_mut_writes_through() {
        let mut arena: Arena<Slot, u64> = Arena::new();
        let id = arena.alloc(1);
        arena[id] = 7;
        assert_eq!(*arena.get(id), 7);
    }

    #[test]
    fn try_get_rejects_foreign_ids() {
        let mut arena: Arena<Slot, u8> = Arena::new();
        let id = arena.alloc(3);
        assert_eq!(arena.try_get(id), Some(&3));
        assert_eq!(arena.try_get(Slot(5)), None);
        assert!(arena.try_get_mut(Slot(1)).is_none());
        if let Some(v) = arena.try_get_mut(id) {
            *v = 4;
        }
        assert_eq!(arena[id], 4);
    }

    #[test]
    fn find_returns_first_match() {
        let mut arena: Arena<Slot, &str> = Arena::new();
        arena.alloc("rst");
        arena.alloc("r_ready");
        arena.alloc("r_ready");
        assert_eq!(arena.find(|s| *s == "r_ready"), Some(Slot(1)));
        assert_eq!(arena.find(|s| s.is_empty()), None);
    }

    #[test]
    fn iter_in_allocation_order() {
        let mut arena: Arena<Slot, u32> = Arena::default();
        assert!(arena.is_empty());
        arena.alloc(10);
        arena.alloc(20);
        let collected: Vec<_> = arena.iter().map(|(id, v)| (id.0, *v)).collect();
        assert_eq!(collected, vec![(0, 10), (1, 20)]);
    }
}
