//! Dense typed identifiers and the arenas they index

#![allow(clippy::cast_possible_truncation)] // Ids are u32; more than 4G entities per kind is unsupported

use std::fmt;
use std::marker::PhantomData;

/// An identifier that indexes an [`Arena`]
pub trait ArenaId: Copy + Eq + std::hash::Hash {
    /// Build the id of the entry stored at `index`
    fn from_index(index: usize) -> Self;

    /// The position of the identified entry in its arena
    fn index(self) -> usize;
}

/// Declare a newtype identifier with dense, insertion-ordered values
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from its raw value
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw value of this id
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::id::ArenaId for $name {
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

pub(crate) use define_id;

/// Append-only storage addressed by dense ids
#[derive(Clone)]
pub struct Arena<I, T> {
    items: Vec<T>,
    _id: PhantomData<fn() -> I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Store `item`, returning its id
    pub fn push(&mut self, item: T) -> I {
        let id = I::from_index(self.items.len());
        self.items.push(item);
        id
    }

    /// Look up an entry
    #[must_use]
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    /// Look up an entry mutably
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (I::from_index(index), item))
    }

    /// Iterate ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.items.len()).map(I::from_index)
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T: fmt::Debug> fmt::Debug for Arena<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<I: ArenaId, T> std::ops::Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.items[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_id!(TestId, "test");

    #[test]
    fn test_ids_are_dense_and_ordered() {
        let mut arena: Arena<TestId, &str> = Arena::new();
        let a = arena.push("a");
        let b = arena.push("b");
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(arena[b], "b");
        assert_eq!(arena.get(TestId::new(2)), None);
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(a.to_string(), "test#0");
    }
}
