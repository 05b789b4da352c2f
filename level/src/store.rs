//! Ordered entity storage with stable handles.
//!
//! Entities live in a generational arena so a handle keeps pointing at the
//! same entity no matter what else is added or removed, and a stale handle
//! never aliases a newer entity. The arena does not remember insertion order,
//! which the wire format depends on, so each store also keeps the handles in
//! order; the position of a handle in that list is its index on save.

use std::collections::HashMap;
use std::hash::Hash;

use generational_arena::{Arena, Index};

pub trait Handle: Copy + Eq + Hash + Ord {
    fn from_index(index: Index) -> Self;
    fn index(self) -> Index;
}

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Index);

        impl Handle for $name {
            fn from_index(index: Index) -> Self {
                $name(index)
            }

            fn index(self) -> Index {
                self.0
            }
        }
    };
}

handle!(
    /// Handle to a `Vertex` in a `Level`
    VertexId
);
handle!(
    /// Handle to a `LineDef` in a `Level`
    LinedefId
);
handle!(
    /// Handle to a `SideDef` in a `Level`
    SidedefId
);
handle!(
    /// Handle to a `Sector` in a `Level`
    SectorId
);
handle!(
    /// Handle to a `Thing` in a `Level`
    ThingId
);

#[derive(Debug, Clone)]
pub struct Store<H, T> {
    arena: Arena<T>,
    order: Vec<H>,
}

impl<H: Handle, T> Default for Store<H, T> {
    fn default() -> Self {
        Store {
            arena: Arena::new(),
            order: Vec::new(),
        }
    }
}

impl<H: Handle, T> Store<H, T> {
    pub fn insert(&mut self, item: T) -> H {
        let handle = H::from_index(self.arena.insert(item));
        self.order.push(handle);
        handle
    }

    pub fn remove(&mut self, handle: H) -> Option<T> {
        let item = self.arena.remove(handle.index())?;
        self.order.retain(|h| *h != handle);
        Some(item)
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        self.arena.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.arena.get_mut(handle.index())
    }

    pub fn contains(&self, handle: H) -> bool {
        self.arena.contains(handle.index())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in wire order
    pub fn ids(&self) -> &[H] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |h| self.arena.get(h.index()).map(|item| (*h, item)))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.arena.iter_mut().map(|(_, item)| item)
    }

    pub fn position(&self, handle: H) -> Option<usize> {
        self.order.iter().position(|h| *h == handle)
    }

    /// Handle to wire index for every entity, for translating references back
    /// to indexes in one pass
    pub fn positions(&self) -> HashMap<H, usize> {
        self.order.iter().enumerate().map(|(i, h)| (*h, i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Store, VertexId};

    #[test]
    fn order_survives_removal() {
        let mut store: Store<VertexId, &str> = Store::default();
        let a = store.insert("a");
        let b = store.insert("b");
        let c = store.insert("c");
        assert_eq!(store.remove(b), Some("b"));
        let d = store.insert("d");

        assert_eq!(store.ids(), &[a, c, d]);
        assert_eq!(store.position(d), Some(2));
        let values: Vec<&str> = store.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["a", "c", "d"]);
    }

    #[test]
    fn stale_handle_misses() {
        let mut store: Store<VertexId, u8> = Store::default();
        let a = store.insert(1);
        store.remove(a);
        let b = store.insert(2);
        assert!(!store.contains(a));
        assert_eq!(store.get(a), None);
        assert_eq!(store.get(b), Some(&2));
        assert_eq!(store.remove(a), None);
        assert_eq!(store.len(), 1);
    }
}
