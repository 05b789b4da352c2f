use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Non-owning reverse references: for each referenced entity, the set of
/// entities pointing at it. Only the `Level` mutation methods touch these so
/// the forward and reverse sides always agree.
#[derive(Debug, Clone)]
pub struct BackRefs<K, V> {
    map: HashMap<K, BTreeSet<V>>,
}

impl<K, V> Default for BackRefs<K, V> {
    fn default() -> Self {
        BackRefs {
            map: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, V: Copy + Ord> BackRefs<K, V> {
    pub fn link(&mut self, target: K, from: V) {
        self.map.entry(target).or_default().insert(from);
    }

    pub fn unlink(&mut self, target: K, from: V) {
        if let Some(set) = self.map.get_mut(&target) {
            set.remove(&from);
            if set.is_empty() {
                self.map.remove(&target);
            }
        }
    }

    /// Move `from` off `old` and onto `new` in one step
    pub fn relink(&mut self, old: Option<K>, new: Option<K>, from: V) {
        if old == new {
            return;
        }
        if let Some(old) = old {
            self.unlink(old, from);
        }
        if let Some(new) = new {
            self.link(new, from);
        }
    }

    pub fn contains(&self, target: K, from: V) -> bool {
        self.map.get(&target).is_some_and(|s| s.contains(&from))
    }

    pub fn get(&self, target: K) -> impl Iterator<Item = V> + '_ {
        self.map.get(&target).into_iter().flatten().copied()
    }

    pub fn count(&self, target: K) -> usize {
        self.map.get(&target).map_or(0, BTreeSet::len)
    }

    /// Drop the whole set for `target`, returning what pointed at it
    pub fn take(&mut self, target: K) -> BTreeSet<V> {
        self.map.remove(&target).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
