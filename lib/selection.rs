//! Optimistic multi-select state, such as the tags on a product or the locations a coupon is
//! limited to.
//!
//! Toggles apply to a working set immediately. The server-confirmed set only moves on
//! [`Selection::commit`], and [`Selection::rollback`] throws local edits away after a failed
//! write.

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Keys to add and remove to turn the confirmed set into the working set. Both sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionDiff<K> {
    pub added: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> SelectionDiff<K> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Selection<K> {
    confirmed: FxHashSet<K>,
    working: FxHashSet<K>,
}

impl<K: Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self {
            confirmed: FxHashSet::default(),
            working: FxHashSet::default(),
        }
    }
}

impl<K: Eq + Hash + Clone + Ord> Selection<K> {
    /// Start from the set the server reported.
    pub fn new(confirmed: impl IntoIterator<Item = K>) -> Self {
        let confirmed: FxHashSet<K> = confirmed.into_iter().collect();
        Self {
            working: confirmed.clone(),
            confirmed,
        }
    }

    /// Flip `key`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.working.remove(&key) {
            false
        } else {
            self.working.insert(key);
            true
        }
    }

    /// Returns whether anything changed.
    pub fn select(&mut self, key: K) -> bool {
        self.working.insert(key)
    }

    /// Returns whether anything changed.
    pub fn deselect(&mut self, key: &K) -> bool {
        self.working.remove(key)
    }

    #[must_use]
    pub fn is_selected(&self, key: &K) -> bool {
        self.working.contains(key)
    }

    /// The working set, sorted.
    #[must_use]
    pub fn selected(&self) -> Vec<K> {
        sorted(self.working.iter())
    }

    #[must_use]
    pub fn diff(&self) -> SelectionDiff<K> {
        SelectionDiff {
            added: sorted(self.working.difference(&self.confirmed)),
            removed: sorted(self.confirmed.difference(&self.working)),
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.working != self.confirmed
    }

    /// The write succeeded; local edits become the confirmed state.
    pub fn commit(&mut self) {
        self.confirmed.clone_from(&self.working);
    }

    /// The write failed; drop local edits.
    pub fn rollback(&mut self) {
        self.working.clone_from(&self.confirmed);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.working.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }
}

fn sorted<'a, K: Clone + Ord + 'a>(keys: impl Iterator<Item = &'a K>) -> Vec<K> {
    let mut out: Vec<K> = keys.cloned().collect();
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_is_clean() {
        let mut sel = Selection::new(["vegan"]);
        assert!(sel.toggle("spicy"));
        assert!(sel.is_dirty());
        assert!(!sel.toggle("spicy"));
        assert!(!sel.is_dirty());
    }

    #[test]
    fn select_existing_is_noop() {
        let mut sel = Selection::new([1, 2]);
        assert!(!sel.select(1));
        assert!(sel.deselect(&2));
        assert!(!sel.deselect(&2));
        assert_eq!(sel.selected(), vec![1]);
    }
}
