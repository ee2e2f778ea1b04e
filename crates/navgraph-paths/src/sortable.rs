//! [`SortableList`], the priority container behind A*'s open and closed sets.
//!
//! The list can be kept in sorted order, in which case membership and
//! insertion-point lookups are binary searches and the minimum sits at the
//! front, or left unordered, in which case lookups fall back to linear scans.

use std::cmp::Ordering;

/// Whether equal entries may coexist in a [`SortableList`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Admission {
    #[default]
    Duplicates,
    Unique,
}

/// A vector of comparable entries, optionally kept sorted.
#[derive(Debug, Clone)]
pub struct SortableList<T> {
    items: Vec<T>,
    sorted: bool,
    admission: Admission,
}

impl<T: Ord> Default for SortableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> SortableList<T> {
    /// An unordered list that admits duplicates.
    pub fn new() -> Self {
        Self::with_policy(false, Admission::Duplicates)
    }

    /// A list kept in ascending order that admits duplicates.
    pub fn sorted() -> Self {
        Self::with_policy(true, Admission::Duplicates)
    }

    pub fn with_policy(sorted: bool, admission: Admission) -> Self {
        Self {
            items: Vec::new(),
            sorted,
            admission,
        }
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    #[inline]
    pub fn admission(&self) -> Admission {
        self.admission
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Switch sorted mode on or off. Turning it on sorts the entries.
    pub fn set_sorted(&mut self, sorted: bool) {
        if sorted && !self.sorted {
            self.items.sort();
        }
        self.sorted = sorted;
    }

    /// Sort the entries in place without changing the mode.
    pub fn sort(&mut self) {
        self.items.sort();
    }

    /// Index at which `item` would be inserted: after any equal entries
    /// when sorted, at the end otherwise.
    pub fn insertion_point(&self, item: &T) -> usize {
        if self.sorted {
            self.items.partition_point(|x| x <= item)
        } else {
            self.items.len()
        }
    }

    /// Index of an entry equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        if self.sorted {
            self.items.binary_search(item).ok()
        } else {
            self.items.iter().position(|x| x == item)
        }
    }

    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Index of the first entry matching `pred`. Always a linear scan; used
    /// when entries must be matched on something other than their ordering
    /// key.
    pub fn position(&self, pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(pred)
    }

    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|x| pred(x))
    }

    /// Add an entry. Returns `false` if it was rejected as a duplicate.
    pub fn push(&mut self, item: T) -> bool {
        if self.admission == Admission::Unique && self.contains(&item) {
            return false;
        }
        let at = self.insertion_point(&item);
        self.items.insert(at, item);
        true
    }

    /// Index of the smallest entry (the first one among equals).
    pub fn index_of_min(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        if self.sorted {
            return Some(0);
        }
        self.items
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(i, _)| i)
    }

    /// Index of the largest entry.
    pub fn index_of_max(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        if self.sorted {
            return Some(self.items.len() - 1);
        }
        self.items
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1))
            .map(|(i, _)| i)
    }

    /// Remove and return the entry at `idx`, keeping the order of the rest.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        (idx < self.items.len()).then(|| self.items.remove(idx))
    }

    pub fn take_min(&mut self) -> Option<T> {
        let idx = self.index_of_min()?;
        self.remove(idx)
    }

    pub fn take_max(&mut self) -> Option<T> {
        let idx = self.index_of_max()?;
        self.remove(idx)
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.items.retain(f);
    }

    /// Drop entries equal to an earlier one. Returns how many were dropped.
    ///
    /// Sorted lists collapse adjacent runs. Unordered lists keep the first
    /// occurrence of each value in a single forward pass, so each entry is
    /// visited exactly once.
    pub fn remove_duplicates(&mut self) -> usize {
        let before = self.items.len();
        if self.sorted {
            self.items.dedup();
        } else {
            let mut kept: Vec<T> = Vec::with_capacity(before);
            for item in self.items.drain(..) {
                if !kept.iter().any(|k| k.cmp(&item) == Ordering::Equal) {
                    kept.push(item);
                }
            }
            self.items = kept;
        }
        before - self.items.len()
    }
}

impl<'a, T> IntoIterator for &'a SortableList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Ord> FromIterator<T> for SortableList<T> {
    /// Collects into an unordered list that admits duplicates.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            sorted: false,
            admission: Admission::Duplicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_insertion_keeps_order() {
        let mut l = SortableList::sorted();
        for v in [5, 1, 4, 1, 3] {
            assert!(l.push(v));
        }
        assert_eq!(l.as_slice(), &[1, 1, 3, 4, 5]);
        assert_eq!(l.insertion_point(&1), 2);
        assert_eq!(l.insertion_point(&0), 0);
        assert_eq!(l.insertion_point(&9), 5);
    }

    #[test]
    fn unsorted_appends() {
        let mut l = SortableList::new();
        for v in [5, 1, 4] {
            l.push(v);
        }
        assert_eq!(l.as_slice(), &[5, 1, 4]);
        assert_eq!(l.insertion_point(&0), 3);
    }

    #[test]
    fn unique_admission_rejects_equal() {
        for sorted in [false, true] {
            let mut l = SortableList::with_policy(sorted, Admission::Unique);
            assert!(l.push(2));
            assert!(l.push(7));
            assert!(!l.push(2));
            assert_eq!(l.len(), 2);
        }
    }

    #[test]
    fn index_of_both_modes() {
        let mut sorted = SortableList::sorted();
        let mut plain = SortableList::new();
        for v in [8, 3, 6] {
            sorted.push(v);
            plain.push(v);
        }
        assert_eq!(sorted.index_of(&6), Some(1));
        assert_eq!(plain.index_of(&6), Some(2));
        assert_eq!(sorted.index_of(&7), None);
        assert_eq!(plain.index_of(&7), None);
        assert!(sorted.contains(&8));
        assert!(plain.contains(&3));
    }

    #[test]
    fn min_max_scan() {
        let l: SortableList<i32> = [4, -2, 9, -2, 9].into_iter().collect();
        assert_eq!(l.index_of_min(), Some(1));
        assert_eq!(l.get(l.index_of_max().unwrap()), Some(&9));
        let empty: SortableList<i32> = SortableList::new();
        assert_eq!(empty.index_of_min(), None);
        assert_eq!(empty.index_of_max(), None);
    }

    #[test]
    fn take_min_max() {
        let mut l = SortableList::sorted();
        for v in [3, 1, 2] {
            l.push(v);
        }
        assert_eq!(l.take_min(), Some(1));
        assert_eq!(l.take_max(), Some(3));
        assert_eq!(l.take_min(), Some(2));
        assert_eq!(l.take_min(), None);
    }

    #[test]
    fn predicate_position() {
        let mut l = SortableList::sorted();
        for v in [(2, 'b'), (1, 'a'), (3, 'c')] {
            l.push(v);
        }
        assert_eq!(l.position(|&(_, c)| c == 'c'), Some(2));
        assert_eq!(l.find(|&(n, _)| n > 1), Some(&(2, 'b')));
        assert_eq!(l.position(|&(_, c)| c == 'z'), None);
    }

    #[test]
    fn remove_out_of_range() {
        let mut l: SortableList<i32> = [1].into_iter().collect();
        assert_eq!(l.remove(3), None);
        assert_eq!(l.remove(0), Some(1));
        assert!(l.is_empty());
    }

    #[test]
    fn remove_duplicates_unsorted_keeps_first() {
        let mut l: SortableList<i32> = [3, 1, 3, 2, 1, 3].into_iter().collect();
        assert_eq!(l.remove_duplicates(), 3);
        assert_eq!(l.as_slice(), &[3, 1, 2]);
        assert_eq!(l.remove_duplicates(), 0);
    }

    #[test]
    fn remove_duplicates_sorted() {
        let mut l = SortableList::sorted();
        for v in [2, 2, 1, 2, 1] {
            l.push(v);
        }
        assert_eq!(l.remove_duplicates(), 3);
        assert_eq!(l.as_slice(), &[1, 2]);
    }

    #[test]
    fn switching_to_sorted_sorts() {
        let mut l: SortableList<i32> = [3, 1, 2].into_iter().collect();
        assert!(!l.is_sorted());
        l.set_sorted(true);
        assert_eq!(l.as_slice(), &[1, 2, 3]);
        l.push(0);
        assert_eq!(l.as_slice(), &[0, 1, 2, 3]);
        assert_eq!((&l).into_iter().count(), 4);
    }
}
