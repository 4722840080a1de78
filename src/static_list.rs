//! Sorted list over a slot array whose capacity is fixed at construction.
//!
//! Positions are found by binary search (upper bound for insertion, lower
//! bound for removal and lookup), then the tail is shifted by one slot.
//! Inserting into a full list is silently ignored.

use std::fmt;
use std::ops::Index;

use crate::config::DEFAULT_STATIC_CAPACITY;
use crate::{write_keys, Dictionary, DuplicatePolicy, Error, Result, CHECK_INVARIANTS};

/// A fixed-capacity sorted multiset of strings.
#[derive(Debug, Clone)]
pub struct StaticSortedList {
    /// Occupied prefix `[0, len)` is sorted; every slot past it is `None`.
    slots: Box<[Option<String>]>,
    len: usize,
}

impl StaticSortedList {
    /// Canonical engine name.
    pub const NAME: &'static str = "static-sorted-list";

    /// Creates an empty list with [`DEFAULT_STATIC_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STATIC_CAPACITY)
    }

    /// Creates an empty list with `capacity` slots. Zero selects the default.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_STATIC_CAPACITY
        } else {
            capacity
        };
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Number of slots, fixed for the lifetime of the list.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` once every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Iterates over the keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots[..self.len].iter().filter_map(|slot| slot.as_deref())
    }

    /// Key at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&str> {
        if index < self.len {
            self.slots[index].as_deref()
        } else {
            None
        }
    }

    /// Key at `index`, or [`Error::IndexOutOfRange`] past the end.
    pub fn try_get(&self, index: usize) -> Result<&str> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    /// First position in the occupied prefix whose key is `>= key`.
    fn lower_bound(&self, key: &str) -> usize {
        self.slots[..self.len].partition_point(|slot| slot.as_deref().is_some_and(|k| k < key))
    }

    /// First position in the occupied prefix whose key is `> key`.
    fn upper_bound(&self, key: &str) -> usize {
        self.slots[..self.len].partition_point(|slot| slot.as_deref().is_some_and(|k| k <= key))
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

impl Default for StaticSortedList {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for StaticSortedList {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Allowed
    }

    fn insert(&mut self, key: &str) {
        if self.is_full() {
            log::trace!(
                "{} full at {} keys, dropping {key:?}",
                Self::NAME,
                self.capacity()
            );
            return;
        }
        let pos = self.upper_bound(key);
        // Slot `len` is free; rotating it to `pos` shifts the tail right by one.
        self.slots[self.len] = Some(key.to_string());
        self.slots[pos..=self.len].rotate_right(1);
        self.len += 1;
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        let pos = self.lower_bound(key);
        if pos == self.len || self.slots[pos].as_deref() != Some(key) {
            return false;
        }
        self.slots[pos] = None;
        self.slots[pos..self.len].rotate_left(1);
        self.len -= 1;
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        let pos = self.lower_bound(key);
        pos < self.len && self.slots[pos].as_deref() == Some(key)
    }

    fn clear(&mut self) {
        log::trace!("clearing {} ({} keys)", Self::NAME, self.len);
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    fn validate(&self) {
        assert!(self.len <= self.slots.len(), "length exceeds capacity");
        for (i, slot) in self.slots.iter().enumerate() {
            assert_eq!(
                slot.is_some(),
                i < self.len,
                "slot {i} occupancy must match the occupied prefix"
            );
        }
        for pair in self.slots[..self.len].windows(2) {
            assert!(pair[0] <= pair[1], "slots out of order: {pair:?}");
        }
    }

    fn memory_usage(&self) -> usize {
        self.slots.len() * std::mem::size_of::<Option<String>>()
            + self.slots.iter().flatten().map(String::capacity).sum::<usize>()
    }
}

impl Index<usize> for StaticSortedList {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        match self.try_get(index) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }
}

impl fmt::Display for StaticSortedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_with_duplicates_after_equals() {
        let mut list = StaticSortedList::with_capacity(8);
        for key in ["pera", "kiwi", "mango", "kiwi", "aguacate"] {
            list.insert(key);
        }
        assert_eq!(list.keys(), vec!["aguacate", "kiwi", "kiwi", "mango", "pera"]);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_full_list_drops_silently() {
        let mut list = StaticSortedList::with_capacity(5);
        for key in ["e", "d", "c", "b", "a"] {
            list.insert(key);
        }
        assert!(list.is_full());
        list.insert("f");
        assert_eq!(list.len(), 5);
        assert!(!list.contains("f"));
        assert_eq!(list.to_string(), "[a, b, c, d, e]");

        // Removing frees a slot for the next insert.
        assert!(list.remove("c"));
        list.insert("f");
        assert!(list.contains("f"));
        assert_eq!(list.keys(), vec!["a", "b", "d", "e", "f"]);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        assert_eq!(StaticSortedList::with_capacity(0).capacity(), DEFAULT_STATIC_CAPACITY);
        assert_eq!(StaticSortedList::default().capacity(), DEFAULT_STATIC_CAPACITY);
    }

    #[test]
    fn test_remove_shifts_tail_left() {
        let mut list = StaticSortedList::with_capacity(4);
        for key in ["a", "b", "b", "c"] {
            list.insert(key);
        }
        assert!(list.remove("b"));
        assert_eq!(list.keys(), vec!["a", "b", "c"]);
        assert!(list.slots[3].is_none());
        assert!(!list.remove("bb"));
        assert!(list.remove("a"));
        assert!(list.remove("c"));
        assert!(list.remove("b"));
        assert!(list.is_empty());
        list.validate();
    }

    #[test]
    fn test_bounds() {
        let mut list = StaticSortedList::with_capacity(6);
        for key in ["b", "b", "d"] {
            list.insert(key);
        }
        assert_eq!(list.lower_bound("b"), 0);
        assert_eq!(list.upper_bound("b"), 2);
        assert_eq!(list.lower_bound("c"), 2);
        assert_eq!(list.upper_bound("z"), 3);
        assert_eq!(list.lower_bound("a"), 0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut list = StaticSortedList::with_capacity(3);
        list.insert("x");
        list.insert("y");
        list.clear();
        list.clear();
        assert_eq!(list.capacity(), 3);
        assert!(list.is_empty());
        assert!(list.slots.iter().all(Option::is_none));
    }

    #[test]
    fn test_positional_access() {
        let mut list = StaticSortedList::with_capacity(3);
        list.insert("b");
        list.insert("a");
        assert_eq!(&list[1], "b");
        assert_eq!(list.get(2), None);
        assert_eq!(
            list.try_get(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_past_len_panics_even_within_capacity() {
        let list = StaticSortedList::with_capacity(10);
        let _ = &list[0];
    }
}
