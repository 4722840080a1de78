//! Binary search tree laid out implicitly in a vector.
//!
//! Slot `0` is a sentinel and never holds a key; the root lives at `1` and
//! the children of slot `i` at `2i` and `2i + 1`. The vector grows on demand
//! when an insertion descends past its end and is trimmed back to the last
//! occupied slot after every successful removal.
//!
//! Like [`PointerBst`](crate::PointerBst) the tree is unbalanced, so a
//! degenerate insertion order needs `2^height` slots.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

use crate::{write_keys, Dictionary, DuplicatePolicy, CHECK_INVARIANTS};

const ROOT: usize = 1;

/// Left child of slot `i`.
///
/// # Panics
///
/// Panics if the child index does not fit in `usize`. In practice the
/// backing vector fails to allocate long before that depth.
#[inline]
fn left(i: usize) -> usize {
    match i.checked_mul(2) {
        Some(child) => child,
        None => panic!("implicit tree slot index overflow below slot {i}"),
    }
}

/// Right child of slot `i`; `left(i)` is even, so adding one cannot wrap.
#[inline]
fn right(i: usize) -> usize {
    left(i) + 1
}

/// A binary search tree set of strings over an implicit array.
#[derive(Debug, Clone)]
pub struct ArrayHeapBst {
    slots: Vec<Option<String>>,
    len: usize,
}

impl ArrayHeapBst {
    /// Canonical engine name.
    pub const NAME: &'static str = "array-heap-bst";

    /// Creates an empty tree holding only the sentinel slot.
    pub fn new() -> Self {
        Self {
            slots: vec![None],
            len: 0,
        }
    }

    /// Length of the backing vector, sentinel included.
    pub fn slot_len(&self) -> usize {
        self.slots.len()
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left_spine(ROOT);
        iter
    }

    #[inline]
    fn key_at(&self, i: usize) -> Option<&str> {
        self.slots.get(i).and_then(|slot| slot.as_deref())
    }

    #[inline]
    fn is_vacant(&self, i: usize) -> bool {
        self.key_at(i).is_none()
    }

    fn ensure_slot(&mut self, i: usize) {
        if i >= self.slots.len() {
            self.slots.resize(i + 1, None);
        }
    }

    /// Slot holding `key`, if any.
    fn find(&self, key: &str) -> Option<usize> {
        let mut i = ROOT;
        while let Some(stored) = self.key_at(i) {
            i = match key.cmp(stored) {
                Ordering::Less => left(i),
                Ordering::Greater => right(i),
                Ordering::Equal => return Some(i),
            };
        }
        None
    }

    /// Slot of the minimum key in the subtree rooted at occupied slot `i`.
    fn min_slot(&self, mut i: usize) -> usize {
        while !self.is_vacant(left(i)) {
            i = left(i);
        }
        i
    }

    /// Removes the key stored at occupied slot `i`.
    fn remove_at(&mut self, i: usize) {
        match (self.is_vacant(left(i)), self.is_vacant(right(i))) {
            (true, true) => self.slots[i] = None,
            (false, true) => self.lift_subtree(left(i), i),
            (true, false) => self.lift_subtree(right(i), i),
            (false, false) => {
                let successor = self.min_slot(right(i));
                self.slots[i] = self.slots[successor].take();
                self.remove_at(successor);
            }
        }
    }

    /// Moves the subtree rooted at `from` one level up so that it is rooted
    /// at its parent `to`, overwriting the key there.
    ///
    /// Processing breadth-first means every destination slot has already
    /// been emptied (or was vacant) when it is written.
    fn lift_subtree(&mut self, from: usize, to: usize) {
        let mut queue = VecDeque::from([(from, to)]);
        while let Some((src, dst)) = queue.pop_front() {
            if self.is_vacant(src) {
                continue;
            }
            self.slots[dst] = self.slots[src].take();
            queue.push_back((left(src), left(dst)));
            queue.push_back((right(src), right(dst)));
        }
    }

    /// Drops trailing vacant slots, keeping the sentinel.
    fn trim(&mut self) {
        let keep = self
            .slots
            .iter()
            .rposition(Option::is_some)
            .map_or(ROOT, |last| last + 1);
        if keep < self.slots.len() {
            log::trace!(
                "{} trimming {} trailing slots",
                Self::NAME,
                self.slots.len() - keep
            );
            self.slots.truncate(keep);
        }
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

impl Default for ArrayHeapBst {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for ArrayHeapBst {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Ignored
    }

    /// Descends from the root, growing the vector to reach the vacant slot.
    /// A degenerate insertion order of height `h` allocates `2^h` slots and
    /// aborts on allocation failure once that no longer fits in memory.
    fn insert(&mut self, key: &str) {
        let mut i = ROOT;
        loop {
            self.ensure_slot(i);
            let Some(stored) = self.slots[i].as_deref() else {
                break;
            };
            i = match key.cmp(stored) {
                Ordering::Less => left(i),
                Ordering::Greater => right(i),
                Ordering::Equal => return,
            };
        }
        self.slots[i] = Some(key.to_string());
        self.len += 1;
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(i) = self.find(key) else {
            return false;
        };
        self.remove_at(i);
        self.len -= 1;
        self.trim();
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    fn clear(&mut self) {
        log::trace!("clearing {} ({} keys)", Self::NAME, self.len);
        self.slots = vec![None];
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    fn validate(&self) {
        assert!(!self.slots.is_empty(), "sentinel slot missing");
        assert!(self.slots[0].is_none(), "sentinel slot must stay empty");
        if self.slots.len() > ROOT {
            assert!(
                self.slots.last().is_some_and(Option::is_some),
                "trailing slots must be occupied"
            );
        }
        for i in (ROOT + 1)..self.slots.len() {
            if self.slots[i].is_some() {
                assert!(!self.is_vacant(i / 2), "slot {i} has no parent");
            }
        }

        let mut count = 0usize;
        let mut prev: Option<&str> = None;
        for key in self.iter() {
            if let Some(prev) = prev {
                assert!(
                    prev < key,
                    "in-order traversal must be strictly increasing: {prev:?} then {key:?}"
                );
            }
            prev = Some(key);
            count += 1;
        }
        assert_eq!(count, self.len, "stored length must match occupied slots");
        assert_eq!(
            self.slots.iter().filter(|slot| slot.is_some()).count(),
            self.len,
            "every occupied slot must be reachable"
        );
    }

    fn memory_usage(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<String>>()
            + self.slots.iter().flatten().map(String::capacity).sum::<usize>()
    }
}

impl fmt::Display for ArrayHeapBst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.iter())
    }
}

/// In-order iterator over the keys of an [`ArrayHeapBst`].
pub struct Iter<'a> {
    tree: &'a ArrayHeapBst,
    stack: Vec<usize>,
}

impl Iter<'_> {
    fn push_left_spine(&mut self, mut i: usize) {
        while !self.tree.is_vacant(i) {
            self.stack.push(i);
            i = left(i);
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.stack.pop()?;
        self.push_left_spine(right(i));
        self.tree.key_at(i)
    }
}
