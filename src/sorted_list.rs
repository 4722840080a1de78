//! Singly linked list kept in non-decreasing key order.
//!
//! Every operation walks from the head, so insert, remove and lookup are
//! O(n). Duplicates are kept: a new key is linked after all equal keys
//! already present.

use std::fmt;
use std::ops::Index;

use crate::{write_keys, Dictionary, DuplicatePolicy, Error, Result, CHECK_INVARIANTS};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: String,
    next: Link,
}

/// A sorted, singly linked multiset of strings.
#[derive(Debug, Default)]
pub struct DynamicSortedList {
    head: Link,
    len: usize,
}

impl DynamicSortedList {
    /// Canonical engine name.
    pub const NAME: &'static str = "dynamic-sorted-list";

    /// Creates an empty list.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Iterates over the keys in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Key at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.iter().nth(index)
    }

    /// Key at `index`, or [`Error::IndexOutOfRange`] past the end.
    pub fn try_get(&self, index: usize) -> Result<&str> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    /// Unlinks nodes one at a time so long chains do not recurse in `Drop`.
    fn release_chain(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

impl Dictionary for DynamicSortedList {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Allowed
    }

    fn insert(&mut self, key: &str) {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key.as_str() <= key) {
            if let Some(node) = cursor {
                cursor = &mut node.next;
            }
        }
        let next = cursor.take();
        *cursor = Some(Box::new(Node {
            key: key.to_string(),
            next,
        }));
        self.len += 1;
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key.as_str() < key) {
            if let Some(node) = cursor {
                cursor = &mut node.next;
            }
        }
        if !cursor.as_ref().is_some_and(|node| node.key == key) {
            return false;
        }
        if let Some(node) = cursor.take() {
            *cursor = node.next;
        }
        self.len -= 1;
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.iter()
            .find(|stored| *stored >= key)
            .is_some_and(|stored| stored == key)
    }

    fn clear(&mut self) {
        log::trace!("clearing {} ({} keys)", Self::NAME, self.len);
        self.release_chain();
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    fn validate(&self) {
        let mut count = 0usize;
        let mut prev: Option<&str> = None;
        for key in self.iter() {
            if let Some(prev) = prev {
                assert!(prev <= key, "list out of order: {prev:?} before {key:?}");
            }
            prev = Some(key);
            count += 1;
        }
        assert_eq!(
            count, self.len,
            "stored length must match the number of linked nodes"
        );
    }

    fn memory_usage(&self) -> usize {
        let mut total = 0;
        let mut link = self.head.as_deref();
        while let Some(node) = link {
            total += std::mem::size_of::<Node>() + node.key.capacity();
            link = node.next.as_deref();
        }
        total
    }
}

impl Drop for DynamicSortedList {
    fn drop(&mut self) {
        self.release_chain();
    }
}

impl Index<usize> for DynamicSortedList {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        match self.try_get(index) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }
}

impl fmt::Display for DynamicSortedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.iter())
    }
}

/// Iterator over the keys of a [`DynamicSortedList`].
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node.key.as_str())
    }
}
