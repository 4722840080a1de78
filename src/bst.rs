//! Unbalanced binary search tree over boxed nodes.
//!
//! Keys are unique: inserting a key that is already present does nothing.
//! A node with two children is removed by copying its in-order successor
//! (the minimum of the right subtree) into it and splicing the successor
//! out of the right subtree. Every walk is iterative, so a degenerate chain
//! of any depth can be searched, cleared and dropped.

use std::cmp::Ordering;
use std::fmt;

use crate::{write_keys, Dictionary, DuplicatePolicy, CHECK_INVARIANTS};

type Link = Option<Box<Node>>;

struct Node {
    key: String,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(key: &str) -> Box<Self> {
        Box::new(Self {
            key: key.to_string(),
            left: None,
            right: None,
        })
    }
}

/// A binary search tree set of strings.
#[derive(Default)]
pub struct PointerBst {
    root: Link,
    len: usize,
}

impl PointerBst {
    /// Canonical engine name.
    pub const NAME: &'static str = "pointer-bst";

    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: self.nodes(),
        }
    }

    fn nodes(&self) -> Nodes<'_> {
        let mut nodes = Nodes { stack: Vec::new() };
        nodes.push_left_spine(self.root.as_deref());
        nodes
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut level: Vec<&Node> = self.root.as_deref().into_iter().collect();
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }
        height
    }

    /// Detaches the minimum node of the non-empty subtree at `link`, splicing
    /// its right child into its place, and returns its key.
    fn take_min(mut link: &mut Link) -> Option<String> {
        while link.as_ref().is_some_and(|node| node.left.is_some()) {
            if let Some(node) = link {
                link = &mut node.left;
            }
        }
        let mut min = link.take()?;
        *link = min.right.take();
        Some(std::mem::take(&mut min.key))
    }

    /// Frees nodes from an explicit stack so degenerate chains do not
    /// recurse in `Drop`.
    fn release(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

impl Dictionary for PointerBst {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Ignored
    }

    fn insert(&mut self, key: &str) {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = match key.cmp(node.key.as_str()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return,
            };
        }
        *link = Some(Node::leaf(key));
        self.len += 1;
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        let mut link = &mut self.root;
        while link.as_ref().is_some_and(|node| node.key != key) {
            if let Some(node) = link {
                link = if key < node.key.as_str() {
                    &mut node.left
                } else {
                    &mut node.right
                };
            }
        }
        let Some(mut node) = link.take() else {
            return false;
        };
        *link = match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                node.left = Some(left);
                node.right = Some(right);
                if let Some(successor) = Self::take_min(&mut node.right) {
                    node.key = successor;
                }
                Some(node)
            }
        };
        self.len -= 1;
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            link = match key.cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    fn clear(&mut self) {
        log::trace!("clearing {} ({} keys)", Self::NAME, self.len);
        self.release();
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
                assert!(
                    prev < key,
                    "in-order traversal must be strictly increasing: {prev:?} then {key:?}"
                );
            }
            prev = Some(key);
            count += 1;
        }
        assert_eq!(count, self.len, "stored length must match the node count");
    }

    fn memory_usage(&self) -> usize {
        self.nodes()
            .map(|node| std::mem::size_of::<Node>() + node.key.capacity())
            .sum()
    }
}

impl Drop for PointerBst {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PointerBst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerBst")
            .field("len", &self.len)
            .field("keys", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for PointerBst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.iter())
    }
}

/// In-order walk over the nodes.
struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Nodes<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(node)
    }
}

/// In-order iterator over the keys of a [`PointerBst`].
pub struct Iter<'a> {
    nodes: Nodes<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|node| node.key.as_str())
    }
}
