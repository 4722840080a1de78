//! Prefix tree over nested nodes with per-node occurrence counters.
//!
//! Each edge is labelled with one `char`. A key is stored by walking (and
//! creating) one edge per character and incrementing the counter of the
//! node it ends on, so duplicates are counted rather than stored twice.
//! Removing the last occurrence prunes every edge that no longer leads to a
//! counted node.
//!
//! Descent, listing and teardown never recurse, so key length is bounded
//! only by memory.

use std::collections::BTreeMap;
use std::fmt;

use crate::{write_keys, Dictionary, DuplicatePolicy, CHECK_INVARIANTS};

#[derive(Default)]
struct Node {
    /// Number of stored keys ending at this node.
    count: usize,
    /// Ordered so depth-first traversal yields keys alphabetically.
    children: BTreeMap<char, Node>,
}

impl Node {
    #[inline]
    fn is_dead(&self) -> bool {
        self.count == 0 && self.children.is_empty()
    }

    /// Holds no key and only leads on to a single child.
    #[inline]
    fn is_passthrough(&self) -> bool {
        self.count == 0 && self.children.len() == 1
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Node> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// A prefix-tree multiset of strings.
#[derive(Default)]
pub struct PointerTrie {
    root: Node,
    len: usize,
}

impl PointerTrie {
    /// Canonical engine name.
    pub const NAME: &'static str = "pointer-trie";

    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occurrences of `key`.
    pub fn count(&self, key: &str) -> usize {
        self.find(key).map_or(0, |node| node.count)
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.values());
        }
        total
    }

    fn find(&self, key: &str) -> Option<&Node> {
        key.chars()
            .try_fold(&self.root, |node, ch| node.children.get(&ch))
    }

    fn find_mut<I>(&mut self, chars: I) -> Option<&mut Node>
    where
        I: IntoIterator<Item = char>,
    {
        chars
            .into_iter()
            .try_fold(&mut self.root, |node, ch| node.children.get_mut(&ch))
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

impl Dictionary for PointerTrie {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Allowed
    }

    fn insert(&mut self, key: &str) {
        let node = key
            .chars()
            .fold(&mut self.root, |node, ch| node.children.entry(ch).or_default());
        node.count += 1;
        self.len += 1;
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        // Read-only pass: find the end node and the shallowest depth of the
        // pass-through run directly above it.
        let mut node = &self.root;
        let mut depth = 0;
        let mut run_start = None;
        for ch in key.chars() {
            if depth > 0 && node.is_passthrough() {
                if run_start.is_none() {
                    run_start = Some(depth);
                }
            } else {
                run_start = None;
            }
            let Some(child) = node.children.get(&ch) else {
                return false;
            };
            node = child;
            depth += 1;
        }
        if node.count == 0 {
            return false;
        }

        if depth > 0 && node.count == 1 && node.children.is_empty() {
            let cut = run_start.unwrap_or(depth);
            let edge = key.chars().nth(cut - 1);
            if let (Some(parent), Some(ch)) = (self.find_mut(key.chars().take(cut - 1)), edge) {
                parent.children.remove(&ch);
            }
            log::trace!(
                "{} pruned {} edges for {key:?}",
                Self::NAME,
                depth - cut + 1
            );
        } else if let Some(end) = self.find_mut(key.chars()) {
            end.count -= 1;
        }
        self.len -= 1;
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.count(key) > 0
    }

    fn clear(&mut self) {
        log::trace!("clearing {} ({} keys)", Self::NAME, self.len);
        self.root = Node::default();
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = String::new();
        out.extend(std::iter::repeat(String::new()).take(self.root.count));
        let mut stack = vec![self.root.children.iter()];
        while let Some(edges) = stack.last_mut() {
            match edges.next() {
                Some((&ch, child)) => {
                    prefix.push(ch);
                    out.extend(std::iter::repeat(prefix.clone()).take(child.count));
                    stack.push(child.children.iter());
                }
                None => {
                    stack.pop();
                    prefix.pop();
                }
            }
        }
        out
    }

    fn validate(&self) {
        let mut total = 0usize;
        let mut stack = vec![(&self.root, true)];
        while let Some((node, is_root)) = stack.pop() {
            if !is_root {
                assert!(!node.is_dead(), "unpruned dead node");
            }
            total += node.count;
            stack.extend(node.children.values().map(|child| (child, false)));
        }
        assert_eq!(total, self.len, "counters must sum to the stored length");
    }

    fn memory_usage(&self) -> usize {
        // BTreeMap entries cost roughly the key plus the value.
        self.node_count() * (std::mem::size_of::<Node>() + std::mem::size_of::<char>())
    }
}

impl fmt::Debug for PointerTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTrie")
            .field("len", &self.len)
            .field("keys", &self.keys())
            .finish()
    }
}

impl fmt::Display for PointerTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.keys())
    }
}
