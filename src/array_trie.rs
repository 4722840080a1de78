//! Prefix tree whose nodes are positions in parallel vectors.
//!
//! Node `i` owns `children[i]` (edge label to child index) and `counts[i]`
//! (keys ending at `i`); the root is index `0`. New nodes are appended.
//! Pruning only unlinks edges: the unlinked nodes stay in the vectors as
//! unreachable entries and their indices are never reused.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use crate::{write_keys, Dictionary, DuplicatePolicy, CHECK_INVARIANTS};

type NodeId = u32;

const ROOT: NodeId = 0;

/// Edges walked while descending; most keys fit inline.
type Path = SmallVec<[(NodeId, char); 16]>;

/// A prefix-tree multiset of strings over index-addressed nodes.
#[derive(Debug, Clone)]
pub struct ArrayTrie {
    children: Vec<BTreeMap<char, NodeId>>,
    counts: Vec<usize>,
    len: usize,
}

impl ArrayTrie {
    /// Canonical engine name.
    pub const NAME: &'static str = "array-trie";

    /// Creates a trie holding only the root node.
    pub fn new() -> Self {
        Self {
            children: vec![BTreeMap::new()],
            counts: vec![0],
            len: 0,
        }
    }

    /// Number of allocated nodes, unreachable ones included.
    pub fn node_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of occurrences of `key`.
    pub fn count(&self, key: &str) -> usize {
        self.find(key).map_or(0, |id| self.counts[id as usize])
    }

    fn find(&self, key: &str) -> Option<NodeId> {
        key.chars()
            .try_fold(ROOT, |id, ch| self.children[id as usize].get(&ch).copied())
    }

    fn push_node(&mut self) -> NodeId {
        let id = NodeId::try_from(self.counts.len()).expect("array trie node ids exhausted");
        self.children.push(BTreeMap::new());
        self.counts.push(0);
        id
    }

    #[inline]
    fn is_dead(&self, id: NodeId) -> bool {
        self.counts[id as usize] == 0 && self.children[id as usize].is_empty()
    }

    /// Unlinks dead nodes bottom-up along `path`, stopping after the first
    /// parent that still has a counter or other children.
    fn prune(&mut self, mut path: Path) -> usize {
        let mut pruned = 0;
        while let Some((parent, ch)) = path.pop() {
            self.children[parent as usize].remove(&ch);
            pruned += 1;
            if !self.is_dead(parent) {
                break;
            }
        }
        pruned
    }

    fn reachable(&self) -> Vec<NodeId> {
        let mut seen = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            seen.push(id);
            stack.extend(self.children[id as usize].values().copied());
        }
        seen
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

impl Default for ArrayTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for ArrayTrie {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Allowed
    }

    fn insert(&mut self, key: &str) {
        let mut id = ROOT;
        for ch in key.chars() {
            id = match self.children[id as usize].get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.push_node();
                    self.children[id as usize].insert(ch, next);
                    next
                }
            };
        }
        self.counts[id as usize] += 1;
        self.len += 1;
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        let mut path = Path::new();
        let mut id = ROOT;
        for ch in key.chars() {
            let Some(&next) = self.children[id as usize].get(&ch) else {
                return false;
            };
            path.push((id, ch));
            id = next;
        }
        if self.counts[id as usize] == 0 {
            return false;
        }
        self.counts[id as usize] -= 1;
        self.len -= 1;
        if self.is_dead(id) {
            let pruned = self.prune(path);
            log::trace!("{} pruned {pruned} edges for {key:?}", Self::NAME);
        }
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.count(key) > 0
    }

    fn clear(&mut self) {
        log::trace!(
            "clearing {} ({} keys, {} nodes)",
            Self::NAME,
            self.len,
            self.counts.len()
        );
        *self = Self::new();
    }

    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = String::new();
        out.extend(std::iter::repeat(String::new()).take(self.counts[ROOT as usize]));
        let mut stack = vec![self.children[ROOT as usize].iter()];
        while let Some(edges) = stack.last_mut() {
            match edges.next() {
                Some((&ch, &child)) => {
                    prefix.push(ch);
                    let count = self.counts[child as usize];
                    out.extend(std::iter::repeat(prefix.clone()).take(count));
                    stack.push(self.children[child as usize].iter());
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
        assert_eq!(
            self.children.len(),
            self.counts.len(),
            "parallel vectors must have equal length"
        );
        let reachable = self.reachable();
        let mut visited = vec![false; self.counts.len()];
        let mut total = 0usize;
        for &id in &reachable {
            let idx = id as usize;
            assert!(idx < self.counts.len(), "child index {idx} out of bounds");
            assert!(!visited[idx], "node {idx} reachable twice");
            visited[idx] = true;
            if id != ROOT {
                assert!(!self.is_dead(id), "unpruned dead node {idx}");
            }
            total += self.counts[idx];
        }
        assert_eq!(total, self.len, "counters must sum to the stored length");
    }

    fn memory_usage(&self) -> usize {
        let edges: usize = self.children.iter().map(BTreeMap::len).sum();
        self.children.capacity() * std::mem::size_of::<BTreeMap<char, NodeId>>()
            + self.counts.capacity() * std::mem::size_of::<usize>()
            + edges * (std::mem::size_of::<char>() + std::mem::size_of::<NodeId>())
    }
}

impl fmt::Display for ArrayTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.keys())
    }
}
