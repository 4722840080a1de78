//! # dict-engines
//!
//! Seven interchangeable implementations of one string dictionary contract,
//! each with a different storage layout and complexity trade-off:
//!
//! | Engine | Layout | Duplicates |
//! |---|---|---|
//! | [`DynamicSortedList`] | singly linked, sorted | kept |
//! | [`StaticSortedList`] | fixed-capacity sorted array | kept (dropped when full) |
//! | [`OpenHashTable`] | chained buckets, prime-sized | kept |
//! | [`PointerBst`] | boxed binary search tree | ignored |
//! | [`ArrayHeapBst`] | implicit tree in a vector (`2i`, `2i + 1`) | ignored |
//! | [`PointerTrie`] | boxed prefix tree with counters | kept |
//! | [`ArrayTrie`] | prefix tree over parallel vectors | kept |
//!
//! All of them are driven through the [`Dictionary`] trait.
//!
//! ## Example
//!
//! ```rust
//! use dict_engines::{Config, Dictionary, EngineKind};
//!
//! let mut dict = EngineKind::PointerTrie.build(&Config::default());
//! dict.insert("gato");
//! dict.insert("gallo");
//! dict.insert("gato");
//!
//! assert_eq!(dict.len(), 3);
//! assert!(dict.remove("gato"));
//! assert!(dict.contains("gato"));
//! assert_eq!(dict.render(), "[gallo, gato]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array_trie;
pub mod bst;
pub mod config;
pub mod error;
pub mod hash_table;
pub mod heap_bst;
pub mod sorted_list;
pub mod static_list;
pub mod trie;

pub use array_trie::ArrayTrie;
pub use bst::PointerBst;
pub use config::{Config, EngineKind};
pub use error::{Error, Result};
pub use hash_table::OpenHashTable;
pub use heap_bst::ArrayHeapBst;
pub use sorted_list::DynamicSortedList;
pub use static_list::StaticSortedList;
pub use trie::PointerTrie;

use std::fmt;

/// Whether engines re-run [`Dictionary::validate`] after each mutation.
pub(crate) const CHECK_INVARIANTS: bool = cfg!(any(debug_assertions, feature = "check_invariants"));

/// How an engine treats the insertion of a key it already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Every insertion is stored; `len` counts each occurrence.
    Allowed,
    /// Inserting a present key is a no-op.
    Ignored,
}

impl DuplicatePolicy {
    /// Returns `true` for [`DuplicatePolicy::Allowed`].
    pub fn allows_duplicates(self) -> bool {
        matches!(self, DuplicatePolicy::Allowed)
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Allowed => f.write_str("duplicates allowed"),
            DuplicatePolicy::Ignored => f.write_str("duplicates ignored"),
        }
    }
}

/// Snapshot of an engine's state for menus and benchmark reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// Canonical engine name, see [`EngineKind::name`].
    pub name: &'static str,
    /// Number of stored keys, duplicates included.
    pub len: usize,
    /// Duplicate handling of the engine.
    pub duplicate_policy: DuplicatePolicy,
    /// Elements per bucket, for engines that have buckets.
    pub load_factor: Option<f64>,
    /// Approximate heap bytes held by the engine.
    pub memory_bytes: usize,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} keys, {}, ~{} bytes",
            self.name, self.len, self.duplicate_policy, self.memory_bytes
        )?;
        if let Some(load) = self.load_factor {
            write!(f, ", load factor {load:.3}")?;
        }
        Ok(())
    }
}

/// A multiset (or set) of string keys.
///
/// Implementors differ only in storage and in their [`DuplicatePolicy`].
/// Missing keys are never an error: [`remove`](Dictionary::remove) and
/// [`contains`](Dictionary::contains) answer `false`.
pub trait Dictionary: fmt::Debug + fmt::Display {
    /// Canonical engine name.
    fn name(&self) -> &'static str;

    /// Duplicate handling of this engine.
    fn duplicate_policy(&self) -> DuplicatePolicy;

    /// Adds one occurrence of `key`, subject to the engine's duplicate policy.
    fn insert(&mut self, key: &str);

    /// Removes one occurrence of `key`. Returns whether anything was removed.
    fn remove(&mut self, key: &str) -> bool;

    /// Returns `true` if at least one occurrence of `key` is stored.
    fn contains(&self, key: &str) -> bool;

    /// Removes every key. The engine stays usable.
    fn clear(&mut self);

    /// Number of stored keys, duplicates included.
    fn len(&self) -> usize;

    /// Returns `true` if no key is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys in ascending order, each repeated once per occurrence.
    fn keys(&self) -> Vec<String>;

    /// Renders the keys as `[k1, k2, ...]`, in the order of [`keys`](Dictionary::keys).
    fn render(&self) -> String {
        self.to_string()
    }

    /// Writes [`render`](Dictionary::render) to standard output.
    fn print(&self) {
        println!("{self}");
    }

    /// Checks the engine's structural invariants.
    ///
    /// # Panics
    ///
    /// Panics if an invariant is broken, which always indicates a bug in the
    /// engine itself.
    fn validate(&self);

    /// Elements per bucket, for engines that have buckets.
    fn load_factor(&self) -> Option<f64> {
        None
    }

    /// Approximate heap bytes held by the engine.
    ///
    /// Node and slot storage is counted by size; owned key strings are
    /// counted by their allocated capacity.
    fn memory_usage(&self) -> usize;

    /// Collects name, size, duplicate policy, load factor and memory usage.
    fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            name: self.name(),
            len: self.len(),
            duplicate_policy: self.duplicate_policy(),
            load_factor: self.load_factor(),
            memory_bytes: self.memory_usage(),
        }
    }
}

/// Writes `keys` in the shared `[a, b, c]` listing format.
pub(crate) fn write_keys<I, S>(f: &mut fmt::Formatter<'_>, keys: I) -> fmt::Result
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    f.write_str("[")?;
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(key.as_ref())?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_engines() -> Vec<Box<dyn Dictionary>> {
        let config = Config::default();
        EngineKind::ALL.iter().map(|kind| kind.build(&config)).collect()
    }

    #[test]
    fn test_empty_engines() {
        for dict in all_engines() {
            assert!(dict.is_empty(), "{}", dict.name());
            assert_eq!(dict.render(), "[]", "{}", dict.name());
            assert!(dict.keys().is_empty());
            assert!(!dict.contains("x"));
            dict.validate();
        }
    }

    #[test]
    fn test_duplicate_policy_matches_behavior() {
        for mut dict in all_engines() {
            dict.insert("k");
            dict.insert("k");
            let expected = if dict.duplicate_policy().allows_duplicates() {
                2
            } else {
                1
            };
            assert_eq!(dict.len(), expected, "{}", dict.name());
            assert_eq!(dict.keys().len(), expected, "{}", dict.name());
        }
    }

    #[test]
    fn test_remove_missing_is_noop() {
        for mut dict in all_engines() {
            for key in ["delta", "alpha", "charlie", "bravo"] {
                dict.insert(key);
            }
            let before = dict.render();
            assert!(!dict.remove("echo"), "{}", dict.name());
            assert!(!dict.remove(""), "{}", dict.name());
            assert!(!dict.remove("alph"), "{}", dict.name());
            assert_eq!(dict.render(), before);
            assert_eq!(dict.len(), 4);
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        for mut dict in all_engines() {
            for key in ["b", "a", "c"] {
                dict.insert(key);
            }
            dict.clear();
            dict.clear();
            assert_eq!(dict.len(), 0, "{}", dict.name());
            assert_eq!(dict.render(), "[]");
            dict.insert("z");
            assert_eq!(dict.keys(), vec!["z".to_string()]);
            dict.validate();
        }
    }

    #[test]
    fn test_empty_key_is_a_key() {
        for mut dict in all_engines() {
            dict.insert("");
            assert!(dict.contains(""), "{}", dict.name());
            assert_eq!(dict.len(), 1);
            assert!(dict.remove(""));
            assert!(!dict.contains(""));
            assert!(dict.is_empty());
        }
    }

    #[test]
    fn test_diagnostics_bundle() {
        for mut dict in all_engines() {
            dict.insert("one");
            let diag = dict.diagnostics();
            assert_eq!(diag.name, dict.name());
            assert_eq!(diag.len, 1);
            assert_eq!(diag.duplicate_policy, dict.duplicate_policy());
            assert_eq!(diag.load_factor.is_some(), dict.name() == "open-hash-table");
            assert!(diag.to_string().starts_with(dict.name()));
        }
    }

    #[test]
    fn test_memory_usage_counts_key_bytes() {
        let key = "k".repeat(4096);
        for mut dict in all_engines() {
            let before = dict.memory_usage();
            dict.insert(&key);
            let after = dict.memory_usage();
            assert!(
                after >= before + key.len(),
                "{}: {before} -> {after}",
                dict.name()
            );
            dict.clear();
            assert!(dict.memory_usage() <= before, "{}", dict.name());
        }
    }

    #[test]
    fn test_non_ascii_keys_sort_by_code_point() {
        for mut dict in all_engines() {
            for key in ["ñu", "nube", "árbol", "zeta"] {
                dict.insert(key);
            }
            assert_eq!(
                dict.keys(),
                vec!["nube", "zeta", "árbol", "ñu"],
                "{}",
                dict.name()
            );
        }
    }
}

#[cfg(test)]
mod proptests;
