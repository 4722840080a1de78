//! Engine selection and construction parameters.

use std::fmt;
use std::str::FromStr;

use crate::{
    ArrayHeapBst, ArrayTrie, Dictionary, DynamicSortedList, Error, OpenHashTable, PointerBst,
    PointerTrie, StaticSortedList,
};

/// Capacity used by [`StaticSortedList`] when none (or zero) is given.
pub const DEFAULT_STATIC_CAPACITY: usize = 1024;

/// Bucket hint used by [`OpenHashTable`] when none is given.
pub const DEFAULT_BUCKET_HINT: usize = 101;

/// Construction parameters for engines built through [`EngineKind::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fixed capacity of a [`StaticSortedList`]. Zero means the default.
    pub static_capacity: usize,
    /// Initial bucket hint of an [`OpenHashTable`]; clamped to at least 4 and
    /// rounded up to a prime.
    pub hash_bucket_hint: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            static_capacity: DEFAULT_STATIC_CAPACITY,
            hash_bucket_hint: DEFAULT_BUCKET_HINT,
        }
    }
}

impl Config {
    /// Sets the static list capacity.
    pub fn with_static_capacity(mut self, capacity: usize) -> Self {
        self.static_capacity = capacity;
        self
    }

    /// Sets the hash table bucket hint.
    pub fn with_hash_bucket_hint(mut self, hint: usize) -> Self {
        self.hash_bucket_hint = hint;
        self
    }
}

/// The seven dictionary engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// [`DynamicSortedList`]
    DynamicSortedList,
    /// [`StaticSortedList`]
    StaticSortedList,
    /// [`OpenHashTable`]
    OpenHashTable,
    /// [`PointerBst`]
    PointerBst,
    /// [`ArrayHeapBst`]
    ArrayHeapBst,
    /// [`PointerTrie`]
    PointerTrie,
    /// [`ArrayTrie`]
    ArrayTrie,
}

impl EngineKind {
    /// Every engine, in menu order.
    pub const ALL: [EngineKind; 7] = [
        EngineKind::DynamicSortedList,
        EngineKind::StaticSortedList,
        EngineKind::OpenHashTable,
        EngineKind::PointerBst,
        EngineKind::ArrayHeapBst,
        EngineKind::PointerTrie,
        EngineKind::ArrayTrie,
    ];

    /// Canonical name, also accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::DynamicSortedList => DynamicSortedList::NAME,
            EngineKind::StaticSortedList => StaticSortedList::NAME,
            EngineKind::OpenHashTable => OpenHashTable::NAME,
            EngineKind::PointerBst => PointerBst::NAME,
            EngineKind::ArrayHeapBst => ArrayHeapBst::NAME,
            EngineKind::PointerTrie => PointerTrie::NAME,
            EngineKind::ArrayTrie => ArrayTrie::NAME,
        }
    }

    /// Builds a fresh, empty engine of this kind.
    pub fn build(self, config: &Config) -> Box<dyn Dictionary> {
        log::debug!("building {} engine", self.name());
        match self {
            EngineKind::DynamicSortedList => Box::new(DynamicSortedList::new()),
            EngineKind::StaticSortedList => {
                Box::new(StaticSortedList::with_capacity(config.static_capacity))
            }
            EngineKind::OpenHashTable => {
                Box::new(OpenHashTable::with_bucket_hint(config.hash_bucket_hint))
            }
            EngineKind::PointerBst => Box::new(PointerBst::new()),
            EngineKind::ArrayHeapBst => Box::new(ArrayHeapBst::new()),
            EngineKind::PointerTrie => Box::new(PointerTrie::new()),
            EngineKind::ArrayTrie => Box::new(ArrayTrie::new()),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        EngineKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| Error::UnknownEngine(s.to_string()))
    }
}
