//! Open hash table with separate chaining.
//!
//! Keys are placed with a fixed polynomial rolling hash (multiplier 257,
//! 32-bit wrap-around) reduced modulo a prime bucket count. The hash is not
//! salted, so a key lands in the same bucket across runs and across tables
//! of the same size.
//!
//! The table grows once `len > buckets * 3 / 4`: the bucket count becomes the
//! next prime at or above twice the current one and every key is
//! redistributed.

use std::fmt;

use crate::config::DEFAULT_BUCKET_HINT;
use crate::{write_keys, Dictionary, DuplicatePolicy, CHECK_INVARIANTS};

/// Smallest bucket hint accepted before rounding to a prime.
const MIN_BUCKETS: usize = 4;

/// Multiplier of the rolling hash.
const HASH_MULTIPLIER: u32 = 257;

/// Polynomial rolling hash over the code points of `key`, wrapping at 32 bits.
#[inline]
pub fn rolling_hash(key: &str) -> u32 {
    key.chars().fold(0u32, |h, ch| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(ch as u32)
    })
}

fn is_prime(n: usize) -> bool {
    if n <= 3 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut f = 5;
    while f * f <= n {
        if n % f == 0 || n % (f + 2) == 0 {
            return false;
        }
        f += 6;
    }
    true
}

/// Smallest odd prime `>= n` (for `n >= 3`).
fn next_prime(n: usize) -> usize {
    let mut p = if n % 2 == 1 { n } else { n + 1 };
    while !is_prime(p) {
        p += 2;
    }
    p
}

/// A chained hash multiset of strings.
#[derive(Debug, Clone)]
pub struct OpenHashTable {
    /// Each bucket keeps its keys in insertion order.
    buckets: Vec<Vec<String>>,
    len: usize,
}

impl OpenHashTable {
    /// Canonical engine name.
    pub const NAME: &'static str = "open-hash-table";

    /// Creates an empty table sized from [`DEFAULT_BUCKET_HINT`].
    pub fn new() -> Self {
        Self::with_bucket_hint(DEFAULT_BUCKET_HINT)
    }

    /// Creates an empty table with the next prime `>= max(hint, 4)` buckets.
    pub fn with_bucket_hint(hint: usize) -> Self {
        let buckets = next_prime(hint.max(MIN_BUCKETS));
        Self {
            buckets: empty_buckets(buckets),
            len: 0,
        }
    }

    /// Current number of buckets, always prime.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Elements per bucket.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Iterates over the keys in bucket order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.iter().flatten().map(String::as_str)
    }

    #[inline]
    fn bucket_index(&self, key: &str) -> usize {
        rolling_hash(key) as usize % self.buckets.len()
    }

    fn should_grow(&self) -> bool {
        self.len > self.buckets.len() * 3 / 4
    }

    fn rehash(&mut self, requested: usize) {
        let new_count = next_prime(requested.max(2 * self.buckets.len()));
        log::debug!(
            "rehashing {}: {} -> {} buckets ({} keys)",
            Self::NAME,
            self.buckets.len(),
            new_count,
            self.len
        );
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_count));
        for key in old.into_iter().flatten() {
            let idx = self.bucket_index(&key);
            self.buckets[idx].push(key);
        }
    }

    fn debug_validate(&self) {
        if CHECK_INVARIANTS {
            self.validate();
        }
    }
}

fn empty_buckets(count: usize) -> Vec<Vec<String>> {
    (0..count).map(|_| Vec::new()).collect()
}

impl Default for OpenHashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for OpenHashTable {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::Allowed
    }

    fn insert(&mut self, key: &str) {
        let idx = self.bucket_index(key);
        self.buckets[idx].push(key.to_string());
        self.len += 1;
        if self.should_grow() {
            self.rehash(2 * self.buckets.len());
        }
        self.debug_validate();
    }

    fn remove(&mut self, key: &str) -> bool {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let Some(pos) = bucket.iter().position(|stored| stored == key) else {
            return false;
        };
        bucket.remove(pos);
        self.len -= 1;
        self.debug_validate();
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.buckets[self.bucket_index(key)]
            .iter()
            .any(|stored| stored == key)
    }

    fn clear(&mut self) {
        log::trace!("clearing {} ({} keys)", Self::NAME, self.len);
        self.buckets = empty_buckets(self.buckets.len());
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.iter().map(str::to_string).collect();
        keys.sort_unstable();
        keys
    }

    fn validate(&self) {
        assert!(is_prime(self.buckets.len()), "bucket count must be prime");
        assert!(self.buckets.len() >= MIN_BUCKETS);
        let mut total = 0usize;
        for (idx, bucket) in self.buckets.iter().enumerate() {
            for key in bucket {
                assert_eq!(
                    self.bucket_index(key),
                    idx,
                    "key {key:?} stored in the wrong bucket"
                );
            }
            total += bucket.len();
        }
        assert_eq!(total, self.len, "stored length must match bucket contents");
        assert!(!self.should_grow(), "load factor above threshold");
    }

    fn load_factor(&self) -> Option<f64> {
        Some(OpenHashTable::load_factor(self))
    }

    fn memory_usage(&self) -> usize {
        self.buckets.capacity() * std::mem::size_of::<Vec<String>>()
            + self
                .buckets
                .iter()
                .map(|bucket| {
                    bucket.capacity() * std::mem::size_of::<String>()
                        + bucket.iter().map(String::capacity).sum::<usize>()
                })
                .sum::<usize>()
    }
}

impl fmt::Display for OpenHashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_keys(f, self.keys())
    }
}
