use crate::{
    ArrayHeapBst, ArrayTrie, Dictionary, DuplicatePolicy, DynamicSortedList, OpenHashTable,
    PointerBst, PointerTrie, StaticSortedList,
};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Multiset model: key -> number of stored occurrences.
type Model = BTreeMap<String, usize>;

fn model_keys(model: &Model) -> Vec<String> {
    model
        .iter()
        .flat_map(|(key, &n)| std::iter::repeat(key.clone()).take(n))
        .collect()
}

fn model_insert(model: &mut Model, key: &str, policy: DuplicatePolicy, capacity: Option<usize>) {
    let len: usize = model.values().sum();
    if capacity.is_some_and(|cap| len >= cap) {
        return;
    }
    let n = model.entry(key.to_string()).or_insert(0);
    if *n == 0 || policy.allows_duplicates() {
        *n += 1;
    }
}

fn model_remove(model: &mut Model, key: &str) -> bool {
    match model.get_mut(key) {
        Some(n) if *n > 1 => {
            *n -= 1;
            true
        }
        Some(_) => {
            model.remove(key);
            true
        }
        None => false,
    }
}

/// Small alphabet and short keys so that duplicates, shared prefixes and
/// removals of present keys are common. It also keeps the implicit-array
/// tree shallow enough for its `2^height` layout.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-c]{0,3}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 30)]
    Remove(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 19)]
    Contains(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 1)]
    Clear,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=200)
}

fn check_against_model(
    dict: &mut dyn Dictionary,
    capacity: Option<usize>,
    ops: Vec<Op>,
) -> std::result::Result<(), TestCaseError> {
    let policy = dict.duplicate_policy();
    let mut model = Model::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                dict.insert(&key);
                model_insert(&mut model, &key, policy, capacity);
            }
            Op::Remove(key) => {
                let before = dict.render();
                let removed = dict.remove(&key);
                prop_assert_eq!(removed, model_remove(&mut model, &key));
                if !removed {
                    prop_assert_eq!(dict.render(), before);
                }
            }
            Op::Contains(key) => {
                prop_assert_eq!(dict.contains(&key), model.contains_key(&key));
            }
            Op::Clear => {
                dict.clear();
                model.clear();
            }
        }
        prop_assert_eq!(dict.len(), model.values().sum::<usize>());
    }

    dict.validate();
    let expected = model_keys(&model);
    prop_assert_eq!(dict.keys(), expected.clone());
    prop_assert_eq!(dict.render(), format!("[{}]", expected.join(", ")));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_dynamic_sorted_list(ops in ops_strategy()) {
        check_against_model(&mut DynamicSortedList::new(), None, ops)?;
    }

    #[test]
    fn prop_static_sorted_list(ops in ops_strategy(), capacity in 1usize..=24) {
        check_against_model(&mut StaticSortedList::with_capacity(capacity), Some(capacity), ops)?;
    }

    #[test]
    fn prop_open_hash_table(ops in ops_strategy(), hint in 0usize..=16) {
        check_against_model(&mut OpenHashTable::with_bucket_hint(hint), None, ops)?;
    }

    #[test]
    fn prop_pointer_bst(ops in ops_strategy()) {
        check_against_model(&mut PointerBst::new(), None, ops)?;
    }

    #[test]
    fn prop_array_heap_bst(ops in ops_strategy()) {
        check_against_model(&mut ArrayHeapBst::new(), None, ops)?;
    }

    #[test]
    fn prop_pointer_trie(ops in ops_strategy()) {
        check_against_model(&mut PointerTrie::new(), None, ops)?;
    }

    #[test]
    fn prop_array_trie(ops in ops_strategy()) {
        check_against_model(&mut ArrayTrie::new(), None, ops)?;
    }

    #[test]
    fn prop_hash_table_rehash_is_transparent(
        keys in prop::collection::btree_set("[a-z]{1,6}", 1..=120),
        hint in 4usize..=13,
    ) {
        let mut table = OpenHashTable::with_bucket_hint(hint);
        for key in &keys {
            table.insert(key);
        }
        prop_assert!(table.load_factor() <= 0.75);
        for key in &keys {
            prop_assert!(table.contains(key));
        }
        let expected: Vec<String> = keys.into_iter().collect();
        prop_assert_eq!(table.keys(), expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 6] = ["d", "b", "f", "a", "c", "e"];

fn bst_engines() -> [Box<dyn Dictionary>; 2] {
    [Box::new(PointerBst::new()), Box::new(ArrayHeapBst::new())]
}

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        for mut tree in bst_engines() {
            for key in &perm {
                tree.insert(key);
            }
            tree.validate();
            assert_eq!(tree.keys(), vec!["a", "b", "c", "d", "e", "f"]);
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Every insertion order crossed with a few removal orders covers all
    // three deletion cases at every depth.
    let removal_orders: [[&str; 6]; 3] = [
        ["d", "b", "f", "a", "c", "e"],
        ["a", "b", "c", "d", "e", "f"],
        ["f", "d", "b", "e", "c", "a"],
    ];
    for_each_permutation(&SMALL_SET, |perm| {
        for order in &removal_orders {
            for mut tree in bst_engines() {
                for key in &perm {
                    tree.insert(key);
                }
                let mut remaining: Vec<&str> = {
                    let mut sorted = SMALL_SET.to_vec();
                    sorted.sort();
                    sorted
                };
                for key in order {
                    assert!(tree.remove(key), "{} failed removing {key}", tree.name());
                    remaining.retain(|k| k != key);
                    tree.validate();
                    assert_eq!(tree.keys(), remaining);
                }
                assert!(tree.is_empty());
            }
        }
    });
}
