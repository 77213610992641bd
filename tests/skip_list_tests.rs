use std::collections::BTreeMap;
use std::ops::{Bound, RangeBounds};

use proptest::prelude::*;
use rstest::rstest;
use skipkv::{ConcurrentSkipList, SetOptions, SkipList, SkipListConfig, SkipListError};

const RANGE_KEYS: [i32; 5] = [2, 3, 21, 34, 62];

fn range_list() -> SkipList<i32, String> {
    RANGE_KEYS
        .iter()
        .map(|key| (*key, format!("v{key}")))
        .collect()
}

fn collect_range(list: &SkipList<i32, String>, from: Bound<i32>, to: Bound<i32>) -> Vec<i32> {
    let mut keys = Vec::new();
    list.range((from, to), |key, value| {
        assert_eq!(value, &format!("v{key}"));
        keys.push(*key);
        true
    });
    keys
}

#[rstest]
#[case::both_inclusive(Bound::Included(3), Bound::Included(34), vec![3, 21, 34])]
#[case::both_exclusive(Bound::Excluded(3), Bound::Excluded(34), vec![21])]
#[case::inclusive_exclusive(Bound::Included(3), Bound::Excluded(34), vec![3, 21])]
#[case::exclusive_inclusive(Bound::Excluded(3), Bound::Included(34), vec![21, 34])]
#[case::absent_bounds(Bound::Included(4), Bound::Included(61), vec![21, 34])]
#[case::absent_exclusive_bounds(Bound::Excluded(4), Bound::Excluded(61), vec![21, 34])]
#[case::open_start(Bound::Unbounded, Bound::Included(3), vec![2, 3])]
#[case::open_end(Bound::Included(34), Bound::Unbounded, vec![34, 62])]
#[case::unbounded(Bound::Unbounded, Bound::Unbounded, vec![2, 3, 21, 34, 62])]
#[case::below_everything(Bound::Unbounded, Bound::Excluded(2), vec![])]
#[case::above_everything(Bound::Excluded(62), Bound::Unbounded, vec![])]
#[case::single_point(Bound::Included(21), Bound::Included(21), vec![21])]
#[case::empty_point(Bound::Included(21), Bound::Excluded(21), vec![])]
#[case::inverted(Bound::Included(34), Bound::Included(3), vec![])]
fn test_range_boundaries(#[case] from: Bound<i32>, #[case] to: Bound<i32>, #[case] expected: Vec<i32>) {
    let list = range_list();
    assert_eq!(collect_range(&list, from, to), expected);
}

#[rstest]
#[case::both_inclusive(Bound::Included(3), Bound::Included(34), vec![3, 21, 34])]
#[case::both_exclusive(Bound::Excluded(3), Bound::Excluded(34), vec![21])]
fn test_concurrent_range_boundaries(
    #[case] from: Bound<i32>,
    #[case] to: Bound<i32>,
    #[case] expected: Vec<i32>,
) {
    let list: ConcurrentSkipList<i32, String> = range_list().into();
    let mut keys = Vec::new();
    list.range((from, to), |key, _| {
        keys.push(*key);
        true
    });
    assert_eq!(keys, expected);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(16)]
#[case(48)]
#[case(64)]
fn test_every_level_count_keeps_order(#[case] max_levels: usize) {
    let mut list: SkipList<u32, u32> =
        SkipList::with_config(SkipListConfig::new().with_max_levels(max_levels).with_seed(9));
    for k in (0..500).rev() {
        list.set(k * 7 % 500, k).unwrap();
    }
    assert_eq!(list.size(), 500);
    assert!(list.current_max_level() < max_levels);
    let keys: Vec<u32> = list.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, (0..500).collect::<Vec<u32>>());
}

#[rstest]
#[case::zero(0)]
#[case::too_many(65)]
#[case::far_too_many(10_000)]
fn test_out_of_range_levels_fall_back_to_default(#[case] max_levels: usize) {
    let config = SkipListConfig {
        max_levels,
        seed: Some(1),
    };
    let list: SkipList<u8, u8> = SkipList::with_config(config);
    assert_eq!(list.max_levels(), skipkv::DEFAULT_MAX_LEVELS);
}

#[test]
fn test_insert_if_absent_keeps_original() {
    let mut list: SkipList<&str, i32> = SkipList::new();
    list.set("k", 1).unwrap();
    assert_eq!(
        list.set_with("k", 2, SetOptions::if_absent()),
        Err(SkipListError::DuplicateKey)
    );
    assert_eq!(list.get("k"), Ok(&1));
    assert_eq!(list.size(), 1);
}

#[test]
fn test_empty_structure_errors() {
    let mut list: SkipList<i32, i32> = SkipList::new();
    assert_eq!(list.min(), Err(SkipListError::Empty));
    assert_eq!(list.max(), Err(SkipListError::Empty));
    assert_eq!(list.pop(), Err(SkipListError::Empty));
    assert_eq!(list.lpop(), Err(SkipListError::Empty));
    assert!(!list.delete(&1));
    assert_eq!(list.size(), 0);
}

#[derive(Debug, Clone)]
enum Op {
    Set(u16, u32),
    SetIfAbsent(u16, u32),
    Delete(u16),
    Pop,
    LPop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u16..300, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        1 => (0u16..300, any::<u32>()).prop_map(|(k, v)| Op::SetIfAbsent(k, v)),
        2 => (0u16..300).prop_map(Op::Delete),
        1 => Just(Op::Pop),
        1 => Just(Op::LPop),
    ]
}

proptest! {
    #[test]
    fn prop_matches_btree_map(ops in prop::collection::vec(op_strategy(), 0..400), seed in any::<u64>()) {
        let mut list: SkipList<u16, u32> = SkipList::with_config(SkipListConfig::new().with_seed(seed));
        let mut expected = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    prop_assert_eq!(list.set(k, v), Ok(()));
                    expected.insert(k, v);
                }
                Op::SetIfAbsent(k, v) => {
                    let result = list.set_with(k, v, SetOptions::if_absent());
                    if expected.contains_key(&k) {
                        prop_assert_eq!(result, Err(SkipListError::DuplicateKey));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        expected.insert(k, v);
                    }
                }
                Op::Delete(k) => {
                    prop_assert_eq!(list.delete(&k), expected.remove(&k).is_some());
                }
                Op::Pop => {
                    let want = expected.pop_last().ok_or(SkipListError::Empty);
                    prop_assert_eq!(list.pop(), want);
                }
                Op::LPop => {
                    let want = expected.pop_first().ok_or(SkipListError::Empty);
                    prop_assert_eq!(list.lpop(), want);
                }
            }
            prop_assert_eq!(list.size(), expected.len());
        }

        let actual: Vec<(u16, u32)> = list.iter().map(|(k, v)| (*k, *v)).collect();
        let wanted: Vec<(u16, u32)> = expected.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(actual, wanted);
        prop_assert_eq!(list.min().ok(), expected.first_key_value());
        prop_assert_eq!(list.max().ok(), expected.last_key_value());
        for k in 0u16..300 {
            prop_assert_eq!(list.get(&k).ok(), expected.get(&k));
        }
    }

    #[test]
    fn prop_range_matches_btree_map(
        keys in prop::collection::btree_set(0i32..1_000, 0..200),
        from in 0i32..1_000,
        len in 0i32..400,
        include_from in any::<bool>(),
        include_to in any::<bool>(),
    ) {
        let list: SkipList<i32, ()> = keys.iter().map(|k| (*k, ())).collect();
        let to = from + len;
        let from_bound = if include_from { Bound::Included(from) } else { Bound::Excluded(from) };
        let to_bound = if include_to { Bound::Included(to) } else { Bound::Excluded(to) };

        let mut visited = Vec::new();
        list.range((from_bound, to_bound), |key, _| {
            visited.push(*key);
            true
        });
        let wanted: Vec<i32> = keys
            .iter()
            .copied()
            .filter(|k| (from_bound, to_bound).contains(k))
            .collect();
        prop_assert_eq!(visited, wanted);
    }
}
