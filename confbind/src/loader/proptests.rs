//! Property-based tests for configuration merging.

use super::merger::{ConfigMerger, IncludeDefault};
use proptest::prelude::*;
use serde_json::{Map, Value};

const MARKER: &str = "__INCLUDE_DEFAULT__";

// Scalars that never collide with the marker
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-e]", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn tree_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-f]{1,3}", value_strategy(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

fn merged(merger: &ConfigMerger, base: &Map<String, Value>, update: &Map<String, Value>) -> Map<String, Value> {
    let mut result = base.clone();
    merger.recursive_update(&mut result, update.clone());
    result
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Merging a tree with itself yields the same tree when no markers are set
    #[test]
    fn merge_is_idempotent(tree in tree_strategy()) {
        let merger = ConfigMerger::default();
        prop_assert_eq!(merged(&merger, &tree, &tree), tree);
    }

    // Every top-level scalar in the override wins
    #[test]
    fn override_scalars_take_precedence(
        base in tree_strategy(),
        update in prop::collection::btree_map("[a-f]{1,3}", scalar_strategy(), 0..6)
    ) {
        let update: Map<String, Value> = update.into_iter().collect();
        let result = merged(&ConfigMerger::default(), &base, &update);

        for (key, value) in &update {
            prop_assert_eq!(result.get(key), Some(value));
        }
        for (key, value) in &base {
            if !update.contains_key(key) {
                prop_assert_eq!(result.get(key), Some(value));
            }
        }
    }

    // Keys are never lost by merging
    #[test]
    fn merge_keeps_every_key(base in tree_strategy(), update in tree_strategy()) {
        let result = merged(&ConfigMerger::default(), &base, &update);
        for key in base.keys().chain(update.keys()) {
            prop_assert!(result.contains_key(key));
        }
    }

    // A marked list appends to the base list and the marker disappears
    #[test]
    fn marked_list_appends(
        base in prop::collection::vec(scalar_strategy(), 0..6),
        extra in prop::collection::vec(scalar_strategy(), 0..6),
        position in 0usize..6
    ) {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));

        let mut marked = extra.clone();
        marked.insert(position.min(marked.len()), Value::String(MARKER.to_string()));

        let mut original = Map::new();
        original.insert("list".to_string(), Value::Array(base.clone()));
        let mut update = Map::new();
        update.insert("list".to_string(), Value::Array(marked));

        let result = merger.merge(vec![original, update]);

        let mut expected = base;
        expected.extend(extra);
        prop_assert_eq!(&result["list"], &Value::Array(expected));
    }

    // Without a marker the override list replaces the base list
    #[test]
    fn unmarked_list_replaces(
        base in prop::collection::vec(scalar_strategy(), 0..6),
        update in prop::collection::vec(scalar_strategy(), 0..6)
    ) {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));

        let mut original = Map::new();
        original.insert("list".to_string(), Value::Array(base));
        let mut overlay = Map::new();
        overlay.insert("list".to_string(), Value::Array(update.clone()));

        let result = merger.merge(vec![original, overlay]);
        prop_assert_eq!(&result["list"], &Value::Array(update));
    }
}
