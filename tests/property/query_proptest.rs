//! Property-based tests for read shaping and path resolution

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use restfeed::backend::registry::NameRegistry;
use restfeed::backend::resource::ReadQuery;

fn record_from(keys: &BTreeSet<String>) -> Value {
    let attributes: Map<String, Value> = keys
        .iter()
        .map(|key| (key.clone(), Value::String(format!("v-{}", key))))
        .collect();
    Value::Object(attributes)
}

fn keys_of(value: &Value) -> BTreeSet<String> {
    value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn test_pick_keeps_only_named_attributes(
        present in prop::collection::btree_set("[a-z]{1,6}", 0..8),
        named in prop::collection::btree_set("[a-z]{1,6}", 1..5),
    ) {
        let query = ReadQuery {
            pick: Some(named.iter().cloned().collect::<Vec<_>>().join(",")),
            ..Default::default()
        };

        let picked = query.project(record_from(&present));

        let expected: BTreeSet<String> = present.intersection(&named).cloned().collect();
        prop_assert_eq!(keys_of(&picked), expected);
    }

    #[test]
    fn test_omit_removes_named_attributes(
        present in prop::collection::btree_set("[a-z]{1,6}", 0..8),
        named in prop::collection::btree_set("[a-z]{1,6}", 1..5),
    ) {
        let query = ReadQuery {
            omit: Some(named.iter().cloned().collect::<Vec<_>>().join(",")),
            ..Default::default()
        };

        let shaped = query.project(record_from(&present));

        let expected: BTreeSet<String> = present.difference(&named).cloned().collect();
        prop_assert_eq!(keys_of(&shaped), expected);
    }

    #[test]
    fn test_where_never_adds_records(ids in prop::collection::vec(0i64..20, 0..30), wanted in 0i64..20) {
        let records: Vec<Value> = ids.iter().map(|id| serde_json::json!({ "id": id })).collect();
        let query = ReadQuery {
            where_key: Some("id".to_string()),
            where_value: Some(wanted.to_string()),
            ..Default::default()
        };

        let kept = query.apply(records);

        prop_assert_eq!(kept.len(), ids.iter().filter(|id| **id == wanted).count());
    }

    #[test]
    fn test_paths_under_a_collection_resolve_to_it(
        base in "[a-z]{1,8}",
        rest in prop::collection::vec("[a-z0-9]{1,6}", 0..4),
        trailing in any::<bool>(),
    ) {
        let mut names = NameRegistry::new();
        names.insert(&format!("/{}", base), base.clone());

        let mut path = format!("/{}", base);
        for segment in &rest {
            path.push('/');
            path.push_str(segment);
        }
        if trailing {
            path.push('/');
        }

        prop_assert_eq!(names.resolve(&path), Some(base.as_str()));
    }
}
