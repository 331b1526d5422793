//! Property-based tests for Record

use proptest::prelude::*;
use serde_json::{Map, Value};

use restfeed::shared::{identity_key, Record};

proptest! {
    #[test]
    fn test_integer_identity_key_is_decimal(id in any::<i64>()) {
        let record = Record::new().with("id", id);
        prop_assert_eq!(record.identity_key("id"), Some(id.to_string()));
    }

    #[test]
    fn test_merge_applies_every_change(
        base in prop::collection::btree_map("[a-z]{1,5}", any::<i32>(), 0..6),
        changes in prop::collection::btree_map("[a-z]{1,5}", any::<i32>(), 0..6),
    ) {
        let mut record = Record::from_map(base.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect());
        let changes: Map<String, Value> = changes.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();

        record.merge(&changes);

        for (key, value) in &changes {
            prop_assert_eq!(record.get(key), Some(value));
        }
        for key in base.keys() {
            prop_assert!(record.get(key).is_some());
        }
    }

    #[test]
    fn test_reserved_holds_identity_and_underscored_only(
        attrs in prop::collection::btree_map("_?[a-z]{1,5}", any::<bool>(), 0..8),
    ) {
        let record = Record::from_map(attrs.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect())
            .with("id", 7);

        let reserved = record.reserved("id");

        prop_assert_eq!(reserved.get("id"), Some(&Value::from(7)));
        for key in reserved.keys() {
            prop_assert!(key == "id" || key.starts_with('_'));
        }
        for key in attrs.keys().filter(|k| k.starts_with('_')) {
            prop_assert!(reserved.contains_key(key));
        }
    }

    #[test]
    fn test_only_strings_and_numbers_are_identities(flag in any::<bool>()) {
        prop_assert_eq!(identity_key(&Value::Bool(flag)), None);
        prop_assert_eq!(identity_key(&Value::Null), None);
    }
}
