//! Property-based tests for listify and parameter filtering

use esapi::{listify, validate_and_extract_params};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,12}"
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::String(String::new())),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        name().prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn listify_joins_in_order(items in prop::collection::vec(name(), 0..8)) {
        let value = Value::from(items.clone());
        prop_assert_eq!(listify(&value).unwrap(), items.join(","));
    }

    #[test]
    fn listify_scalar_is_identity(item in name()) {
        prop_assert_eq!(listify(&Value::String(item.clone())).unwrap(), item);
    }

    #[test]
    fn extraction_only_keeps_allowed_non_blank(
        entries in prop::collection::btree_map(name(), scalar(), 0..12),
        allowed in prop::collection::vec(name(), 0..6),
    ) {
        let input: Map<String, Value> = entries.into_iter().collect();
        let out = validate_and_extract_params(&input, &allowed);

        for (key, value) in &out {
            prop_assert!(allowed.contains(key));
            prop_assert_eq!(input.get(key), Some(value));
            prop_assert!(!value.is_null());
            prop_assert_ne!(value, &Value::String(String::new()));
        }

        // A second pass changes nothing
        prop_assert_eq!(validate_and_extract_params(&out, &allowed), out);
    }
}
