//! Property tests for the `-O` option parse cascade.

use proptest::prelude::*;

use serde_json::{Map, Value};

use pugc::{merge, parse_obj};

fn option_key() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-zA-Z0-9]{0,10}").unwrap()
}

fn option_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[A-Za-z0-9 /_.-]{0,16}".prop_map(Value::from),
    ]
}

fn option_map() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::btree_map(option_key(), option_value(), 0..=6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `parse_obj` never panics on arbitrary input; it either
    /// yields a mapping or a diagnostic error.
    #[test]
    fn property_parse_obj_never_panics(
        s in "(?s).{0,128}"
    ) {
        let _ = parse_obj(&s);
    }

    /// PROPERTY: any JSON object survives the cascade unchanged.
    #[test]
    fn property_json_objects_round_trip(
        map in option_map()
    ) {
        let text = Value::Object(map.clone()).to_string();
        let parsed = parse_obj(&text).unwrap();
        prop_assert_eq!(parsed, map);
    }

    /// PROPERTY: merge overwrites colliding keys with the incoming value
    /// and retains every key the incoming mapping omits.
    #[test]
    fn property_merge_overwrites_and_retains(
        current in option_map(),
        incoming in option_map()
    ) {
        let mut merged = current.clone();
        merge(&mut merged, incoming.clone());

        for (key, value) in &merged {
            match incoming.get(key) {
                Some(v) => prop_assert_eq!(value, v),
                None => prop_assert_eq!(value, &current[key]),
            }
        }
        for key in current.keys().chain(incoming.keys()) {
            prop_assert!(merged.contains_key(key));
        }
    }
}
