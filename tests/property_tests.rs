//! Property-based tests for the core round-trip guarantees.
//!
//! Serde values go through `to_string`/`from_str`; generated `Value` trees
//! go through `stringify`/`parse` and must read back unchanged.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use yamlet::{from_str, parse, parse_all, stringify, to_string, Mapping, ParseOptions, StringifyOptions, Value};

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<i32>().prop_map(|n| Value::Float(f64::from(n) / 8.0)),
        "[a-zA-Z0-9 _.,:#'\"-]{0,24}".prop_map(Value::from),
        "[a-z]{1,10}(\n[a-z]{1,10}){0,3}\n?".prop_map(Value::from),
    ]
}

fn value_tree() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..6).prop_map(|entries| {
                Value::Mapping(entries.into_iter().collect::<Mapping>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_string(s in "[a-zA-Z0-9 _.,:#'\"\\[\\]{}-]{0,40}") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_tuple_i32_bool(t in (any::<i32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }

    #[test]
    fn prop_value_tree_reads_back(value in value_tree()) {
        let yaml = stringify(&value, &StringifyOptions::default()).unwrap();
        let back = parse(&yaml, &ParseOptions::default()).unwrap();
        prop_assert_eq!(back, value, "yaml was:\n{}", yaml);
    }

    #[test]
    fn prop_flow_output_reads_back(value in value_tree()) {
        let options = StringifyOptions::new().with_flow_level(Some(0));
        let yaml = stringify(&value, &options).unwrap();
        let back = parse(&yaml, &ParseOptions::default()).unwrap();
        prop_assert_eq!(back, value, "yaml was:\n{}", yaml);
    }

    #[test]
    fn prop_stringify_is_stable(value in value_tree()) {
        let options = StringifyOptions::default();
        let once = stringify(&value, &options).unwrap();
        let twice = stringify(&parse(&once, &ParseOptions::default()).unwrap(), &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_joined_documents_read_back(values in prop::collection::vec(value_tree(), 1..4)) {
        let options = StringifyOptions::default();
        let yaml = values
            .iter()
            .map(|value| stringify(value, &options).unwrap())
            .collect::<Vec<_>>()
            .join("---\n");
        let back = parse_all(&yaml, &ParseOptions::default()).unwrap();
        prop_assert_eq!(back, values, "yaml was:\n{}", yaml);
    }
}
