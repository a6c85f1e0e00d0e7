use crate::{Mapping, Type, Value};

fn resolve_pairs(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Sequence(items) => items
            .iter()
            .all(|item| matches!(item, Value::Mapping(pair) if pair.len() == 1)),
        _ => false,
    }
}

fn construct_pairs(data: Value) -> Value {
    match data {
        Value::Null => Value::Pairs(Vec::new()),
        Value::Sequence(items) => Value::Pairs(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Mapping(pair) => pair.into_iter().next(),
                    _ => None,
                })
                .collect(),
        ),
        other => other,
    }
}

fn represent_pairs(value: &Value, _style: &str) -> Value {
    match value {
        Value::Pairs(pairs) => Value::Sequence(
            pairs
                .iter()
                .map(|(key, value)| {
                    Value::Mapping(Mapping::from_iter([(key.clone(), value.clone())]))
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// `!!pairs`: key/value pairs where keys may repeat.
pub fn pairs() -> Type {
    Type::sequence("tag:yaml.org,2002:pairs")
        .with_resolve(resolve_pairs)
        .with_construct(construct_pairs)
        .with_predicate(|value| matches!(value, Value::Pairs(_)))
        .with_represent(represent_pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: i64) -> Value {
        Value::Mapping(Mapping::from_iter([(key.to_string(), Value::from(value))]))
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let data = Value::from(vec![pair("a", 1), pair("a", 2)]);
        assert!(resolve_pairs(&data));
        let value = construct_pairs(data.clone());
        assert_eq!(
            value,
            Value::Pairs(vec![
                ("a".to_string(), Value::from(1)),
                ("a".to_string(), Value::from(2)),
            ])
        );
        assert_eq!(represent_pairs(&value, ""), data);
    }

    #[test]
    fn test_rejects_wide_mappings() {
        let mut wide = Mapping::new();
        wide.insert("a".into(), Value::Null);
        wide.insert("b".into(), Value::Null);
        assert!(!resolve_pairs(&Value::from(vec![Value::Mapping(wide)])));
        assert!(!resolve_pairs(&Value::from("a")));
    }
}
