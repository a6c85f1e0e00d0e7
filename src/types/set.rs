use crate::{Mapping, Type, Value};

/// `!!set`: a mapping whose values are all null.
pub fn set() -> Type {
    Type::mapping("tag:yaml.org,2002:set")
        .with_resolve(|data| match data {
            Value::Null => true,
            Value::Mapping(map) => map.values().all(Value::is_null),
            _ => false,
        })
        .with_construct(|data| match data {
            Value::Null => Value::Set(Default::default()),
            Value::Mapping(map) => Value::Set(map.keys().cloned().collect()),
            other => other,
        })
        .with_predicate(|value| matches!(value, Value::Set(_)))
        .with_represent(|value, _| match value {
            Value::Set(items) => Value::Mapping(
                items
                    .iter()
                    .map(|item| (item.clone(), Value::Null))
                    .collect::<Mapping>(),
            ),
            other => other.clone(),
        })
}
