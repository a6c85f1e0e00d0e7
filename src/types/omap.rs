use crate::{Type, Value};
use std::collections::HashSet;

fn resolve_omap(data: &Value) -> bool {
    let items = match data {
        Value::Null => return true,
        Value::Sequence(items) => items,
        _ => return false,
    };
    let mut seen = HashSet::new();
    items.iter().all(|item| match item {
        Value::Mapping(pair) if pair.len() == 1 => {
            pair.keys().next().is_some_and(|key| seen.insert(key.clone()))
        }
        _ => false,
    })
}

fn construct_omap(data: Value) -> Value {
    match data {
        Value::Null => Value::OrderedMap(Vec::new()),
        Value::Sequence(items) => Value::OrderedMap(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Mapping(pair) => Some(pair),
                    _ => None,
                })
                .collect(),
        ),
        other => other,
    }
}

fn represent_omap(value: &Value, _style: &str) -> Value {
    match value {
        Value::OrderedMap(entries) => {
            Value::Sequence(entries.iter().cloned().map(Value::Mapping).collect())
        }
        other => other.clone(),
    }
}

/// `!!omap`: an ordered sequence of single-key mappings with unique keys.
pub fn omap() -> Type {
    Type::sequence("tag:yaml.org,2002:omap")
        .with_resolve(resolve_omap)
        .with_construct(construct_omap)
        .with_predicate(|value| matches!(value, Value::OrderedMap(_)))
        .with_represent(represent_omap)
}
