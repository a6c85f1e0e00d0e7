use super::text;
use crate::schema::StyleFn;
use crate::{Type, Value};

fn resolve_null(data: &Value) -> bool {
    match data {
        Value::Null => true,
        other => matches!(text(other), Some("~" | "null" | "Null" | "NULL")),
    }
}

fn canonical(_: &Value) -> Value {
    Value::from("~")
}

fn lowercase(_: &Value) -> Value {
    Value::from("null")
}

fn uppercase(_: &Value) -> Value {
    Value::from("NULL")
}

fn camelcase(_: &Value) -> Value {
    Value::from("Null")
}

fn empty(_: &Value) -> Value {
    Value::from("")
}

const STYLES: &[(&str, StyleFn)] = &[
    ("canonical", canonical),
    ("lowercase", lowercase),
    ("uppercase", uppercase),
    ("camelcase", camelcase),
    ("empty", empty),
];

/// `!!null`
pub fn null() -> Type {
    Type::scalar("tag:yaml.org,2002:null")
        .with_resolve(resolve_null)
        .with_construct(|_| Value::Null)
        .with_predicate(Value::is_null)
        .with_styles(STYLES, "lowercase")
}
