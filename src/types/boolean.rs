use super::text;
use crate::schema::StyleFn;
use crate::{Type, Value};

fn resolve_bool(data: &Value) -> bool {
    matches!(
        text(data),
        Some("true" | "True" | "TRUE" | "false" | "False" | "FALSE")
    )
}

fn construct_bool(data: Value) -> Value {
    match data {
        Value::Str(s) => Value::Bool(s.eq_ignore_ascii_case("true")),
        other => other,
    }
}

fn spell(value: &Value, yes: &str, no: &str) -> Value {
    Value::from(if value.as_bool() == Some(true) { yes } else { no })
}

fn lowercase(value: &Value) -> Value {
    spell(value, "true", "false")
}

fn uppercase(value: &Value) -> Value {
    spell(value, "TRUE", "FALSE")
}

fn camelcase(value: &Value) -> Value {
    spell(value, "True", "False")
}

const STYLES: &[(&str, StyleFn)] = &[
    ("lowercase", lowercase),
    ("uppercase", uppercase),
    ("camelcase", camelcase),
];

/// `!!bool`
pub fn boolean() -> Type {
    Type::scalar("tag:yaml.org,2002:bool")
        .with_resolve(resolve_bool)
        .with_construct(construct_bool)
        .with_predicate(Value::is_bool)
        .with_styles(STYLES, "lowercase")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_and_construct() {
        let ty = boolean();
        assert!(ty.resolve(&Value::from("True")));
        assert!(!ty.resolve(&Value::from("yes")));
        assert!(!ty.resolve(&Value::from("tRUE")));
        assert_eq!(ty.construct(Value::from("FALSE")), Value::Bool(false));
        assert_eq!(ty.construct(Value::from("TRUE")), Value::Bool(true));
    }

    #[test]
    fn test_styles() {
        let ty = boolean();
        assert_eq!(
            ty.represent(&Value::Bool(true), Some("camelcase")).unwrap(),
            Value::from("True")
        );
        assert_eq!(
            ty.represent(&Value::Bool(false), Some("uppercase")).unwrap(),
            Value::from("FALSE")
        );
    }
}
