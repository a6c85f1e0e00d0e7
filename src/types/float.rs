use super::text;
use crate::schema::StyleFn;
use crate::{Type, Value};
use once_cell::sync::Lazy;
use regex::Regex;

static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:[-+]?(?:0|[1-9][0-9_]*)(?:\.[0-9_]*)?(?:[eE][-+]?[0-9]+)?",
        r"|\.[0-9_]+(?:[eE][-+]?[0-9]+)?",
        r"|[-+]?\.(?:inf|Inf|INF)",
        r"|\.(?:nan|NaN|NAN))$",
    ))
    .unwrap()
});

static SCIENTIFIC_WITHOUT_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+e").unwrap());

fn resolve_float(data: &Value) -> bool {
    text(data).is_some_and(|text| FLOAT_PATTERN.is_match(text) && !text.ends_with('_'))
}

fn construct_float(data: Value) -> Value {
    let Value::Str(text) = data else {
        return data;
    };
    let lowered: String = text
        .chars()
        .filter(|&ch| ch != '_')
        .collect::<String>()
        .to_lowercase();
    let sign = if lowered.starts_with('-') { -1.0 } else { 1.0 };
    let unsigned = lowered.trim_start_matches(['-', '+']);
    let magnitude = match unsigned {
        ".inf" => f64::INFINITY,
        ".nan" => return Value::Float(f64::NAN),
        digits => digits.parse::<f64>().unwrap_or(f64::NAN),
    };
    Value::Float(sign * magnitude)
}

fn special(value: f64, nan: &str, inf: &str) -> Option<String> {
    if value.is_nan() {
        Some(nan.to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { inf.to_string() } else { format!("-{inf}") })
    } else {
        None
    }
}

fn finite(value: f64) -> String {
    if value == 0.0 && value.is_sign_negative() {
        return "-0.0".to_string();
    }
    let text = format!("{value:?}");
    if SCIENTIFIC_WITHOUT_DOT.is_match(&text) {
        text.replacen('e', ".e", 1)
    } else {
        text
    }
}

fn spell(value: &Value, nan: &str, inf: &str) -> Value {
    let Value::Float(number) = *value else {
        return value.clone();
    };
    Value::Str(special(number, nan, inf).unwrap_or_else(|| finite(number)))
}

fn lowercase(value: &Value) -> Value {
    spell(value, ".nan", ".inf")
}

fn uppercase(value: &Value) -> Value {
    spell(value, ".NAN", ".INF")
}

fn camelcase(value: &Value) -> Value {
    spell(value, ".NaN", ".Inf")
}

const STYLES: &[(&str, StyleFn)] = &[
    ("lowercase", lowercase),
    ("uppercase", uppercase),
    ("camelcase", camelcase),
];

/// `!!float`
pub fn float() -> Type {
    Type::scalar("tag:yaml.org,2002:float")
        .with_resolve(resolve_float)
        .with_construct(construct_float)
        .with_predicate(Value::is_f64)
        .with_styles(STYLES, "lowercase")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolves(text: &str) -> bool {
        resolve_float(&Value::from(text))
    }

    fn construct(text: &str) -> f64 {
        construct_float(Value::from(text)).as_f64().unwrap()
    }

    #[test]
    fn test_resolve() {
        for text in ["1.5", "-0.5", "1e3", "1.0E-3", ".5", "+.inf", "-.Inf", ".NaN", "1_000.5", "1."] {
            assert!(resolves(text), "{text}");
        }
        for text in ["", "1.5_", "-.nan", ".", "01.5", "1e", "abc", "1.5.5"] {
            assert!(!resolves(text), "{text}");
        }
    }

    #[test]
    fn test_construct() {
        assert_eq!(construct("1_000.5"), 1000.5);
        assert_eq!(construct("-.INF"), f64::NEG_INFINITY);
        assert_eq!(construct("+.inf"), f64::INFINITY);
        assert!(construct(".NaN").is_nan());
        assert_eq!(construct("1E3"), 1000.0);
        assert_eq!(construct("1."), 1.0);
    }

    #[test]
    fn test_represent() {
        let ty = float();
        let repr = |v: f64, style: Option<&str>| ty.represent(&Value::Float(v), style).unwrap();
        assert_eq!(repr(f64::NAN, None), Value::from(".nan"));
        assert_eq!(repr(f64::NAN, Some("camelcase")), Value::from(".NaN"));
        assert_eq!(repr(f64::NEG_INFINITY, Some("uppercase")), Value::from("-.INF"));
        assert_eq!(repr(-0.0, None), Value::from("-0.0"));
        assert_eq!(repr(3.0, None), Value::from("3.0"));
        assert_eq!(repr(1.5, None), Value::from("1.5"));
        assert_eq!(repr(1e21, None), Value::from("1.e21"));
        assert_eq!(repr(1.5e-7, None), Value::from("1.5e-7"));
    }
}
