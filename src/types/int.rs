use super::text;
use crate::schema::StyleFn;
use crate::{Type, Value};

fn is_digit_of(radix: u32, ch: u8) -> bool {
    (ch as char).is_digit(radix)
}

fn resolve_int(data: &Value) -> bool {
    let Some(text) = text(data) else {
        return false;
    };
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut index = 0;
    if matches!(bytes[0], b'-' | b'+') {
        index += 1;
    }
    if bytes.get(index) == Some(&b'0') {
        if index + 1 == bytes.len() {
            return true;
        }
        index += 1;
        let radix = match bytes[index] {
            b'b' => Some(2),
            b'x' => Some(16),
            b'o' => Some(8),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = &bytes[index + 1..];
            return digits.iter().any(|&ch| ch != b'_')
                && digits.iter().all(|&ch| ch == b'_' || is_digit_of(radix, ch))
                && digits.last() != Some(&b'_');
        }
    }
    let digits = &bytes[index..];
    if digits.first() == Some(&b'_') {
        return false;
    }
    digits.iter().any(|&ch| ch != b'_')
        && digits.iter().all(|&ch| ch == b'_' || ch.is_ascii_digit())
        && digits.last() != Some(&b'_')
}

fn digits_to_f64(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|ch| ch.to_digit(radix))
        .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit))
}

fn construct_int(data: Value) -> Value {
    let Value::Str(text) = data else {
        return data;
    };
    let cleaned: String = text.chars().filter(|&ch| ch != '_').collect();
    let (negative, unsigned) = match cleaned.as_bytes().first() {
        Some(b'-') => (true, &cleaned[1..]),
        Some(b'+') => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0b") => (2, &unsigned[2..]),
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        _ => (10, unsigned),
    };
    match i128::from_str_radix(digits, radix) {
        Ok(magnitude) => {
            let signed = if negative { -magnitude } else { magnitude };
            i64::try_from(signed).map_or(Value::Float(signed as f64), Value::Int)
        }
        Err(_) => {
            let magnitude = digits_to_f64(digits, radix);
            Value::Float(if negative { -magnitude } else { magnitude })
        }
    }
}

fn with_radix(value: &Value, prefix: &str, radix: u32) -> Value {
    let Some(number) = value.as_i64() else {
        return value.clone();
    };
    let magnitude = number.unsigned_abs();
    let digits = match radix {
        2 => format!("{magnitude:b}"),
        8 => format!("{magnitude:o}"),
        16 => format!("{magnitude:X}"),
        _ => magnitude.to_string(),
    };
    let sign = if number < 0 { "-" } else { "" };
    Value::Str(format!("{sign}{prefix}{digits}"))
}

fn binary(value: &Value) -> Value {
    with_radix(value, "0b", 2)
}

fn octal(value: &Value) -> Value {
    with_radix(value, "0o", 8)
}

fn decimal(value: &Value) -> Value {
    with_radix(value, "", 10)
}

fn hexadecimal(value: &Value) -> Value {
    with_radix(value, "0x", 16)
}

const STYLES: &[(&str, StyleFn)] = &[
    ("binary", binary),
    ("octal", octal),
    ("decimal", decimal),
    ("hexadecimal", hexadecimal),
];

const ALIASES: &[(&str, &str)] = &[
    ("2", "binary"),
    ("bin", "binary"),
    ("8", "octal"),
    ("oct", "octal"),
    ("10", "decimal"),
    ("dec", "decimal"),
    ("16", "hexadecimal"),
    ("hex", "hexadecimal"),
];

/// `!!int`
pub fn int() -> Type {
    Type::scalar("tag:yaml.org,2002:int")
        .with_resolve(resolve_int)
        .with_construct(construct_int)
        .with_predicate(Value::is_i64)
        .with_styles(STYLES, "decimal")
        .with_style_aliases(ALIASES)
}
