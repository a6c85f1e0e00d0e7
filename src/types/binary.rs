use super::text;
use crate::{Type, Value};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Decoder tolerant of missing padding and stray trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

fn is_base64_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '+' | '/' | '=')
}

fn decode(text: &str) -> Option<Vec<u8>> {
    let mut bits = 0usize;
    for ch in text.chars() {
        if matches!(ch, '\n' | '\r') {
            continue;
        }
        if !is_base64_char(ch) {
            return None;
        }
        bits += 6;
    }
    if bits % 8 != 0 {
        return None;
    }
    let cleaned: String = text
        .chars()
        .filter(|ch| !matches!(ch, '\n' | '\r' | '='))
        .collect();
    LENIENT.decode(cleaned).ok()
}

/// `!!binary`, base64 encoded.
pub fn binary() -> Type {
    Type::scalar("tag:yaml.org,2002:binary")
        .with_resolve(|data| text(data).and_then(decode).is_some())
        .with_construct(|data| match text(&data).and_then(decode) {
            Some(bytes) => Value::Binary(bytes),
            None => data,
        })
        .with_predicate(|value| matches!(value, Value::Binary(_)))
        .with_represent(|value, _| match value {
            Value::Binary(bytes) => Value::Str(STANDARD.encode(bytes)),
            other => other.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_ignores_line_breaks() {
        let value = binary().construct(Value::from("SGVs\nbG8=\r\n"));
        assert_eq!(value, Value::Binary(b"Hello".to_vec()));
    }

    #[test]
    fn test_resolve() {
        let ty = binary();
        assert!(ty.resolve(&Value::from("SGVsbG8=")));
        assert!(ty.resolve(&Value::from("")));
        assert!(!ty.resolve(&Value::from("SGVsbG8")));
        assert!(!ty.resolve(&Value::from("SGV*bG8=")));
    }

    #[test]
    fn test_represent() {
        let value = Value::Binary(vec![0, 1, 2, 250]);
        assert_eq!(binary().represent(&value, None).unwrap(), Value::from("AAEC+g=="));
    }
}
