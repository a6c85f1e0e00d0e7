use super::text;
use crate::{Type, Value};
use once_cell::sync::Lazy;
use regex::Regex;

static LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^/(.+)/([gimsuy]*)$").unwrap());

/// Splits `/source/flags`; other text is taken as a flagless source.
fn split(text: &str) -> Option<(String, String)> {
    if text.is_empty() {
        return None;
    }
    if !text.starts_with('/') {
        return Some((text.to_string(), String::new()));
    }
    let caps = LITERAL.captures(text)?;
    let flags = caps.get(2).map_or("", |m| m.as_str());
    let mut seen = String::new();
    for flag in flags.chars() {
        if seen.contains(flag) {
            return None;
        }
        seen.push(flag);
    }
    Some((caps[1].to_string(), flags.to_string()))
}

/// `!<tag:yaml.org,2002:js/regexp>`
pub fn regexp() -> Type {
    Type::scalar("tag:yaml.org,2002:js/regexp")
        .with_resolve(|data| text(data).and_then(split).is_some())
        .with_construct(|data| match text(&data).and_then(split) {
            Some((source, flags)) => Value::Regexp { source, flags },
            None => data,
        })
        .with_predicate(|value| matches!(value, Value::Regexp { .. }))
        .with_represent(|value, _| match value {
            Value::Regexp { source, flags } => Value::Str(format!("/{source}/{flags}")),
            other => other.clone(),
        })
}

/// `!<tag:yaml.org,2002:js/undefined>`: any scalar, read as null.
pub fn undefined() -> Type {
    Type::scalar("tag:yaml.org,2002:js/undefined").with_construct(|_| Value::Null)
}
