//! Dynamic value representation for YAML data.
//!
//! [`Value`] is what the loader produces and what the dumper consumes. The
//! scalar variants cover every type of the built-in schemas; the collection
//! variants cover plain sequences and mappings plus the `!!omap`, `!!pairs`
//! and `!!set` collection types.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use yamlet::{yaml, Value};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = yaml!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_mapping());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use yamlet::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::{Mapping, Sequence};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed YAML value.
///
/// # Examples
///
/// ```rust
/// use yamlet::{parse, ParseOptions, Value};
///
/// let value = parse("answer: 42\npi: 3.14\n", &ParseOptions::default()).unwrap();
/// assert_eq!(value.get("answer"), Some(&Value::Int(42)));
/// assert_eq!(value.get("pi").and_then(Value::as_f64), Some(3.14));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// `!!binary`
    Binary(Vec<u8>),
    /// `!!timestamp`, normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// `!<tag:yaml.org,2002:js/regexp>`
    Regexp { source: String, flags: String },
    Sequence(Sequence),
    Mapping(Mapping),
    /// `!!omap`: single-entry mappings with unique keys.
    OrderedMap(Vec<Mapping>),
    /// `!!pairs`: key/value tuples, duplicates allowed.
    Pairs(Vec<(String, Value)>),
    /// `!!set`: a mapping whose values are all null.
    Set(IndexSet<String>),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_i64(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_f64(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlet::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns floats as-is and widens integers.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(dt) => Some(dt),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// A short name for the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Binary(_) => "binary",
            Value::Timestamp(_) => "timestamp",
            Value::Regexp { .. } => "regexp",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::OrderedMap(_) => "omap",
            Value::Pairs(_) => "pairs",
            Value::Set(_) => "set",
        }
    }

    /// Coerces the value into a mapping key.
    ///
    /// Mapping-like values all collapse to `"[object Object]"` and sequences
    /// are joined with `,`. Returns `None` when a sequence holds another
    /// sequence, which cannot be used as a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlet::{Sequence, Value};
    ///
    /// assert_eq!(Value::Null.to_key_string().as_deref(), Some("null"));
    /// assert_eq!(Value::Float(2.0).to_key_string().as_deref(), Some("2"));
    ///
    /// let seq: Sequence = vec![Value::from(1), Value::Null, Value::from("a")].into();
    /// assert_eq!(Value::Sequence(seq).to_key_string().as_deref(), Some("1,,a"));
    /// ```
    #[must_use]
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Value::Sequence(seq) => {
                let mut parts = Vec::with_capacity(seq.len());
                for item in seq.iter() {
                    let part = match item {
                        Value::Null => String::new(),
                        Value::Sequence(_) => return None,
                        other => other.to_key_string()?,
                    };
                    parts.push(part);
                }
                Some(parts.join(","))
            }
            other => Some(scalar_key_string(other)),
        }
    }
}

fn scalar_key_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => number_key_string(*f),
        Value::Str(s) => s.clone(),
        Value::Binary(bytes) => bytes
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Timestamp(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        Value::Regexp { source, flags } => format!("/{source}/{flags}"),
        Value::Sequence(_)
        | Value::Mapping(_)
        | Value::OrderedMap(_)
        | Value::Pairs(_)
        | Value::Set(_) => "[object Object]".to_string(),
    }
}

fn number_key_string(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if f == 0.0 {
        "0".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    /// Formats the value as a YAML document with default options.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::stringify(self, &crate::StringifyOptions::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(text.trim_end_matches('\n'))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            Value::Timestamp(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Regexp { source, flags } => {
                serializer.serialize_str(&format!("/{source}/{flags}"))
            }
            Value::Sequence(seq) => {
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for element in seq.iter() {
                    out.serialize_element(element)?;
                }
                out.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::OrderedMap(entries) => {
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries.iter().flat_map(Mapping::iter) {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Pairs(pairs) => {
                let mut out = serializer.serialize_seq(Some(pairs.len()))?;
                for pair in pairs {
                    out.serialize_element(pair)?;
                }
                out.end()
            }
            Value::Set(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid YAML value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::Str(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::Str(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
                Ok(Value::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Binary(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Sequence(vec.into()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Mapping::new();
                while let Some((key, value)) = map.next_entry::<Value, Value>()? {
                    let key = key
                        .to_key_string()
                        .ok_or_else(|| de::Error::custom("nested sequences cannot be keys"))?;
                    values.insert(key, value);
                }
                Ok(Value::Mapping(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Ok(f as i64)
            }
            other => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                other.kind_name()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value.as_f64().ok_or_else(|| {
            crate::Error::custom(format!("expected number, found {}", value.kind_name()))
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                other.kind_name()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.kind_name()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(value as f64),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value.into())
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Value::Sequence(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        assert_eq!(i64::try_from(Value::Int(42)).unwrap(), 42);
        assert_eq!(i64::try_from(Value::Float(42.0)).unwrap(), 42);
        assert!(i64::try_from(Value::Float(42.5)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_f64() {
        assert_eq!(f64::try_from(Value::Float(3.5)).unwrap(), 3.5);
        assert_eq!(f64::try_from(Value::Int(42)).unwrap(), 42.0);
        assert!(f64::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_tryfrom_bool_and_string() {
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::Int(1)).is_err());
        assert_eq!(String::try_from(Value::from("hello")).unwrap(), "hello");
        assert!(String::try_from(Value::Int(1)).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(u64::MAX), Value::Float(u64::MAX as f64));
        assert_eq!(Value::from(3.5f64), Value::Float(3.5));
        assert_eq!(Value::from("test"), Value::Str("test".to_string()));
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(Value::Bool(false).to_key_string().unwrap(), "false");
        assert_eq!(Value::Int(-7).to_key_string().unwrap(), "-7");
        assert_eq!(Value::Float(1.5).to_key_string().unwrap(), "1.5");
        assert_eq!(Value::Float(-0.0).to_key_string().unwrap(), "0");
        assert_eq!(Value::Float(f64::NAN).to_key_string().unwrap(), "NaN");
        assert_eq!(
            Value::Float(f64::NEG_INFINITY).to_key_string().unwrap(),
            "-Infinity"
        );
        assert_eq!(
            Value::Mapping(Mapping::new()).to_key_string().unwrap(),
            "[object Object]"
        );
        assert_eq!(Value::Binary(vec![1, 2]).to_key_string().unwrap(), "1,2");
    }

    #[test]
    fn test_key_string_rejects_nested_sequences() {
        let inner = Value::from(vec![Value::from(1)]);
        let outer = Value::from(vec![inner]);
        assert_eq!(outer.to_key_string(), None);

        let with_map = Value::from(vec![Value::Mapping(Mapping::new()), Value::from(2)]);
        assert_eq!(with_map.to_key_string().unwrap(), "[object Object],2");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Set(IndexSet::new()).kind_name(), "set");
    }

    #[test]
    fn test_serialize_to_json() {
        let mut map = Mapping::new();
        map.insert("a".into(), Value::from(1));
        map.insert("b".into(), Value::from(vec![Value::Null, Value::from("x")]));
        let json = serde_json::to_string(&Value::Mapping(map)).unwrap();
        assert_eq!(json, r#"{"a":1,"b":[null,"x"]}"#);
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Value = serde_json::from_str(r#"{"a":[1,2.5,"s",true,null]}"#).unwrap();
        let seq = value.get("a").and_then(Value::as_sequence).unwrap();
        assert_eq!(seq[0], Value::Int(1));
        assert_eq!(seq[1], Value::Float(2.5));
        assert_eq!(seq[2], Value::from("s"));
        assert_eq!(seq[3], Value::Bool(true));
        assert_eq!(seq[4], Value::Null);
    }

    #[test]
    fn test_const_is_methods() {
        const fn check_null(v: &Value) -> bool {
            v.is_null()
        }
        assert!(check_null(&Value::Null));
        assert!(Value::from(1).is_i64());
        assert!(!Value::from(1).is_f64());
    }
}
