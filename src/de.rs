//! Serde deserialization from [`Value`].
//!
//! [`Value`] implements [`serde::Deserializer`], so any `Deserialize` type
//! can be read out of a loaded document. Most users go through
//! [`from_str`](crate::from_str) or [`from_value`](crate::from_value):
//!
//! ```rust
//! use serde::Deserialize;
//! use yamlet::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config { name: String, ports: Vec<u16> }
//!
//! let config: Config = from_str("name: web\nports: [80, 443]\n").unwrap();
//! assert_eq!(config, Config { name: "web".into(), ports: vec![80, 443] });
//! ```
//!
//! The YAML-specific variants read as their nearest serde shape:
//! `OrderedMap` as a map, `Pairs` as a sequence of 2-tuples, `Set` as a
//! sequence of strings, `Timestamp` as RFC 3339 text and `Regexp` as
//! `/source/flags` text.

use crate::{Error, Mapping, Result, Value};
use chrono::SecondsFormat;
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Str(s) => visitor.visit_string(s),
            Value::Binary(bytes) => visitor.visit_byte_buf(bytes),
            Value::Timestamp(dt) => {
                visitor.visit_string(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Regexp { source, flags } => visitor.visit_string(format!("/{source}/{flags}")),
            Value::Sequence(seq) => visitor.visit_seq(SeqDeserializer::new(seq.into_vec())),
            Value::Mapping(map) => visitor.visit_map(MapDeserializer::new(map)),
            Value::OrderedMap(entries) => {
                let map: Mapping = entries.into_iter().flatten().collect();
                visitor.visit_map(MapDeserializer::new(map))
            }
            Value::Pairs(pairs) => {
                let items = pairs
                    .into_iter()
                    .map(|(key, value)| Value::Sequence(vec![Value::Str(key), value].into()))
                    .collect();
                visitor.visit_seq(SeqDeserializer::new(items))
            }
            Value::Set(keys) => {
                let items = keys.into_iter().map(Value::Str).collect();
                visitor.visit_seq(SeqDeserializer::new(items))
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Str(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Mapping(map) if map.len() == 1 => {
                let Some((variant, value)) = map.into_iter().next() else {
                    return Err(Error::custom("Expected enum variant"));
                };
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                })
            }
            Value::Mapping(_) => Err(Error::custom(
                "Expected a mapping with exactly one key for an enum variant",
            )),
            other => Err(Error::custom(format!(
                "Expected enum, found {}",
                other.kind_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Mapping) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Value::Str(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Value::Str(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Sequence(seq)) => visitor.visit_seq(SeqDeserializer::new(seq.into_vec())),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Mapping(map)) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

/// Deserializes a `T` out of a [`Value`].
///
/// # Errors
///
/// Fails when the value's shape does not match what `T` expects.
///
/// # Examples
///
/// ```rust
/// use yamlet::{from_value, yaml};
///
/// let pair: (String, i32) = from_value(yaml!(["x", 5])).unwrap();
/// assert_eq!(pair, ("x".to_string(), 5));
/// ```
pub fn from_value<T: de::DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(value)
}
