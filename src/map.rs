//! Ordered mapping type for YAML mappings.
//!
//! [`Mapping`] keeps insertion order (YAML mappings are dumped back in the
//! order they were read unless key sorting is requested) and is a shared,
//! copy-on-write handle: cloning a `Mapping` yields a second handle to the
//! same storage. This is how an alias (`*name`) refers to its anchored node,
//! and how the dumper recognizes repeated nodes and emits `&ref_N` anchors.
//!
//! ## Examples
//!
//! ```rust
//! use yamlet::{Mapping, Value};
//!
//! let mut map = Mapping::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//!
//! let alias = map.clone();
//! assert!(alias.ptr_eq(&map));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// An ordered map of string keys to YAML values with shared identity.
#[derive(Debug, Clone, Default)]
pub struct Mapping(Arc<IndexMap<String, Value>>);

impl Mapping {
    /// Creates an empty `Mapping`.
    #[must_use]
    pub fn new() -> Self {
        Mapping(Arc::new(IndexMap::new()))
    }

    /// Creates an empty `Mapping` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Mapping(Arc::new(IndexMap::with_capacity(capacity)))
    }

    /// Inserts a key-value pair, keeping the key's original slot if present.
    ///
    /// If the storage is shared with other handles it is copied first, so
    /// the other handles keep seeing the old contents.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlet::{Mapping, Value};
    ///
    /// let mut map = Mapping::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        Arc::make_mut(&mut self.0).insert(key, value)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        Arc::make_mut(&mut self.0).shift_remove(key)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference, detaching shared storage first.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        Arc::make_mut(&mut self.0).get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns `true` if both handles share the same storage.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// An address identifying the shared storage.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl From<IndexMap<String, Value>> for Mapping {
    fn from(map: IndexMap<String, Value>) -> Self {
        Mapping(Arc::new(map))
    }
}

impl From<HashMap<String, Value>> for Mapping {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        Arc::try_unwrap(self.0)
            .unwrap_or_else(|shared| (*shared).clone())
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, Value)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Mapping(Arc::new(IndexMap::from_iter(iter)))
    }
}
