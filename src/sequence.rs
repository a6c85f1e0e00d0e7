//! Shared sequence handle for YAML sequences.
//!
//! Like [`Mapping`](crate::Mapping), a [`Sequence`] is a copy-on-write
//! handle whose clones share storage, so aliases and repeated nodes keep a
//! common identity.

use crate::Value;
use std::ops::Deref;
use std::sync::Arc;

/// An ordered list of YAML values with shared identity.
///
/// # Examples
///
/// ```rust
/// use yamlet::{Sequence, Value};
///
/// let mut seq = Sequence::new();
/// seq.push(Value::from(1));
/// seq.push(Value::from("two"));
///
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq[1].as_str(), Some("two"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sequence(Arc<Vec<Value>>);

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Sequence(Arc::new(Vec::new()))
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Sequence(Arc::new(Vec::with_capacity(capacity)))
    }

    /// Appends a value, detaching shared storage first.
    pub fn push(&mut self, value: Value) {
        Arc::make_mut(&mut self.0).push(value);
    }

    /// Mutable access to the elements, detaching shared storage first.
    pub fn as_mut_vec(&mut self) -> &mut Vec<Value> {
        Arc::make_mut(&mut self.0)
    }

    /// Unwraps the elements, cloning them if other handles still exist.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Returns `true` if both handles share the same storage.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// An address identifying the shared storage.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl Deref for Sequence {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(values: Vec<Value>) -> Self {
        Sequence(Arc::new(values))
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Sequence(Arc::new(iter.into_iter().collect()))
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
