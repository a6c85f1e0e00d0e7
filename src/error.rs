//! Error types for YAML loading and dumping.
//!
//! ## Error Categories
//!
//! - **Syntax errors**: malformed YAML, carrying a [`Mark`] with the line,
//!   column and an excerpt of the offending input. The same shape is handed
//!   to warning callbacks for recoverable diagnostics.
//! - **Multiple documents**: [`parse`](crate::parse) met a stream with more
//!   than one document.
//! - **Unrepresentable values**: the dumper met a value no type of the
//!   active schema can represent.
//! - **Unknown styles**: a style override names a style the type lacks.
//! - **Custom**: failures raised through the Serde bridge.
//!
//! ## Examples
//!
//! ```rust
//! use yamlet::{parse, ParseOptions};
//!
//! let err = parse("a: 1\na: 2\n", &ParseOptions::default()).unwrap_err();
//! let mark = err.mark().unwrap();
//! assert_eq!(mark.line(), 2);
//! assert!(err.to_string().starts_with("Cannot store mapping pair: duplicated key"));
//! ```

use crate::mark::Mark;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while loading or dumping YAML.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed input, or a warning dispatched to a callback.
    #[error("{message} {mark}")]
    Syntax { message: String, mark: Mark },

    /// [`parse`](crate::parse) expects exactly one document.
    #[error("Found more than 1 document in the stream: expected a single document")]
    MultipleDocuments,

    /// A value kind that no type of the active schema can represent.
    #[error("Cannot stringify {0}")]
    Unrepresentable(String),

    /// A style override names a style the type does not offer.
    #[error("!<{tag}> tag resolver accepts not \"{style}\" style")]
    UnknownStyle { tag: String, style: String },

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error pinned to `mark`.
    pub(crate) fn syntax(message: impl Into<String>, mark: Mark) -> Self {
        Error::Syntax {
            message: message.into(),
            mark,
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlet::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert_eq!(err.to_string(), "something went wrong");
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The position of a syntax error, if this is one.
    #[must_use]
    pub fn mark(&self) -> Option<&Mark> {
        match self {
            Error::Syntax { mark, .. } => Some(mark),
            _ => None,
        }
    }

    /// The message of a syntax error without its position suffix.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Syntax { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` for errors raised by the loader.
    #[inline]
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. } | Error::MultipleDocuments)
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
