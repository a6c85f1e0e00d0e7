//! # yamlet
//!
//! A YAML 1.2 loader and dumper with a pluggable schema/type system and a
//! Serde bridge.
//!
//! ## Key Features
//!
//! - **Full YAML syntax**: block and flow collections, all five scalar
//!   styles, anchors and aliases, `%YAML`/`%TAG` directives, multi-document
//!   streams and `<<` merge keys
//! - **Schemas**: `failsafe`, `json`, `core`, `default` and `extended`
//!   built in, custom types through [`Schema::builder`]
//! - **Readable output**: the dumper picks the most readable scalar style
//!   that reads back unchanged, folds long lines and anchors shared nodes
//! - **Serde Compatible**: [`from_str`] and [`to_string`] work with any
//!   `#[derive(Serialize, Deserialize)]` type
//! - **Precise errors**: every syntax error carries a [`Mark`] with line,
//!   column and a snippet of the offending line
//!
//! ## Quick Start
//!
//! ```rust
//! use yamlet::{parse, stringify, ParseOptions, StringifyOptions, Value};
//!
//! let text = "name: yamlet\nversions: [1, 2]\n";
//! let value = parse(text, &ParseOptions::default()).unwrap();
//! assert_eq!(value.get("name"), Some(&Value::from("yamlet")));
//!
//! let yaml = stringify(&value, &StringifyOptions::default()).unwrap();
//! assert_eq!(yaml, "name: yamlet\nversions:\n  - 1\n  - 2\n");
//! ```
//!
//! ### With Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yamlet::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//! let yaml = to_string(&user).unwrap();
//! assert_eq!(yaml, "id: 123\nname: Alice\nactive: true\n");
//!
//! let user_back: User = from_str(&yaml).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Multiple documents
//!
//! ```rust
//! use yamlet::{parse_all, ParseOptions, Value};
//!
//! let docs = parse_all("--- 1\n--- 2\n", &ParseOptions::default()).unwrap();
//! assert_eq!(docs, vec![Value::Int(1), Value::Int(2)]);
//! ```
//!
//! ### Dynamic Values with the yaml! Macro
//!
//! ```rust
//! use yamlet::{stringify, yaml, StringifyOptions};
//!
//! let data = yaml!({
//!     "name": "Alice",
//!     "tags": ["rust", "serde"]
//! });
//! let options = StringifyOptions::new().with_flow_level(Some(1));
//! assert_eq!(
//!     stringify(&data, &options).unwrap(),
//!     "name: Alice\ntags: [rust, serde]\n"
//! );
//! ```
//!
//! ## Logging
//!
//! Loader warnings without an `on_warning` handler and dumper decisions are
//! emitted through [`tracing`](https://docs.rs/tracing) under the
//! `yamlet::loader` and `yamlet::dumper` targets. The crate never installs
//! a subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - typed round trip through YAML text
//! - **`dynamic_values.rs`** - loading, inspecting and re-dumping `Value`s
//!
//! Run any example with: `cargo run --example <name>`

mod chars;
pub mod de;
mod dumper;
pub mod error;
mod loader;
pub mod macros;
pub mod map;
pub mod mark;
pub mod options;
pub mod schema;
pub mod ser;
pub mod sequence;
pub mod types;
pub mod value;

pub use de::from_value;
pub use error::{Error, Result};
pub use loader::Documents;
pub use map::Mapping;
pub use mark::Mark;
pub use options::{KeyComparator, ParseOptions, SortKeys, StringifyOptions, WarningHandler};
pub use schema::{Kind, Represent, Schema, SchemaBuilder, Type};
pub use ser::{to_value, ValueSerializer};
pub use sequence::Sequence;
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses a single YAML document.
///
/// Empty input (or input holding only comments) yields [`Value::Null`].
///
/// # Examples
///
/// ```rust
/// use yamlet::{parse, ParseOptions, Schema, Value};
///
/// assert_eq!(parse("", &ParseOptions::default()).unwrap(), Value::Null);
///
/// let failsafe = ParseOptions::new().with_schema(Schema::failsafe());
/// assert_eq!(parse("~", &failsafe).unwrap(), Value::from("~"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed input and
/// [`Error::MultipleDocuments`] when the stream holds more than one
/// document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str, options: &ParseOptions) -> Result<Value> {
    let mut documents = parse_documents(text, options);
    let first = match documents.next() {
        Some(document) => document?,
        None => return Ok(Value::Null),
    };
    match documents.next() {
        None => Ok(first),
        Some(Ok(_)) => Err(Error::MultipleDocuments),
        Some(Err(err)) => Err(err),
    }
}

/// Parses every document of a YAML stream.
///
/// # Examples
///
/// ```rust
/// use yamlet::{parse_all, ParseOptions};
///
/// assert!(parse_all("", &ParseOptions::default()).unwrap().is_empty());
/// assert_eq!(parse_all("a\n---\nb\n", &ParseOptions::default()).unwrap().len(), 2);
/// ```
///
/// # Errors
///
/// Returns the first syntax error; no documents are returned in that case.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_all(text: &str, options: &ParseOptions) -> Result<Vec<Value>> {
    parse_documents(text, options).collect()
}

/// Lazily parses the documents of a YAML stream, one per `next` call.
#[must_use]
pub fn parse_documents(text: &str, options: &ParseOptions) -> Documents {
    Documents::new(text, options)
}

/// Writes a value as a YAML document ending in a line break.
///
/// # Examples
///
/// ```rust
/// use yamlet::{stringify, StringifyOptions, Value};
///
/// let options = StringifyOptions::default();
/// assert_eq!(stringify(&Value::Float(f64::INFINITY), &options).unwrap(), ".inf\n");
/// assert_eq!(stringify(&Value::Float(-0.0), &options).unwrap(), "-0.0\n");
/// assert_eq!(stringify(&Value::from("yes"), &options).unwrap(), "'yes'\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Unrepresentable`] when a value has no matching type in
/// the schema and `skip_invalid` is off, and [`Error::UnknownStyle`] when a
/// style override names a style the type does not offer.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn stringify(value: &Value, options: &StringifyOptions) -> Result<String> {
    dumper::Dumper::new(options).dump(value)
}

/// Serialize any `T: Serialize` to a YAML string.
///
/// # Examples
///
/// ```rust
/// use yamlet::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Size { width: u32, height: u32 }
///
/// let size = Size { width: 640, height: 480 };
/// assert_eq!(to_string(&size).unwrap(), "width: 640\nheight: 480\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &StringifyOptions::default())
}

/// Serialize any `T: Serialize` to a YAML string with custom options.
///
/// # Examples
///
/// ```rust
/// use yamlet::{to_string_with_options, StringifyOptions};
///
/// let options = StringifyOptions::new().with_flow_level(Some(0));
/// assert_eq!(to_string_with_options(&vec![1, 2], &options).unwrap(), "[1, 2]\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &StringifyOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    stringify(&to_value(value)?, options)
}

/// Serialize any `T: Serialize` to a writer as YAML.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let yaml = to_string(value)?;
    writer
        .write_all(yaml.as_bytes())
        .map_err(|e| Error::custom(e.to_string()))
}

/// Deserialize an instance of type `T` from YAML text.
///
/// # Examples
///
/// ```rust
/// use yamlet::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1\ny: 2\n").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid YAML or cannot be
/// deserialized to type `T`. Syntax errors include line and column
/// information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &ParseOptions::default())
}

/// Deserialize an instance of type `T` from YAML text with custom options.
///
/// # Errors
///
/// Returns an error if the input is not valid YAML or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &ParseOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s, options)?)
}

/// Deserialize an instance of type `T` from an I/O stream of YAML.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid YAML, or the
/// data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::custom(e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of YAML text.
///
/// # Examples
///
/// ```rust
/// use yamlet::from_slice;
///
/// let numbers: Vec<u8> = from_slice(b"- 1\n- 2\n").unwrap();
/// assert_eq!(numbers, vec![1, 2]);
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid YAML, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    fn user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let yaml = to_string(&point).unwrap();
        let point_back: Point = from_str(&yaml).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let yaml = to_string(&user()).unwrap();
        assert_eq!(
            yaml,
            "id: 123\nname: Alice\nactive: true\ntags:\n  - admin\n  - user\n"
        );
        let user_back: User = from_str(&yaml).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_custom_options() {
        let options = StringifyOptions::new()
            .with_indent(4)
            .with_sort_keys(SortKeys::Ascending);
        let yaml = to_string_with_options(&user(), &options).unwrap();
        assert!(yaml.starts_with("active: true\nid: 123\n"));
        let user_back: User = from_str(&yaml).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(value.get("x"), Some(&Value::Int(1)));
        assert_eq!(value.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_compat_mode_quotes_legacy_boolean_keys() {
        let point = Point { x: 1, y: 2 };
        assert_eq!(to_string(&point).unwrap(), "x: 1\n'y': 2\n");

        let options = StringifyOptions::new().with_compat_mode(false);
        assert_eq!(to_string_with_options(&point, &options).unwrap(), "x: 1\ny: 2\n");

        let back: Point = from_str("x: 1\n'y': 2\n").unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_parse_rejects_second_document() {
        let err = parse("a\n---\nb\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MultipleDocuments));
    }

    #[test]
    fn test_parse_reports_error_in_second_document() {
        let err = parse("a\n--- [\n", &ParseOptions::default()).unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn test_writer_and_reader() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 3, y: 4 }).unwrap();
        let point: Point = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }
}
