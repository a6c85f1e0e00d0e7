//! Configuration for loading and dumping.
//!
//! - [`ParseOptions`]: schema, duplicate-key policy and warning callback.
//! - [`StringifyOptions`]: layout, quoting and anchor policy of the dumper.
//! - [`SortKeys`]: mapping key order used by the dumper.
//!
//! ## Examples
//!
//! ```rust
//! use yamlet::{parse, stringify, ParseOptions, Schema, SortKeys, StringifyOptions};
//!
//! let options = ParseOptions::new()
//!     .with_schema(Schema::failsafe())
//!     .with_allow_duplicate_keys(true);
//! let value = parse("a: 1\na: 2\n", &options).unwrap();
//!
//! let options = StringifyOptions::new()
//!     .with_indent(4)
//!     .with_sort_keys(SortKeys::Ascending)
//!     .with_flow_level(Some(1));
//! assert_eq!(stringify(&value, &options).unwrap(), "a: '2'\n");
//! ```

use crate::{Error, Schema};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback receiving recoverable loader diagnostics.
pub type WarningHandler = Arc<dyn Fn(&Error) + Send + Sync>;

/// Comparator used by [`SortKeys::Custom`].
pub type KeyComparator = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Options for [`parse`](crate::parse) and friends.
///
/// When no warning handler is set, warnings are emitted as `tracing`
/// events at the `WARN` level.
#[derive(Clone)]
pub struct ParseOptions {
    pub schema: Arc<Schema>,
    pub allow_duplicate_keys: bool,
    pub on_warning: Option<WarningHandler>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            schema: Schema::default_schema(),
            allow_duplicate_keys: false,
            on_warning: None,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("schema", &self.schema)
            .field("allow_duplicate_keys", &self.allow_duplicate_keys)
            .field("on_warning", &self.on_warning.is_some())
            .finish()
    }
}

impl ParseOptions {
    /// Creates default options: default schema, duplicate keys rejected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = schema;
        self
    }

    /// Lets later duplicate keys silently replace earlier ones.
    #[must_use]
    pub fn with_allow_duplicate_keys(mut self, allow: bool) -> Self {
        self.allow_duplicate_keys = allow;
        self
    }

    /// Routes warnings to `handler` instead of the `tracing` log.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::{Arc, Mutex};
    /// use yamlet::{parse, ParseOptions};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let options = ParseOptions::new().with_on_warning(move |err| {
    ///     sink.lock().unwrap().push(err.to_string());
    /// });
    /// parse("%FOO bar\n---\nx\n", &options).unwrap();
    /// assert!(seen.lock().unwrap()[0].starts_with("unknown document directive \"FOO\""));
    /// ```
    #[must_use]
    pub fn with_on_warning<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.on_warning = Some(Arc::new(handler));
        self
    }
}

/// Mapping key order used by the dumper.
#[derive(Clone, Default)]
pub enum SortKeys {
    /// Keep insertion order.
    #[default]
    Insertion,
    /// Ascending code point order.
    Ascending,
    Custom(KeyComparator),
}

impl SortKeys {
    /// Wraps a comparator.
    pub fn by<F>(compare: F) -> Self
    where
        F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    {
        SortKeys::Custom(Arc::new(compare))
    }
}

impl fmt::Debug for SortKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKeys::Insertion => f.write_str("Insertion"),
            SortKeys::Ascending => f.write_str("Ascending"),
            SortKeys::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options for [`stringify`](crate::stringify).
///
/// # Examples
///
/// ```rust
/// use yamlet::StringifyOptions;
///
/// let options = StringifyOptions::new();
/// assert_eq!(options.indent, 2);
/// assert_eq!(options.line_width, Some(80));
/// assert_eq!(options.flow_level, None);
/// assert!(options.use_anchors);
/// assert!(options.compat_mode);
/// ```
#[derive(Clone, Debug)]
pub struct StringifyOptions {
    /// Spaces per nesting level; values below 1 are treated as 1.
    pub indent: usize,
    /// Indent sequence items inside mappings by one level.
    pub array_indent: bool,
    /// Drop values no schema type can represent instead of failing.
    pub skip_invalid: bool,
    /// Nesting level from which collections switch to flow style.
    /// `None` keeps block style everywhere.
    pub flow_level: Option<usize>,
    /// Tag to style-name overrides; `!!name` is shorthand for
    /// `tag:yaml.org,2002:name`.
    pub styles: HashMap<String, String>,
    pub schema: Arc<Schema>,
    pub sort_keys: SortKeys,
    /// Preferred maximum line width; `None` disables folding.
    pub line_width: Option<usize>,
    /// Emit `&ref_N`/`*ref_N` for nodes that occur more than once.
    pub use_anchors: bool,
    /// Quote YAML 1.1 boolean spellings such as `yes` and `off`.
    pub compat_mode: bool,
    /// Omit spaces inside flow collections.
    pub condense_flow: bool,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        StringifyOptions {
            indent: 2,
            array_indent: true,
            skip_invalid: false,
            flow_level: None,
            styles: HashMap::new(),
            schema: Schema::default_schema(),
            sort_keys: SortKeys::Insertion,
            line_width: Some(80),
            use_anchors: true,
            compat_mode: true,
            condense_flow: false,
        }
    }
}

impl StringifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_array_indent(mut self, array_indent: bool) -> Self {
        self.array_indent = array_indent;
        self
    }

    #[must_use]
    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    #[must_use]
    pub fn with_flow_level(mut self, flow_level: Option<usize>) -> Self {
        self.flow_level = flow_level;
        self
    }

    /// Selects a representation style for one tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlet::{stringify, StringifyOptions, Value};
    ///
    /// let options = StringifyOptions::new().with_style("!!int", "hexadecimal");
    /// assert_eq!(stringify(&Value::Int(255), &options).unwrap(), "0xFF\n");
    /// ```
    #[must_use]
    pub fn with_style(mut self, tag: impl Into<String>, style: impl Into<String>) -> Self {
        self.styles.insert(tag.into(), style.into());
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_sort_keys(mut self, sort_keys: SortKeys) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: Option<usize>) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_use_anchors(mut self, use_anchors: bool) -> Self {
        self.use_anchors = use_anchors;
        self
    }

    #[must_use]
    pub fn with_compat_mode(mut self, compat_mode: bool) -> Self {
        self.compat_mode = compat_mode;
        self
    }

    #[must_use]
    pub fn with_condense_flow(mut self, condense_flow: bool) -> Self {
        self.condense_flow = condense_flow;
        self
    }
}
