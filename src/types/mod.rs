//! Built-in types of the shipped schemas.
//!
//! Each function returns a fresh [`Type`](crate::Type) descriptor, so the
//! built-ins can be mixed into custom schemas:
//!
//! ```rust
//! use yamlet::{parse, types, ParseOptions, Schema};
//!
//! let schema = Schema::builder()
//!     .include(&Schema::failsafe())
//!     .implicit(types::boolean())
//!     .build()
//!     .unwrap();
//! let options = ParseOptions::new().with_schema(schema.into());
//! let value = parse("[true, 1]\n", &options).unwrap();
//! assert_eq!(value.as_sequence().unwrap()[0].as_bool(), Some(true));
//! assert_eq!(value.as_sequence().unwrap()[1].as_str(), Some("1"));
//! ```

mod binary;
mod boolean;
mod collections;
mod float;
mod int;
mod merge;
mod null;
mod omap;
mod pairs;
mod regexp;
mod set;
mod timestamp;

pub use binary::binary;
pub use boolean::boolean;
pub use collections::{map, seq, string};
pub use float::float;
pub use int::int;
pub use merge::merge;
pub use null::null;
pub use omap::omap;
pub use pairs::pairs;
pub use regexp::{regexp, undefined};
pub use set::set;
pub use timestamp::timestamp;

/// Prefix of the tags defined by the YAML type repository.
pub const TAG_PREFIX: &str = "tag:yaml.org,2002:";

pub(crate) const STR_TAG: &str = "tag:yaml.org,2002:str";
pub(crate) const SEQ_TAG: &str = "tag:yaml.org,2002:seq";
pub(crate) const MAP_TAG: &str = "tag:yaml.org,2002:map";
pub(crate) const MERGE_TAG: &str = "tag:yaml.org,2002:merge";

/// The text of a scalar node, if `data` is one.
fn text(data: &crate::Value) -> Option<&str> {
    data.as_str()
}
