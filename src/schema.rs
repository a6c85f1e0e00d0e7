//! Type descriptors and schemas.
//!
//! A [`Type`] teaches the loader how to turn a tagged node into a [`Value`]
//! and teaches the dumper how to recognize and represent such a value. A
//! [`Schema`] is an ordered collection of types split into *implicit* types
//! (tried, in order, on every untagged plain scalar) and *explicit* types
//! (reachable only through a tag).
//!
//! Five schemas ship with the crate, each one including the previous:
//!
//! | schema | adds |
//! |---|---|
//! | [`Schema::failsafe`] | `str`, `seq`, `map` |
//! | [`Schema::json`] | implicit `null`, `bool`, `int`, `float` |
//! | [`Schema::core`] | nothing (same as json) |
//! | [`Schema::default_schema`] | implicit `timestamp`, `merge`; explicit `binary`, `omap`, `pairs`, `set` |
//! | [`Schema::extended`] | explicit `js/regexp`, `js/undefined` |
//!
//! ## Custom types
//!
//! ```rust
//! use yamlet::{parse, ParseOptions, Schema, Type, Value};
//!
//! let upper = Type::scalar("!upper").with_construct(|value| match value {
//!     Value::Str(s) => Value::Str(s.to_uppercase()),
//!     other => other,
//! });
//! let schema = Schema::builder()
//!     .include(&Schema::default_schema())
//!     .explicit(upper)
//!     .build()
//!     .unwrap();
//!
//! let options = ParseOptions::new().with_schema(schema.into());
//! let value = parse("name: !upper alice\n", &options).unwrap();
//! assert_eq!(value.get("name"), Some(&Value::from("ALICE")));
//! ```

use crate::types;
use crate::{Error, Result, Value};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Node kind a type applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    Sequence,
    Mapping,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ResolveFn = fn(&Value) -> bool;
pub type ConstructFn = fn(Value) -> Value;
pub type PredicateFn = fn(&Value) -> bool;
pub type StyleFn = fn(&Value) -> Value;

/// How a type turns a native value back into something the dumper writes.
///
/// Scalar types produce [`Value::Str`]; collection types produce a
/// [`Value::Sequence`] or [`Value::Mapping`].
#[derive(Clone, Copy)]
pub enum Represent {
    /// One function that receives the active style name.
    Single(fn(&Value, &str) -> Value),
    /// A function per named style.
    Styles(&'static [(&'static str, StyleFn)]),
}

/// A value-type plugin.
#[derive(Clone)]
pub struct Type {
    tag: Cow<'static, str>,
    kind: Kind,
    resolve: ResolveFn,
    construct: ConstructFn,
    predicate: Option<PredicateFn>,
    represent: Option<Represent>,
    default_style: Option<&'static str>,
    style_aliases: &'static [(&'static str, &'static str)],
}

impl Type {
    /// A type that accepts every node of `kind` and keeps it unchanged.
    pub fn new(tag: impl Into<Cow<'static, str>>, kind: Kind) -> Self {
        Type {
            tag: tag.into(),
            kind,
            resolve: |_| true,
            construct: |value| value,
            predicate: None,
            represent: None,
            default_style: None,
            style_aliases: &[],
        }
    }

    pub fn scalar(tag: impl Into<Cow<'static, str>>) -> Self {
        Type::new(tag, Kind::Scalar)
    }

    pub fn sequence(tag: impl Into<Cow<'static, str>>) -> Self {
        Type::new(tag, Kind::Sequence)
    }

    pub fn mapping(tag: impl Into<Cow<'static, str>>) -> Self {
        Type::new(tag, Kind::Mapping)
    }

    /// Decides whether a node's raw data belongs to this type.
    #[must_use]
    pub fn with_resolve(mut self, resolve: ResolveFn) -> Self {
        self.resolve = resolve;
        self
    }

    /// Builds the native value from a node that passed `resolve`.
    #[must_use]
    pub fn with_construct(mut self, construct: ConstructFn) -> Self {
        self.construct = construct;
        self
    }

    /// Recognizes native values this type can dump.
    #[must_use]
    pub fn with_predicate(mut self, predicate: PredicateFn) -> Self {
        self.predicate = Some(predicate);
        self
    }

    #[must_use]
    pub fn with_represent(mut self, represent: fn(&Value, &str) -> Value) -> Self {
        self.represent = Some(Represent::Single(represent));
        self
    }

    /// Named representation styles; `default` must be one of them.
    #[must_use]
    pub fn with_styles(
        mut self,
        styles: &'static [(&'static str, StyleFn)],
        default: &'static str,
    ) -> Self {
        self.represent = Some(Represent::Styles(styles));
        self.default_style = Some(default);
        self
    }

    /// Alternative spellings of style names, as `(alias, style)` pairs.
    #[must_use]
    pub fn with_style_aliases(mut self, aliases: &'static [(&'static str, &'static str)]) -> Self {
        self.style_aliases = aliases;
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn resolve(&self, data: &Value) -> bool {
        (self.resolve)(data)
    }

    #[inline]
    #[must_use]
    pub fn construct(&self, data: Value) -> Value {
        (self.construct)(data)
    }

    #[inline]
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        self.predicate.is_some_and(|predicate| predicate(value))
    }

    #[must_use]
    pub fn default_style(&self) -> Option<&'static str> {
        self.default_style
    }

    /// Default style and alias targets must be among the named styles.
    fn check_styles(&self) -> Result<()> {
        let Some(Represent::Styles(styles)) = &self.represent else {
            return Ok(());
        };
        let offers = |name: &str| styles.iter().any(|(style, _)| *style == name);
        let Some(default) = self.default_style else {
            return Err(Error::custom(format!(
                "Type {} offers named styles without a default style",
                self.tag
            )));
        };
        if !offers(default) {
            return Err(Error::custom(format!(
                "Type {} has an unknown default style \"{default}\"",
                self.tag
            )));
        }
        let dangling = self.style_aliases.iter().find(|(_, target)| !offers(*target));
        if let Some((alias, target)) = dangling {
            return Err(Error::custom(format!(
                "Type {} maps style alias \"{alias}\" to an unknown style \"{target}\"",
                self.tag
            )));
        }
        Ok(())
    }

    /// Represents `value` in `style`, or the default style.
    ///
    /// Types without a represent hook hand the value back unchanged.
    pub fn represent(&self, value: &Value, style: Option<&str>) -> Result<Value> {
        let Some(represent) = self.represent else {
            return Ok(value.clone());
        };
        let style = style.or(self.default_style).unwrap_or_default();
        let style = self
            .style_aliases
            .iter()
            .find(|(alias, _)| *alias == style)
            .map_or(style, |(_, canonical)| *canonical);
        match represent {
            Represent::Single(represent) => Ok(represent(value, style)),
            Represent::Styles(styles) => styles
                .iter()
                .find(|(name, _)| *name == style)
                .map(|(_, represent)| represent(value))
                .ok_or_else(|| Error::UnknownStyle {
                    tag: self.tag.to_string(),
                    style: style.to_string(),
                }),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("default_style", &self.default_style)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct TypeMap {
    scalar: HashMap<String, Arc<Type>>,
    sequence: HashMap<String, Arc<Type>>,
    mapping: HashMap<String, Arc<Type>>,
    fallback: HashMap<String, Arc<Type>>,
}

/// An immutable, ordered set of types.
#[derive(Debug)]
pub struct Schema {
    name: Option<&'static str>,
    implicit_types: Vec<Arc<Type>>,
    explicit_types: Vec<Arc<Type>>,
    type_map: TypeMap,
}

static FAILSAFE: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        SchemaBuilder::named("failsafe")
            .explicit(types::string())
            .explicit(types::seq())
            .explicit(types::map())
            .compile(),
    )
});

static JSON: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        SchemaBuilder::named("json")
            .include(&FAILSAFE)
            .implicit(types::null())
            .implicit(types::boolean())
            .implicit(types::int())
            .implicit(types::float())
            .compile(),
    )
});

static DEFAULT: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        SchemaBuilder::named("default")
            .include(&JSON)
            .implicit(types::timestamp())
            .implicit(types::merge())
            .explicit(types::binary())
            .explicit(types::omap())
            .explicit(types::pairs())
            .explicit(types::set())
            .compile(),
    )
});

static EXTENDED: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        SchemaBuilder::named("extended")
            .include(&DEFAULT)
            .explicit(types::regexp())
            .explicit(types::undefined())
            .compile(),
    )
});

impl Schema {
    /// Strings, sequences and mappings only.
    #[must_use]
    pub fn failsafe() -> Arc<Schema> {
        Arc::clone(&FAILSAFE)
    }

    #[must_use]
    pub fn json() -> Arc<Schema> {
        Arc::clone(&JSON)
    }

    /// Same types as [`Schema::json`].
    #[must_use]
    pub fn core() -> Arc<Schema> {
        Arc::clone(&JSON)
    }

    /// The schema used when none is configured.
    #[must_use]
    pub fn default_schema() -> Arc<Schema> {
        Arc::clone(&DEFAULT)
    }

    #[must_use]
    pub fn extended() -> Arc<Schema> {
        Arc::clone(&EXTENDED)
    }

    /// Looks up a built-in schema by name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlet::Schema;
    ///
    /// assert!(Schema::by_name("core").is_some());
    /// assert!(Schema::by_name("yaml-1.1").is_none());
    /// ```
    #[must_use]
    pub fn by_name(name: &str) -> Option<Arc<Schema>> {
        match name {
            "failsafe" => Some(Schema::failsafe()),
            "json" => Some(Schema::json()),
            "core" => Some(Schema::core()),
            "default" => Some(Schema::default_schema()),
            "extended" => Some(Schema::extended()),
            _ => None,
        }
    }

    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name
    }

    /// Scalar types tried, in order, on untagged plain scalars.
    #[must_use]
    pub fn implicit_types(&self) -> &[Arc<Type>] {
        &self.implicit_types
    }

    #[must_use]
    pub fn explicit_types(&self) -> &[Arc<Type>] {
        &self.explicit_types
    }

    /// Finds the type for `tag` among types of `kind`, or among all types
    /// when the node had no content.
    #[must_use]
    pub fn lookup(&self, kind: Option<Kind>, tag: &str) -> Option<&Arc<Type>> {
        let map = match kind {
            Some(Kind::Scalar) => &self.type_map.scalar,
            Some(Kind::Sequence) => &self.type_map.sequence,
            Some(Kind::Mapping) => &self.type_map.mapping,
            None => &self.type_map.fallback,
        };
        map.get(tag)
    }

    /// The first implicit type whose resolver accepts `data`.
    #[must_use]
    pub fn resolve_implicit(&self, data: &Value) -> Option<&Arc<Type>> {
        self.implicit_types.iter().find(|ty| ty.resolve(data))
    }
}

/// Composes a [`Schema`] from included schemas and additional types.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: Option<&'static str>,
    implicit_types: Vec<Arc<Type>>,
    explicit_types: Vec<Arc<Type>>,
}

impl SchemaBuilder {
    fn named(name: &'static str) -> Self {
        SchemaBuilder {
            name: Some(name),
            ..Default::default()
        }
    }

    /// Copies the parent's types ahead of anything added afterwards.
    #[must_use]
    pub fn include(mut self, parent: &Schema) -> Self {
        self.implicit_types
            .extend(parent.implicit_types.iter().cloned());
        self.explicit_types
            .extend(parent.explicit_types.iter().cloned());
        self
    }

    #[must_use]
    pub fn implicit(mut self, ty: Type) -> Self {
        self.implicit_types.push(Arc::new(ty));
        self
    }

    #[must_use]
    pub fn explicit(mut self, ty: Type) -> Self {
        self.explicit_types.push(Arc::new(ty));
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Fails if an implicit type is not a scalar type, or if a type's
    /// default style or style aliases name a style it does not offer.
    pub fn build(self) -> Result<Schema> {
        for ty in &self.implicit_types {
            if ty.kind != Kind::Scalar {
                return Err(Error::custom(format!(
                    "There is a non-scalar type in the implicit list of a schema. Implicit resolving of such types is not supported: {}",
                    ty.tag
                )));
            }
        }
        for ty in self.implicit_types.iter().chain(&self.explicit_types) {
            ty.check_styles()?;
        }
        Ok(self.compile())
    }

    fn compile(self) -> Schema {
        let mut type_map = TypeMap::default();
        for ty in self.implicit_types.iter().chain(&self.explicit_types) {
            let by_kind = match ty.kind {
                Kind::Scalar => &mut type_map.scalar,
                Kind::Sequence => &mut type_map.sequence,
                Kind::Mapping => &mut type_map.mapping,
            };
            by_kind.insert(ty.tag.to_string(), Arc::clone(ty));
            type_map.fallback.insert(ty.tag.to_string(), Arc::clone(ty));
        }
        Schema {
            name: self.name,
            implicit_types: self.implicit_types,
            explicit_types: self.explicit_types,
            type_map,
        }
    }
}
