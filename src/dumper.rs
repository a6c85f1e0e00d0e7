//! The YAML dumper.
//!
//! [`Dumper`] walks a [`Value`] tree and writes block or flow YAML. Every
//! node first goes through the schema's types: a matching implicit type
//! turns it into bare text, a matching explicit type into text or a
//! collection prefixed with a verbatim `!<tag>`. Strings then get the most
//! readable scalar style that still reads back as the same string.
//!
//! Collections reached more than once (shared [`Sequence`] or [`Mapping`]
//! handles) are written once with `&ref_N` and referenced with `*ref_N`
//! afterwards, unless anchors are disabled.

use crate::chars::{is_plain_safe, is_plain_safe_first, is_printable, is_white_space_char};
use crate::error::{Error, Result};
use crate::options::{SortKeys, StringifyOptions};
use crate::types::TAG_PREFIX;
use crate::{Mapping, Sequence, Type, Value};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// YAML 1.1 spellings of booleans that older readers would not keep as text.
const DEPRECATED_BOOLEANS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "on", "On", "ON", "n", "N", "no", "No", "NO", "off", "Off",
    "OFF",
];

/// Explicit-key notation is used past this key length.
const MAX_IMPLICIT_KEY_LENGTH: usize = 1024;

static LINE_CHUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\n+)([^\n]*)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarStyle {
    Plain,
    Single,
    Literal,
    Folded,
    Double,
}

/// How [`Dumper::detect_type`] classified a node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTag {
    /// No type matched; strings and collections are written as is.
    Untyped,
    /// An implicit type matched; its text reads back on its own.
    Implicit,
    /// An explicit type matched; the node is written with `!<tag>`.
    Explicit(String),
}

impl NodeTag {
    fn is_explicit(&self) -> bool {
        matches!(self, NodeTag::Explicit(_))
    }
}

fn escape_char(c: char) -> Option<&'static str> {
    Some(match c {
        '\0' => "\\0",
        '\x07' => "\\a",
        '\x08' => "\\b",
        '\t' => "\\t",
        '\n' => "\\n",
        '\x0B' => "\\v",
        '\x0C' => "\\f",
        '\r' => "\\r",
        '\x1B' => "\\e",
        '"' => "\\\"",
        '\\' => "\\\\",
        '\u{85}' => "\\N",
        '\u{A0}' => "\\_",
        '\u{2028}' => "\\L",
        '\u{2029}' => "\\P",
        _ => return None,
    })
}

fn escape_string(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match escape_char(c) {
            Some(escape) => result.push_str(escape),
            None if is_printable(c) => result.push(c),
            None => {
                let code = c as u32;
                let escape = if code <= 0xFF {
                    format!("\\x{code:02X}")
                } else if code <= 0xFFFF {
                    format!("\\u{code:04X}")
                } else {
                    format!("\\U{code:08X}")
                };
                result.push_str(&escape);
            }
        }
    }
    result
}

/// Indents every non-empty line.
fn indent_string(text: &str, spaces: usize) -> String {
    let indent = " ".repeat(spaces);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                Cow::Borrowed(line)
            } else {
                Cow::Owned(format!("{indent}{line}"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn next_line(indent: usize, level: usize) -> String {
    format!("\n{}", " ".repeat(indent * level))
}

/// Block scalars whose first content line starts with a space need an
/// explicit indentation indicator.
fn need_indent_indicator(text: &str) -> bool {
    text.trim_start_matches('\n').starts_with(' ')
}

fn block_header(text: &str, indent_indicator: usize) -> String {
    let indicator = if need_indent_indicator(text) {
        indent_indicator.to_string()
    } else {
        String::new()
    };
    let clip = text.ends_with('\n');
    let keep = clip && (text.ends_with("\n\n") || text == "\n");
    let chomp = if keep {
        "+"
    } else if clip {
        ""
    } else {
        "-"
    };
    format!("{indicator}{chomp}\n")
}

fn trim_trailing_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

/// Picks the scalar style for a non-empty string.
///
/// Plain and single-quoted results never contain a line break; folded is
/// only chosen when `line_width` is set and some line can be folded.
fn choose_scalar_style(
    text: &str,
    single_line_only: bool,
    indent_indicator: usize,
    line_width: Option<usize>,
    is_ambiguous: impl Fn(&str) -> bool,
) -> ScalarStyle {
    let chars: Vec<char> = text.chars().collect();
    let (Some(&first), Some(&last)) = (chars.first(), chars.last()) else {
        return ScalarStyle::Single;
    };

    let mut has_line_break = false;
    let mut has_foldable_line = false;
    let mut previous_line_break: isize = -1;
    let mut plain = is_plain_safe_first(first) && !is_white_space_char(last);

    // A line is foldable when it is too long and not more-indented.
    let foldable = |end: usize, previous: isize, width: usize| {
        let line_start = (previous + 1) as usize;
        end - line_start > width && chars.get(line_start) != Some(&' ')
    };

    for (i, &c) in chars.iter().enumerate() {
        if !single_line_only && c == '\n' {
            has_line_break = true;
            if let Some(width) = line_width {
                has_foldable_line = has_foldable_line || foldable(i, previous_line_break, width);
                previous_line_break = i as isize;
            }
        } else if !is_printable(c) {
            return ScalarStyle::Double;
        }
        plain = plain && is_plain_safe(c);
    }
    if !single_line_only {
        if let Some(width) = line_width {
            has_foldable_line =
                has_foldable_line || foldable(chars.len(), previous_line_break, width);
        }
    }

    if !has_line_break && !has_foldable_line {
        return if plain && !is_ambiguous(text) {
            ScalarStyle::Plain
        } else {
            ScalarStyle::Single
        };
    }
    // Indentation indicators are a single digit.
    if indent_indicator > 9 && need_indent_indicator(text) {
        return ScalarStyle::Double;
    }
    if has_foldable_line {
        ScalarStyle::Folded
    } else {
        ScalarStyle::Literal
    }
}

/// Greedy folding of one line: the longest piece under `width`, or the
/// shortest piece over it. Breaks only replace a space followed by a
/// non-space.
fn fold_line(line: &str, width: usize) -> String {
    if line.is_empty() || line.starts_with(' ') {
        return line.to_string();
    }

    let chars: Vec<char> = line.chars().collect();
    let piece = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut curr = 0;

    let breaks = (0..chars.len().saturating_sub(1))
        .filter(|&i| chars[i] == ' ' && chars[i + 1] != ' ');
    for next in breaks {
        if next - start > width {
            let end = if curr > start { curr } else { next };
            lines.push(piece(start, end));
            start = end + 1;
        }
        curr = next;
    }

    if chars.len() - start > width && curr > start {
        lines.push(piece(start, curr));
        lines.push(piece(curr + 1, chars.len()));
    } else {
        lines.push(piece(start, chars.len()));
    }
    lines.join("\n")
}

/// Folds every line of `text` so that it reads back unchanged in folded
/// block style.
fn fold_string(text: &str, width: usize) -> String {
    let first_break = text.find('\n').unwrap_or(text.len());
    let mut result = fold_line(&text[..first_break], width);
    let mut prev_more_indented = text.starts_with('\n') || text.starts_with(' ');

    for caps in LINE_CHUNK.captures_iter(&text[first_break..]) {
        let prefix = &caps[1];
        let line = &caps[2];
        let more_indented = line.starts_with(' ');
        result.push_str(prefix);
        if !prev_more_indented && !more_indented && !line.is_empty() {
            result.push('\n');
        }
        result.push_str(&fold_line(line, width));
        prev_more_indented = more_indented;
    }
    result
}

/// Records the identity of every collection reached more than once.
fn inspect_node(value: &Value, objects: &mut HashSet<usize>, duplicates: &mut IndexSet<usize>) {
    let mut visit = |identity: usize| {
        if objects.insert(identity) {
            true
        } else {
            duplicates.insert(identity);
            false
        }
    };
    match value {
        Value::Sequence(seq) => {
            if visit(seq.identity()) {
                for item in seq.iter() {
                    inspect_node(item, objects, duplicates);
                }
            }
        }
        Value::Mapping(map) => {
            if visit(map.identity()) {
                for item in map.values() {
                    inspect_node(item, objects, duplicates);
                }
            }
        }
        Value::OrderedMap(entries) => {
            for entry in entries {
                inspect_node(&Value::Mapping(entry.clone()), objects, duplicates);
            }
        }
        Value::Pairs(pairs) => {
            for (_, item) in pairs {
                inspect_node(item, objects, duplicates);
            }
        }
        _ => {}
    }
}

fn expand_style_map(styles: &HashMap<String, String>) -> HashMap<String, String> {
    styles
        .iter()
        .map(|(tag, style)| {
            let tag = match tag.strip_prefix("!!") {
                Some(suffix) => format!("{TAG_PREFIX}{suffix}"),
                None => tag.clone(),
            };
            (tag, style.clone())
        })
        .collect()
}

/// Writer state for one [`stringify`](crate::stringify) call.
pub(crate) struct Dumper<'a> {
    options: &'a StringifyOptions,
    indent: usize,
    style_map: HashMap<String, String>,
    duplicates: IndexSet<usize>,
    used_duplicates: HashSet<usize>,
}

impl<'a> Dumper<'a> {
    pub(crate) fn new(options: &'a StringifyOptions) -> Self {
        Dumper {
            options,
            indent: options.indent.max(1),
            style_map: expand_style_map(&options.styles),
            duplicates: IndexSet::new(),
            used_duplicates: HashSet::new(),
        }
    }

    /// Writes `value` as one document, or nothing when the root is skipped.
    pub(crate) fn dump(mut self, value: &Value) -> Result<String> {
        if self.options.use_anchors {
            let mut objects = HashSet::new();
            inspect_node(value, &mut objects, &mut self.duplicates);
            trace!(duplicates = self.duplicates.len(), "collected shared nodes");
        }
        Ok(match self.stringify_node(value, 0, true, true, false)? {
            Some(text) => text + "\n",
            None => String::new(),
        })
    }

    fn represent(&self, ty: &Type, value: &Value) -> Result<Value> {
        let style = self.style_map.get(ty.tag()).map(String::as_str);
        ty.represent(value, style)
    }

    fn detect_type<'v>(&self, value: &'v Value) -> Result<(NodeTag, Cow<'v, Value>)> {
        let schema = &self.options.schema;
        if let Some(ty) = schema.implicit_types().iter().find(|ty| ty.matches(value)) {
            return Ok((NodeTag::Implicit, Cow::Owned(self.represent(ty, value)?)));
        }
        if let Some(ty) = schema.explicit_types().iter().find(|ty| ty.matches(value)) {
            let tag = NodeTag::Explicit(ty.tag().to_string());
            return Ok((tag, Cow::Owned(self.represent(ty, value)?)));
        }
        Ok((NodeTag::Untyped, Cow::Borrowed(value)))
    }

    fn is_ambiguous(&self, text: &str) -> bool {
        let candidate = Value::Str(text.to_string());
        self.options
            .schema
            .implicit_types()
            .iter()
            .any(|ty| ty.resolve(&candidate))
    }

    fn stringify_scalar(&self, text: &str, level: usize, is_key: bool) -> String {
        if text.is_empty() {
            return "''".to_string();
        }
        if self.options.compat_mode && DEPRECATED_BOOLEANS.contains(&text) {
            return format!("'{text}'");
        }

        let indent = self.indent * level.max(1);
        // Deeper levels get narrower, down to min(line_width, 40).
        let line_width = self
            .options
            .line_width
            .map(|width| width.min(40).max(width.saturating_sub(indent)));
        let single_line_only =
            is_key || self.options.flow_level.is_some_and(|flow| level >= flow);
        // The document root sits at indentation -1.
        let indicator = if level == 0 { indent + 1 } else { self.indent };

        let style = choose_scalar_style(text, single_line_only, indicator, line_width, |s| {
            self.is_ambiguous(s)
        });
        match style {
            ScalarStyle::Plain => text.to_string(),
            ScalarStyle::Single => format!("'{}'", text.replace('\'', "''")),
            ScalarStyle::Literal => format!(
                "|{}{}",
                block_header(text, indicator),
                trim_trailing_newline(&indent_string(text, indent))
            ),
            ScalarStyle::Folded => {
                let folded = fold_string(text, line_width.unwrap_or(usize::MAX));
                format!(
                    ">{}{}",
                    block_header(text, indicator),
                    trim_trailing_newline(&indent_string(&folded, indent))
                )
            }
            ScalarStyle::Double => format!("\"{}\"", escape_string(text)),
        }
    }

    fn sorted_keys<'m>(&self, map: &'m Mapping) -> Vec<&'m String> {
        let mut keys: Vec<&String> = map.keys().collect();
        match &self.options.sort_keys {
            SortKeys::Insertion => {}
            SortKeys::Ascending => keys.sort(),
            SortKeys::Custom(compare) => keys.sort_by(|a, b| compare(a.as_str(), b.as_str())),
        }
        keys
    }

    fn stringify_flow_sequence(&mut self, seq: &Sequence, level: usize) -> Result<String> {
        let mut results = Vec::with_capacity(seq.len());
        for item in seq.iter() {
            if let Some(text) = self.stringify_node(item, level, false, false, false)? {
                results.push(text);
            }
        }
        let separator = if self.options.condense_flow { "," } else { ", " };
        Ok(format!("[{}]", results.join(separator)))
    }

    fn stringify_block_sequence(
        &mut self,
        seq: &Sequence,
        level: usize,
        compact: bool,
    ) -> Result<String> {
        let whitespace = next_line(self.indent, level);
        let mut results = Vec::with_capacity(seq.len());
        for item in seq.iter() {
            let Some(text) = self.stringify_node(item, level + 1, true, true, false)? else {
                continue;
            };
            let prefix = if text.starts_with('\n') { "-" } else { "- " };
            results.push(format!("{prefix}{text}"));
        }
        if results.is_empty() {
            return Ok("[]".to_string());
        }
        let prefix = if compact { "" } else { whitespace.as_str() };
        Ok(format!("{prefix}{}", results.join(&whitespace)))
    }

    fn stringify_flow_mapping(&mut self, map: &Mapping, level: usize) -> Result<String> {
        let quote = if self.options.condense_flow { "\"" } else { "" };
        let separator = if self.options.condense_flow { ":" } else { ": " };

        let mut results = Vec::with_capacity(map.len());
        for key in self.sorted_keys(map) {
            let key_value = Value::Str(key.clone());
            let Some(key_text) = self.stringify_node(&key_value, level, false, false, false)?
            else {
                continue;
            };
            let Some(value) = map.get(key) else { continue };
            let Some(value_text) = self.stringify_node(value, level, false, false, false)? else {
                continue;
            };
            let key_prefix = if key_text.chars().count() > MAX_IMPLICIT_KEY_LENGTH {
                "? "
            } else {
                ""
            };
            results.push(format!(
                "{quote}{key_prefix}{key_text}{quote}{separator}{value_text}"
            ));
        }
        Ok(format!("{{{}}}", results.join(", ")))
    }

    fn stringify_block_mapping(
        &mut self,
        map: &Mapping,
        tag: &NodeTag,
        level: usize,
        compact: bool,
    ) -> Result<String> {
        let separator = next_line(self.indent, level);
        let mut results = Vec::with_capacity(map.len());

        for key in self.sorted_keys(map) {
            let key_value = Value::Str(key.clone());
            let Some(key_text) = self.stringify_node(&key_value, level + 1, true, true, true)?
            else {
                continue;
            };
            let explicit_pair =
                tag.is_explicit() || key_text.chars().count() > MAX_IMPLICIT_KEY_LENGTH;

            let Some(value) = map.get(key) else { continue };
            let Some(value_text) =
                self.stringify_node(value, level + 1, true, explicit_pair, false)?
            else {
                continue;
            };

            let mut pair = String::new();
            if explicit_pair {
                pair.push_str(if key_text.starts_with('\n') { "?" } else { "? " });
            }
            pair.push_str(&key_text);
            if explicit_pair {
                pair.push_str(&separator);
            }
            pair.push_str(if value_text.starts_with('\n') { ":" } else { ": " });
            pair.push_str(&value_text);
            results.push(pair);
        }

        if results.is_empty() {
            return Ok("{}".to_string());
        }
        let prefix = if compact { "" } else { separator.as_str() };
        Ok(format!("{prefix}{}", results.join(&separator)))
    }

    /// Writes one node; `None` means it was skipped under `skip_invalid`.
    fn stringify_node(
        &mut self,
        value: &Value,
        level: usize,
        block: bool,
        compact: bool,
        is_key: bool,
    ) -> Result<Option<String>> {
        let (tag, value) = self.detect_type(value)?;
        let block = block && self.options.flow_level.map_or(true, |flow| flow > level);

        let mut text = match value.as_ref() {
            Value::Str(text) if tag == NodeTag::Implicit => text.clone(),
            Value::Str(text) => self.stringify_scalar(text, level, is_key),
            Value::Sequence(_) | Value::Mapping(_) => {
                match self.stringify_collection(&value, &tag, level, block, compact)? {
                    Collection::Written(text) => text,
                    Collection::Alias(text) => return Ok(Some(text)),
                }
            }
            other => {
                if self.options.skip_invalid {
                    debug!(kind = other.kind_name(), "skipping unrepresentable value");
                    return Ok(None);
                }
                return Err(Error::Unrepresentable(other.kind_name().to_string()));
            }
        };

        if let NodeTag::Explicit(tag) = &tag {
            text = format!("!<{tag}> {text}");
        }
        Ok(Some(text))
    }

    fn stringify_collection(
        &mut self,
        value: &Value,
        tag: &NodeTag,
        level: usize,
        block: bool,
        compact: bool,
    ) -> Result<Collection> {
        let identity = match value {
            Value::Sequence(seq) => seq.identity(),
            Value::Mapping(map) => map.identity(),
            _ => return Err(Error::Unrepresentable(value.kind_name().to_string())),
        };
        let duplicate = self.duplicates.get_index_of(&identity);
        if let Some(index) = duplicate {
            if !self.used_duplicates.insert(identity) {
                return Ok(Collection::Alias(format!("*ref_{index}")));
            }
        }

        let compact =
            compact && !tag.is_explicit() && duplicate.is_none() && !(self.indent != 2 && level > 0);

        let (text, is_block) = match value {
            Value::Sequence(seq) => {
                let level = if !self.options.array_indent && level > 0 {
                    level - 1
                } else {
                    level
                };
                if block && !seq.is_empty() {
                    (self.stringify_block_sequence(seq, level, compact)?, true)
                } else {
                    (self.stringify_flow_sequence(seq, level)?, false)
                }
            }
            Value::Mapping(map) if block && !map.is_empty() => {
                (self.stringify_block_mapping(map, tag, level, compact)?, true)
            }
            Value::Mapping(map) => (self.stringify_flow_mapping(map, level)?, false),
            _ => return Err(Error::Unrepresentable(value.kind_name().to_string())),
        };

        Ok(Collection::Written(match duplicate {
            Some(index) if is_block => format!("&ref_{index}{text}"),
            Some(index) => format!("&ref_{index} {text}"),
            None => text,
        }))
    }
}

enum Collection {
    Written(String),
    Alias(String),
}
