//! The YAML loader.
//!
//! [`Loader`] is a cursor over the normalized input. Every sub-parser works
//! on the shared "current node" slots (`tag`, `anchor`, `kind`, `result`)
//! and reports through its return value whether it recognized anything at
//! the cursor; [`Loader::compose_node`] drives them in grammar precedence
//! order and then resolves the node's tag against the active [`Schema`].
//!
//! The input is scanned byte by byte: every indicator is ASCII, and bytes
//! of multi-byte characters are only ever copied through, so slices are
//! always taken at character boundaries. Reading past the end yields `0`,
//! which doubles as the end-of-input sentinel.

use crate::chars::{
    is_eol, is_flow_indicator, is_non_printable, is_white_space, is_white_space_or_eol, BOM,
};
use crate::error::{Error, Result};
use crate::mark::Mark;
use crate::options::{ParseOptions, WarningHandler};
use crate::schema::{Kind, Schema};
use crate::types::MERGE_TAG;
use crate::{Mapping, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;
use std::mem;
use std::sync::Arc;
use tracing::{trace, warn};

static TAG_HANDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:!|!!|![a-z\-]+!)$").unwrap());

static TAG_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:!|[^,\[\]\{\}])(?:%[0-9a-f]{2}|[0-9a-z\-#;/\?:@&=\+\$,_\.!~\*'\(\)\[\]])*$")
        .unwrap()
});

static YAML_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)$").unwrap());

/// Deepest node nesting a document may reach.
const MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    FlowIn,
    FlowOut,
    BlockIn,
    BlockOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomping {
    Clip,
    Strip,
    Keep,
}

fn simple_escape(c: u8) -> Option<&'static str> {
    Some(match c {
        b'0' => "\x00",
        b'a' => "\x07",
        b'b' => "\x08",
        b't' | b'\t' => "\t",
        b'n' => "\n",
        b'v' => "\x0B",
        b'f' => "\x0C",
        b'r' => "\r",
        b'e' => "\x1B",
        b' ' => " ",
        b'"' => "\"",
        b'/' => "/",
        b'\\' => "\\",
        b'N' => "\u{85}",
        b'_' => "\u{A0}",
        b'L' => "\u{2028}",
        b'P' => "\u{2029}",
        _ => return None,
    })
}

fn hex_escape_length(c: u8) -> Option<usize> {
    match c {
        b'x' => Some(2),
        b'u' => Some(4),
        b'U' => Some(8),
        _ => None,
    }
}

/// Strips a leading BOM and makes sure non-empty input ends with a line
/// break.
fn sanitize(input: &str) -> String {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut text = String::with_capacity(input.len() + 1);
    text.push_str(input);
    if !text.is_empty() && !text.ends_with(['\n', '\r']) {
        text.push('\n');
    }
    text
}

/// Parser state for one input stream.
pub(crate) struct Loader {
    input: String,
    position: usize,
    line: usize,
    line_start: usize,
    line_indent: isize,

    schema: Arc<Schema>,
    allow_duplicate_keys: bool,
    on_warning: Option<WarningHandler>,

    version: Option<String>,
    check_line_breaks: bool,
    tag_map: HashMap<String, String>,
    anchor_map: HashMap<String, Value>,
    depth: usize,

    tag: Option<String>,
    anchor: Option<String>,
    kind: Option<Kind>,
    result: Value,
    scalar: String,
}

impl Loader {
    pub(crate) fn new(input: &str, options: &ParseOptions) -> Self {
        let mut loader = Loader {
            input: sanitize(input),
            position: 0,
            line: 0,
            line_start: 0,
            line_indent: 0,
            schema: Arc::clone(&options.schema),
            allow_duplicate_keys: options.allow_duplicate_keys,
            on_warning: options.on_warning.clone(),
            version: None,
            check_line_breaks: false,
            tag_map: HashMap::new(),
            anchor_map: HashMap::new(),
            depth: 0,
            tag: None,
            anchor: None,
            kind: None,
            result: Value::Null,
            scalar: String::new(),
        };
        loader.read_indent();
        loader
    }

    /// Whether unread input remains.
    pub(crate) fn has_more(&self) -> bool {
        self.position < self.input.len()
    }

    #[inline]
    fn byte_at(&self, index: usize) -> u8 {
        self.input.as_bytes().get(index).copied().unwrap_or(0)
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.byte_at(self.position)
    }

    #[inline]
    fn next(&mut self) -> u8 {
        self.position += 1;
        self.peek()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input.get(start..end).unwrap_or_default().to_string()
    }

    fn read_indent(&mut self) {
        while self.peek() == b' ' {
            self.line_indent += 1;
            self.position += 1;
        }
    }

    fn mark(&self) -> Mark {
        Mark::new(&self.input, self.position, self.line, self.line_start)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.mark())
    }

    fn dispatch_warning(&self, message: impl Into<String>) {
        let warning = self.error(message);
        match &self.on_warning {
            Some(handler) => handler(&warning),
            None => warn!("{warning}"),
        }
    }

    fn yaml_directive(&mut self, args: &[String]) -> Result<()> {
        if self.version.is_some() {
            return Err(self.error("Cannot handle YAML directive: duplication of %YAML directive"));
        }
        let [version] = args else {
            return Err(self.error(
                "Cannot handle YAML directive: YAML directive accepts exactly one argument",
            ));
        };
        let parsed = YAML_VERSION.captures(version).and_then(|caps| {
            let major = caps[1].parse::<u64>().ok()?;
            let minor = caps[2].parse::<u64>().ok()?;
            Some((major, minor))
        });
        let Some((major, minor)) = parsed else {
            return Err(self.error("Cannot handle YAML directive: ill-formed argument"));
        };
        if major != 1 {
            return Err(self.error("Cannot handle YAML directive: unacceptable YAML version"));
        }

        self.version = Some(version.clone());
        self.check_line_breaks = minor < 2;
        if minor != 1 && minor != 2 {
            self.dispatch_warning("Cannot handle YAML directive: unsupported YAML version");
        }
        Ok(())
    }

    fn tag_directive(&mut self, args: &[String]) -> Result<()> {
        let [handle, prefix] = args else {
            return Err(self.error(format!(
                "Cannot handle tag directive: directive accepts exactly two arguments, received {}",
                args.len()
            )));
        };
        if !TAG_HANDLE.is_match(handle) {
            return Err(self.error(format!(
                "Cannot handle tag directive: ill-formed handle (first argument) in \"{handle}\""
            )));
        }
        if self.tag_map.contains_key(handle) {
            return Err(self.error(format!(
                "Cannot handle tag directive: previously declared suffix for \"{handle}\" tag handle"
            )));
        }
        if !TAG_URI.is_match(prefix) {
            return Err(self.error(
                "Cannot handle tag directive: ill-formed tag prefix (second argument) of the TAG directive",
            ));
        }
        self.tag_map.insert(handle.clone(), prefix.clone());
        Ok(())
    }

    /// Appends `input[start..end]` to the scalar being read.
    ///
    /// Quoted scalars only refuse control characters other than tab; plain
    /// and block scalars refuse every non-printable character.
    fn capture_segment(&mut self, start: usize, end: usize, check_json: bool) -> Result<()> {
        if start >= end {
            return Ok(());
        }
        let segment = self.input.get(start..end).unwrap_or_default();
        if check_json {
            if let Some(c) = segment.chars().find(|&c| c != '\t' && (c as u32) < 0x20) {
                return Err(self.error(format!(
                    "Expected valid JSON character: received \"{}\"",
                    c as u32
                )));
            }
        } else if segment.chars().any(is_non_printable) {
            return Err(self.error("Stream contains non-printable characters"));
        }
        self.scalar.push_str(segment);
        Ok(())
    }

    fn finish_scalar(&mut self) {
        self.kind = Some(Kind::Scalar);
        self.result = Value::Str(mem::take(&mut self.scalar));
    }

    fn read_block_sequence(&mut self, node_indent: isize) -> Result<bool> {
        let tag = self.tag.clone();
        let anchor = self.anchor.clone();
        let mut items = Vec::new();
        let mut detected = false;

        let mut ch = self.peek();
        while ch == b'-' && is_white_space_or_eol(self.byte_at(self.position + 1)) {
            detected = true;
            self.position += 1;

            if self.skip_separation_space(true, -1) > 0 && self.line_indent <= node_indent {
                items.push(Value::Null);
                ch = self.peek();
                continue;
            }

            let line = self.line;
            self.compose_node(node_indent, Context::BlockIn, false, true)?;
            items.push(mem::take(&mut self.result));
            self.skip_separation_space(true, -1);

            ch = self.peek();
            if (self.line == line || self.line_indent > node_indent) && ch != 0 {
                return Err(
                    self.error("Cannot read block sequence: bad indentation of a sequence entry")
                );
            } else if self.line_indent < node_indent {
                break;
            }
        }

        if detected {
            self.tag = tag;
            self.anchor = anchor;
            self.kind = Some(Kind::Sequence);
            self.result = Value::Sequence(items.into());
        }
        Ok(detected)
    }

    /// Copies the entries of a `<<` source that `destination` lacks.
    fn merge_mappings(
        &self,
        destination: &mut Mapping,
        source: &Value,
        overridable_keys: &mut HashSet<String>,
    ) -> Result<()> {
        let entries: Vec<(String, Value)> = match source {
            Value::Mapping(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Value::Set(items) => items.iter().map(|k| (k.clone(), Value::Null)).collect(),
            _ => {
                return Err(self.error(
                    "Cannot merge mappings: the provided source object is unacceptable",
                ))
            }
        };
        for (key, value) in entries {
            if destination.contains_key(&key) {
                continue;
            }
            destination.insert(key.clone(), value);
            overridable_keys.insert(key);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn store_mapping_pair(
        &mut self,
        result: &mut Mapping,
        overridable_keys: &mut HashSet<String>,
        key_tag: Option<&str>,
        key_node: Value,
        value_node: Value,
        start: Option<(usize, usize)>,
    ) -> Result<()> {
        let Some(key) = key_node.to_key_string() else {
            return Err(self.error(
                "Cannot store mapping pair: nested arrays are not supported inside keys",
            ));
        };

        if key_tag == Some(MERGE_TAG) {
            if let Value::Sequence(sources) = &value_node {
                for source in sources.iter() {
                    self.merge_mappings(result, source, overridable_keys)?;
                }
            } else {
                self.merge_mappings(result, &value_node, overridable_keys)?;
            }
            return Ok(());
        }

        if !self.allow_duplicate_keys
            && !overridable_keys.contains(&key)
            && result.contains_key(&key)
        {
            if let Some((line, position)) = start {
                self.line = line;
                self.position = position;
                self.line_start = self.line_start_of(position);
            }
            return Err(self.error("Cannot store mapping pair: duplicated key"));
        }
        overridable_keys.remove(&key);
        result.insert(key, value_node);
        Ok(())
    }

    fn line_start_of(&self, position: usize) -> usize {
        self.input.as_bytes()[..position.min(self.input.len())]
            .iter()
            .rposition(|&b| is_eol(b))
            .map_or(0, |index| index + 1)
    }

    /// Consumes `\n`, `\r` or `\r\n`; the caller has checked there is one.
    fn consume_line_break(&mut self) {
        if self.peek() == b'\r' {
            self.position += 1;
            if self.peek() == b'\n' {
                self.position += 1;
            }
        } else {
            self.position += 1;
        }
        self.line += 1;
        self.line_start = self.position;
    }

    fn read_line_break(&mut self) -> Result<()> {
        if !is_eol(self.peek()) {
            return Err(self.error("Cannot read line: line break not found"));
        }
        self.consume_line_break();
        Ok(())
    }

    /// Skips blanks, comments and line breaks; returns the number of line
    /// breaks crossed.
    fn skip_separation_space(&mut self, allow_comments: bool, check_indent: isize) -> usize {
        let mut line_breaks = 0;
        let mut ch = self.peek();

        while ch != 0 {
            while is_white_space(ch) {
                ch = self.next();
            }

            if allow_comments && ch == b'#' {
                loop {
                    ch = self.next();
                    if ch == b'\n' || ch == b'\r' || ch == 0 {
                        break;
                    }
                }
            }

            if !is_eol(ch) {
                break;
            }
            self.consume_line_break();
            line_breaks += 1;
            self.line_indent = 0;
            self.read_indent();
            ch = self.peek();
        }

        if check_indent != -1 && line_breaks != 0 && self.line_indent < check_indent {
            self.dispatch_warning("deficient indentation");
        }
        line_breaks
    }

    /// `---` or `...` followed by a blank; the caller checks the cursor is
    /// at the start of a line.
    fn test_document_separator(&self) -> bool {
        let ch = self.peek();
        if (ch == b'-' || ch == b'.')
            && ch == self.byte_at(self.position + 1)
            && ch == self.byte_at(self.position + 2)
        {
            let after = self.byte_at(self.position + 3);
            return after == 0 || is_white_space_or_eol(after);
        }
        false
    }

    fn write_folded_lines(&mut self, count: usize) {
        match count {
            0 => {}
            1 => self.scalar.push(' '),
            _ => self.scalar.push_str(&"\n".repeat(count - 1)),
        }
    }

    fn read_plain_scalar(&mut self, node_indent: isize, within_flow: bool) -> Result<bool> {
        let mut ch = self.peek();
        if is_white_space_or_eol(ch)
            || is_flow_indicator(ch)
            || matches!(
                ch,
                b'#' | b'&' | b'*' | b'!' | b'|' | b'>' | b'\'' | b'"' | b'%' | b'@' | b'`'
            )
        {
            return Ok(false);
        }
        if ch == b'?' || ch == b'-' {
            let following = self.byte_at(self.position + 1);
            if is_white_space_or_eol(following) || (within_flow && is_flow_indicator(following)) {
                return Ok(false);
            }
        }

        self.scalar.clear();
        let mut capture_start = self.position;
        let mut capture_end = self.position;
        let mut has_pending_content = false;
        let mut line = 0;

        while ch != 0 {
            if ch == b':' {
                let following = self.byte_at(self.position + 1);
                if is_white_space_or_eol(following)
                    || (within_flow && is_flow_indicator(following))
                {
                    break;
                }
            } else if ch == b'#' {
                let preceding = self.position.checked_sub(1).map_or(0, |p| self.byte_at(p));
                if is_white_space_or_eol(preceding) {
                    break;
                }
            } else if (self.position == self.line_start && self.test_document_separator())
                || (within_flow && is_flow_indicator(ch))
            {
                break;
            } else if is_eol(ch) {
                line = self.line;
                let line_start = self.line_start;
                let line_indent = self.line_indent;
                self.skip_separation_space(false, -1);

                if self.line_indent >= node_indent {
                    has_pending_content = true;
                    ch = self.peek();
                    continue;
                }
                self.position = capture_end;
                self.line = line;
                self.line_start = line_start;
                self.line_indent = line_indent;
                break;
            }

            if has_pending_content {
                self.capture_segment(capture_start, capture_end, false)?;
                self.write_folded_lines(self.line - line);
                capture_start = self.position;
                capture_end = self.position;
                has_pending_content = false;
            }

            if !is_white_space(ch) {
                capture_end = self.position + 1;
            }
            ch = self.next();
        }

        self.capture_segment(capture_start, capture_end, false)?;
        if self.scalar.is_empty() {
            return Ok(false);
        }
        self.finish_scalar();
        Ok(true)
    }

    fn read_single_quoted_scalar(&mut self, node_indent: isize) -> Result<bool> {
        if self.peek() != b'\'' {
            return Ok(false);
        }

        self.scalar.clear();
        self.position += 1;
        let mut capture_start = self.position;
        let mut capture_end = self.position;

        loop {
            let ch = self.peek();
            if ch == 0 {
                break;
            }
            if ch == b'\'' {
                self.capture_segment(capture_start, self.position, true)?;
                if self.next() != b'\'' {
                    self.finish_scalar();
                    return Ok(true);
                }
                capture_start = self.position;
                self.position += 1;
                capture_end = self.position;
            } else if is_eol(ch) {
                self.capture_segment(capture_start, capture_end, true)?;
                let breaks = self.skip_separation_space(false, node_indent);
                self.write_folded_lines(breaks);
                capture_start = self.position;
                capture_end = self.position;
            } else if self.position == self.line_start && self.test_document_separator() {
                return Err(
                    self.error("Unexpected end of the document within a single quoted scalar")
                );
            } else {
                self.position += 1;
                capture_end = self.position;
            }
        }

        Err(self.error("Unexpected end of the stream within a single quoted scalar"))
    }

    fn read_double_quoted_scalar(&mut self, node_indent: isize) -> Result<bool> {
        if self.peek() != b'"' {
            return Ok(false);
        }

        self.scalar.clear();
        self.position += 1;
        let mut capture_start = self.position;
        let mut capture_end = self.position;

        loop {
            let mut ch = self.peek();
            if ch == 0 {
                break;
            }
            if ch == b'"' {
                self.capture_segment(capture_start, self.position, true)?;
                self.position += 1;
                self.finish_scalar();
                return Ok(true);
            }
            if ch == b'\\' {
                self.capture_segment(capture_start, self.position, true)?;
                ch = self.next();

                if is_eol(ch) {
                    self.skip_separation_space(false, node_indent);
                } else if let Some(text) = simple_escape(ch) {
                    self.scalar.push_str(text);
                    self.position += 1;
                } else if let Some(length) = hex_escape_length(ch) {
                    let mut code: u32 = 0;
                    for _ in 0..length {
                        let digit = (self.next() as char).to_digit(16).ok_or_else(|| {
                            self.error(
                                "Cannot read double quoted scalar: expected hexadecimal character",
                            )
                        })?;
                        code = (code << 4) + digit;
                    }
                    self.scalar
                        .push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    self.position += 1;
                } else {
                    return Err(
                        self.error("Cannot read double quoted scalar: unknown escape sequence")
                    );
                }

                capture_start = self.position;
                capture_end = self.position;
            } else if is_eol(ch) {
                self.capture_segment(capture_start, capture_end, true)?;
                let breaks = self.skip_separation_space(false, node_indent);
                self.write_folded_lines(breaks);
                capture_start = self.position;
                capture_end = self.position;
            } else if self.position == self.line_start && self.test_document_separator() {
                return Err(
                    self.error("Unexpected end of the document within a double quoted scalar")
                );
            } else {
                self.position += 1;
                capture_end = self.position;
            }
        }

        Err(self.error("Unexpected end of the stream within a double quoted scalar"))
    }

    fn read_flow_collection(&mut self, node_indent: isize) -> Result<bool> {
        let (terminator, is_mapping) = match self.peek() {
            b'[' => (b']', false),
            b'{' => (b'}', true),
            _ => return Ok(false),
        };

        let mut ch = self.next();
        let tag = self.tag.clone();
        let anchor = self.anchor.clone();
        let mut mapping = Mapping::new();
        let mut items = Vec::new();
        let mut overridable_keys = HashSet::new();
        let mut read_next = true;

        while ch != 0 {
            self.skip_separation_space(true, node_indent);

            ch = self.peek();
            if ch == terminator {
                self.position += 1;
                self.tag = tag;
                self.anchor = anchor;
                if is_mapping {
                    self.kind = Some(Kind::Mapping);
                    self.result = Value::Mapping(mapping);
                } else {
                    self.kind = Some(Kind::Sequence);
                    self.result = Value::Sequence(items.into());
                }
                return Ok(true);
            }
            if !read_next {
                return Err(self.error(
                    "Cannot read flow collection: missing comma between flow collection entries",
                ));
            }

            let mut is_pair = false;
            let mut is_explicit_pair = false;
            if ch == b'?' && is_white_space_or_eol(self.byte_at(self.position + 1)) {
                is_pair = true;
                is_explicit_pair = true;
                self.position += 1;
                self.skip_separation_space(true, node_indent);
            }

            let line = self.line;
            self.compose_node(node_indent, Context::FlowIn, false, true)?;
            let key_tag = self.tag.take();
            let key_node = mem::take(&mut self.result);
            self.skip_separation_space(true, node_indent);

            let mut value_node = Value::Null;
            if (is_explicit_pair || self.line == line) && self.peek() == b':' {
                is_pair = true;
                self.position += 1;
                self.skip_separation_space(true, node_indent);
                self.compose_node(node_indent, Context::FlowIn, false, true)?;
                value_node = mem::take(&mut self.result);
            }

            if is_mapping {
                self.store_mapping_pair(
                    &mut mapping,
                    &mut overridable_keys,
                    key_tag.as_deref(),
                    key_node,
                    value_node,
                    None,
                )?;
            } else if is_pair {
                let mut pair = Mapping::with_capacity(1);
                self.store_mapping_pair(
                    &mut pair,
                    &mut overridable_keys,
                    key_tag.as_deref(),
                    key_node,
                    value_node,
                    None,
                )?;
                items.push(Value::Mapping(pair));
            } else {
                items.push(key_node);
            }

            self.skip_separation_space(true, node_indent);

            ch = self.peek();
            if ch == b',' {
                read_next = true;
                ch = self.next();
            } else {
                read_next = false;
            }
        }

        Err(self.error(
            "Cannot read flow collection: unexpected end of the stream within a flow collection",
        ))
    }

    /// Literal (`|`) and folded (`>`) block scalars.
    fn read_block_scalar(&mut self, node_indent: isize) -> Result<bool> {
        let folding = match self.peek() {
            b'|' => false,
            b'>' => true,
            _ => return Ok(false),
        };

        self.scalar.clear();
        let mut chomping = Chomping::Clip;
        let mut did_read_content = false;
        let mut detected_indent = false;
        let mut text_indent = node_indent;
        let mut empty_lines = 0;
        let mut at_more_indented = false;

        let mut ch = self.peek();
        while ch != 0 {
            ch = self.next();

            if ch == b'+' || ch == b'-' {
                if chomping != Chomping::Clip {
                    return Err(self.error("Cannot read block: chomping mode identifier repeated"));
                }
                chomping = if ch == b'+' {
                    Chomping::Keep
                } else {
                    Chomping::Strip
                };
            } else if let Some(width) = (ch as char).to_digit(10) {
                if width == 0 {
                    return Err(
                        self.error("Cannot read block: indentation width must be greater than 0")
                    );
                }
                if detected_indent {
                    return Err(
                        self.error("Cannot read block: indentation width identifier repeated")
                    );
                }
                text_indent = node_indent + width as isize - 1;
                detected_indent = true;
            } else {
                break;
            }
        }

        if is_white_space(ch) {
            loop {
                ch = self.next();
                if !is_white_space(ch) {
                    break;
                }
            }
            if ch == b'#' {
                loop {
                    ch = self.next();
                    if is_eol(ch) || ch == 0 {
                        break;
                    }
                }
            }
        }

        while ch != 0 {
            self.read_line_break()?;
            self.line_indent = 0;

            ch = self.peek();
            while (!detected_indent || self.line_indent < text_indent) && ch == b' ' {
                self.line_indent += 1;
                ch = self.next();
            }
            if !detected_indent && self.line_indent > text_indent {
                text_indent = self.line_indent;
            }

            if is_eol(ch) {
                empty_lines += 1;
                continue;
            }

            if self.line_indent < text_indent {
                match chomping {
                    Chomping::Keep => {
                        let breaks = if did_read_content { empty_lines + 1 } else { empty_lines };
                        self.scalar.push_str(&"\n".repeat(breaks));
                    }
                    Chomping::Clip if did_read_content => self.scalar.push('\n'),
                    Chomping::Clip | Chomping::Strip => {}
                }
                break;
            }

            if folding {
                if is_white_space(ch) {
                    // More-indented lines keep their line breaks.
                    at_more_indented = true;
                    let breaks = if did_read_content { empty_lines + 1 } else { empty_lines };
                    self.scalar.push_str(&"\n".repeat(breaks));
                } else if at_more_indented {
                    at_more_indented = false;
                    self.scalar.push_str(&"\n".repeat(empty_lines + 1));
                } else if empty_lines == 0 {
                    if did_read_content {
                        self.scalar.push(' ');
                    }
                } else {
                    self.scalar.push_str(&"\n".repeat(empty_lines));
                }
            } else {
                let breaks = if did_read_content { empty_lines + 1 } else { empty_lines };
                self.scalar.push_str(&"\n".repeat(breaks));
            }

            did_read_content = true;
            detected_indent = true;
            empty_lines = 0;
            let capture_start = self.position;
            while !is_eol(ch) && ch != 0 {
                ch = self.next();
            }
            self.capture_segment(capture_start, self.position, false)?;
        }

        self.finish_scalar();
        Ok(true)
    }

    fn read_block_mapping(&mut self, node_indent: isize, flow_indent: isize) -> Result<bool> {
        let tag = self.tag.clone();
        let anchor = self.anchor.clone();
        let mut result = Mapping::new();
        let mut overridable_keys = HashSet::new();
        let mut key_tag: Option<String> = None;
        let mut key_node = Value::Null;
        let mut value_node = Value::Null;
        let mut at_explicit_key = false;
        let mut detected = false;

        let mut ch = self.peek();
        while ch != 0 {
            let following = self.byte_at(self.position + 1);
            let line = self.line;
            let pos = self.position;
            let allow_compact;

            if (ch == b'?' || ch == b':') && is_white_space_or_eol(following) {
                // Explicit notation: `? key` then `: value`.
                if ch == b'?' {
                    if at_explicit_key {
                        self.store_mapping_pair(
                            &mut result,
                            &mut overridable_keys,
                            key_tag.take().as_deref(),
                            mem::take(&mut key_node),
                            Value::Null,
                            None,
                        )?;
                        value_node = Value::Null;
                    }
                    detected = true;
                    at_explicit_key = true;
                    allow_compact = true;
                } else if at_explicit_key {
                    at_explicit_key = false;
                    allow_compact = true;
                } else {
                    return Err(self.error(
                        "Cannot read block as explicit mapping pair is incomplete: a key node is missed or followed by a non-tabulated empty line",
                    ));
                }
                self.position += 1;
                ch = following;
            } else if self.compose_node(flow_indent, Context::FlowOut, false, true)? {
                // Implicit notation: a flow node as key, then `:`.
                if self.line != line {
                    if detected {
                        return Err(self.error(
                            "Cannot read a block mapping entry: a multiline key may not be an implicit key",
                        ));
                    }
                    self.tag = tag;
                    self.anchor = anchor;
                    return Ok(true);
                }

                ch = self.peek();
                while is_white_space(ch) {
                    ch = self.next();
                }
                if ch != b':' {
                    if detected {
                        return Err(self.error("Cannot read an implicit mapping pair: missing colon"));
                    }
                    self.tag = tag;
                    self.anchor = anchor;
                    return Ok(true);
                }

                ch = self.next();
                if !is_white_space_or_eol(ch) {
                    return Err(self.error(
                        "Cannot read block: a whitespace character is expected after the key-value separator within a block mapping",
                    ));
                }
                if at_explicit_key {
                    let pending_tag = key_tag.take();
                    let pending_key = mem::take(&mut key_node);
                    self.store_mapping_pair(
                        &mut result,
                        &mut overridable_keys,
                        pending_tag.as_deref(),
                        pending_key,
                        Value::Null,
                        None,
                    )?;
                    value_node = Value::Null;
                }
                detected = true;
                at_explicit_key = false;
                allow_compact = false;
                key_tag = self.tag.clone();
                key_node = mem::take(&mut self.result);
            } else {
                break;
            }

            if self.line == line || self.line_indent > node_indent {
                if self.compose_node(node_indent, Context::BlockOut, true, allow_compact)? {
                    if at_explicit_key {
                        key_node = mem::take(&mut self.result);
                    } else {
                        value_node = mem::take(&mut self.result);
                    }
                }
                if !at_explicit_key {
                    self.store_mapping_pair(
                        &mut result,
                        &mut overridable_keys,
                        key_tag.take().as_deref(),
                        mem::take(&mut key_node),
                        mem::take(&mut value_node),
                        Some((line, pos)),
                    )?;
                }
                self.skip_separation_space(true, -1);
                ch = self.peek();
            }

            if self.line_indent > node_indent && ch != 0 {
                return Err(self.error("Cannot read block: bad indentation of a mapping entry"));
            } else if self.line_indent < node_indent {
                break;
            }
        }

        // A trailing `? key` without a value.
        if at_explicit_key {
            self.store_mapping_pair(
                &mut result,
                &mut overridable_keys,
                key_tag.as_deref(),
                key_node,
                Value::Null,
                None,
            )?;
        }

        if detected {
            self.tag = tag;
            self.anchor = anchor;
            self.kind = Some(Kind::Mapping);
            self.result = Value::Mapping(result);
        }
        Ok(detected)
    }

    fn read_tag_property(&mut self) -> Result<bool> {
        if self.peek() != b'!' {
            return Ok(false);
        }
        if self.tag.is_some() {
            return Err(self.error("Cannot read tag property: duplication of a tag property"));
        }

        let mut ch = self.next();
        let mut is_verbatim = false;
        let mut is_named = false;
        let mut handle = String::from("!");
        if ch == b'<' {
            is_verbatim = true;
            ch = self.next();
        } else if ch == b'!' {
            is_named = true;
            handle.push('!');
            ch = self.next();
        }

        let mut start = self.position;
        let name;
        if is_verbatim {
            while ch != 0 && ch != b'>' {
                ch = self.next();
            }
            if ch != b'>' {
                return Err(self.error("Cannot read tag property: unexpected end of stream"));
            }
            name = self.slice(start, self.position);
            self.position += 1;
        } else {
            while ch != 0 && !is_white_space_or_eol(ch) {
                if ch == b'!' {
                    if is_named {
                        return Err(self.error(
                            "Cannot read tag property: tag suffix cannot contain an exclamation mark",
                        ));
                    }
                    handle = self.slice(start - 1, self.position + 1);
                    if !TAG_HANDLE.is_match(&handle) {
                        return Err(self.error(
                            "Cannot read tag property: named tag handle contains invalid characters",
                        ));
                    }
                    is_named = true;
                    start = self.position + 1;
                }
                ch = self.next();
            }
            name = self.slice(start, self.position);
            if name.bytes().any(is_flow_indicator) {
                return Err(self.error(
                    "Cannot read tag property: tag suffix cannot contain flow indicator characters",
                ));
            }
        }

        if !name.is_empty() && !TAG_URI.is_match(&name) {
            return Err(self.error(format!(
                "Cannot read tag property: invalid characters in tag name \"{name}\""
            )));
        }

        let tag = if is_verbatim {
            name
        } else if let Some(prefix) = self.tag_map.get(&handle) {
            format!("{prefix}{name}")
        } else if handle == "!" {
            format!("!{name}")
        } else if handle == "!!" {
            format!("tag:yaml.org,2002:{name}")
        } else {
            return Err(self.error(format!(
                "Cannot read tag property: undeclared tag handle \"{handle}\""
            )));
        };
        self.tag = Some(tag);
        Ok(true)
    }

    /// Reads a run of anchor-name characters after `&` or `*`.
    fn read_node_name(&mut self) -> String {
        let mut ch = self.next();
        let start = self.position;
        while ch != 0 && !is_white_space_or_eol(ch) && !is_flow_indicator(ch) {
            ch = self.next();
        }
        self.slice(start, self.position)
    }

    fn read_anchor_property(&mut self) -> Result<bool> {
        if self.peek() != b'&' {
            return Ok(false);
        }
        if self.anchor.is_some() {
            return Err(self.error("Cannot read anchor property: duplicate anchor property"));
        }
        let name = self.read_node_name();
        if name.is_empty() {
            return Err(self.error(
                "Cannot read anchor property: name of an anchor node must contain at least one character",
            ));
        }
        self.anchor = Some(name);
        Ok(true)
    }

    fn read_alias(&mut self) -> Result<bool> {
        if self.peek() != b'*' {
            return Ok(false);
        }
        let alias = self.read_node_name();
        if alias.is_empty() {
            return Err(
                self.error("Cannot read alias: alias name must contain at least one character")
            );
        }
        let Some(value) = self.anchor_map.get(&alias) else {
            return Err(self.error(format!("Cannot read alias: unidentified alias \"{alias}\"")));
        };
        self.result = value.clone();
        self.skip_separation_space(true, -1);
        Ok(true)
    }

    fn store_anchor(&mut self) {
        if let Some(anchor) = &self.anchor {
            self.anchor_map.insert(anchor.clone(), self.result.clone());
        }
    }

    /// Parses one node of any style into the current-node slots.
    ///
    /// Returns `false` when nothing (no properties, no content) was found
    /// at a compatible indentation, which is how enclosing collections
    /// detect their end.
    fn compose_node(
        &mut self,
        parent_indent: isize,
        context: Context,
        allow_to_seek: bool,
        allow_compact: bool,
    ) -> Result<bool> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!(
                "Cannot compose node: nesting exceeds {MAX_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let composed =
            self.compose_nested_node(parent_indent, context, allow_to_seek, allow_compact);
        self.depth -= 1;
        composed
    }

    fn compose_nested_node(
        &mut self,
        parent_indent: isize,
        context: Context,
        allow_to_seek: bool,
        allow_compact: bool,
    ) -> Result<bool> {
        let mut indent_status = Ordering::Greater;
        let mut at_new_line = false;
        let mut has_content = false;

        self.tag = None;
        self.anchor = None;
        self.kind = None;
        self.result = Value::Null;

        let allow_block_styles = matches!(context, Context::BlockOut | Context::BlockIn);
        let allow_block_scalars = allow_block_styles;
        let mut allow_block_collections = allow_block_styles;

        if allow_to_seek && self.skip_separation_space(true, -1) > 0 {
            at_new_line = true;
            indent_status = self.line_indent.cmp(&parent_indent);
        }

        if indent_status == Ordering::Greater {
            while self.read_tag_property()? || self.read_anchor_property()? {
                if self.skip_separation_space(true, -1) > 0 {
                    at_new_line = true;
                    allow_block_collections = allow_block_styles;
                    indent_status = self.line_indent.cmp(&parent_indent);
                } else {
                    allow_block_collections = false;
                }
            }
        }

        if allow_block_collections {
            allow_block_collections = at_new_line || allow_compact;
        }

        if indent_status == Ordering::Greater || context == Context::BlockOut {
            let flow_indent = if matches!(context, Context::FlowIn | Context::FlowOut) {
                parent_indent
            } else {
                parent_indent + 1
            };
            let block_indent = (self.position - self.line_start) as isize;

            if indent_status == Ordering::Greater {
                if (allow_block_collections
                    && (self.read_block_sequence(block_indent)?
                        || self.read_block_mapping(block_indent, flow_indent)?))
                    || self.read_flow_collection(flow_indent)?
                {
                    has_content = true;
                } else if (allow_block_scalars && self.read_block_scalar(flow_indent)?)
                    || self.read_single_quoted_scalar(flow_indent)?
                    || self.read_double_quoted_scalar(flow_indent)?
                {
                    has_content = true;
                } else if self.read_alias()? {
                    has_content = true;
                    if self.tag.is_some() || self.anchor.is_some() {
                        return Err(self.error(
                            "Cannot compose node: alias node should not have any properties",
                        ));
                    }
                } else if self.read_plain_scalar(flow_indent, context == Context::FlowIn)? {
                    has_content = true;
                    if self.tag.is_none() {
                        self.tag = Some("?".to_string());
                    }
                }
            } else if indent_status == Ordering::Equal {
                // Block sequences may share their parent's indentation.
                has_content = allow_block_collections && self.read_block_sequence(block_indent)?;
            }
        }
        self.store_anchor();

        if let Some(tag) = self.tag.clone() {
            if tag == "?" {
                if let Some(ty) = self.schema.resolve_implicit(&self.result).cloned() {
                    let data = mem::take(&mut self.result);
                    self.result = ty.construct(data);
                    self.tag = Some(ty.tag().to_string());
                    self.store_anchor();
                }
            } else if tag != "!" {
                let Some(ty) = self.schema.lookup(self.kind, &tag).cloned() else {
                    return Err(self.error(format!("Cannot resolve unknown tag !<{tag}>")));
                };
                if !self.result.is_null() && Some(ty.kind()) != self.kind {
                    return Err(self.error(format!(
                        "Unacceptable node kind for !<{tag}> tag: it should be \"{}\", not \"{}\"",
                        ty.kind(),
                        self.kind.map_or("null", Kind::as_str)
                    )));
                }
                if !ty.resolve(&self.result) {
                    return Err(
                        self.error(format!("Cannot resolve a node with !<{tag}> explicit tag"))
                    );
                }
                let data = mem::take(&mut self.result);
                self.result = ty.construct(data);
                self.store_anchor();
            }
        }

        Ok(self.tag.is_some() || self.anchor.is_some() || has_content)
    }

    /// Reads directives, the optional `---` marker, the root node and the
    /// optional `...` marker of one document.
    pub(crate) fn read_document(&mut self) -> Result<Value> {
        let document_start = self.position;
        let mut has_directives = false;

        self.version = None;
        self.check_line_breaks = false;
        self.tag_map.clear();
        self.anchor_map.clear();
        trace!(line = self.line + 1, "reading document");

        while self.peek() != 0 {
            self.skip_separation_space(true, -1);

            let mut ch = self.peek();
            if self.line_indent > 0 || ch != b'%' {
                break;
            }

            has_directives = true;
            ch = self.next();
            let mut start = self.position;
            while ch != 0 && !is_white_space_or_eol(ch) {
                ch = self.next();
            }
            let name = self.slice(start, self.position);
            if name.is_empty() {
                return Err(self.error(
                    "Cannot read document: directive name length must be greater than zero",
                ));
            }

            let mut args = Vec::new();
            while ch != 0 {
                while is_white_space(ch) {
                    ch = self.next();
                }
                if ch == b'#' {
                    loop {
                        ch = self.next();
                        if ch == 0 || is_eol(ch) {
                            break;
                        }
                    }
                    break;
                }
                if is_eol(ch) {
                    break;
                }
                start = self.position;
                while ch != 0 && !is_white_space_or_eol(ch) {
                    ch = self.next();
                }
                args.push(self.slice(start, self.position));
            }

            if ch != 0 {
                self.read_line_break()?;
            }

            match name.as_str() {
                "YAML" => self.yaml_directive(&args)?,
                "TAG" => self.tag_directive(&args)?,
                _ => self.dispatch_warning(format!("unknown document directive \"{name}\"")),
            }
        }

        self.skip_separation_space(true, -1);

        if self.line_indent == 0
            && self.peek() == b'-'
            && self.byte_at(self.position + 1) == b'-'
            && self.byte_at(self.position + 2) == b'-'
        {
            self.position += 3;
            self.skip_separation_space(true, -1);
        } else if has_directives {
            return Err(self.error("Cannot read document: directives end mark is expected"));
        }

        self.compose_node(self.line_indent - 1, Context::BlockOut, false, true)?;
        self.skip_separation_space(true, -1);

        if self.check_line_breaks
            && self
                .input
                .get(document_start..self.position)
                .is_some_and(|text| text.contains(['\u{85}', '\u{2028}', '\u{2029}']))
        {
            self.dispatch_warning("non-ASCII line breaks are interpreted as content");
        }

        if self.position == self.line_start && self.test_document_separator() {
            if self.peek() == b'.' {
                self.position += 3;
                self.skip_separation_space(true, -1);
            }
        } else if self.has_more() {
            return Err(self.error(
                "Cannot read document: end of the stream or a document separator is expected",
            ));
        }

        trace!(line = self.line + 1, "finished document");
        Ok(mem::take(&mut self.result))
    }
}

/// A forward-only iterator over the documents of a YAML stream.
///
/// Created by [`parse_documents`](crate::parse_documents). Each call to
/// `next` parses one more document; after the first error, or once the
/// input is exhausted, it yields `None`.
///
/// # Examples
///
/// ```rust
/// use yamlet::{parse_documents, ParseOptions, Value};
///
/// let mut docs = parse_documents("a\n---\nb\n", &ParseOptions::default());
/// assert_eq!(docs.next().unwrap().unwrap(), Value::from("a"));
/// assert_eq!(docs.next().unwrap().unwrap(), Value::from("b"));
/// assert!(docs.next().is_none());
/// ```
pub struct Documents {
    loader: Loader,
    failed: bool,
}

impl Documents {
    pub(crate) fn new(input: &str, options: &ParseOptions) -> Self {
        Documents {
            loader: Loader::new(input, options),
            failed: false,
        }
    }
}

impl Iterator for Documents {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.loader.has_more() {
            return None;
        }
        let document = self.loader.read_document();
        self.failed = document.is_err();
        Some(document)
    }
}

impl FusedIterator for Documents {}
