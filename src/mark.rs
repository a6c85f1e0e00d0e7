//! Source positions for diagnostics.
//!
//! A [`Mark`] pins a loader error or warning to a line and column of the
//! input and carries a short excerpt of the offending line:
//!
//! ```text
//! at line 2, column 1:
//!     a: 2
//!     ^
//! ```

use std::fmt;

const INDENT: usize = 4;
const MAX_LENGTH: usize = 75;
const HALF_WIDTH: usize = MAX_LENGTH / 2;
const ELLIPSIS: &str = " ... ";

/// A position inside the loaded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    line: usize,
    column: usize,
    position: usize,
    snippet: Option<String>,
}

impl Mark {
    /// Builds a mark from a byte `position` inside `buffer`.
    ///
    /// `line` is zero-based and `line_start` is the byte offset where that
    /// line begins; the stored line and column are one-based.
    pub(crate) fn new(buffer: &str, position: usize, line: usize, line_start: usize) -> Self {
        let position = floor_char_boundary(buffer, position.min(buffer.len()));
        let line_start = floor_char_boundary(buffer, line_start.min(position));
        let column = buffer[line_start..position].chars().count();
        Mark {
            line: line + 1,
            column: column + 1,
            position,
            snippet: snippet(buffer, position),
        }
    }

    /// One-based line number.
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column, counted in characters.
    #[inline]
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Byte offset into the (normalized) input.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The excerpt with its caret line, if the input was not empty.
    #[must_use]
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at line {}, column {}", self.line, self.column)?;
        if let Some(snippet) = &self.snippet {
            write!(f, ":\n{snippet}")?;
        }
        Ok(())
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '\0' | '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn snippet(buffer: &str, position: usize) -> Option<String> {
    if buffer.is_empty() {
        return None;
    }

    let before: Vec<char> = buffer[..position].chars().collect();
    let after: Vec<char> = buffer[position..].chars().collect();

    let mut head = "";
    let mut start = before.len();
    while start > 0 && !is_delimiter(before[start - 1]) {
        start -= 1;
        if before.len() - start > HALF_WIDTH - 1 {
            head = ELLIPSIS;
            start += ELLIPSIS.len();
            break;
        }
    }

    let mut tail = "";
    let mut end = 0;
    while end < after.len() && !is_delimiter(after[end]) {
        end += 1;
        if end > HALF_WIDTH - 1 {
            tail = ELLIPSIS;
            end -= ELLIPSIS.len();
            break;
        }
    }

    let excerpt: String = before[start..].iter().chain(&after[..end]).collect();
    let indent = " ".repeat(INDENT);
    let caret = " ".repeat(INDENT + (before.len() - start) + head.len());
    Some(format!("{indent}{head}{excerpt}{tail}\n{caret}^"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column() {
        let text = "a: 1\nbb: 2\n";
        let mark = Mark::new(text, 6, 1, 5);
        assert_eq!(mark.line(), 2);
        assert_eq!(mark.column(), 2);
        assert_eq!(mark.position(), 6);
    }

    #[test]
    fn test_snippet_points_at_position() {
        let text = "a: 1\nbb: 2\n";
        let mark = Mark::new(text, 6, 1, 5);
        assert_eq!(mark.snippet(), Some("    bb: 2\n     ^"));
        assert_eq!(
            mark.to_string(),
            "at line 2, column 2:\n    bb: 2\n     ^"
        );
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "ключ: x\n";
        let position = "ключ".len();
        let mark = Mark::new(text, position, 0, 0);
        assert_eq!(mark.column(), 5);
    }

    #[test]
    fn test_long_lines_are_truncated() {
        let text = format!("{}X{}\n", "a".repeat(100), "b".repeat(100));
        let mark = Mark::new(&text, 100, 0, 0);
        let snippet = mark.snippet().unwrap();
        let first = snippet.lines().next().unwrap();
        assert!(first.starts_with("     ... "));
        assert!(first.ends_with(" ... "));
        assert!(first.contains('X'));
        let caret = snippet.lines().nth(1).unwrap();
        let caret_col = caret.find('^').unwrap();
        assert_eq!(first.chars().nth(caret_col), Some('X'));
    }

    #[test]
    fn test_empty_buffer_has_no_snippet() {
        let mark = Mark::new("", 0, 0, 0);
        assert_eq!(mark.snippet(), None);
        assert_eq!(mark.to_string(), "at line 1, column 1");
    }
}
