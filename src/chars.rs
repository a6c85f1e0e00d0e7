//! Character classes shared by the loader and the dumper.
//!
//! The loader walks the input byte by byte (every YAML indicator is ASCII),
//! so its predicates take `u8`. The dumper reasons about whole code points
//! and uses the `char` predicates.

pub(crate) const BOM: char = '\u{FEFF}';

/// `\n` or `\r`.
#[inline]
pub(crate) const fn is_eol(c: u8) -> bool {
    matches!(c, b'\n' | b'\r')
}

/// Space or tab.
#[inline]
pub(crate) const fn is_white_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t')
}

#[inline]
pub(crate) const fn is_white_space_or_eol(c: u8) -> bool {
    is_white_space(c) || is_eol(c)
}

/// One of `, [ ] { }`.
#[inline]
pub(crate) const fn is_flow_indicator(c: u8) -> bool {
    matches!(c, b',' | b'[' | b']' | b'{' | b'}')
}

#[inline]
pub(crate) const fn is_white_space_char(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Printable without escaping (YAML 1.2, section 5.1).
#[inline]
pub(crate) fn is_printable(c: char) -> bool {
    let c = c as u32;
    (0x20..=0x7e).contains(&c)
        || ((0xa1..=0xd7ff).contains(&c) && c != 0x2028 && c != 0x2029)
        || ((0xe000..=0xfffd).contains(&c) && c != BOM as u32)
        || (0x10000..=0x10ffff).contains(&c)
}

/// Allowed after the first character of a plain scalar.
#[inline]
pub(crate) fn is_plain_safe(c: char) -> bool {
    is_printable(c) && c != BOM && !matches!(c, ',' | '[' | ']' | '{' | '}' | ':' | '#')
}

/// Allowed as the first character of a plain scalar.
#[inline]
pub(crate) fn is_plain_safe_first(c: char) -> bool {
    is_plain_safe(c)
        && !is_white_space_char(c)
        && !matches!(
            c,
            '-' | '?' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
        )
}

/// Code points the loader refuses inside plain, literal and folded content.
#[inline]
pub(crate) fn is_non_printable(c: char) -> bool {
    let c = c as u32;
    c <= 0x08
        || c == 0x0b
        || c == 0x0c
        || (0x0e..=0x1f).contains(&c)
        || (0x7f..=0x84).contains(&c)
        || (0x86..=0x9f).contains(&c)
        || c == 0xfffe
        || c == 0xffff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_classes() {
        assert!(is_eol(b'\n'));
        assert!(is_eol(b'\r'));
        assert!(!is_eol(b' '));
        assert!(is_white_space(b'\t'));
        assert!(is_white_space_or_eol(b'\n'));
        assert!(!is_white_space_or_eol(0));
        assert!(is_flow_indicator(b'{'));
        assert!(!is_flow_indicator(b':'));
    }

    #[test]
    fn test_printable() {
        assert!(is_printable('a'));
        assert!(is_printable('é'));
        assert!(is_printable('\u{1F600}'));
        assert!(!is_printable('\u{7}'));
        assert!(!is_printable('\u{2028}'));
        assert!(!is_printable(BOM));
    }

    #[test]
    fn test_plain_safety() {
        assert!(is_plain_safe_first('a'));
        assert!(!is_plain_safe_first('-'));
        assert!(!is_plain_safe_first(' '));
        assert!(is_plain_safe('-'));
        assert!(!is_plain_safe(':'));
        assert!(!is_plain_safe('#'));
    }

    #[test]
    fn test_non_printable() {
        assert!(is_non_printable('\u{0}'));
        assert!(is_non_printable('\u{7f}'));
        assert!(!is_non_printable('\u{85}'));
        assert!(!is_non_printable('\t'));
        assert!(!is_non_printable('\n'));
    }
}
