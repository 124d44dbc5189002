//! Character-offset text primitives for block text.
//!
//! Block offsets throughout the workspace are *character* indices (Unicode
//! scalar values), never byte indices. Every helper here accepts character
//! offsets and translates to byte boundaries internally so callers never slice
//! a `&str` directly. Offsets past the end of the text clamp to the end, which
//! keeps these helpers total; range validation is a concern of the document
//! engine, not of this crate.

/// The indentation unit inserted by indent and removed by outdent.
pub const INDENT: char = '\t';

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the character at `offset`, clamped to `text.len()`.
pub fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Substring covering characters `[start, end)`. Reversed bounds yield "".
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let a = byte_index(text, start);
    let b = byte_index(text, end);
    &text[a..b]
}

/// Split `text` at a character offset.
pub fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(byte_index(text, offset))
}

/// Replace characters `[start, end)` with `insert`, returning the new text.
pub fn splice(text: &str, start: usize, end: usize, insert: &str) -> String {
    let a = byte_index(text, start);
    let b = byte_index(text, end.max(start));
    let mut out = String::with_capacity(text.len() - (b - a) + insert.len());
    out.push_str(&text[..a]);
    out.push_str(insert);
    out.push_str(&text[b..]);
    out
}

/// Insert `insert` at a character offset.
pub fn insert_at(text: &str, offset: usize, insert: &str) -> String {
    splice(text, offset, offset, insert)
}

/// `text` prefixed with one indentation unit.
pub fn indented(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + INDENT.len_utf8());
    out.push(INDENT);
    out.push_str(text);
    out
}

/// `text` without its leading indentation unit, or `None` when it has none.
pub fn strip_indent(text: &str) -> Option<&str> {
    text.strip_prefix(INDENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("🚀a"), 2);
    }

    #[test]
    fn byte_index_clamps_past_end() {
        assert_eq!(byte_index("abc", 1), 1);
        assert_eq!(byte_index("abc", 3), 3);
        assert_eq!(byte_index("abc", 99), 3);
        assert_eq!(byte_index("é!", 1), 2);
    }

    #[test]
    fn slice_chars_multibyte() {
        assert_eq!(slice_chars("café au lait", 2, 6), "fé a");
        assert_eq!(slice_chars("hello", 0, 5), "hello");
        assert_eq!(slice_chars("hello", 3, 1), "");
        assert_eq!(slice_chars("hello", 3, 40), "lo");
    }

    #[test]
    fn splice_replaces_range() {
        assert_eq!(splice("hello world", 6, 11, "\t"), "hello \t");
        assert_eq!(splice("hello", 0, 0, "\t"), "\thello");
        assert_eq!(splice("Ωmega", 1, 1, "-"), "Ω-mega");
    }

    #[test]
    fn insert_at_caret() {
        assert_eq!(insert_at("hello", 2, "\t"), "he\tllo");
        assert_eq!(insert_at("hello", 5, "!"), "hello!");
    }

    #[test]
    fn split_at_char_boundaries() {
        assert_eq!(split_at_char("añb", 2), ("añ", "b"));
        assert_eq!(split_at_char("ab", 0), ("", "ab"));
    }

    #[test]
    fn indent_and_strip() {
        assert_eq!(indented("foo"), "\tfoo");
        assert_eq!(strip_indent("\t\tfoo"), Some("\tfoo"));
        assert_eq!(strip_indent("foo"), None);
        assert_eq!(strip_indent(" \tfoo"), None);
    }
}
