//! Unicode helpers shared by the editing and layout code.
//!
//! Cursor positions are codepoint ("rune") indices. Display widths are
//! measured per extended grapheme cluster so that emoji sequences joined with
//! U+200D occupy the two columns a terminal draws them in.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ZERO_WIDTH_JOINER: char = '\u{200d}';

/// Count the codepoints in a string.
///
/// ```
/// use promptkit_core::unicode::rune_count;
///
/// assert_eq!(rune_count("hello"), 5);
/// assert_eq!(rune_count("こんにちは"), 5);
/// ```
pub fn rune_count(s: &str) -> usize {
    s.chars().count()
}

/// Convert a codepoint index to a byte index, clamping to the end of `s`.
pub fn byte_index_from_rune_index(s: &str, rune_index: usize) -> usize {
    s.char_indices()
        .nth(rune_index)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}

/// Substring by codepoint indices. An empty range yields `""`.
///
/// ```
/// use promptkit_core::unicode::rune_slice;
///
/// assert_eq!(rune_slice("hello", 1, 4), "ell");
/// assert_eq!(rune_slice("こんにちは", 1, 3), "んに");
/// ```
pub fn rune_slice(s: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let start_byte = byte_index_from_rune_index(s, start);
    let end_byte = byte_index_from_rune_index(s, end);
    &s[start_byte..end_byte]
}

/// Display width of a single grapheme cluster.
///
/// A multi-codepoint cluster containing a zero-width joiner counts as 2
/// columns; anything else uses the cluster's `unicode-width`.
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let multi = chars.next().is_some() && chars.next().is_some();
    if multi && grapheme.contains(ZERO_WIDTH_JOINER) {
        2
    } else {
        grapheme.width()
    }
}

/// Display width of a string in terminal columns.
///
/// ```
/// use promptkit_core::unicode::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("こんにちは"), 10);
/// ```
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Longest prefix of `s` that fits in `width` columns, never splitting a
/// grapheme cluster.
pub fn truncate_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, grapheme) in s.grapheme_indices(true) {
        let w = grapheme_width(grapheme);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Truncate `s` to `width` columns, ending with `…` when anything was cut.
pub fn truncate_with_ellipsis(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    format!("{}…", truncate_to_width(s, width - 1))
}

/// Pad `s` with spaces on the right up to `width` columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - current))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rune_count() {
        assert_eq!(rune_count(""), 0);
        assert_eq!(rune_count("hello"), 5);
        assert_eq!(rune_count("🦀🚀"), 2);
    }

    #[test]
    fn test_byte_index_from_rune_index() {
        assert_eq!(byte_index_from_rune_index("hello", 2), 2);
        assert_eq!(byte_index_from_rune_index("こんにちは", 2), 6);
        assert_eq!(byte_index_from_rune_index("abc", 10), 3);
    }

    #[test]
    fn test_rune_slice() {
        assert_eq!(rune_slice("hello", 0, 5), "hello");
        assert_eq!(rune_slice("hello", 3, 1), "");
        assert_eq!(rune_slice("hello", 3, 100), "lo");
        assert_eq!(rune_slice("🦀🚀x", 1, 2), "🚀");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("中文"), 4);
        assert_eq!(display_width("🦀"), 2);
    }

    #[test]
    fn test_zero_width_joiner_cluster_is_two_columns() {
        let family = "👨\u{200d}👩\u{200d}👧\u{200d}👦";
        assert_eq!(family.graphemes(true).count(), 1);
        assert_eq!(grapheme_width(family), 2);
        assert_eq!(display_width(family), 2);
        assert_eq!(display_width(&format!("a {family} b")), 6);
    }

    #[test]
    fn test_combining_mark() {
        // e + combining acute accent is one cluster, one column
        assert_eq!(display_width("e\u{301}"), 1);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("中文字", 3), "中");
        assert_eq!(truncate_to_width("abc", 10), "abc");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
        assert_eq!(truncate_with_ellipsis("hi", 6), "hi");
        assert_eq!(truncate_with_ellipsis("hi", 0), "");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("中", 4), "中  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }
}
