//! Terminal cell width helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual width of a string in terminal cells.
///
/// Wide characters (CJK, most emoji) count as two cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` cells, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_width_wide_chars() {
        assert_eq!(visual_width("abc"), 3);
        assert_eq!(visual_width("你好"), 4);
    }

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_to_width("Hello", 10), "Hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let cut = truncate_to_width("Patna Metro Job Updates", 10);
        assert_eq!(cut, "Patna Met…");
        assert_eq!(visual_width(&cut), 10);
    }

    #[test]
    fn test_truncate_respects_wide_chars() {
        // Only one two-cell char fits before the ellipsis
        assert_eq!(truncate_to_width("你好世界", 4), "你…");
    }
}
