//! Display width calculation for Unicode text
//!
//! Terminal cells are not characters: CJK and emoji take two columns,
//! combining marks take none. Layout code in the select control pads and
//! truncates by display width, never by `len()` or `chars().count()`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculate the display width of a single character.
///
/// Returns 0 for control characters and zero-width characters,
/// 2 for CJK/fullwidth characters and emoji,
/// 1 for most other characters.
#[inline]
pub fn char_width(c: char) -> usize {
    // unicode_width returns None for control characters
    c.width().unwrap_or(0)
}

/// Calculate the display width of a string.
#[inline]
pub fn str_width(s: &str) -> usize {
    s.width()
}

/// Calculate the visual column (display width) at a given byte offset within a string.
#[inline]
pub fn visual_column_at_byte(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset.min(s.len())].chars().map(char_width).sum()
}

/// Truncate `s` so that it fits in `max_width` columns, then pad it with
/// spaces up to exactly `max_width` columns.
///
/// A double-width character that would straddle the boundary is dropped and
/// replaced by padding.
pub fn fit_to_width(s: &str, max_width: usize) -> String {
    let mut out = String::with_capacity(max_width);
    let mut used = 0;
    for ch in s.chars() {
        let w = char_width(ch);
        if used + w > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(max_width - used));
    out
}
