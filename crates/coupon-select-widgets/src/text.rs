//! Display-width aware helpers for laying out rows.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns `s` occupies in a terminal.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_width` columns, ending with `tail` when cut.
///
/// ```
/// use coupon_select_widgets::text::truncate;
///
/// assert_eq!(truncate("Minimum order not met", 10, "…"), "Minimum o…");
/// assert_eq!(truncate("Food", 10, "…"), "Food");
/// ```
pub fn truncate(s: &str, max_width: usize, tail: &str) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let tail_width = display_width(tail);
    if tail_width > max_width {
        return take_columns(tail, max_width);
    }
    let mut out = take_columns(s, max_width - tail_width);
    out.push_str(tail);
    out
}

fn take_columns(s: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw > max_width {
            break;
        }
        out.push(c);
        width += cw;
    }
    out
}
