//! Text wrapping for message bubbles.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap a plain text string to the specified width.
///
/// Explicit newlines are kept, including blank lines. A zero width
/// returns the text split on newlines only.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Break one line into rows of at most `width` columns, between any two
/// characters.
///
/// Unlike [`wrap_text`] no whitespace is dropped, so the rows concatenate
/// back to `line` and character positions map straight onto rows. Always
/// returns at least one row; a zero width returns the line unbroken.
pub fn wrap_chars(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![line.to_string()];
    }

    let mut rows = vec![String::new()];
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && used > 0 {
            rows.push(String::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        used += w;
    }
    rows
}

/// Display width of the widest line.
pub fn wrap_width(lines: &[String]) -> usize {
    lines.iter().map(|line| line.width()).max().unwrap_or(0)
}
