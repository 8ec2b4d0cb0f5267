//! Text Measurement
//!
//! Display widths in terminal cells, via `unicode-width`:
//! - ASCII printable: 1 cell
//! - CJK and most emoji (✨ included): 2 cells
//! - Control and zero-width characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of one character in terminal cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Width of a string in terminal cells (saturating).
pub fn string_width(s: &str) -> u16 {
    s.width().min(u16::MAX as usize) as u16
}

/// Truncate text to fit `width` cells, ending with an ellipsis when cut.
///
/// # Arguments
///
/// * `text` - The text to truncate
/// * `width` - Maximum width (in cells)
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    if string_width(text) <= width {
        return text.to_string();
    }

    // Leave room for the ellipsis
    let target_width = width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0u16;

    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > target_width {
            break;
        }
        result.push(c);
        current_width += w;
    }

    result.push('…');
    result
}
