//! FrameBuffer and drawing primitives.
//!
//! A 2D grid of Cells: what should be on the terminal this frame.
//! Flat storage, row-major: `index = y * width + x`. Wide glyphs (✨) put a
//! continuation marker (`char == 0`) in the cell to their right.

use crate::layout::char_width;
use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells
            .resize(width as usize * height as usize, Cell::default());
        self.clear();
    }

    /// Row `y` as a string, continuation cells skipped (for tests and logs).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|c| c.char != 0)
            .filter_map(|c| char::from_u32(c.char))
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell. Returns true if the cell was in bounds.
    pub fn set_cell(&mut self, x: u16, y: u16, char: u32, fg: Rgba, bg: Rgba, attrs: Attr) -> bool {
        let Some(cell) = self.get_mut(x, y) else {
            return false;
        };
        cell.char = char;
        cell.fg = fg;
        cell.bg = bg;
        cell.attrs = attrs;
        true
    }

    /// Fill a rectangle with a background color.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, bg: Rgba) {
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);
        if x2 <= x || y2 <= y {
            return;
        }

        for row in y..y2 {
            let start = self.index(x, row);
            let end = self.index(x2, row);
            for cell in &mut self.cells[start..end] {
                cell.bg = bg;
                cell.char = b' ' as u32;
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw a glyph, keeping the existing background.
    ///
    /// A wide glyph that would not fit before the right edge is skipped.
    pub fn draw_glyph(&mut self, x: u16, y: u16, glyph: char, fg: Rgba, attrs: Attr) -> bool {
        let w = char_width(glyph);
        if w == 0 || !self.in_bounds(x, y) || (w == 2 && x + 1 >= self.width) {
            return false;
        }
        let bg = self.cells[self.index(x, y)].bg;
        self.set_cell(x, y, glyph as u32, fg, bg, attrs);
        if w == 2 {
            let bg = self.cells[self.index(x + 1, y)].bg;
            self.set_cell(x + 1, y, 0, fg, bg, attrs);
        }
        true
    }

    /// Draw text at a position. Returns the number of cells used.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, attrs: Attr) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            self.draw_glyph(col, y, ch, fg, attrs);
            col += w;
        }
        col.saturating_sub(x)
    }
}

// =============================================================================
// Tests
// =============================================================================
