//! Differential renderer for fullscreen mode.
//!
//! Compares the current frame to the previous one and only emits cells that
//! changed, through crossterm commands.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each cell in the new frame:
//!    - If the previous frame has the same cell: skip
//!    - Otherwise: move there and print it, switching colors/attributes only
//!      when they differ from the last printed cell
//! 3. Write the whole frame with a single flush
//! 4. Keep the frame as previous for the next comparison

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

/// Differential renderer over any writer (stdout in practice).
pub struct DiffRenderer<W: Write> {
    out: W,
    frame: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer<io::Stdout> {
    /// Renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: Vec::with_capacity(16 * 1024),
            previous: None,
        }
    }

    /// Render a frame, outputting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        self.frame.clear();
        queue!(self.frame, BeginSynchronizedUpdate)?;

        let mut style = StyleState::default();
        let mut has_changes = false;

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };

                let changed = match &self.previous {
                    Some(prev) if prev.width() == buffer.width() && prev.height() == buffer.height() => {
                        prev.get(x, y).is_none_or(|p| p != cell)
                    }
                    _ => true,
                };

                if changed {
                    has_changes = true;
                    render_cell(&mut self.frame, &mut style, x, y, cell)?;
                }
            }
        }

        queue!(self.frame, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.write_all(&self.frame)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Forget the previous frame; the next render redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter the alternate screen with the cursor hidden.
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.invalidate();
        Ok(())
    }

    /// Leave the alternate screen and show the cursor again.
    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        execute!(self.out, SetAttribute(Attribute::Reset), ResetColor, Show, LeaveAlternateScreen)
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }
}

// =============================================================================
// Cell Output
// =============================================================================

/// What the terminal is currently set to, so unchanged styles are not resent.
#[derive(Default)]
struct StyleState {
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
    /// Cursor position after the last print.
    cursor: Option<(u16, u16)>,
}

fn render_cell(out: &mut Vec<u8>, style: &mut StyleState, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
    // Tail of a wide glyph: the lead cell already covers it.
    if cell.char == 0 {
        return Ok(());
    }

    if style.cursor != Some((x, y)) {
        queue!(out, MoveTo(x, y))?;
    }

    if style.attrs != Some(cell.attrs) {
        // Attribute reset also drops colors.
        queue!(out, SetAttribute(Attribute::Reset))?;
        for attr in attributes(cell.attrs) {
            queue!(out, SetAttribute(attr))?;
        }
        style.attrs = Some(cell.attrs);
        style.fg = None;
        style.bg = None;
    }
    if style.fg != Some(cell.fg) {
        queue!(out, SetForegroundColor(to_color(cell.fg)))?;
        style.fg = Some(cell.fg);
    }
    if style.bg != Some(cell.bg) {
        queue!(out, SetBackgroundColor(to_color(cell.bg)))?;
        style.bg = Some(cell.bg);
    }

    let ch = char::from_u32(cell.char).unwrap_or(' ');
    queue!(out, Print(ch))?;

    let advance = crate::layout::char_width(ch).max(1);
    style.cursor = Some((x.saturating_add(advance), y));
    Ok(())
}

fn to_color(c: Rgba) -> Color {
    if c.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: c.r.clamp(0, 255) as u8,
            g: c.g.clamp(0, 255) as u8,
            b: c.b.clamp(0, 255) as u8,
        }
    }
}

fn attributes(attrs: Attr) -> Vec<Attribute> {
    let mut out = Vec::new();
    if attrs.contains(Attr::BOLD) {
        out.push(Attribute::Bold);
    }
    if attrs.contains(Attr::DIM) {
        out.push(Attribute::Dim);
    }
    if attrs.contains(Attr::ITALIC) {
        out.push(Attribute::Italic);
    }
    if attrs.contains(Attr::UNDERLINE) {
        out.push(Attribute::Underlined);
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
