//! Page layout.
//!
//! Text elements are stacked as centered lines on the terminal grid, one
//! blank row apart, and given pixel boxes through [`CellMetrics`]. Wrapper
//! containers then take the box of the element they wrap, so particles
//! mounted in a wrapper move with their text on resize.
//!
//! # Example
//!
//! ```
//! use sparkle_tui::document::{Document, Element};
//! use sparkle_tui::layout::layout_page;
//! use sparkle_tui::CellMetrics;
//!
//! let mut doc = Document::new();
//! let line = doc.create_element(Element::new("h1").with_text("hello"));
//! let body = doc.root();
//! doc.append_child(body, line);
//!
//! layout_page(&mut doc, 15, 3, CellMetrics::default());
//! let rect = doc.bounding_rect(line).unwrap();
//! assert_eq!((rect.x, rect.y, rect.width), (40.0, 16.0, 40.0));
//! ```

mod text_measure;

pub use text_measure::*;

use crate::document::{CONTAINER_CLASS, Document, ElementId};
use crate::types::CellMetrics;

/// Rows left empty between two lines.
pub const LINE_GAP: u16 = 1;

/// Text elements laid out as page lines, in document order.
pub fn text_lines(doc: &Document) -> Vec<ElementId> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&id| {
            doc.get(id)
                .is_some_and(|e| e.text.is_some() && e.particle.is_none())
        })
        .collect()
}

/// Center every text line on a `cols × rows` grid and size wrappers.
///
/// Lines wider than the grid are laid out at full width; the painter
/// truncates them.
pub fn layout_page(doc: &mut Document, cols: u16, rows: u16, metrics: CellMetrics) {
    let lines = text_lines(doc);
    if lines.is_empty() {
        return;
    }

    let count = lines.len() as u16;
    let block_height = count + LINE_GAP * count.saturating_sub(1);
    let mut row = rows.saturating_sub(block_height) / 2;

    for &line in &lines {
        let width = doc
            .get(line)
            .and_then(|e| e.text.as_deref())
            .map(string_width)
            .unwrap_or(0)
            .min(cols);
        let col = cols.saturating_sub(width) / 2;

        doc.set_rect(line, metrics.cells_to_rect(col, row, width, 1));
        row = row.saturating_add(1 + LINE_GAP);
    }

    for container in doc.query_by_class(CONTAINER_CLASS) {
        let inner = doc
            .children(container)
            .iter()
            .copied()
            .find(|&c| doc.get(c).is_some_and(|e| e.particle.is_none()));
        if let Some(rect) = inner.and_then(|c| doc.bounding_rect(c)) {
            doc.set_rect(container, rect);
        }
    }
}
