//! Page painter - document to FrameBuffer.
//!
//! Draw order: intro doors, text lines, then particles. Particles never
//! paint over a text glyph, and are skipped while nearly transparent.

use crate::document::{Document, INTRO_DURATION_MS, INTRO_OVERLAY_ID, PARTICLE_CLASS, TARGET_CLASS};
use crate::layout::{text_lines, truncate_text};
use crate::types::{Attr, CellMetrics, Point, Rgba};

use super::buffer::FrameBuffer;

/// Particles below this opacity are not drawn.
const MIN_VISIBLE_OPACITY: f32 = 0.05;

/// Paint the document as it looks at logical time `now`.
pub fn paint(doc: &Document, now: u64, metrics: CellMetrics, buf: &mut FrameBuffer) {
    buf.clear();
    paint_text(doc, metrics, buf);
    paint_particles(doc, now, metrics, buf);
    paint_intro(doc, now, buf);
}

fn paint_text(doc: &Document, metrics: CellMetrics, buf: &mut FrameBuffer) {
    for line in text_lines(doc) {
        let Some(element) = doc.get(line) else {
            continue;
        };
        let Some(text) = element.text.as_deref() else {
            continue;
        };
        let Some((col, row)) = metrics.to_cell(element.rect.origin()) else {
            continue;
        };

        let (fg, attrs) = if element.has_class(TARGET_CLASS) {
            (Rgba::GOLD, Attr::BOLD)
        } else {
            (Rgba::TERMINAL_DEFAULT, Attr::NONE)
        };
        let text = truncate_text(text, buf.width().saturating_sub(col));
        buf.draw_text(col, row, &text, fg, attrs);
    }
}

fn paint_particles(doc: &Document, now: u64, metrics: CellMetrics, buf: &mut FrameBuffer) {
    for id in doc.query_by_class(PARTICLE_CLASS) {
        let Some(particle) = doc.get(id).and_then(|e| e.particle.as_ref()) else {
            continue;
        };
        let origin = doc
            .parent(id)
            .and_then(|p| doc.bounding_rect(p))
            .map(|r| r.origin())
            .unwrap_or(Point::ZERO);

        let frame = particle.frame(now);
        if frame.opacity < MIN_VISIBLE_OPACITY {
            continue;
        }

        let at = Point::new(origin.x + frame.position.x, origin.y + frame.position.y);
        let Some((col, row)) = metrics.to_cell(at) else {
            continue;
        };
        let occupied = buf
            .get(col, row)
            .is_some_and(|c| c.char != b' ' as u32);
        if occupied {
            continue;
        }

        let fg = Rgba::lerp(Rgba::DEEP_GOLD.dim(0.6), Rgba::PALE_GOLD, frame.opacity);
        buf.draw_glyph(col, row, particle.glyph, fg, frame.attrs);
    }
}

/// Two door panels sliding apart over the intro duration.
fn paint_intro(doc: &Document, now: u64, buf: &mut FrameBuffer) {
    if now >= INTRO_DURATION_MS || doc.get_element_by_id(INTRO_OVERLAY_ID).is_none() {
        return;
    }
    let remaining = 1.0 - now as f32 / INTRO_DURATION_MS as f32;
    let half = buf.width() / 2;
    let panel = (half as f32 * remaining).ceil() as u16;
    let height = buf.height();

    buf.fill_rect(0, 0, panel, height, Rgba::DEEP_GOLD);
    buf.fill_rect(buf.width() - panel, 0, panel, height, Rgba::DEEP_GOLD);
}
