//! Terminal renderer.
//!
//! - [`FrameBuffer`] - the cell grid for one frame
//! - [`paint`] - rasterize a document (text, particles, intro doors)
//! - [`DiffRenderer`] - emit only changed cells through crossterm

mod buffer;
mod diff;
mod paint;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
pub use paint::paint;
