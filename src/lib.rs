//! # sparkle-tui
//!
//! Gold sparkle particles around terminal text.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): the
//! scheduler's active flag and live particle count are signals, so a UI can
//! react to them.
//!
//! ## Architecture
//!
//! Elements marked `gold-sparkle` are wrapped in a container; each target
//! gets a repeating burst timer; each burst spawns a few particles on the
//! target's edges; each particle removes itself after its lifetime.
//!
//! ```text
//! Document ─▶ SparkleEffect (TimerQueue) ─▶ particles in Document ─▶ paint ─▶ DiffRenderer
//! ```
//!
//! Everything is single-threaded and driven by a logical millisecond clock.
//! Tests step it directly; the `sparkle` binary feeds it wall-clock time.
//!
//! ## Modules
//!
//! - [`types`] - Colors, cells, geometry
//! - [`config`] - Tunables, partial updates, intensity levels
//! - [`timer`] - Logical-time timer queue
//! - [`document`] - Element tree and selector contract
//! - [`layout`] - Text measurement and page layout
//! - [`particle`] - Placement, drift, keyframes
//! - [`scheduler`] - The sparkle scheduler
//! - [`control`] - Single-instance host and control functions
//! - [`renderer`] - Frame buffer, painter, terminal output

pub mod config;
pub mod control;
pub mod document;
pub mod layout;
pub mod particle;
pub mod renderer;
pub mod scheduler;
pub mod timer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{intensity_patch, ConfigPatch, SparkleConfig};

pub use control::{
    disable_sparkles, enable_sparkles, set_sparkle_intensity, toggle_sparkles, SparkleHost,
};

pub use document::{Document, Element, ElementId};

pub use layout::{layout_page, string_width};

pub use particle::{Edge, Particle, ParticleFrame};

pub use renderer::{paint, DiffRenderer, FrameBuffer};

pub use scheduler::SparkleEffect;

pub use timer::{FrameClock, TimerId, TimerQueue};
