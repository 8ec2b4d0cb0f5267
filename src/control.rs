//! Control surface - the page's single sparkle instance.
//!
//! [`SparkleHost`] holds at most one [`SparkleEffect`], created when the
//! document becomes ready and released on teardown. The four control
//! functions act on that instance and quietly do nothing before it exists.
//!
//! # Example
//!
//! ```
//! use sparkle_tui::control::{SparkleHost, set_sparkle_intensity, toggle_sparkles};
//! use sparkle_tui::document::Document;
//!
//! let mut doc = Document::new();
//! let mut host = SparkleHost::new();
//!
//! // Nothing to control yet.
//! toggle_sparkles(&mut host);
//!
//! host.on_document_ready(&mut doc);
//! set_sparkle_intensity(&mut host, 10);
//! assert_eq!(host.effect().unwrap().config().tick_interval_ms, 200);
//! ```

use crate::config::{clamp_intensity, intensity_patch, SparkleConfig};
use crate::document::Document;
use crate::scheduler::SparkleEffect;

// =============================================================================
// SparkleHost
// =============================================================================

/// Owner of the one sparkle instance.
#[derive(Default)]
pub struct SparkleHost {
    effect: Option<SparkleEffect>,
    /// Torn-down instances whose particles have not all expired yet.
    retired: Vec<SparkleEffect>,
}

impl SparkleHost {
    pub fn new() -> Self {
        Self {
            effect: None,
            retired: Vec::new(),
        }
    }

    /// Create and initialize the instance with [`SparkleConfig::page`].
    ///
    /// Only the first call does anything.
    pub fn on_document_ready(&mut self, doc: &mut Document) {
        self.install(doc, SparkleConfig::page());
    }

    /// Create and initialize the instance with `config`.
    ///
    /// Returns false if an instance already exists.
    pub fn install(&mut self, doc: &mut Document, config: SparkleConfig) -> bool {
        self.install_effect(doc, SparkleEffect::new(config))
    }

    /// Adopt a prepared (e.g. deterministically seeded) effect and
    /// initialize it. Returns false if an instance already exists.
    pub fn install_effect(&mut self, doc: &mut Document, mut effect: SparkleEffect) -> bool {
        if self.effect.is_some() {
            return false;
        }
        effect.initialize(doc);
        self.effect = Some(effect);
        true
    }

    /// Destroy and release the instance.
    ///
    /// Particles still on screen keep their expiry timers: the destroyed
    /// instance is pumped by [`advance`](Self::advance) until they are gone.
    pub fn teardown(&mut self) {
        if let Some(mut effect) = self.effect.take() {
            effect.destroy();
            if effect.live_particles() > 0 {
                self.retired.push(effect);
            }
        }
    }

    pub fn is_installed(&self) -> bool {
        self.effect.is_some()
    }

    pub fn effect(&self) -> Option<&SparkleEffect> {
        self.effect.as_ref()
    }

    pub fn effect_mut(&mut self) -> Option<&mut SparkleEffect> {
        self.effect.as_mut()
    }

    /// Pump the instance's clock, and drain torn-down instances.
    pub fn advance(&mut self, doc: &mut Document, ms: u64) {
        if let Some(effect) = self.effect.as_mut() {
            effect.advance(doc, ms);
        }
        for effect in &mut self.retired {
            effect.advance(doc, ms);
        }
        self.retired.retain(|effect| effect.live_particles() > 0);
    }

    /// Torn-down instances still waiting on particle expiry.
    pub fn draining(&self) -> usize {
        self.retired.len()
    }
}

// =============================================================================
// Control Functions
// =============================================================================

/// Turn the master switch on and start generating.
pub fn enable_sparkles(host: &mut SparkleHost) {
    if let Some(effect) = host.effect_mut() {
        effect.set_enabled(true);
        effect.start();
    }
}

/// Stop generating and turn the master switch off.
pub fn disable_sparkles(host: &mut SparkleHost) {
    if let Some(effect) = host.effect_mut() {
        effect.stop();
        effect.set_enabled(false);
    }
}

/// Stop if running, start otherwise.
pub fn toggle_sparkles(host: &mut SparkleHost) {
    if let Some(effect) = host.effect_mut() {
        effect.toggle();
    }
}

/// Set density on a 1-10 scale (clamped).
pub fn set_sparkle_intensity(host: &mut SparkleHost, level: i32) {
    if let Some(effect) = host.effect_mut() {
        let level = clamp_intensity(level);
        effect.update_configuration(&intensity_patch(level));
        tracing::info!(target: "sparkle", level, "sparkle intensity set");
    }
}

// =============================================================================
// Tests
// =============================================================================
