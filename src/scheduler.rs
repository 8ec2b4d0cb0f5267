//! Sparkle Scheduler - per-target particle generation.
//!
//! Owns the target set, one repeating burst timer per target, and the
//! one-shot timers that spawn and expire individual particles.
//!
//! # Lifecycle
//!
//! ```text
//! initialize ──(start delay [+ intro])──▶ start ──▶ burst ticks ──▶ spawn ──(lifetime)──▶ expire
//!                                           ▲  │
//!                              toggle/enable│  │stop/disable/destroy
//!                                           │  ▼
//!                                          stopped  (live particles still expire)
//! ```
//!
//! All work runs inside [`SparkleEffect::advance`], which pumps the logical
//! clock and applies due tasks to the document. Nothing here can fail: a
//! missing target or particle is a silent no-op.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sparkle_tui::document::{Document, Element, TARGET_CLASS};
//! use sparkle_tui::scheduler::SparkleEffect;
//! use sparkle_tui::{Rect, SparkleConfig};
//!
//! let mut doc = Document::new();
//! let title = doc.create_element(
//!     Element::new("h1").with_class(TARGET_CLASS).with_rect(Rect::new(0.0, 0.0, 80.0, 16.0)),
//! );
//! let body = doc.root();
//! doc.append_child(body, title);
//!
//! let config = SparkleConfig::default().with_start_delay(0);
//! let mut effect = SparkleEffect::with_rng(config, StdRng::seed_from_u64(1));
//! effect.initialize(&mut doc);
//! effect.advance(&mut doc, 300);
//!
//! assert!(effect.is_active());
//! assert_eq!(effect.live_particles(), 3);
//! ```

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spark_signals::{signal, Signal};

use crate::config::{ConfigPatch, SparkleConfig};
use crate::document::{
    Document, Element, ElementId, CONTAINER_CLASS, INTRO_DURATION_MS, INTRO_OVERLAY_ID,
    PARTICLE_CLASS, TARGET_CLASS,
};
use crate::particle::Particle;
use crate::timer::{TimerId, TimerQueue};

/// Extra period added per target index so bursts don't line up.
pub const TARGET_STAGGER_MS: u64 = 200;

/// Delay between particles of one burst.
pub const PARTICLE_STAGGER_MS: u64 = 150;

/// Pause between stop and start when a config update restarts generation.
pub const RESTART_SETTLE_MS: u64 = 100;

// =============================================================================
// Tasks
// =============================================================================

/// Work carried by a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Deferred start after initialize.
    Start,
    /// Start again after a config update.
    Restart,
    /// Repeating burst tick for a target.
    Burst(ElementId),
    /// One staggered particle of a burst.
    Spawn(ElementId),
    /// End of a particle's life.
    Expire(ElementId),
}

// =============================================================================
// SparkleEffect
// =============================================================================

/// The sparkle scheduler.
pub struct SparkleEffect<R: Rng = StdRng> {
    config: SparkleConfig,
    targets: Vec<ElementId>,
    /// Target → its repeating burst timer. At most one entry per target.
    intervals: HashMap<ElementId, TimerId>,
    timers: TimerQueue<Task>,
    /// Pending deferred start or settle-restart.
    pending_start: Option<TimerId>,
    active: Signal<bool>,
    particle_count: Signal<usize>,
    rng: R,
}

impl SparkleEffect<StdRng> {
    /// Create a scheduler with an entropy-seeded RNG.
    pub fn new(config: SparkleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> SparkleEffect<R> {
    /// Create a scheduler drawing randomness from `rng`.
    pub fn with_rng(config: SparkleConfig, rng: R) -> Self {
        Self {
            config,
            targets: Vec::new(),
            intervals: HashMap::new(),
            timers: TimerQueue::new(),
            pending_start: None,
            active: signal(false),
            particle_count: signal(0),
            rng,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Wrap every `.gold-sparkle` element and schedule the first start.
    ///
    /// The target list is rebuilt from scratch on every call; generation
    /// that is already running is stopped and a pending start is replaced.
    /// The start waits `start_delay_ms`, plus [`INTRO_DURATION_MS`] when the
    /// intro overlay is in the document.
    pub fn initialize(&mut self, doc: &mut Document) {
        if self.is_active() {
            self.stop();
        }
        self.cancel_pending_start();
        self.targets.clear();

        let found = doc.query_by_class(TARGET_CLASS);
        if found.is_empty() {
            tracing::warn!(target: "sparkle", "no .{} elements found", TARGET_CLASS);
            return;
        }

        for &target in &found {
            doc.wrap_element(target);
        }
        self.targets = found;

        let intro = doc.get_element_by_id(INTRO_OVERLAY_ID).is_some();
        let delay = if intro {
            INTRO_DURATION_MS + self.config.start_delay_ms
        } else {
            self.config.start_delay_ms
        };
        self.pending_start = Some(self.timers.set_timeout(delay, Task::Start));

        tracing::info!(
            target: "sparkle",
            targets = self.targets.len(),
            intro,
            delay_ms = delay,
            "sparkle effect initialized"
        );
    }

    /// Begin generation for every target.
    ///
    /// No-op while disabled or already active. Each target gets an immediate
    /// burst and a repeating timer at `tick_interval_ms + index × 200`.
    pub fn start(&mut self) {
        if !self.config.enabled || self.is_active() {
            return;
        }
        self.cancel_pending_start();
        self.active.set(true);

        let targets = self.targets.clone();
        for (index, target) in targets.into_iter().enumerate() {
            self.spawn_burst(target);

            let period = self.config.tick_interval_ms + index as u64 * TARGET_STAGGER_MS;
            let handle = self.timers.set_interval(period, Task::Burst(target));
            if let Some(previous) = self.intervals.insert(target, handle) {
                self.timers.clear(previous);
            }
        }

        tracing::info!(target: "sparkle", targets = self.targets.len(), "sparkles started");
    }

    /// Cancel every burst timer. Safe to call when already stopped.
    ///
    /// Particles already on screen keep their expiry timers.
    pub fn stop(&mut self) {
        let was_active = self.is_active();
        self.active.set(false);

        for (_, handle) in self.intervals.drain() {
            self.timers.clear(handle);
        }

        if was_active {
            tracing::info!(target: "sparkle", "sparkles stopped");
        }
    }

    /// Stop if active, start otherwise.
    pub fn toggle(&mut self) {
        if self.is_active() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Merge `patch` into the configuration.
    ///
    /// When active, generation stops now and starts again after
    /// [`RESTART_SETTLE_MS`] so new timing and density apply.
    pub fn update_configuration(&mut self, patch: &ConfigPatch) {
        self.config.apply(patch);

        if self.is_active() {
            self.stop();
            self.cancel_pending_start();
            self.pending_start = Some(self.timers.set_timeout(RESTART_SETTLE_MS, Task::Restart));
        }
    }

    /// Set the master switch without touching generation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Stop generation and forget the targets.
    ///
    /// Wrapper containers stay in the document. Live particles still expire.
    pub fn destroy(&mut self) {
        self.stop();
        self.cancel_pending_start();
        self.targets.clear();
        tracing::info!(target: "sparkle", "sparkle effect destroyed");
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Queue `burst_size` particles for `target`, 150 ms apart, the first
    /// one due immediately.
    pub fn spawn_burst(&mut self, target: ElementId) {
        for i in 0..self.config.burst_size as u64 {
            self.timers.set_timeout(i * PARTICLE_STAGGER_MS, Task::Spawn(target));
        }
    }

    /// Mount one particle into `target`'s wrapper and schedule its removal.
    ///
    /// Returns the particle element, or None when the target is gone from
    /// the document or a pool is empty.
    pub fn spawn_particle(&mut self, doc: &mut Document, target: ElementId) -> Option<ElementId> {
        if !doc.contains(target) {
            tracing::debug!(target: "sparkle", element = %target, "target detached, spawn skipped");
            return None;
        }
        let container = doc.parent(target)?;
        let rect = doc.bounding_rect(target)?;
        let now = self.timers.now();

        let particle = Particle::sample(
            &mut self.rng,
            &self.config.glyphs,
            &self.config.sizes,
            rect.width,
            rect.height,
            now,
            self.config.particle_lifetime_ms,
        )?;

        let size = particle.size.clone();
        let mut element = Element::new("span")
            .with_class(PARTICLE_CLASS)
            .with_text(particle.glyph.to_string());
        element.particle = Some(particle);

        let id = doc.create_element(element);
        doc.add_class(id, &size);
        doc.append_child(container, id);
        self.timers
            .set_timeout(self.config.particle_lifetime_ms, Task::Expire(id));
        self.particle_count.set(self.particle_count.get() + 1);

        if !doc.has_class(container, CONTAINER_CLASS) {
            tracing::debug!(target: "sparkle", element = %target, "target not wrapped, mounted on parent");
        }
        Some(id)
    }

    // =========================================================================
    // Event Loop
    // =========================================================================

    /// Move logical time forward by `ms`, running every task that falls due.
    pub fn advance(&mut self, doc: &mut Document, ms: u64) {
        let until = self.timers.now() + ms;
        while let Some((id, task)) = self.timers.pop_due(until) {
            self.dispatch(doc, id, task);
        }
        self.timers.advance_to(until);
    }

    /// Run tasks until nothing is due before `until`, then stop the clock there.
    pub fn advance_to(&mut self, doc: &mut Document, until: u64) {
        let now = self.timers.now();
        self.advance(doc, until.saturating_sub(now));
    }

    fn dispatch(&mut self, doc: &mut Document, id: TimerId, task: Task) {
        match task {
            Task::Start | Task::Restart => {
                if self.pending_start == Some(id) {
                    self.pending_start = None;
                }
                self.start();
            }
            Task::Burst(target) => {
                if doc.contains(target) {
                    self.spawn_burst(target);
                } else {
                    tracing::debug!(target: "sparkle", element = %target, "target detached, burst skipped");
                }
            }
            Task::Spawn(target) => {
                self.spawn_particle(doc, target);
            }
            Task::Expire(particle) => {
                // Detached subtrees still hold the particle; only a freed id is skipped.
                if doc.exists(particle) {
                    doc.remove(particle);
                }
                self.particle_count
                    .set(self.particle_count.get().saturating_sub(1));
            }
        }
    }

    fn cancel_pending_start(&mut self) {
        if let Some(handle) = self.pending_start.take() {
            self.timers.clear(handle);
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Reactive handle on the active flag.
    pub fn active_signal(&self) -> Signal<bool> {
        self.active.clone()
    }

    /// Particles spawned and not yet expired.
    pub fn live_particles(&self) -> usize {
        self.particle_count.get()
    }

    /// Reactive handle on the live particle count.
    pub fn particle_count_signal(&self) -> Signal<usize> {
        self.particle_count.clone()
    }

    pub fn config(&self) -> &SparkleConfig {
        &self.config
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    /// Number of targets with a running burst timer.
    pub fn active_timer_count(&self) -> usize {
        self.intervals.len()
    }

    /// Period of `target`'s burst timer, if running.
    pub fn tick_period(&self, target: ElementId) -> Option<u64> {
        self.intervals
            .get(&target)
            .and_then(|&handle| self.timers.period_of(handle))
    }

    /// Repeating timers actually scheduled in the queue.
    pub fn scheduled_intervals(&self) -> usize {
        self.timers.interval_count()
    }

    /// Whether a deferred start or settle-restart is waiting.
    pub fn pending_start(&self) -> bool {
        self.pending_start
            .is_some_and(|handle| self.timers.is_pending(handle))
    }

    /// Current logical time in ms.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// Next time anything is due, for drivers that sleep between frames.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }
}

// =============================================================================
// Tests
// =============================================================================
