//! End-to-end scheduling scenarios on a logical clock.
//!
//! Every test drives a seeded scheduler through the public API and checks
//! timer bookkeeping and particle counts at exact millisecond boundaries.
//!
//! Run with: cargo test --test scheduling

use rand::SeedableRng;
use rand::rngs::StdRng;

use sparkle_tui::document::{CONTAINER_CLASS, INTRO_OVERLAY_ID, PARTICLE_CLASS, TARGET_CLASS};
use sparkle_tui::{
    disable_sparkles, enable_sparkles, set_sparkle_intensity, toggle_sparkles, Document, Element,
    ElementId, Rect, SparkleConfig, SparkleEffect, SparkleHost,
};

// =============================================================================
// HELPERS
// =============================================================================

/// A page with `n` sparkle targets, each 10 cells wide and one row tall.
fn page(n: usize) -> (Document, Vec<ElementId>) {
    let mut doc = Document::new();
    let body = doc.root();
    let mut ids = Vec::new();
    for i in 0..n {
        let id = doc.create_element(
            Element::new("h1")
                .with_class(TARGET_CLASS)
                .with_text(format!("line {i}"))
                .with_rect(Rect::new(0.0, i as f32 * 32.0, 80.0, 16.0)),
        );
        doc.append_child(body, id);
        ids.push(id);
    }
    (doc, ids)
}

fn effect(config: SparkleConfig) -> SparkleEffect {
    SparkleEffect::with_rng(config, StdRng::seed_from_u64(7))
}

fn immediate() -> SparkleConfig {
    SparkleConfig::default().with_start_delay(0)
}

// =============================================================================
// START / STOP
// =============================================================================

#[test]
fn two_targets_burst_immediately_with_staggered_periods() {
    let (mut doc, ids) = page(2);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);

    fx.advance_to(&mut doc, 0);
    assert!(fx.is_active());
    assert_eq!(fx.live_particles(), 2);

    fx.advance_to(&mut doc, 149);
    assert_eq!(fx.live_particles(), 2);
    fx.advance_to(&mut doc, 300);
    assert_eq!(fx.live_particles(), 6);
    assert_eq!(doc.count_by_class(PARTICLE_CLASS), 6);

    assert_eq!(fx.tick_period(ids[0]), Some(800));
    assert_eq!(fx.tick_period(ids[1]), Some(1000));

    // First repeat for target 0 only.
    fx.advance_to(&mut doc, 800);
    assert_eq!(fx.live_particles(), 7);
    fx.advance_to(&mut doc, 1000);
    assert_eq!(fx.live_particles(), 9);
}

#[test]
fn double_start_is_idempotent() {
    let (mut doc, _) = page(2);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);
    fx.advance_to(&mut doc, 0);

    fx.start();
    fx.advance(&mut doc, 0);

    assert_eq!(fx.active_timer_count(), 2);
    assert_eq!(fx.scheduled_intervals(), 2);
    assert_eq!(fx.live_particles(), 2);
}

#[test]
fn double_stop_leaves_no_timers() {
    let (mut doc, _) = page(2);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);
    fx.advance_to(&mut doc, 300);

    fx.stop();
    fx.stop();
    assert!(!fx.is_active());
    assert_eq!(fx.active_timer_count(), 0);
    assert_eq!(fx.scheduled_intervals(), 0);

    // Live particles still run out their lifetime.
    assert_eq!(fx.live_particles(), 6);
    fx.advance_to(&mut doc, 2300);
    assert_eq!(fx.live_particles(), 0);
    assert_eq!(doc.count_by_class(PARTICLE_CLASS), 0);
}

#[test]
fn toggle_flips_active_signal() {
    let (mut doc, _) = page(1);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);
    fx.advance_to(&mut doc, 0);

    let active = fx.active_signal();
    assert!(active.get());
    fx.toggle();
    assert!(!active.get());
    fx.toggle();
    assert!(active.get());
    assert_eq!(fx.active_timer_count(), 1);
}

// =============================================================================
// INITIALIZE
// =============================================================================

#[test]
fn repeated_initialize_wraps_each_target_once() {
    let (mut doc, _) = page(2);
    let mut fx = effect(immediate());
    for _ in 0..3 {
        fx.initialize(&mut doc);
    }
    assert_eq!(doc.count_by_class(CONTAINER_CLASS), 2);
    assert_eq!(fx.targets().len(), 2);

    fx.advance_to(&mut doc, 0);
    assert_eq!(fx.active_timer_count(), 2);
    assert_eq!(fx.scheduled_intervals(), 2);
}

#[test]
fn intro_overlay_delays_start() {
    let (mut doc, _) = page(1);
    let overlay = doc.create_element(Element::new("div").with_id(INTRO_OVERLAY_ID));
    let body = doc.root();
    doc.append_child(body, overlay);

    let mut fx = effect(SparkleConfig::default());
    fx.initialize(&mut doc);

    fx.advance_to(&mut doc, 3999);
    assert!(!fx.is_active());
    assert!(fx.pending_start());
    fx.advance_to(&mut doc, 4000);
    assert!(fx.is_active());
}

#[test]
fn no_targets_schedules_nothing() {
    let mut doc = Document::new();
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);

    assert!(!fx.pending_start());
    fx.advance(&mut doc, 5000);
    assert!(!fx.is_active());
    assert_eq!(fx.next_deadline(), None);
}

// =============================================================================
// PARTICLES
// =============================================================================

#[test]
fn particle_lifetime_is_exact() {
    let (mut doc, _) = page(1);
    let config = immediate().with_burst_size(1).with_tick_interval(10_000);
    let mut fx = effect(config);
    fx.initialize(&mut doc);

    fx.advance_to(&mut doc, 0);
    let particle = doc.query_by_class(PARTICLE_CLASS)[0];

    fx.advance_to(&mut doc, 1999);
    assert!(doc.contains(particle));
    assert_eq!(fx.live_particles(), 1);

    fx.advance_to(&mut doc, 2000);
    assert!(!doc.contains(particle));
    assert_eq!(fx.live_particles(), 0);
}

#[test]
fn particles_mount_inside_wrapper() {
    let (mut doc, ids) = page(1);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);
    fx.advance_to(&mut doc, 300);

    let wrapper = doc.parent(ids[0]).unwrap();
    assert!(doc.has_class(wrapper, CONTAINER_CLASS));
    for particle in doc.query_by_class(PARTICLE_CLASS) {
        assert_eq!(doc.parent(particle), Some(wrapper));
        let element = doc.get(particle).unwrap();
        let glyph = element.particle.as_ref().unwrap().glyph;
        assert!(fx.config().glyphs.contains(&glyph));
    }
}

#[test]
fn detached_target_stops_receiving_particles() {
    let (mut doc, ids) = page(1);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);
    fx.advance_to(&mut doc, 300);
    assert_eq!(fx.live_particles(), 3);

    doc.remove(ids[0]);
    fx.advance_to(&mut doc, 5000);

    // Interval keeps ticking, but bursts are skipped.
    assert!(fx.is_active());
    assert_eq!(fx.live_particles(), 0);
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn update_configuration_restarts_after_settle() {
    let (mut doc, ids) = page(2);
    let mut fx = effect(immediate());
    fx.initialize(&mut doc);
    fx.advance_to(&mut doc, 300);

    fx.update_configuration(&sparkle_tui::ConfigPatch::default().tick_interval(500));
    assert!(!fx.is_active());
    assert!(fx.pending_start());

    fx.advance(&mut doc, 99);
    assert!(!fx.is_active());
    fx.advance(&mut doc, 1);
    assert!(fx.is_active());

    assert_eq!(fx.tick_period(ids[0]), Some(500));
    assert_eq!(fx.tick_period(ids[1]), Some(700));
    assert_eq!(fx.scheduled_intervals(), 2);
}

#[test]
fn update_configuration_while_stopped_only_merges() {
    let (mut doc, _) = page(1);
    let mut fx = effect(immediate().with_start_delay(1000));
    fx.initialize(&mut doc);

    fx.update_configuration(&sparkle_tui::ConfigPatch::default().burst_size(5));
    assert_eq!(fx.config().burst_size, 5);
    assert!(!fx.is_active());

    fx.advance_to(&mut doc, 1000);
    assert!(fx.is_active());
    assert_eq!(fx.live_particles(), 1);
}

#[test]
fn disabled_config_never_starts() {
    let (mut doc, _) = page(1);
    let mut fx = effect(immediate().with_enabled(false));
    fx.initialize(&mut doc);
    fx.advance(&mut doc, 1000);
    assert!(!fx.is_active());
    assert_eq!(fx.live_particles(), 0);
}

#[test]
fn destroy_cancels_pending_start() {
    let (mut doc, _) = page(1);
    let mut fx = effect(SparkleConfig::default());
    fx.initialize(&mut doc);

    fx.destroy();
    fx.advance(&mut doc, 10_000);
    assert!(!fx.is_active());
    assert!(fx.targets().is_empty());
    assert_eq!(doc.count_by_class(CONTAINER_CLASS), 1);
}

// =============================================================================
// CONTROL SURFACE
// =============================================================================

fn hosted(config: SparkleConfig) -> (Document, SparkleHost) {
    let (mut doc, _) = page(2);
    let mut host = SparkleHost::new();
    assert!(host.install_effect(&mut doc, effect(config)));
    (doc, host)
}

#[test]
fn intensity_levels_map_and_clamp() {
    let (mut doc, mut host) = hosted(immediate());
    host.advance(&mut doc, 0);

    let cases = [(15, 4, 200), (10, 4, 200), (5, 2, 700), (1, 1, 1100), (-3, 1, 1100)];
    for (level, burst, interval) in cases {
        set_sparkle_intensity(&mut host, level);
        let config = host.effect().unwrap().config();
        assert_eq!(config.burst_size, burst, "level {level}");
        assert_eq!(config.tick_interval_ms, interval, "level {level}");
    }

    host.advance(&mut doc, 100);
    let fx = host.effect().unwrap();
    assert!(fx.is_active());
    assert_eq!(fx.scheduled_intervals(), 2);
}

#[test]
fn control_functions_before_install_are_noops() {
    let mut doc = Document::new();
    let mut host = SparkleHost::new();
    enable_sparkles(&mut host);
    disable_sparkles(&mut host);
    toggle_sparkles(&mut host);
    set_sparkle_intensity(&mut host, 5);
    host.advance(&mut doc, 1000);
    assert!(!host.is_installed());
}

#[test]
fn disable_then_enable_round_trip() {
    let (mut doc, mut host) = hosted(immediate());
    host.advance(&mut doc, 0);

    disable_sparkles(&mut host);
    assert!(!host.effect().unwrap().is_active());
    // Toggling cannot start while the master switch is off.
    toggle_sparkles(&mut host);
    assert!(!host.effect().unwrap().is_active());

    enable_sparkles(&mut host);
    let fx = host.effect().unwrap();
    assert!(fx.is_active());
    assert!(fx.config().enabled);
    assert_eq!(fx.scheduled_intervals(), 2);
}

#[test]
fn second_install_is_rejected() {
    let (mut doc, mut host) = hosted(immediate());
    host.on_document_ready(&mut doc);
    assert!(!host.install(&mut doc, SparkleConfig::default()));
    assert_eq!(doc.count_by_class(CONTAINER_CLASS), 2);

    host.teardown();
    assert!(!host.is_installed());
}
