//! Sparkle configuration.
//!
//! [`SparkleConfig`] carries every tunable of the effect with the stock
//! defaults. [`ConfigPatch`] is a partial update merged in by
//! `SparkleEffect::update_configuration`, and [`intensity_patch`] turns a
//! 1-10 density level into such a patch.

// =============================================================================
// Defaults
// =============================================================================

/// Particles spawned per tick.
pub const DEFAULT_BURST_SIZE: u32 = 3;

/// Milliseconds between bursts for a single target.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 800;

/// Milliseconds a particle lives before it is removed.
pub const DEFAULT_PARTICLE_LIFETIME_MS: u64 = 2000;

/// Milliseconds to wait before the first burst.
pub const DEFAULT_START_DELAY_MS: u64 = 2000;

/// Glyph pool used when nothing else is configured.
pub const DEFAULT_GLYPHS: [char; 5] = ['✦', '✧', '★', '✨', '⋆'];

/// Glyph pool of the page preset (no solid star).
pub const PAGE_GLYPHS: [char; 4] = ['✦', '✧', '⋆', '✨'];

/// Size classes, smallest first.
pub const DEFAULT_SIZES: [&str; 3] = ["small", "medium", "large"];

/// Lowest and highest accepted intensity level.
pub const MIN_INTENSITY: i32 = 1;
pub const MAX_INTENSITY: i32 = 10;

// =============================================================================
// SparkleConfig
// =============================================================================

/// Tunables of the sparkle effect.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkleConfig {
    /// Particles spawned per tick.
    pub burst_size: u32,
    /// Milliseconds between bursts for the first target. Later targets add
    /// a 200 ms stagger per index.
    pub tick_interval_ms: u64,
    /// Glyph pool; one is chosen uniformly per particle.
    pub glyphs: Vec<char>,
    /// Milliseconds until a particle is removed.
    pub particle_lifetime_ms: u64,
    /// Size class pool; one is chosen uniformly per particle.
    pub sizes: Vec<String>,
    /// Master switch. `start()` does nothing while false.
    pub enabled: bool,
    /// Delay before the first burst, on top of the intro duration when an
    /// intro overlay is present.
    pub start_delay_ms: u64,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            burst_size: DEFAULT_BURST_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            glyphs: DEFAULT_GLYPHS.to_vec(),
            particle_lifetime_ms: DEFAULT_PARTICLE_LIFETIME_MS,
            sizes: DEFAULT_SIZES.iter().map(|s| s.to_string()).collect(),
            enabled: true,
            start_delay_ms: DEFAULT_START_DELAY_MS,
        }
    }
}

impl SparkleConfig {
    /// The configuration installed when the page becomes ready.
    pub fn page() -> Self {
        Self {
            glyphs: PAGE_GLYPHS.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_burst_size(mut self, burst_size: u32) -> Self {
        self.burst_size = burst_size;
        self
    }

    pub fn with_tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Replace the glyph pool. An empty pool is ignored.
    pub fn with_glyphs(mut self, glyphs: impl IntoIterator<Item = char>) -> Self {
        let glyphs: Vec<char> = glyphs.into_iter().collect();
        if !glyphs.is_empty() {
            self.glyphs = glyphs;
        }
        self
    }

    pub fn with_particle_lifetime(mut self, ms: u64) -> Self {
        self.particle_lifetime_ms = ms;
        self
    }

    /// Replace the size class pool. An empty pool is ignored.
    pub fn with_sizes<S: Into<String>>(mut self, sizes: impl IntoIterator<Item = S>) -> Self {
        let sizes: Vec<String> = sizes.into_iter().map(Into::into).collect();
        if !sizes.is_empty() {
            self.sizes = sizes;
        }
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_start_delay(mut self, ms: u64) -> Self {
        self.start_delay_ms = ms;
        self
    }

    /// Merge every field set in `patch`.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.burst_size {
            self.burst_size = v;
        }
        if let Some(v) = patch.tick_interval_ms {
            self.tick_interval_ms = v;
        }
        if let Some(v) = &patch.glyphs {
            if !v.is_empty() {
                self.glyphs = v.clone();
            }
        }
        if let Some(v) = patch.particle_lifetime_ms {
            self.particle_lifetime_ms = v;
        }
        if let Some(v) = &patch.sizes {
            if !v.is_empty() {
                self.sizes = v.clone();
            }
        }
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.start_delay_ms {
            self.start_delay_ms = v;
        }
    }
}

// =============================================================================
// ConfigPatch
// =============================================================================

/// A partial configuration update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub burst_size: Option<u32>,
    pub tick_interval_ms: Option<u64>,
    pub glyphs: Option<Vec<char>>,
    pub particle_lifetime_ms: Option<u64>,
    pub sizes: Option<Vec<String>>,
    pub enabled: Option<bool>,
    pub start_delay_ms: Option<u64>,
}

impl ConfigPatch {
    pub fn burst_size(mut self, v: u32) -> Self {
        self.burst_size = Some(v);
        self
    }

    pub fn tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = Some(ms);
        self
    }

    pub fn glyphs(mut self, glyphs: Vec<char>) -> Self {
        self.glyphs = Some(glyphs);
        self
    }

    pub fn particle_lifetime(mut self, ms: u64) -> Self {
        self.particle_lifetime_ms = Some(ms);
        self
    }

    pub fn sizes(mut self, sizes: Vec<String>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn enabled(mut self, v: bool) -> Self {
        self.enabled = Some(v);
        self
    }

    pub fn start_delay(mut self, ms: u64) -> Self {
        self.start_delay_ms = Some(ms);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Intensity
// =============================================================================

/// Clamp a density level into `[MIN_INTENSITY, MAX_INTENSITY]`.
#[inline]
pub fn clamp_intensity(level: i32) -> i32 {
    level.clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// Patch for a density level: burst size `ceil(level / 3)`, tick interval
/// `1200 - 100 * level` ms. The level is clamped first.
///
/// # Example
///
/// ```
/// use sparkle_tui::config::intensity_patch;
///
/// let patch = intensity_patch(10);
/// assert_eq!(patch.burst_size, Some(4));
/// assert_eq!(patch.tick_interval_ms, Some(200));
/// ```
pub fn intensity_patch(level: i32) -> ConfigPatch {
    let level = clamp_intensity(level);
    ConfigPatch::default()
        .burst_size(((level + 2) / 3) as u32)
        .tick_interval((1200 - 100 * level) as u64)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let config = SparkleConfig::default();
        assert_eq!(config.burst_size, 3);
        assert_eq!(config.tick_interval_ms, 800);
        assert_eq!(config.glyphs.len(), 5);
        assert_eq!(config.particle_lifetime_ms, 2000);
        assert_eq!(config.sizes, vec!["small", "medium", "large"]);
        assert!(config.enabled);
        assert_eq!(config.start_delay_ms, 2000);
    }

    #[test]
    fn test_page_preset_glyphs() {
        let config = SparkleConfig::page();
        assert_eq!(config.glyphs, vec!['✦', '✧', '⋆', '✨']);
        assert_eq!(config.burst_size, DEFAULT_BURST_SIZE);
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut config = SparkleConfig::default();
        config.apply(&ConfigPatch::default().tick_interval(500).enabled(false));

        assert_eq!(config.tick_interval_ms, 500);
        assert!(!config.enabled);
        assert_eq!(config.burst_size, 3);
        assert_eq!(config.particle_lifetime_ms, 2000);
    }

    #[test]
    fn test_apply_ignores_empty_pools() {
        let mut config = SparkleConfig::default();
        config.apply(&ConfigPatch::default().glyphs(vec![]).sizes(vec![]));
        assert_eq!(config.glyphs.len(), 5);
        assert_eq!(config.sizes.len(), 3);

        let config = SparkleConfig::default().with_glyphs(Vec::<char>::new()).with_sizes(Vec::<String>::new());
        assert_eq!(config.glyphs.len(), 5);
        assert_eq!(config.sizes.len(), 3);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ConfigPatch::default().is_empty());
        assert!(!ConfigPatch::default().burst_size(1).is_empty());
    }

    #[test]
    fn test_intensity_examples() {
        let cases = [(1, 1, 1100), (3, 1, 900), (4, 2, 800), (5, 2, 700), (10, 4, 200)];
        for (level, burst, interval) in cases {
            let patch = intensity_patch(level);
            assert_eq!(patch.burst_size, Some(burst), "level {}", level);
            assert_eq!(patch.tick_interval_ms, Some(interval), "level {}", level);
        }
    }

    #[test]
    fn test_intensity_clamps() {
        assert_eq!(intensity_patch(0), intensity_patch(1));
        assert_eq!(intensity_patch(-7), intensity_patch(1));
        assert_eq!(intensity_patch(42), intensity_patch(10));
    }

    proptest! {
        #[test]
        fn prop_intensity_matches_formula(level in -100i32..100) {
            let clamped = level.clamp(1, 10);
            let patch = intensity_patch(level);
            let expected_burst = (clamped as f64 / 3.0).ceil() as u32;
            prop_assert_eq!(patch.burst_size, Some(expected_burst));
            prop_assert_eq!(patch.tick_interval_ms, Some((1200 - 100 * clamped) as u64));
            prop_assert!(patch.tick_interval_ms.unwrap() >= 200);
        }
    }
}
