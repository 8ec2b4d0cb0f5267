//! Particles - placement, drift and keyframes.
//!
//! A particle is spawned on one of the four edges of its target's box,
//! drifts a little sideways and always upward, and is removed when its
//! lifetime ends. Placement is relative to the wrapper container, whose box
//! coincides with the target's.
//!
//! [`ParticleFrame`] is the animation side of the contract: given how far a
//! particle is through its life it yields the offset, opacity and weight to
//! draw it with.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::{Attr, Point};

/// Distance from the target's edge to the spawn line, in px.
pub const EDGE_OFFSET: f32 = 5.0;

/// Horizontal drift range, in px.
pub const DRIFT_X_RANGE: (f32, f32) = (-15.0, 15.0);

/// Vertical drift range, in px. Always negative: particles rise.
pub const DRIFT_Y_RANGE: (f32, f32) = (-40.0, -10.0);

// =============================================================================
// Edge
// =============================================================================

/// Side of the target box a particle spawns on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Pick an edge uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Edge {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Spawn point on this edge of a `width × height` box.
    ///
    /// The coordinate along the edge is uniform over the edge's length; the
    /// other coordinate sits [`EDGE_OFFSET`] outside the box.
    pub fn position<R: Rng + ?Sized>(self, rng: &mut R, width: f32, height: f32) -> Point {
        let along = |rng: &mut R, len: f32| {
            if len > 0.0 { rng.gen_range(0.0..len) } else { 0.0 }
        };
        match self {
            Edge::Top => Point::new(along(rng, width), -EDGE_OFFSET),
            Edge::Right => Point::new(width + EDGE_OFFSET, along(rng, height)),
            Edge::Bottom => Point::new(along(rng, width), height + EDGE_OFFSET),
            Edge::Left => Point::new(-EDGE_OFFSET, along(rng, height)),
        }
    }
}

/// Random edge and the spawn point on it.
pub fn random_edge_position<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> (Edge, Point) {
    let edge = Edge::random(rng);
    (edge, edge.position(rng, width, height))
}

/// Random drift: x in [-15, 15), y in [-40, -10).
pub fn random_drift<R: Rng + ?Sized>(rng: &mut R) -> Point {
    Point::new(
        rng.gen_range(DRIFT_X_RANGE.0..DRIFT_X_RANGE.1),
        rng.gen_range(DRIFT_Y_RANGE.0..DRIFT_Y_RANGE.1),
    )
}

// =============================================================================
// Particle
// =============================================================================

/// One sparkle glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub glyph: char,
    pub size: String,
    pub edge: Edge,
    /// Spawn position relative to the wrapper's origin.
    pub position: Point,
    /// Total displacement over the particle's life.
    pub drift: Point,
    /// Logical time of spawn, ms.
    pub born_at: u64,
    pub lifetime_ms: u64,
}

impl Particle {
    /// Sample a particle for a `width × height` target.
    ///
    /// Returns None when either pool is empty.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        glyphs: &[char],
        sizes: &[String],
        width: f32,
        height: f32,
        born_at: u64,
        lifetime_ms: u64,
    ) -> Option<Particle> {
        let glyph = *glyphs.choose(rng)?;
        let size = sizes.choose(rng)?.clone();
        let (edge, position) = random_edge_position(rng, width, height);
        let drift = random_drift(rng);

        Some(Particle {
            glyph,
            size,
            edge,
            position,
            drift,
            born_at,
            lifetime_ms,
        })
    }

    /// Logical time at which the particle is removed.
    #[inline]
    pub fn expires_at(&self) -> u64 {
        self.born_at + self.lifetime_ms
    }

    /// Fraction of life elapsed at `now`, clamped to [0, 1].
    pub fn progress(&self, now: u64) -> f32 {
        if self.lifetime_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.born_at) as f32;
        (elapsed / self.lifetime_ms as f32).clamp(0.0, 1.0)
    }

    /// Keyframe at `now`.
    pub fn frame(&self, now: u64) -> ParticleFrame {
        ParticleFrame::at(self, self.progress(now))
    }
}

// =============================================================================
// Keyframes
// =============================================================================

/// How a particle is drawn at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    /// Position relative to the wrapper's origin.
    pub position: Point,
    /// 0.0 invisible .. 1.0 full.
    pub opacity: f32,
    pub attrs: Attr,
}

impl ParticleFrame {
    pub fn at(particle: &Particle, progress: f32) -> Self {
        let p = progress.clamp(0.0, 1.0);
        Self {
            position: particle.position.offset_by(particle.drift, ease_out(p)),
            opacity: opacity_at(p),
            attrs: size_attrs(&particle.size),
        }
    }
}

/// Quadratic ease-out.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Fade in over the first 20 %, hold, fade out over the last 40 %.
pub fn opacity_at(t: f32) -> f32 {
    if t < 0.2 {
        t / 0.2
    } else if t > 0.6 {
        ((1.0 - t) / 0.4).max(0.0)
    } else {
        1.0
    }
}

/// Cell attributes for a size class.
pub fn size_attrs(size: &str) -> Attr {
    match size {
        "small" => Attr::DIM,
        "large" => Attr::BOLD,
        _ => Attr::NONE,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sizes() -> Vec<String> {
        vec!["small".into(), "medium".into(), "large".into()]
    }

    /// True if `p` lies on the offset boundary of a `w × h` box.
    fn on_boundary(edge: Edge, p: Point, w: f32, h: f32) -> bool {
        match edge {
            Edge::Top => p.y == -EDGE_OFFSET && (0.0..=w).contains(&p.x),
            Edge::Bottom => p.y == h + EDGE_OFFSET && (0.0..=w).contains(&p.x),
            Edge::Left => p.x == -EDGE_OFFSET && (0.0..=h).contains(&p.y),
            Edge::Right => p.x == w + EDGE_OFFSET && (0.0..=h).contains(&p.y),
        }
    }

    #[test]
    fn test_all_edges_get_used() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(Edge::random(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_zero_sized_target() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Edge::Top.position(&mut rng, 0.0, 0.0), Point::new(0.0, -5.0));
        assert_eq!(Edge::Right.position(&mut rng, 0.0, 0.0), Point::new(5.0, 0.0));
    }

    #[test]
    fn test_sample_uses_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = Particle::sample(&mut rng, &['✦'], &["large".to_string()], 40.0, 16.0, 100, 2000)
            .unwrap();
        assert_eq!(p.glyph, '✦');
        assert_eq!(p.size, "large");
        assert_eq!(p.born_at, 100);
        assert_eq!(p.expires_at(), 2100);
    }

    #[test]
    fn test_sample_empty_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(Particle::sample(&mut rng, &[], &sizes(), 40.0, 16.0, 0, 2000).is_none());
        assert!(Particle::sample(&mut rng, &['✦'], &[], 40.0, 16.0, 0, 2000).is_none());
    }

    #[test]
    fn test_frame_progression() {
        let particle = Particle {
            glyph: '✧',
            size: "small".into(),
            edge: Edge::Top,
            position: Point::new(10.0, -5.0),
            drift: Point::new(10.0, -20.0),
            born_at: 1000,
            lifetime_ms: 2000,
        };

        let start = particle.frame(1000);
        assert_eq!(start.position, Point::new(10.0, -5.0));
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.attrs, Attr::DIM);

        let mid = particle.frame(2000);
        assert_eq!(mid.opacity, 1.0);
        assert_eq!(mid.position, Point::new(17.5, -20.0));

        let end = particle.frame(3000);
        assert_eq!(end.position, Point::new(20.0, -25.0));
        assert_eq!(end.opacity, 0.0);

        // Before birth and past death clamp.
        assert_eq!(particle.progress(0), 0.0);
        assert_eq!(particle.progress(10_000), 1.0);
    }

    #[test]
    fn test_size_attrs() {
        assert_eq!(size_attrs("small"), Attr::DIM);
        assert_eq!(size_attrs("medium"), Attr::NONE);
        assert_eq!(size_attrs("large"), Attr::BOLD);
        assert_eq!(size_attrs("huge"), Attr::NONE);
    }

    proptest! {
        #[test]
        fn prop_spawn_on_boundary(seed in any::<u64>(), w in 0.0f32..400.0, h in 0.0f32..100.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let (edge, p) = random_edge_position(&mut rng, w, h);
            prop_assert!(on_boundary(edge, p, w, h), "{:?} {:?} in {}x{}", edge, p, w, h);
        }

        #[test]
        fn prop_drift_ranges(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = random_drift(&mut rng);
            prop_assert!((-15.0..=15.0).contains(&d.x));
            prop_assert!((-40.0..=-10.0).contains(&d.y));
        }
    }
}
