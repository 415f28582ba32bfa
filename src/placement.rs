//! Anchor placement by rejection sampling.
//!
//! Anchors are drawn inside a sphere with a radial power-law bias and must keep
//! a minimum distance from every anchor placed before them. The placement grid
//! makes that test a 27-cell lookup instead of a scan over all anchors.
//!
//! The sampler gives up after `attempts_per_point * count` tries and fills the
//! remainder with unconstrained points, so it always terminates with exactly
//! `count` anchors.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::config::PlacementConfig;
use crate::palette::PaletteMode;
use crate::point::Point;
use crate::spatial::SpatialGrid;

/// Fraction of the radius at which the fixed first anchor sits, on -X.
const SEED_ANCHOR_FRACTION: f32 = 0.99;

/// Uniformly distributed unit vector.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * theta.cos(), ring * theta.sin(), z)
}

/// Result of a placement run.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Exactly the requested number of anchors.
    pub anchors: Vec<Vec3>,
    /// The first `spaced` anchors honor the minimum spacing; the rest are
    /// fallback points.
    pub spaced: usize,
}

impl Placement {
    /// Whether the attempt cap forced unconstrained fallback points.
    pub fn used_fallback(&self) -> bool {
        self.spaced < self.anchors.len()
    }
}

/// Places anchors and owns the placement grid.
#[derive(Debug, Clone)]
pub struct AnchorPlacer {
    config: PlacementConfig,
    grid: SpatialGrid,
}

impl AnchorPlacer {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            config: config.clone(),
            grid: SpatialGrid::new(config.cell_size),
        }
    }

    /// The grid holding the anchors of the last placement.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Draw `count` anchors inside a sphere of `radius`, keeping every
    /// candidate within `radius * wall_clamp`.
    pub fn place_anchors<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        radius: f32,
        wall_clamp: f32,
        rng: &mut R,
    ) -> Placement {
        let limit = radius * wall_clamp;
        let bias = self.config.radial_bias;
        let min_spacing = self.config.min_spacing;

        self.grid.clear();
        let mut anchors = Vec::with_capacity(count);
        if count == 0 {
            return Placement { anchors, spaced: 0 };
        }

        let seed_anchor = Vec3::new(-radius * SEED_ANCHOR_FRACTION, 0.0, 0.0);
        anchors.push(seed_anchor);
        self.grid.insert(0, seed_anchor);

        let max_attempts = self.config.attempts_per_point.saturating_mul(count);
        let mut attempts = 0;
        while anchors.len() < count && attempts < max_attempts {
            attempts += 1;
            let r = radius * rng.gen::<f32>().powf(bias);
            if r > limit {
                continue;
            }
            let candidate = random_direction(rng) * r;
            let crowded = self
                .grid
                .neighborhood(candidate)
                .any(|i| candidate.distance(anchors[i]) < min_spacing);
            if crowded {
                continue;
            }
            self.grid.insert(anchors.len(), candidate);
            anchors.push(candidate);
        }

        let spaced = anchors.len();
        if spaced < count {
            tracing::warn!(
                placed = spaced,
                requested = count,
                attempts,
                "placement attempt cap reached, filling with unconstrained points"
            );
            while anchors.len() < count {
                let r = (radius * rng.gen::<f32>().powf(bias)).min(limit);
                anchors.push(random_direction(rng) * r);
            }
            self.grid.clear();
            for (i, anchor) in anchors.iter().enumerate() {
                self.grid.insert(i, *anchor);
            }
        }

        tracing::debug!(count, spaced, attempts, "anchors placed");
        Placement { anchors, spaced }
    }

    /// Build inactive points on `anchors`, colored with `palette`.
    pub fn build_points<R: Rng + ?Sized>(
        &self,
        anchors: &[Vec3],
        radius: f32,
        palette: PaletteMode,
        rng: &mut R,
    ) -> Vec<Point> {
        anchors
            .iter()
            .map(|&anchor| {
                let color = palette.point_color(
                    anchor,
                    radius,
                    self.config.color_radius_exponent,
                    rng,
                );
                let seed = rng.gen_range(0.0..1000.0);
                let size = rng.gen_range(self.config.size_min..self.config.size_max);
                let rotation = rng.gen_range(0.0..TAU);
                Point::new(anchor, seed, color, size, rotation)
            })
            .collect()
    }
}
