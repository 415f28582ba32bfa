//! Domain parameters for a network simulation.
//!
//! [`NetworkConfig`] is fixed for the lifetime of a run. It serializes to
//! JSON so runs can be tuned without recompiling:
//!
//! ```ignore
//! use nodeweave::NetworkConfig;
//!
//! let config = NetworkConfig::default()
//!     .with_point_count(500)
//!     .with_radius(120.0);
//! config.save("network.json")?;
//! ```
//!
//! Every field has a default, so a JSON file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimulationError};

/// Largest cell coordinate a grid may need, leaving room for the one-cell
/// neighborhood offset inside `i32`.
const MAX_LATTICE_EXTENT: f32 = (i32::MAX - 2) as f32;

/// Viewport size in pixels, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Anchor placement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Exponent applied to a uniform sample to get the radial distance.
    /// Values below 1 push anchors toward the surface.
    pub radial_bias: f32,
    /// Minimum distance between two accepted anchors.
    pub min_spacing: f32,
    /// Cell size of the placement grid. Must be at least `min_spacing`.
    pub cell_size: f32,
    /// Placement attempts allowed per requested anchor before falling back
    /// to unconstrained points.
    pub attempts_per_point: usize,
    /// Exponent applied to the normalized anchor radius before palette lookup.
    pub color_radius_exponent: f32,
    /// Cosmetic point size range.
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            radial_bias: 1.0,
            min_spacing: 10.5,
            cell_size: 10.5,
            attempts_per_point: 200,
            color_radius_exponent: 0.9,
            size_min: 6.0,
            size_max: 14.0,
        }
    }
}

/// Reveal sweep parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Distance the sweep plane advances per frame.
    pub step: f32,
    /// Step multiplier once the sweep is starved.
    pub boost_factor: f32,
    /// Consecutive frames without activations before boosting.
    pub boost_after: u32,
    /// Extra reach past the sweep plane when testing anchors.
    pub epsilon: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            step: 1.0,
            boost_factor: 1.5,
            boost_after: 18,
            epsilon: 0.0,
        }
    }
}

/// One layer of coherent-noise drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    /// Noise phase advance per frame.
    pub frequency: f32,
    /// Drift scale for this layer.
    pub amplitude: f32,
}

/// Floating-motion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Restoring stiffness along the anchor's radial direction.
    pub radial_stiffness: f32,
    /// Restoring stiffness perpendicular to the radial direction.
    pub tangential_stiffness: f32,
    /// Velocity retained each frame.
    pub drag: f32,
    pub noise: [NoiseLayer; 2],
    /// Chance per point per frame of a random kick.
    pub impulse_probability: f32,
    pub impulse_magnitude: f32,
    /// Velocity retained after hitting the boundary sphere.
    pub wall_damping: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            radial_stiffness: 0.07,
            tangential_stiffness: 0.03,
            drag: 0.94,
            noise: [
                NoiseLayer {
                    frequency: 0.002,
                    amplitude: 0.45,
                },
                NoiseLayer {
                    frequency: 0.007,
                    amplitude: 0.18,
                },
            ],
            impulse_probability: 0.012,
            impulse_magnitude: 2.0,
            wall_damping: 0.4,
        }
    }
}

/// Proximity-link parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Edges never form or survive below this distance.
    pub link_min: f32,
    /// New edges form at or below this distance.
    pub link_on: f32,
    /// Existing edges survive below `link_on * link_off_factor`.
    pub link_off_factor: f32,
    pub max_degree: usize,
    /// Frames between graph rebuilds.
    pub rebuild_every: u32,
    /// Cell size of the link grid.
    pub cell_size: f32,
}

impl LinkConfig {
    /// Distance at which a retained edge is dropped.
    #[inline]
    pub fn link_off(&self) -> f32 {
        self.link_on * self.link_off_factor
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            link_min: 10.0,
            link_on: 35.0,
            link_off_factor: 2.5,
            max_degree: 3,
            rebuild_every: 8,
            cell_size: 30.0,
        }
    }
}

/// Cosmetic values passed through to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit every n-th edge.
    pub edge_stride: usize,
    /// Edges shorter than this are not drawn.
    pub edge_short_cut: f32,
    /// Emit every n-th point.
    pub point_stride: usize,
    pub tube_radius: f32,
    pub tube_detail: u32,
    /// Frames a newly revealed point takes to grow to full size.
    pub growth_frames: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            edge_stride: 3,
            edge_short_cut: 12.0,
            point_stride: 1,
            tube_radius: 0.8,
            tube_detail: 4,
            growth_frames: 16,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of points, fixed for the run.
    pub point_count: usize,
    /// Domain sphere radius.
    pub radius: f32,
    /// Fraction of the smaller viewport side used as radius on resize.
    pub radius_scale: f32,
    /// Fraction of the radius where anchors and points are clamped.
    pub wall_clamp: f32,
    pub placement: PlacementConfig,
    pub reveal: RevealConfig,
    pub motion: MotionConfig,
    pub links: LinkConfig,
    pub render: RenderConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            point_count: 2000,
            radius: 210.0,
            radius_scale: 0.35,
            wall_clamp: 0.995,
            placement: PlacementConfig::default(),
            reveal: RevealConfig::default(),
            motion: MotionConfig::default(),
            links: LinkConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl NetworkConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of points.
    pub fn with_point_count(mut self, count: usize) -> Self {
        self.point_count = count;
        self
    }

    /// Set the domain radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Derive the domain radius from a viewport using `radius_scale`.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.radius = self.radius_for_viewport(viewport);
        self
    }

    /// Set the minimum anchor spacing, growing the placement cell to match.
    pub fn with_min_spacing(mut self, spacing: f32) -> Self {
        self.placement.min_spacing = spacing;
        self.placement.cell_size = self.placement.cell_size.max(spacing);
        self
    }

    /// Set the radial bias exponent.
    pub fn with_radial_bias(mut self, bias: f32) -> Self {
        self.placement.radial_bias = bias;
        self
    }

    /// Set the link distances.
    pub fn with_link_band(mut self, link_min: f32, link_on: f32, off_factor: f32) -> Self {
        self.links.link_min = link_min;
        self.links.link_on = link_on;
        self.links.link_off_factor = off_factor;
        self
    }

    /// Set the degree cap.
    pub fn with_max_degree(mut self, degree: usize) -> Self {
        self.links.max_degree = degree;
        self
    }

    /// Set the graph rebuild interval in frames.
    pub fn with_rebuild_every(mut self, frames: u32) -> Self {
        self.links.rebuild_every = frames;
        self
    }

    /// Radius for a viewport: `floor(min(width, height) * radius_scale)`.
    pub fn radius_for_viewport(&self, viewport: Viewport) -> f32 {
        (viewport.width.min(viewport.height) * self.radius_scale).floor()
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimulationError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter sets that would break the grids, the placement loop
    /// or the link hysteresis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_count == 0 {
            return Err(ConfigError::EmptyNetwork);
        }

        let p = &self.placement;
        let r = &self.reveal;
        let m = &self.motion;
        let l = &self.links;

        positive("radius", self.radius)?;
        positive("wall_clamp", self.wall_clamp)?;
        in_range("wall_clamp", self.wall_clamp, 0.0, 1.0)?;

        positive("placement.radial_bias", p.radial_bias)?;
        finite("placement.min_spacing", p.min_spacing)?;
        in_range("placement.min_spacing", p.min_spacing, 0.0, f32::MAX)?;
        positive("placement.cell_size", p.cell_size)?;
        if p.min_spacing > p.cell_size {
            return Err(ConfigError::SpacingExceedsCell {
                min_spacing: p.min_spacing,
                cell_size: p.cell_size,
            });
        }
        if p.attempts_per_point == 0 {
            return Err(ConfigError::Zero("placement.attempts_per_point"));
        }
        positive("placement.color_radius_exponent", p.color_radius_exponent)?;
        finite("placement.size_min", p.size_min)?;
        finite("placement.size_max", p.size_max)?;
        if p.size_min >= p.size_max {
            return Err(ConfigError::EmptySizeRange {
                min: p.size_min,
                max: p.size_max,
            });
        }

        positive("reveal.step", r.step)?;
        finite("reveal.boost_factor", r.boost_factor)?;
        in_range("reveal.boost_factor", r.boost_factor, 1.0, f32::MAX)?;
        finite("reveal.epsilon", r.epsilon)?;

        finite("motion.radial_stiffness", m.radial_stiffness)?;
        in_range("motion.radial_stiffness", m.radial_stiffness, 0.0, 1.0)?;
        finite("motion.tangential_stiffness", m.tangential_stiffness)?;
        in_range("motion.tangential_stiffness", m.tangential_stiffness, 0.0, 1.0)?;
        finite("motion.drag", m.drag)?;
        in_range("motion.drag", m.drag, 0.0, 1.0)?;
        for layer in &m.noise {
            positive("motion.noise.frequency", layer.frequency)?;
            finite("motion.noise.amplitude", layer.amplitude)?;
        }
        finite("motion.impulse_probability", m.impulse_probability)?;
        in_range("motion.impulse_probability", m.impulse_probability, 0.0, 1.0)?;
        finite("motion.impulse_magnitude", m.impulse_magnitude)?;
        finite("motion.wall_damping", m.wall_damping)?;
        in_range("motion.wall_damping", m.wall_damping, 0.0, 1.0)?;

        finite("links.link_min", l.link_min)?;
        in_range("links.link_min", l.link_min, 0.0, f32::MAX)?;
        positive("links.link_on", l.link_on)?;
        if l.link_min > l.link_on {
            return Err(ConfigError::InvertedLinkBand {
                link_min: l.link_min,
                link_on: l.link_on,
            });
        }
        finite("links.link_off_factor", l.link_off_factor)?;
        if l.link_off_factor < 1.0 {
            return Err(ConfigError::NoHysteresis(l.link_off_factor));
        }
        if l.rebuild_every == 0 {
            return Err(ConfigError::Zero("links.rebuild_every"));
        }
        positive("links.cell_size", l.cell_size)?;
        if l.cell_size < l.link_on {
            tracing::warn!(
                cell_size = l.cell_size,
                link_on = l.link_on,
                "link cell is smaller than the link-on distance; distant candidates will be missed"
            );
        }

        lattice("placement.cell_size", self.radius, p.cell_size)?;
        lattice("links.cell_size", self.radius, l.cell_size)?;

        if self.render.edge_stride == 0 {
            return Err(ConfigError::Zero("render.edge_stride"));
        }
        if self.render.point_stride == 0 {
            return Err(ConfigError::Zero("render.point_stride"));
        }

        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Every position stays within `radius` of the origin, so the outermost
/// cell index is `radius / cell_size`.
fn lattice(name: &'static str, radius: f32, cell_size: f32) -> Result<(), ConfigError> {
    let extent = (radius / cell_size).ceil();
    if extent.is_finite() && extent <= MAX_LATTICE_EXTENT {
        Ok(())
    } else {
        Err(ConfigError::LatticeOverflow { name, extent })
    }
}

fn in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
