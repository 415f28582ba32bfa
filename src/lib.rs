//! # nodeweave - procedural particle networks
//!
//! Thousands of points are placed inside a sphere with a minimum spacing,
//! revealed by a plane sweeping across the domain, set floating around their
//! rest positions by coherent noise, and joined into a proximity graph that
//! is rebuilt every few frames.
//!
//! The crate is a simulation core. It does not draw; each frame it produces
//! [`RenderPoint`] and [`RenderEdge`] records for whatever renderer the host
//! uses.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nodeweave::prelude::*;
//!
//! let config = NetworkConfig::default()
//!     .with_point_count(1500)
//!     .with_viewport(Viewport::new(1280.0, 720.0));
//!
//! let mut sim = Simulation::new(config)?;
//! let mut clock = FrameClock::new();
//!
//! loop {
//!     sim.step(clock.tick());
//!     let points: Vec<RenderPoint> = sim.render_points().collect();
//!     let edges: Vec<RenderEdge> = sim.render_edges().collect();
//!     // upload with bytemuck::cast_slice(&points) ...
//! }
//! ```
//!
//! ## Frame Pipeline
//!
//! | Stage | Type | Runs |
//! |-------|------|------|
//! | Reveal sweep | [`RevealController`] | while the phase is `Run` |
//! | Floating motion | [`MotionIntegrator`] | every unpaused frame |
//! | Graph rebuild | [`GraphMaintainer`] | every `rebuild_every` frames |
//!
//! Anchors are placed once by [`AnchorPlacer`] and colored by a
//! [`PaletteMode`] ramp over their normalized radius.
//!
//! ## Spatial Hashing
//!
//! Placement and linking both use a [`SpatialGrid`]. A query visits the 27
//! cells around a position, so a grid only sees every neighbor when its cell
//! size is at least the query distance:
//!
//! - `placement.cell_size >= placement.min_spacing` (enforced)
//! - `links.cell_size >= links.link_on` (recommended; a warning is logged otherwise)
//!
//! ## Host Controls
//!
//! - [`Simulation::set_paused`] / [`Simulation::toggle_pause`]
//! - [`Simulation::request_reset`] / [`Simulation::request_pick`] restart the
//!   sweep from a picked column and switch palette on the next frame
//! - [`Simulation::reset_all`] / [`Simulation::resize`] re-place every anchor

pub mod config;
pub mod error;
pub mod graph;
pub mod motion;
pub mod noise;
pub mod palette;
pub mod placement;
pub mod point;
pub mod render;
pub mod reveal;
mod simulation;
pub mod spatial;
pub mod time;

pub use bytemuck;
pub use config::{
    LinkConfig, MotionConfig, NetworkConfig, NoiseLayer, PlacementConfig, RenderConfig,
    RevealConfig, Viewport,
};
pub use error::{ConfigError, SimulationError};
pub use glam::{IVec3, Vec3};
pub use graph::{GraphMaintainer, RebuildStats};
pub use motion::MotionIntegrator;
pub use crate::noise::{NoiseField, PerlinNoise};
pub use palette::{palette_color, Hsb, PaletteMode};
pub use placement::{AnchorPlacer, Placement};
pub use point::{Edge, Point};
pub use render::{RenderEdge, RenderPoint};
pub use reveal::{Phase, RevealController};
pub use simulation::{NetworkStats, Simulation};
pub use spatial::SpatialGrid;
pub use time::{FrameClock, FrameTick};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use nodeweave::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{NetworkConfig, Viewport};
    pub use crate::error::{ConfigError, SimulationError};
    pub use crate::noise::{NoiseField, PerlinNoise};
    pub use crate::palette::{Hsb, PaletteMode};
    pub use crate::point::{Edge, Point};
    pub use crate::render::{RenderEdge, RenderPoint};
    pub use crate::reveal::Phase;
    pub use crate::simulation::{NetworkStats, Simulation};
    pub use crate::time::{FrameClock, FrameTick};
    pub use crate::Vec3;
}
