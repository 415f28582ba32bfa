//! Error types for nodeweave.
//!
//! Configuration is checked once when a simulation is built. Nothing inside
//! the per-frame step can fail, so these are the only errors the crate returns.

use thiserror::Error;

/// A [`NetworkConfig`](crate::NetworkConfig) value that would make the
/// simulation misbehave.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The network must contain at least one point.
    #[error("point count must be at least 1")]
    EmptyNetwork,

    /// A parameter is NaN or infinite.
    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    /// A length, size or rate that must be strictly positive.
    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    /// A factor or probability outside its closed range.
    #[error("`{name}` must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// An integer interval or stride of zero.
    #[error("`{0}` must be at least 1")]
    Zero(&'static str),

    /// The placement cell is too small for the 27-cell query to see every
    /// conflicting anchor.
    #[error("minimum spacing {min_spacing} exceeds placement cell size {cell_size}")]
    SpacingExceedsCell { min_spacing: f32, cell_size: f32 },

    /// The link band is empty.
    #[error("link minimum {link_min} exceeds link-on distance {link_on}")]
    InvertedLinkBand { link_min: f32, link_on: f32 },

    /// The link-off distance would sit inside the link-on distance.
    #[error("link-off factor must be at least 1, got {0}")]
    NoHysteresis(f32),

    /// The domain spans more grid cells than the integer lattice can index.
    #[error("domain spans {extent} cells of `{name}`, beyond the grid lattice")]
    LatticeOverflow { name: &'static str, extent: f32 },

    /// Point size range is empty or inverted.
    #[error("point size range {min}..{max} is empty")]
    EmptySizeRange { min: f32, max: f32 },
}

/// Errors surfaced by configuration loading and the runner.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A configuration file could not be read or written.
    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON for [`NetworkConfig`](crate::NetworkConfig).
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}
