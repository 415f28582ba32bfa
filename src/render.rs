//! GPU-ready records for the rendering collaborator.
//!
//! The simulation does not draw. Each frame it hands the renderer flat,
//! `#[repr(C)]` records with colors already converted to RGBA, ready for a
//! `bytemuck::cast_slice` into an instance buffer.

use bytemuck::{Pod, Zeroable};

use crate::config::RenderConfig;
use crate::palette::{normalized_radius, PaletteMode};
use crate::point::{Edge, Point};

/// Opacity of point instances.
const POINT_ALPHA: f32 = 0.92;
/// Opacity of edge tubes.
const EDGE_ALPHA: f32 = 0.28;

/// One active point.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RenderPoint {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
    /// Rotation phase for the instance.
    pub rotation: f32,
    /// Scale easing in `[0, 1]` while the point grows in after its reveal.
    pub growth: f32,
    pub activation_frame: u32,
    pub _pad: f32,
}

/// One edge, drawn as a tube between the endpoints.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RenderEdge {
    pub start: [f32; 3],
    pub radius: f32,
    pub end: [f32; 3],
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Linear growth from 0 at activation to 1 after `growth_frames`.
pub fn growth_factor(frame: u64, activation_frame: u64, growth_frames: u32) -> f32 {
    if growth_frames == 0 {
        return 1.0;
    }
    let age = frame.saturating_sub(activation_frame);
    (age as f32 / growth_frames as f32).min(1.0)
}

/// Record for an active point at `frame`.
pub fn point_record(point: &Point, frame: u64, config: &RenderConfig) -> RenderPoint {
    let rgb = point.color.to_rgb();
    RenderPoint {
        position: point.position.to_array(),
        size: point.size,
        color: [rgb.x, rgb.y, rgb.z, POINT_ALPHA],
        rotation: point.rotation_seed,
        growth: growth_factor(frame, point.activation_frame, config.growth_frames),
        activation_frame: point.activation_frame.min(u32::MAX as u64) as u32,
        _pad: 0.0,
    }
}

/// Record for `edge`, or `None` when it is too short to draw.
pub fn edge_record(
    edge: Edge,
    points: &[Point],
    radius: f32,
    palette: PaletteMode,
    config: &RenderConfig,
) -> Option<RenderEdge> {
    let a = points.get(edge.a)?;
    let b = points.get(edge.b)?;
    if a.position.distance(b.position) < config.edge_short_cut {
        return None;
    }

    let t = (normalized_radius(a.anchor, radius) + normalized_radius(b.anchor, radius)) * 0.5;
    let rgb = palette.edge_color(t).to_rgb();
    Some(RenderEdge {
        start: a.position.to_array(),
        radius: config.tube_radius,
        end: b.position.to_array(),
        _pad: 0.0,
        color: [rgb.x, rgb.y, rgb.z, EDGE_ALPHA],
    })
}
