//! Points and edges of the network.

use glam::Vec3;

use crate::palette::Hsb;

/// One node of the network. The point count is fixed for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Rest position, fixed at placement.
    pub anchor: Vec3,
    /// Current simulated position.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Set once by the reveal sweep; cleared only by a reset.
    pub active: bool,
    /// Frame at which the point was revealed.
    pub activation_frame: u64,
    /// Decorrelates noise sampling between points.
    pub seed: f32,
    pub color: Hsb,
    /// Cosmetic size passed to the renderer.
    pub size: f32,
    /// Cosmetic rotation phase passed to the renderer.
    pub rotation_seed: f32,
}

impl Point {
    /// An inactive point resting on `anchor`.
    pub fn new(anchor: Vec3, seed: f32, color: Hsb, size: f32, rotation_seed: f32) -> Self {
        Self {
            anchor,
            position: anchor,
            velocity: Vec3::ZERO,
            active: false,
            activation_frame: 0,
            seed,
            color,
            size,
            rotation_seed,
        }
    }

    pub(crate) fn activate(&mut self, frame: u64) {
        self.active = true;
        self.activation_frame = frame;
    }

    /// Deactivate and return to the anchor at rest.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.position = self.anchor;
        self.velocity = Vec3::ZERO;
    }
}

/// An undirected link between two points, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    /// Canonical edge for the pair, smaller index first.
    #[inline]
    pub fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { a: i, b: j }
        } else {
            Self { a: j, b: i }
        }
    }

    /// Current endpoint distance.
    #[inline]
    pub fn length(&self, points: &[Point]) -> f32 {
        points[self.a].position.distance(points[self.b].position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_is_canonical() {
        assert_eq!(Edge::new(7, 2), Edge { a: 2, b: 7 });
        assert_eq!(Edge::new(2, 7), Edge::new(7, 2));
    }

    #[test]
    fn test_deactivate_returns_to_anchor() {
        let mut p = Point::new(Vec3::X, 1.0, Hsb::new(0.0, 0.0, 0.0), 8.0, 0.0);
        p.activate(12);
        p.position = Vec3::new(3.0, 1.0, 0.0);
        p.velocity = Vec3::Y;
        assert!(p.active);
        assert_eq!(p.activation_frame, 12);

        p.deactivate();
        assert!(!p.active);
        assert_eq!(p.position, p.anchor);
        assert_eq!(p.velocity, Vec3::ZERO);
    }
}
