//! Proximity graph maintenance.
//!
//! Every rebuild runs two passes over the current positions:
//!
//! 1. **Retention**: keep each existing edge whose endpoints are both active
//!    and whose length lies in `[link_min, link_off)`.
//! 2. **Growth**: rebuild the link grid from active positions, then greedily
//!    link each unsaturated point to unsaturated neighbors within
//!    `[link_min, link_on]`.
//!
//! `link_off` is larger than `link_on`, so an edge that formed stays until its
//! endpoints drift well apart. Degrees are capped at `max_degree` throughout.

use std::collections::HashSet;

use crate::config::LinkConfig;
use crate::point::{Edge, Point};
use crate::spatial::SpatialGrid;

/// Counts from one rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildStats {
    pub retained: usize,
    pub created: usize,
}

/// Owns the edge set and the link grid.
#[derive(Debug, Clone)]
pub struct GraphMaintainer {
    config: LinkConfig,
    grid: SpatialGrid,
    edges: Vec<Edge>,
    linked: HashSet<Edge>,
    degree: Vec<usize>,
}

impl GraphMaintainer {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            config: config.clone(),
            grid: SpatialGrid::new(config.cell_size),
            edges: Vec::new(),
            linked: HashSet::new(),
            degree: Vec::new(),
        }
    }

    /// Current edges, retained ones first, in creation order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Degree of every point after the last rebuild.
    #[inline]
    pub fn degrees(&self) -> &[usize] {
        &self.degree
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.linked.contains(&edge)
    }

    /// The link grid as of the last rebuild.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Drop every edge.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.linked.clear();
        self.degree.iter_mut().for_each(|d| *d = 0);
    }

    /// Rebuild the edge set from current positions.
    pub fn rebuild(&mut self, points: &[Point]) -> RebuildStats {
        let link_min = self.config.link_min;
        let link_on = self.config.link_on;
        let link_off = self.config.link_off();
        let max_degree = self.config.max_degree;

        self.degree.clear();
        self.degree.resize(points.len(), 0);

        // Retention
        let previous = std::mem::take(&mut self.edges);
        self.linked.clear();
        for edge in previous {
            let (Some(a), Some(b)) = (points.get(edge.a), points.get(edge.b)) else {
                continue;
            };
            if !(a.active && b.active) {
                continue;
            }
            let length = a.position.distance(b.position);
            if length >= link_off || length < link_min {
                continue;
            }
            if self.degree[edge.a] >= max_degree || self.degree[edge.b] >= max_degree {
                continue;
            }
            self.degree[edge.a] += 1;
            self.degree[edge.b] += 1;
            self.linked.insert(edge);
            self.edges.push(edge);
        }
        let retained = self.edges.len();

        // Growth
        self.grid.clear();
        for (i, point) in points.iter().enumerate().filter(|(_, p)| p.active) {
            self.grid.insert(i, point.position);
        }

        for (i, point) in points.iter().enumerate() {
            if !point.active || self.degree[i] >= max_degree {
                continue;
            }
            for j in self.grid.neighborhood(point.position) {
                if self.degree[i] >= max_degree {
                    break;
                }
                if j <= i || !points[j].active || self.degree[j] >= max_degree {
                    continue;
                }
                let edge = Edge { a: i, b: j };
                if self.linked.contains(&edge) {
                    continue;
                }
                let length = point.position.distance(points[j].position);
                if length > link_on || length < link_min {
                    continue;
                }
                self.degree[i] += 1;
                self.degree[j] += 1;
                self.linked.insert(edge);
                self.edges.push(edge);
            }
        }

        let stats = RebuildStats {
            retained,
            created: self.edges.len() - retained,
        };
        tracing::debug!(
            retained = stats.retained,
            created = stats.created,
            total = self.edges.len(),
            "graph rebuilt"
        );
        stats
    }
}
