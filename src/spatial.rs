//! Uniform spatial hashing for bounded-cost proximity queries.
//!
//! Positions are quantized to integer lattice cells (`floor(p / cell_size)` per
//! axis) and each cell keeps the indices inserted into it. A neighborhood query
//! visits the 27 cells around the query cell, so it finds every index within
//! `cell_size` of the query position.
//!
//! Grids are never patched in place. When positions go stale the owner calls
//! [`SpatialGrid::clear`] and reinserts everything.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

/// Offsets of the 27 cells around (and including) a center cell.
pub const NEIGHBOR_OFFSETS: [IVec3; 27] = {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = IVec3::new(
            (i % 3) as i32 - 1,
            ((i / 3) % 3) as i32 - 1,
            (i / 9) as i32 - 1,
        );
        i += 1;
    }
    offsets
};

/// Hash grid mapping lattice cells to point indices.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
}

impl SpatialGrid {
    /// Create an empty grid. `cell_size` must be positive; callers validate
    /// it through [`NetworkConfig::validate`](crate::NetworkConfig::validate).
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Size of each cell in world units.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Lattice cell containing `position`.
    #[inline]
    pub fn key(&self, position: Vec3) -> IVec3 {
        (position / self.cell_size).floor().as_ivec3()
    }

    /// Remove every entry. Bucket allocations are dropped with their cells.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Append `index` to the bucket for `position`.
    pub fn insert(&mut self, index: usize, position: Vec3) {
        let key = self.key(position);
        self.cells.entry(key).or_default().push(index);
    }

    /// Indices in the 3x3x3 block of cells centered on `position`'s cell.
    ///
    /// Each inserted index appears at most once as long as it was inserted once.
    pub fn neighborhood(&self, position: Vec3) -> impl Iterator<Item = usize> + '_ {
        let center = self.key(position);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |offset| self.cells.get(&center.saturating_add(*offset)))
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Collected form of [`neighborhood`](Self::neighborhood).
    pub fn query_neighborhood(&self, position: Vec3) -> Vec<usize> {
        self.neighborhood(position).collect()
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Total number of stored indices.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_offsets_cover_block() {
        let mut seen = std::collections::HashSet::new();
        for offset in NEIGHBOR_OFFSETS {
            assert!(offset.abs().max_element() <= 1);
            seen.insert(offset);
        }
        assert_eq!(seen.len(), 27);
        assert!(seen.contains(&IVec3::ZERO));
    }

    #[test]
    fn test_key_floors_negative_coordinates() {
        let grid = SpatialGrid::new(10.0);
        assert_eq!(grid.key(Vec3::new(5.0, -0.1, -10.0)), IVec3::new(0, -1, -1));
        assert_eq!(grid.key(Vec3::new(-10.1, 19.9, 20.0)), IVec3::new(-2, 1, 2));
    }

    #[test]
    fn test_neighborhood_includes_adjacent_cells_only() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(0, Vec3::new(0.5, 0.5, 0.5));
        grid.insert(1, Vec3::new(1.5, 0.5, -0.5));
        grid.insert(2, Vec3::new(2.5, 0.5, 0.5));
        grid.insert(3, Vec3::new(-0.5, -0.5, -0.5));

        let mut found = grid.query_neighborhood(Vec3::new(0.5, 0.5, 0.5));
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 3]);
    }

    #[test]
    fn test_no_duplicates_for_single_insertions() {
        let mut grid = SpatialGrid::new(2.0);
        for i in 0..50 {
            let t = i as f32 * 0.1;
            grid.insert(i, Vec3::new(t, -t, t * 0.5));
        }
        let found = grid.query_neighborhood(Vec3::new(1.0, -1.0, 0.5));
        let unique: std::collections::HashSet<_> = found.iter().copied().collect();
        assert_eq!(unique.len(), found.len());
    }

    #[test]
    fn test_finds_everything_within_one_cell() {
        let mut grid = SpatialGrid::new(3.0);
        let query = Vec3::new(0.2, 5.9, -2.9);
        let points = [
            query + Vec3::new(2.9, 0.0, 0.0),
            query + Vec3::new(0.0, -2.9, 0.0),
            query + Vec3::new(1.7, 1.7, 1.7),
        ];
        for (i, p) in points.iter().enumerate() {
            grid.insert(i, *p);
        }
        assert_eq!(grid.neighborhood(query).count(), points.len());
    }

    #[test]
    fn test_query_at_lattice_edge_does_not_overflow() {
        let mut grid = SpatialGrid::new(1.0);
        let far = Vec3::splat(1.0e12);
        grid.insert(0, far);
        assert_eq!(grid.key(far), IVec3::splat(i32::MAX));
        assert!(grid.query_neighborhood(far).contains(&0));
        assert_eq!(grid.neighborhood(-far).count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(7, Vec3::ZERO);
        grid.insert(8, Vec3::ZERO);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.occupied_cells(), 1);
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.neighborhood(Vec3::ZERO).count(), 0);
    }
}
