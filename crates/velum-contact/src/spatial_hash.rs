//! Spatial hash broad phase for uniform-grid collision detection.
//!
//! Partitions space into a uniform grid and bins item bounding boxes into
//! every cell they overlap. A box query returns the items binned in the
//! cells it touches. Ideal for static scenery whose triangles are roughly
//! the same size.

use std::collections::HashMap;

use velum_math::Vec3;
use velum_types::Scalar;

use crate::broad::Aabb;

/// Boxes spanning more cells than this go to the oversized list instead.
const MAX_CELLS_PER_ITEM: i64 = 512;

/// Spatial hash over axis-aligned boxes.
///
/// Cell size should be about the typical item extent.
#[derive(Debug, Clone)]
pub struct SpatialHash {
    /// Inverse cell size (cached for performance).
    inv_cell_size: Scalar,
    /// Hash map from cell key to the items overlapping that cell.
    grid: HashMap<(i32, i32, i32), Vec<u32>>,
    /// Items too large to bin; returned by every query.
    oversized: Vec<u32>,
    /// Number of items inserted.
    item_count: u32,
}

impl SpatialHash {
    /// Create a new spatial hash with the given cell size.
    pub fn new(cell_size: Scalar) -> Self {
        let cell_size = cell_size.max(1e-6);
        Self {
            inv_cell_size: 1.0 / cell_size,
            grid: HashMap::new(),
            oversized: Vec::new(),
            item_count: 0,
        }
    }

    /// Edge length of one grid cell.
    pub fn cell_size(&self) -> Scalar {
        1.0 / self.inv_cell_size
    }

    /// Number of inserted items.
    pub fn len(&self) -> usize {
        self.item_count as usize
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.grid.len()
    }

    /// Removes every item, keeping the cell size.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.oversized.clear();
        self.item_count = 0;
    }

    /// Hash a position to a cell key.
    fn cell_key(&self, p: Vec3) -> (i32, i32, i32) {
        let cx = (p.x * self.inv_cell_size).floor() as i32;
        let cy = (p.y * self.inv_cell_size).floor() as i32;
        let cz = (p.z * self.inv_cell_size).floor() as i32;
        (cx, cy, cz)
    }

    fn cell_range(&self, bounds: &Aabb) -> ((i32, i32, i32), (i32, i32, i32), i64) {
        let lo = self.cell_key(bounds.min);
        let hi = self.cell_key(bounds.max);
        let count = (hi.0 as i64 - lo.0 as i64 + 1)
            * (hi.1 as i64 - lo.1 as i64 + 1)
            * (hi.2 as i64 - lo.2 as i64 + 1);
        (lo, hi, count)
    }

    /// Bins `item` into every cell overlapped by `bounds`.
    pub fn insert(&mut self, item: u32, bounds: &Aabb) {
        self.item_count += 1;
        let (lo, hi, count) = self.cell_range(bounds);
        if count > MAX_CELLS_PER_ITEM {
            self.oversized.push(item);
            return;
        }
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    self.grid.entry((cx, cy, cz)).or_default().push(item);
                }
            }
        }
    }

    /// Items whose cells overlap `bounds`, sorted and without duplicates.
    ///
    /// Queries spanning a huge number of cells scan the occupied cells
    /// instead of walking the range.
    pub fn query(&self, bounds: &Aabb) -> Vec<u32> {
        let (lo, hi, count) = self.cell_range(bounds);
        let mut items = self.oversized.clone();

        if count as usize > self.grid.len() {
            for (&(cx, cy, cz), cell) in &self.grid {
                if (lo.0..=hi.0).contains(&cx)
                    && (lo.1..=hi.1).contains(&cy)
                    && (lo.2..=hi.2).contains(&cz)
                {
                    items.extend_from_slice(cell);
                }
            }
        } else {
            for cx in lo.0..=hi.0 {
                for cy in lo.1..=hi.1 {
                    for cz in lo.2..=hi.2 {
                        if let Some(cell) = self.grid.get(&(cx, cy, cz)) {
                            items.extend_from_slice(cell);
                        }
                    }
                }
            }
        }

        items.sort_unstable();
        items.dedup();
        items
    }
}
