//! Uniform-grid spatial hash for broad-phase neighbor queries.

use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Spatial hash grid mapping ground-plane cells to the entities inside
/// them.
///
/// Keys discretize world X/Z; Y is ignored. Operating assumption (not
/// enforced): cells are at least as large as the widest tracked entity,
/// which keeps the 3x3 quadrant query sufficient for collision
/// candidates. The grid stores entity handles only and never owns the
/// entities behind them.
pub struct SpatialGrid {
    cell_x: f32,
    cell_z: f32,
    cells: HashMap<(i32, i32), Vec<Entity>>,
}

impl SpatialGrid {
    pub fn new(cell_x: f32, cell_z: f32) -> Self {
        Self {
            cell_x,
            cell_z,
            cells: HashMap::new(),
        }
    }

    /// Convert a world position to cell coordinates.
    pub fn key_for(&self, pos: Vec3) -> (i32, i32) {
        (
            (pos.x / self.cell_x).floor() as i32,
            (pos.z / self.cell_z).floor() as i32,
        )
    }

    /// Insert an entity into the bucket at `key`. No dedup check: callers
    /// must remove an entity before reinserting it elsewhere.
    pub fn insert(&mut self, key: (i32, i32), entity: Entity) {
        self.cells.entry(key).or_default().push(entity);
    }

    /// Remove an entity from the bucket at `key`, returning how many
    /// entries were dropped. A missing bucket is a benign no-op (0); a
    /// well-formed caller sees exactly 1.
    pub fn remove(&mut self, key: (i32, i32), entity: Entity) -> usize {
        let Some(bucket) = self.cells.get_mut(&key) else {
            return 0;
        };
        let before = bucket.len();
        bucket.retain(|&e| e != entity);
        before - bucket.len()
    }

    /// Entities in a single cell.
    pub fn cell(&self, key: (i32, i32)) -> &[Entity] {
        self.cells.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Occupied buckets of the 3x3 neighborhood centered on `key`.
    /// Empty and absent cells are skipped, never created.
    pub fn quadrant(&self, key: (i32, i32)) -> SmallVec<[&[Entity]; 9]> {
        let mut buckets = SmallVec::new();
        for dx in -1..=1 {
            for dz in -1..=1 {
                if let Some(bucket) = self.cells.get(&(key.0 + dx, key.1 + dz)) {
                    if !bucket.is_empty() {
                        buckets.push(bucket.as_slice());
                    }
                }
            }
        }
        buckets
    }

    /// Total tracked entries across all buckets.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
