//! Wave-function-collapse solver for the street tile grid.

use rand::Rng;
use smallvec::{smallvec, SmallVec};

use super::tiles::{AdjacencyRules, Direction, TileKind};
use super::ProcgenError;

/// A grid cell holding the tiles it may still resolve to.
#[derive(Clone, Debug)]
pub struct WaveCell {
    pub candidates: SmallVec<[TileKind; 5]>,
    pub collapsed: Option<TileKind>,
}

impl Default for WaveCell {
    fn default() -> Self {
        Self {
            candidates: SmallVec::from_slice(&TileKind::BASE),
            collapsed: None,
        }
    }
}

impl WaveCell {
    /// Number of tiles the cell can still become.
    pub fn entropy(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.is_some()
    }
}

/// Wave-function-collapse street map generator.
///
/// `generate` always yields a complete map: a cell whose candidate set
/// empties out collapses to a wildcard that the final sweep rewrites to a
/// crossing, trading strict constraint satisfaction for guaranteed
/// termination. Output is deterministic for a given RNG seed.
pub struct WaveGrid {
    size: usize,
    end_points: usize,
    rules: AdjacencyRules,
    cells: Vec<WaveCell>,
    anomalies: Vec<usize>,
}

impl WaveGrid {
    pub fn new(size: usize, end_points: usize) -> Result<Self, ProcgenError> {
        Self::with_rules(size, end_points, AdjacencyRules::default())
    }

    /// Build a generator over a custom rule set.
    pub fn with_rules(
        size: usize,
        end_points: usize,
        rules: AdjacencyRules,
    ) -> Result<Self, ProcgenError> {
        if size == 0 {
            return Err(ProcgenError::InvalidGridSize);
        }
        Ok(Self {
            size,
            end_points,
            rules,
            cells: Vec::new(),
            anomalies: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cells the final sweep had to patch from a contradiction wildcard,
    /// by index. Empty on a clean run.
    pub fn resolved_anomalies(&self) -> &[usize] {
        &self.anomalies
    }

    /// Run the solver to completion and return the resolved tiles,
    /// row-major, length `size * size`.
    pub fn generate(&mut self, rng: &mut impl Rng) -> Vec<TileKind> {
        self.reset();
        for _ in 0..self.end_points {
            self.seed_end_point(rng);
        }
        while let Some(idx) = self.next_to_collapse(rng) {
            self.collapse(idx, rng);
        }

        let mut tiles = Vec::with_capacity(self.cells.len());
        for (idx, cell) in self.cells.iter().enumerate() {
            match cell.collapsed.unwrap_or(TileKind::Anomaly) {
                TileKind::Anomaly => {
                    self.anomalies.push(idx);
                    tiles.push(TileKind::Cross);
                }
                tile => tiles.push(tile),
            }
        }
        tiles
    }

    fn reset(&mut self) {
        self.cells.clear();
        self.cells
            .resize_with(self.size * self.size, WaveCell::default);
        self.anomalies.clear();
    }

    /// Force a goal cell. Redraws a few times to land on an uncollapsed
    /// cell but proceeds regardless, so two goals can merge on tiny grids.
    fn seed_end_point(&mut self, rng: &mut impl Rng) {
        let mut idx = rng.gen_range(0..self.cells.len());
        for _ in 0..10 {
            if !self.cells[idx].is_collapsed() {
                break;
            }
            idx = rng.gen_range(0..self.cells.len());
        }
        let cell = &mut self.cells[idx];
        cell.candidates = smallvec![TileKind::Endpoint];
        cell.collapsed = Some(TileKind::Endpoint);
        self.propagate(idx);
    }

    /// Pick uniformly among the uncollapsed cells sharing the lowest
    /// entropy; `None` once every cell is resolved. The uniform tie-break
    /// avoids directional bias across the grid.
    fn next_to_collapse(&self, rng: &mut impl Rng) -> Option<usize> {
        let mut min_entropy = usize::MAX;
        let mut candidates: Vec<usize> = Vec::new();

        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.is_collapsed() {
                continue;
            }
            let entropy = cell.entropy();
            if entropy < min_entropy {
                min_entropy = entropy;
                candidates.clear();
                candidates.push(idx);
            } else if entropy == min_entropy {
                candidates.push(idx);
            }
        }

        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    fn collapse(&mut self, idx: usize, rng: &mut impl Rng) {
        let cell = &mut self.cells[idx];
        let choice = cell.candidates[rng.gen_range(0..cell.candidates.len())];
        cell.candidates = smallvec![choice];
        cell.collapsed = Some(choice);
        self.propagate(idx);
    }

    /// Depth-first constraint propagation over an explicit work stack.
    /// Every entry is a collapsed cell; a neighbor joins the stack only
    /// when it collapses in turn, so the stack drains in bounded steps.
    fn propagate(&mut self, start: usize) {
        let mut pending: Vec<usize> = vec![start];

        while let Some(idx) = pending.pop() {
            let Some(tile) = self.cells[idx].collapsed else {
                continue;
            };
            for (dir, neighbor) in self.neighbors(idx) {
                let rules = &self.rules;
                let cell = &mut self.cells[neighbor];
                if cell.is_collapsed() {
                    continue;
                }
                cell.candidates.retain(|t| rules.is_allowed(tile, dir, *t));
                match cell.entropy() {
                    0 => {
                        // dead end: force the wildcard so generation can
                        // still terminate
                        cell.candidates = smallvec![TileKind::Anomaly];
                        cell.collapsed = Some(TileKind::Anomaly);
                        pending.push(neighbor);
                    }
                    1 => {
                        cell.collapsed = Some(cell.candidates[0]);
                        pending.push(neighbor);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Grid-adjacent neighbors in fixed N/E/S/W order; boundary neighbors
    /// are omitted.
    fn neighbors(&self, idx: usize) -> SmallVec<[(Direction, usize); 4]> {
        let size = self.size;
        let x = idx % size;
        let y = idx / size;
        let mut out = SmallVec::new();
        if y > 0 {
            out.push((Direction::North, idx - size));
        }
        if x + 1 < size {
            out.push((Direction::East, idx + 1));
        }
        if y + 1 < size {
            out.push((Direction::South, idx + size));
        }
        if x > 0 {
            out.push((Direction::West, idx - 1));
        }
        out
    }
}
