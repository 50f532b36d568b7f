//! Per-cell domains and the bookkeeping that keeps propagation incremental
//!
//! Every cell carries a bitset of still-allowed tiles, running weight sums
//! for its entropy, and a compatibility counter per tile and direction. A
//! counter `[cell][tile][d]` counts the tiles still allowed in the
//! neighbour on the side opposite to `d` that support `tile`; once it hits
//! zero the tile is banned. Bans are queued on a LIFO stack that the
//! propagation loop drains.

use ndarray::{Array2, Array3};

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::propagator::Propagator;
use crate::math::entropy::{entropy_from_sums, entropy_of, weight_log_weight};
use crate::spatial::direction::Direction;

/// Compact view of a wave used for progress frames
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveSnapshot {
    /// Per cell, 0 when decided or contradicted, up to 255 when undecided
    pub uncertainty: Vec<u8>,
    /// Per cell, the committed tile if any
    pub observed: Vec<Option<usize>>,
}

/// Mutable solver state of one generation attempt
#[derive(Clone, Debug)]
pub struct WaveState {
    tile_count: usize,
    weights: Vec<f64>,
    weight_log_weights: Vec<f64>,
    starting_weight_sum: f64,
    starting_weight_log_weight_sum: f64,
    starting_entropy: f64,
    initial_compatibility: Array2<i32>,

    domains: Vec<TileBitset>,
    compatibility: Array3<i32>,
    remaining: Vec<usize>,
    weight_sums: Vec<f64>,
    weight_log_weight_sums: Vec<f64>,
    entropies: Vec<f64>,
    observed: Vec<Option<usize>>,
    pending: Vec<(usize, usize)>,
}

impl WaveState {
    /// Allocate a wave for `cell_count` cells, already reset
    pub fn new(cell_count: usize, weights: &[f64], propagator: &Propagator) -> Self {
        let tile_count = weights.len();
        let weight_log_weights: Vec<f64> = weights.iter().map(|&w| weight_log_weight(w)).collect();
        let starting_weight_sum: f64 = weights.iter().sum();
        let starting_weight_log_weight_sum: f64 = weight_log_weights.iter().sum();
        let starting_entropy =
            entropy_from_sums(starting_weight_sum, starting_weight_log_weight_sum);

        let initial_compatibility =
            Array2::from_shape_fn((tile_count, Direction::COUNT), |(tile, d)| {
                Direction::from_index(d)
                    .map_or(0, |direction| propagator.support(direction, tile) as i32)
            });

        let mut wave = Self {
            tile_count,
            weights: weights.to_vec(),
            weight_log_weights,
            starting_weight_sum,
            starting_weight_log_weight_sum,
            starting_entropy,
            initial_compatibility,
            domains: vec![TileBitset::all(tile_count); cell_count],
            compatibility: Array3::zeros((cell_count, tile_count, Direction::COUNT)),
            remaining: vec![tile_count; cell_count],
            weight_sums: vec![starting_weight_sum; cell_count],
            weight_log_weight_sums: vec![starting_weight_log_weight_sum; cell_count],
            entropies: vec![starting_entropy; cell_count],
            observed: vec![None; cell_count],
            pending: Vec::new(),
        };
        wave.reset();
        wave
    }

    /// Return every cell to the full domain and clear the pending stack
    pub fn reset(&mut self) {
        for domain in &mut self.domains {
            domain.fill();
        }
        for mut cell in self.compatibility.outer_iter_mut() {
            cell.assign(&self.initial_compatibility);
        }
        self.remaining.fill(self.tile_count);
        self.weight_sums.fill(self.starting_weight_sum);
        self.weight_log_weight_sums
            .fill(self.starting_weight_log_weight_sum);
        self.entropies.fill(self.starting_entropy);
        self.observed.fill(None);
        self.pending.clear();
    }

    /// Number of cells
    pub const fn cell_count(&self) -> usize {
        self.domains.len()
    }

    /// Number of tile variants
    pub const fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Base weights of the tile variants
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of each tile, or 0 where the tile is banned
    pub fn sample_distribution(&self, cell: usize) -> Vec<f64> {
        let mut distribution = vec![0.0; self.tile_count];
        self.sample_into(cell, &mut distribution);
        distribution
    }

    /// Fill `out` with the cell's distribution
    pub fn sample_into(&self, cell: usize, out: &mut [f64]) {
        let domain = self.domains.get(cell);
        for (tile, (slot, &weight)) in out.iter_mut().zip(&self.weights).enumerate() {
            *slot = if domain.is_some_and(|d| d.contains(tile)) {
                weight
            } else {
                0.0
            };
        }
    }

    /// Remove `tile` from `cell` and queue the ban for propagation
    ///
    /// Returns `true` when the domain became empty. Banning a tile that is
    /// already absent does nothing and returns `false`.
    pub fn ban(&mut self, cell: usize, tile: usize) -> bool {
        let Some(domain) = self.domains.get_mut(cell) else {
            return false;
        };
        if !domain.remove(tile) {
            return false;
        }

        for d in 0..Direction::COUNT {
            if let Some(counter) = self.compatibility.get_mut((cell, tile, d)) {
                *counter = 0;
            }
        }
        self.pending.push((cell, tile));

        let weight = self.weights.get(tile).copied().unwrap_or(0.0);
        let weight_log_weight = self.weight_log_weights.get(tile).copied().unwrap_or(0.0);

        let (Some(remaining), Some(sum), Some(sum_log), Some(entropy)) = (
            self.remaining.get_mut(cell),
            self.weight_sums.get_mut(cell),
            self.weight_log_weight_sums.get_mut(cell),
            self.entropies.get_mut(cell),
        ) else {
            return false;
        };
        *remaining = remaining.saturating_sub(1);
        *sum -= weight;
        *sum_log -= weight_log_weight;
        *entropy = entropy_from_sums(*sum, *sum_log);

        *remaining == 0
    }

    /// Take the most recent pending ban
    pub fn pop_pending(&mut self) -> Option<(usize, usize)> {
        self.pending.pop()
    }

    /// Whether bans are waiting to be propagated
    pub const fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of queued bans
    pub const fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Lower the support of `tile` in `cell` on the `direction` side
    ///
    /// Returns `true` exactly when the counter reaches zero.
    pub fn decrement_support(&mut self, cell: usize, tile: usize, direction: Direction) -> bool {
        self.compatibility
            .get_mut((cell, tile, direction.index()))
            .is_some_and(|counter| {
                *counter -= 1;
                *counter == 0
            })
    }

    /// Current compatibility counter
    pub fn compatibility(&self, cell: usize, tile: usize, direction: Direction) -> i32 {
        self.compatibility
            .get((cell, tile, direction.index()))
            .copied()
            .unwrap_or(0)
    }

    /// Allowed tiles of a cell
    pub fn domain(&self, cell: usize) -> Option<&TileBitset> {
        self.domains.get(cell)
    }

    /// Whether `tile` is still allowed in `cell`
    pub fn allows(&self, cell: usize, tile: usize) -> bool {
        self.domains.get(cell).is_some_and(|domain| domain.contains(tile))
    }

    /// Number of allowed tiles in a cell
    pub fn remaining(&self, cell: usize) -> usize {
        self.remaining.get(cell).copied().unwrap_or(0)
    }

    /// Sum of the weights of the allowed tiles
    pub fn weight_sum(&self, cell: usize) -> f64 {
        self.weight_sums.get(cell).copied().unwrap_or(0.0)
    }

    /// Incrementally maintained entropy of a cell
    pub fn entropy(&self, cell: usize) -> f64 {
        self.entropies.get(cell).copied().unwrap_or(0.0)
    }

    /// Entropy recomputed from the domain, for checking the running sums
    pub fn recomputed_entropy(&self, cell: usize) -> f64 {
        let Some(domain) = self.domains.get(cell) else {
            return 0.0;
        };
        entropy_of(
            domain
                .iter()
                .map(|tile| self.weights.get(tile).copied().unwrap_or(0.0)),
        )
    }

    /// Committed tile of a cell
    pub fn observed(&self, cell: usize) -> Option<usize> {
        self.observed.get(cell).copied().flatten()
    }

    /// Record the committed tile of a cell
    pub fn set_observed(&mut self, cell: usize, tile: Option<usize>) {
        if let Some(slot) = self.observed.get_mut(cell) {
            *slot = tile;
        }
    }

    /// Whether every cell has a committed tile
    pub fn is_fully_observed(&self) -> bool {
        self.observed.iter().all(Option::is_some)
    }

    /// Uncertainty map and committed tiles
    pub fn snapshot(&self) -> WaveSnapshot {
        let spread = (self.tile_count.saturating_sub(1)).max(1) as f64;
        let uncertainty = self
            .remaining
            .iter()
            .map(|&remaining| {
                if remaining <= 1 {
                    0
                } else {
                    let normalized = ((remaining - 1) as f64 / spread).min(1.0);
                    (normalized * 255.0).round() as u8
                }
            })
            .collect();

        WaveSnapshot {
            uncertainty,
            observed: self.observed.clone(),
        }
    }
}
