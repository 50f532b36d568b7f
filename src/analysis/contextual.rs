//! Contextual weighting from the neighbours' remaining candidates
//!
//! Each tile is scored against every partially resolved neighbour: how much
//! of the neighbour's remaining weight falls on tiles it is allowed to sit
//! next to. Tiles with support get boosted, tiles with none get penalised.

use ndarray::Array3;

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::wave::WaveState;
use crate::analysis::distribution::Distribution;
use crate::io::configuration::{DEFAULT_CONTEXT_BIAS, DEFAULT_CONTEXT_PENALTY};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::direction::Direction;
use crate::spatial::grid::GridLayout;
use crate::spatial::tiles::TileSet;

/// Tunables of the contextual adjuster
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextualOptions {
    /// Boost per unit of neighbour support
    pub bias: f64,
    /// Multiplier for a tile no neighbour candidate supports
    pub penalty: f64,
}

impl Default for ContextualOptions {
    fn default() -> Self {
        Self {
            bias: DEFAULT_CONTEXT_BIAS,
            penalty: DEFAULT_CONTEXT_PENALTY,
        }
    }
}

impl ContextualOptions {
    /// Check the option values
    ///
    /// # Errors
    ///
    /// Returns an error if the bias is negative or the penalty is not positive
    pub fn validate(&self) -> Result<()> {
        if !self.bias.is_finite() || self.bias < 0.0 {
            return Err(invalid_parameter(
                "context bias",
                &self.bias,
                &"must be finite and non-negative",
            ));
        }
        if !self.penalty.is_finite() || self.penalty <= 0.0 {
            return Err(invalid_parameter(
                "context penalty",
                &self.penalty,
                &"must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Adjuster scoring tiles against neighbouring domains
#[derive(Clone, Debug)]
pub struct ContextualAdjuster {
    frequencies: Array3<f64>,
    weights: Vec<f64>,
    options: ContextualOptions,
}

struct NeighborContext<'a> {
    direction: Direction,
    domain: &'a TileBitset,
    weight_sum: f64,
}

impl ContextualAdjuster {
    /// Precompute frequency rows for a tile set
    pub fn new(tiles: &TileSet, options: ContextualOptions) -> Self {
        Self {
            frequencies: tiles.propagator().frequency_rows(),
            weights: tiles.weights().to_vec(),
            options,
        }
    }

    /// Apply contextual modifiers for `cell`
    ///
    /// Neighbours whose domain is empty or still full carry no information
    /// and are skipped. Without any informative neighbour the distribution
    /// is left untouched.
    pub fn adjust(
        &self,
        cell: usize,
        wave: &WaveState,
        grid: &GridLayout,
        distribution: &mut Distribution,
    ) {
        let contexts: Vec<NeighborContext<'_>> = grid
            .neighbors(cell)
            .filter_map(|(direction, neighbor)| {
                let domain = wave.domain(neighbor)?;
                if domain.is_empty() || domain.is_full() {
                    return None;
                }
                let mut weight_sum: f64 = domain
                    .iter()
                    .map(|tile| self.weights.get(tile).copied().unwrap_or(0.0))
                    .sum();
                if weight_sum <= 0.0 {
                    weight_sum = domain.count() as f64;
                }
                Some(NeighborContext {
                    direction,
                    domain,
                    weight_sum,
                })
            })
            .collect();

        if contexts.is_empty() {
            return;
        }

        for tile in 0..distribution.len() {
            if distribution.get(tile) <= 0.0 {
                distribution.scale(tile, 0.0);
                continue;
            }
            let modifier = contexts.iter().fold(1.0, |modifier, context| {
                let ratio = self.support_ratio(tile, context);
                if ratio > 0.0 {
                    modifier * self.options.bias.mul_add(ratio, 1.0)
                } else {
                    modifier * self.options.penalty
                }
            });
            distribution.scale(tile, modifier);
        }
    }

    /// Share of the neighbour's weight that `tile` may sit next to
    fn support_ratio(&self, tile: usize, context: &NeighborContext<'_>) -> f64 {
        let direction = context.direction.index();
        let score: f64 = context
            .domain
            .iter()
            .map(|neighbor_tile| {
                let frequency = self
                    .frequencies
                    .get((direction, tile, neighbor_tile))
                    .copied()
                    .unwrap_or(0.0);
                frequency * self.weights.get(neighbor_tile).copied().unwrap_or(0.0)
            })
            .sum();

        if score > 0.0 && context.weight_sum > 0.0 {
            score / context.weight_sum
        } else {
            0.0
        }
    }
}
