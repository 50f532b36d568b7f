//! Choice of the tile placed in an observed cell

use clap::ValueEnum;

use crate::algorithm::bitset::TileBitset;
use crate::math::random::RandomSource;

/// Rule used to pick one tile from an adjusted distribution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum PatternStrategy {
    /// Roulette wheel over the distribution
    #[default]
    Weighted,
    /// Uniform among the available tiles placed least often so far
    LeastUsed,
}

/// Pick a tile for a cell
///
/// `usage` counts how often each tile has been placed in the current
/// attempt; `available` is the cell's domain. Returns `None` when nothing
/// can be chosen.
pub fn select_pattern(
    strategy: PatternStrategy,
    distribution: &[f64],
    rng: &mut RandomSource,
    usage: &[u32],
    available: &TileBitset,
) -> Option<usize> {
    match strategy {
        PatternStrategy::Weighted => weighted_choice(distribution, rng),
        PatternStrategy::LeastUsed => least_used_choice(distribution, rng, usage, available),
    }
}

/// Roulette-wheel selection over weights clamped at zero
///
/// Draws once from `rng`. Tiles with no weight are never returned, and
/// rounding at the end of the wheel falls back to the last weighted tile.
pub fn weighted_choice(weights: &[f64], rng: &mut RandomSource) -> Option<usize> {
    let total: f64 = weights.iter().map(|&w| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let mut threshold = rng.next_f64() * total;
    let mut last_positive = None;
    for (i, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        threshold -= weight;
        if threshold <= 0.0 {
            return Some(i);
        }
        last_positive = Some(i);
    }
    last_positive
}

fn least_used_choice(
    distribution: &[f64],
    rng: &mut RandomSource,
    usage: &[u32],
    available: &TileBitset,
) -> Option<usize> {
    let mut minimum = u32::MAX;
    let mut candidates = Vec::new();

    for (tile, &weight) in distribution.iter().enumerate() {
        if !available.contains(tile) || weight <= 0.0 {
            continue;
        }
        let count = usage.get(tile).copied().unwrap_or(0);
        if count < minimum {
            minimum = count;
            candidates.clear();
            candidates.push(tile);
        } else if count == minimum {
            candidates.push(tile);
        }
    }

    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.below(candidates.len())).copied()
}
