//! Spatial noise bias between tile groups
//!
//! Variants are grouped by base name. A hashed field assigns every cell a
//! preferred group; tiles of that group are boosted and all others bleed
//! a little weight.

use ndarray::Array2;

use crate::analysis::distribution::Distribution;
use crate::io::configuration::{DEFAULT_NOISE_BLEED, DEFAULT_NOISE_BOOST};
use crate::io::error::{Result, invalid_parameter};
use crate::math::hashing::hash2d;
use crate::spatial::grid::GridLayout;
use crate::spatial::tiles::TileSet;

/// Tunables of the noise adjuster
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseOptions {
    /// Multiplier for the preferred group
    pub boost: f64,
    /// Multiplier for every other group
    pub bleed: f64,
    /// Seed of the noise field
    pub seed: u32,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            boost: DEFAULT_NOISE_BOOST,
            bleed: DEFAULT_NOISE_BLEED,
            seed: 0,
        }
    }
}

impl NoiseOptions {
    /// Check the option values
    ///
    /// # Errors
    ///
    /// Returns an error if either multiplier is not finite and positive
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("noise boost", self.boost), ("noise bleed", self.bleed)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid_parameter(name, &value, &"must be finite and positive"));
            }
        }
        Ok(())
    }
}

/// Adjuster biasing each cell towards one tile group
#[derive(Clone, Debug)]
pub struct NoiseAdjuster {
    field: Array2<usize>,
    group_of: Vec<usize>,
    group_count: usize,
    width: usize,
    options: NoiseOptions,
}

impl NoiseAdjuster {
    /// Build the adjuster, or `None` when the set has fewer than two groups
    pub fn new(tiles: &TileSet, grid: &GridLayout, options: NoiseOptions) -> Option<Self> {
        let mut groups: Vec<&str> = Vec::new();
        let mut group_of = Vec::with_capacity(tiles.tile_count());
        for variant in tiles.variants() {
            let group = variant.group();
            let existing = groups.iter().position(|&g| g == group);
            let index = existing.unwrap_or_else(|| {
                groups.push(group);
                groups.len() - 1
            });
            group_of.push(index);
        }

        let group_count = groups.len();
        if group_count <= 1 {
            return None;
        }

        Some(Self {
            field: noise_field(grid.width(), grid.height(), group_count, options.seed),
            group_of,
            group_count,
            width: grid.width(),
            options,
        })
    }

    /// Number of distinct tile groups
    pub const fn group_count(&self) -> usize {
        self.group_count
    }

    /// Group index of a variant
    pub fn group_of(&self, tile: usize) -> Option<usize> {
        self.group_of.get(tile).copied()
    }

    /// Preferred group of a cell
    pub fn preferred_group(&self, cell: usize) -> Option<usize> {
        let x = cell % self.width;
        let y = cell / self.width;
        self.field.get((y, x)).copied()
    }

    /// Apply the group bias for `cell`
    pub fn adjust(&self, cell: usize, distribution: &mut Distribution) {
        let Some(preferred) = self.preferred_group(cell) else {
            return;
        };
        for tile in 0..distribution.len() {
            let modifier = if self.group_of(tile) == Some(preferred) {
                self.options.boost
            } else {
                self.options.bleed
            };
            distribution.scale(tile, modifier);
        }
    }
}

/// Preferred group per cell, indexed `[y, x]`
pub fn noise_field(width: usize, height: usize, group_count: usize, seed: u32) -> Array2<usize> {
    Array2::from_shape_fn((height, width), |(y, x)| {
        let h = hash2d(x as u32, y as u32, seed);
        ((h * group_count as f64).floor() as usize) % group_count.max(1)
    })
}
