//! Distribution adjustment pipeline
//!
//! Before a cell is observed, its raw distribution (tile weight where the
//! tile is allowed, zero elsewhere) passes through an ordered list of
//! adjusters. Each adjuster multiplies per-tile modifiers into the
//! pipeline's scratch [`Distribution`]. Zero entries stay zero, so an
//! adjuster can never resurrect a banned tile.

use std::fmt;

use tracing::debug;

use crate::algorithm::wave::WaveState;
use crate::analysis::coherence::{CoherenceAdjuster, CoherenceOptions, CoherenceTracker};
use crate::analysis::contextual::{ContextualAdjuster, ContextualOptions};
use crate::analysis::noise::{NoiseAdjuster, NoiseOptions};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::GridLayout;
use crate::spatial::tiles::TileSet;

/// Per-tile sampling weights of one cell
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Distribution {
    weights: Vec<f64>,
}

impl Distribution {
    /// All-zero distribution over `tile_count` tiles
    pub fn zeros(tile_count: usize) -> Self {
        Self {
            weights: vec![0.0; tile_count],
        }
    }

    /// Distribution from explicit weights
    pub const fn from_weights(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// Weights in tile order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Mutable weights in tile order
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    /// Weight of one tile
    pub fn get(&self, tile: usize) -> f64 {
        self.weights.get(tile).copied().unwrap_or(0.0)
    }

    /// Number of tiles
    pub const fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the distribution covers no tiles
    pub const fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of the positive weights
    pub fn total(&self) -> f64 {
        self.weights.iter().filter(|&&w| w > 0.0).sum()
    }

    /// Multiply one tile's weight by `modifier`
    ///
    /// Entries that are not positive before or after are forced to zero.
    pub fn scale(&mut self, tile: usize, modifier: f64) {
        if let Some(weight) = self.weights.get_mut(tile) {
            let scaled = if *weight > 0.0 { *weight * modifier } else { 0.0 };
            *weight = if scaled > 0.0 && scaled.is_finite() {
                scaled
            } else {
                0.0
            };
        }
    }
}

/// Kind of distribution adjuster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdjusterKind {
    /// Favour tiles frequently seen next to the neighbours' candidates
    Contextual,
    /// Favour one tile group per cell following a hashed noise field
    NoiseBias,
    /// Pull placed-tile shares back towards their weight shares
    Coherence,
}

impl AdjusterKind {
    /// Standard ordering: contextual, then noise, then coherence
    pub fn canonical(contextual: bool, noise: bool, coherence: bool) -> Vec<Self> {
        [
            (contextual, Self::Contextual),
            (noise, Self::NoiseBias),
            (coherence, Self::Coherence),
        ]
        .into_iter()
        .filter_map(|(enabled, kind)| enabled.then_some(kind))
        .collect()
    }
}

impl fmt::Display for AdjusterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Contextual => "contextual",
            Self::NoiseBias => "noise",
            Self::Coherence => "coherence",
        })
    }
}

/// Tunables of every adjuster kind
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdjusterOptions {
    /// Contextual weighting
    pub contextual: ContextualOptions,
    /// Noise bias
    pub noise: NoiseOptions,
    /// Coherence
    pub coherence: CoherenceOptions,
}

impl AdjusterOptions {
    /// Check every option set
    ///
    /// # Errors
    ///
    /// Returns an error if any option is non-finite or out of range
    pub fn validate(&self) -> Result<()> {
        self.contextual.validate()?;
        self.noise.validate()?;
        self.coherence.validate()
    }
}

#[derive(Clone, Debug)]
enum Adjuster {
    Contextual(ContextualAdjuster),
    Noise(NoiseAdjuster),
    Coherence(CoherenceAdjuster),
}

/// Ordered adjusters with a single reusable scratch distribution
#[derive(Clone, Debug)]
pub struct AdjusterPipeline {
    stages: Vec<Adjuster>,
    scratch: Distribution,
}

impl AdjusterPipeline {
    /// Compile `kinds` in order for a tile set and grid
    ///
    /// A noise adjuster over a set with fewer than two tile groups has no
    /// effect and is left out.
    ///
    /// # Errors
    ///
    /// Returns an error if a kind is listed twice or an option is invalid
    pub fn new(
        kinds: &[AdjusterKind],
        tiles: &TileSet,
        grid: &GridLayout,
        options: &AdjusterOptions,
    ) -> Result<Self> {
        options.validate()?;

        let mut stages = Vec::with_capacity(kinds.len());
        for (position, &kind) in kinds.iter().enumerate() {
            if kinds.iter().take(position).any(|&earlier| earlier == kind) {
                return Err(invalid_parameter(
                    "adjusters",
                    &kind,
                    &"each adjuster may appear only once",
                ));
            }

            let stage = match kind {
                AdjusterKind::Contextual => Some(Adjuster::Contextual(ContextualAdjuster::new(
                    tiles,
                    options.contextual,
                ))),
                AdjusterKind::NoiseBias => {
                    NoiseAdjuster::new(tiles, grid, options.noise).map(Adjuster::Noise)
                }
                AdjusterKind::Coherence => Some(Adjuster::Coherence(CoherenceAdjuster::new(
                    tiles.weights(),
                    options.coherence,
                ))),
            };

            match stage {
                Some(stage) => {
                    debug!(adjuster = %kind, "registered distribution adjuster");
                    stages.push(stage);
                }
                None => debug!(adjuster = %kind, "adjuster inactive for this tile set"),
            }
        }

        Ok(Self {
            stages,
            scratch: Distribution::zeros(tiles.tile_count()),
        })
    }

    /// Kinds of the active stages, in order
    pub fn kinds(&self) -> Vec<AdjusterKind> {
        self.stages
            .iter()
            .map(|stage| match stage {
                Adjuster::Contextual(_) => AdjusterKind::Contextual,
                Adjuster::Noise(_) => AdjusterKind::NoiseBias,
                Adjuster::Coherence(_) => AdjusterKind::Coherence,
            })
            .collect()
    }

    /// Adjusted distribution of `cell`
    ///
    /// The result borrows the pipeline's scratch buffer and is overwritten
    /// by the next call.
    pub fn distribution(
        &mut self,
        cell: usize,
        wave: &WaveState,
        grid: &GridLayout,
    ) -> &Distribution {
        wave.sample_into(cell, self.scratch.weights_mut());
        for stage in &self.stages {
            match stage {
                Adjuster::Contextual(adjuster) => {
                    adjuster.adjust(cell, wave, grid, &mut self.scratch);
                }
                Adjuster::Noise(adjuster) => adjuster.adjust(cell, &mut self.scratch),
                Adjuster::Coherence(adjuster) => adjuster.adjust(&mut self.scratch),
            }
        }
        &self.scratch
    }

    /// Record a placed tile with the stages that track placements
    pub fn register(&mut self, tile: usize) {
        for stage in &mut self.stages {
            if let Adjuster::Coherence(adjuster) = stage {
                adjuster.tracker_mut().register(tile);
            }
        }
    }

    /// Placement tracker of the coherence stage, if present
    pub fn coherence_tracker(&self) -> Option<&CoherenceTracker> {
        self.stages.iter().find_map(|stage| match stage {
            Adjuster::Coherence(adjuster) => Some(adjuster.tracker()),
            _ => None,
        })
    }

    /// Forget placements from the previous attempt
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            if let Adjuster::Coherence(adjuster) = stage {
                adjuster.tracker_mut().reset();
            }
        }
    }
}
