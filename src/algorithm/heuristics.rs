//! Cell-selection heuristics
//!
//! A [`Heuristic`] is the configuration value; [`CellPicker`] is the
//! stateful picker compiled from it once per model. Only cells with more
//! than one remaining tile are ever returned, and on a bounded grid cells
//! rejected by [`GridLayout::is_candidate`] are skipped.

use clap::ValueEnum;

use crate::algorithm::wave::WaveState;
use crate::math::random::RandomSource;
use crate::spatial::grid::GridLayout;

/// Scale of the random tie-break added to entropy and MRV scores
pub const TIE_BREAK_JITTER: f64 = 1e-6;

/// Strategy for choosing the next cell to observe
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Heuristic {
    /// Lowest Shannon entropy first
    #[default]
    Entropy,
    /// Fewest remaining tiles first
    Mrv,
    /// Row-major order
    Scanline,
    /// Inward clockwise spiral from the top-left corner
    Spiral,
}

/// Stateful cell picker for one model
#[derive(Clone, Debug)]
pub enum CellPicker {
    /// Minimum entropy with jitter
    Entropy,
    /// Minimum remaining count with jitter
    Mrv,
    /// Monotonic row-major cursor
    Scanline {
        /// First cell index not yet passed
        cursor: usize,
    },
    /// Cursor over a precomputed spiral order
    Spiral {
        /// Cell indices in spiral order
        order: Vec<usize>,
        /// Order position to resume from
        cursor: usize,
    },
}

impl CellPicker {
    /// Compile a heuristic for a grid
    pub fn new(heuristic: Heuristic, grid: &GridLayout) -> Self {
        match heuristic {
            Heuristic::Entropy => Self::Entropy,
            Heuristic::Mrv => Self::Mrv,
            Heuristic::Scanline => Self::Scanline { cursor: 0 },
            Heuristic::Spiral => Self::Spiral {
                order: grid.spiral_order(),
                cursor: 0,
            },
        }
    }

    /// Heuristic this picker was compiled from
    pub const fn heuristic(&self) -> Heuristic {
        match self {
            Self::Entropy => Heuristic::Entropy,
            Self::Mrv => Heuristic::Mrv,
            Self::Scanline { .. } => Heuristic::Scanline,
            Self::Spiral { .. } => Heuristic::Spiral,
        }
    }

    /// Rewind the cursor for a new attempt
    pub fn reset(&mut self) {
        match self {
            Self::Entropy | Self::Mrv => {}
            Self::Scanline { cursor } | Self::Spiral { cursor, .. } => *cursor = 0,
        }
    }

    /// Next cell to observe, or `None` when no undecided cell is left
    pub fn pick(
        &mut self,
        wave: &WaveState,
        grid: &GridLayout,
        rng: &mut RandomSource,
    ) -> Option<usize> {
        match self {
            Self::Entropy => pick_minimum(wave, grid, rng, |cell| wave.entropy(cell)),
            Self::Mrv => pick_minimum(wave, grid, rng, |cell| wave.remaining(cell) as f64),
            Self::Scanline { cursor } => {
                let found = (*cursor..grid.cell_count())
                    .find(|&cell| grid.is_candidate(cell) && wave.remaining(cell) > 1)?;
                *cursor = found + 1;
                Some(found)
            }
            Self::Spiral { order, cursor } => {
                let total = order.len();
                for offset in 0..total {
                    let position = (*cursor + offset) % total;
                    let Some(&cell) = order.get(position) else {
                        continue;
                    };
                    if grid.is_candidate(cell) && wave.remaining(cell) > 1 {
                        *cursor = (position + 1) % total;
                        return Some(cell);
                    }
                }
                None
            }
        }
    }
}

fn pick_minimum(
    wave: &WaveState,
    grid: &GridLayout,
    rng: &mut RandomSource,
    score: impl Fn(usize) -> f64,
) -> Option<usize> {
    let mut best = f64::INFINITY;
    let mut argmin = None;

    for cell in 0..grid.cell_count() {
        if !grid.is_candidate(cell) || wave.remaining(cell) <= 1 {
            continue;
        }
        let candidate = TIE_BREAK_JITTER.mul_add(rng.next_f64(), score(cell));
        if candidate < best {
            best = candidate;
            argmin = Some(cell);
        }
    }

    argmin
}
