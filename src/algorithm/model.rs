//! Observation and propagation loop of the simple tiled model
//!
//! A [`Model`] owns one [`WaveState`] and the per-attempt state around it:
//! the compiled cell picker, the adjuster pipeline, usage counters and the
//! random source. The tile set is shared read-only through an [`Arc`] so
//! several models can run attempts side by side.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::heuristics::{CellPicker, Heuristic};
use crate::algorithm::selection::{PatternStrategy, select_pattern};
use crate::algorithm::wave::{WaveSnapshot, WaveState};
use crate::analysis::distribution::{AdjusterKind, AdjusterOptions, AdjusterPipeline};
use crate::io::configuration::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_GRID_DIMENSION};
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::math::random::RandomSource;
use crate::spatial::grid::GridLayout;
use crate::spatial::tiles::TileSet;

/// Settings fixed for the lifetime of a model
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Whether the grid wraps around at its edges
    pub periodic: bool,
    /// Next-cell heuristic
    pub heuristic: Heuristic,
    /// Tile choice within an observed cell
    pub pattern: PatternStrategy,
    /// Distribution adjusters, applied in this order
    pub adjusters: Vec<AdjusterKind>,
    /// Adjuster tunables
    pub options: AdjusterOptions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            periodic: false,
            heuristic: Heuristic::default(),
            pattern: PatternStrategy::default(),
            adjusters: AdjusterKind::canonical(true, false, true),
            options: AdjusterOptions::default(),
        }
    }
}

impl ModelConfig {
    /// Config for a grid size with default settings otherwise
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check grid bounds and adjuster options
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or above [`MAX_GRID_DIMENSION`],
    /// or an adjuster option is invalid
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    name,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        self.options.validate()
    }
}

/// Progress of the current attempt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Never reset
    #[default]
    Uninitialized,
    /// Cells left to observe
    Running,
    /// Every cell holds exactly one tile
    Solved,
    /// Some cell ran out of tiles
    Contradicted,
}

impl RunStatus {
    /// Whether stepping further can change anything
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Solved | Self::Contradicted)
    }
}

type StepRecorder = Box<dyn FnMut(&Model, usize) + Send>;

/// Simple tiled model over a shared tile set
pub struct Model {
    tiles: Arc<TileSet>,
    grid: GridLayout,
    wave: WaveState,
    picker: CellPicker,
    pattern: PatternStrategy,
    pipeline: AdjusterPipeline,
    rng: RandomSource,
    usage: Vec<u32>,
    status: RunStatus,
    steps: usize,
    recorder: Option<StepRecorder>,
    recorder_limit: usize,
    recorded: usize,
}

impl Model {
    /// Create a model; it must be reset before stepping
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or lists an
    /// adjuster twice
    pub fn new(tiles: Arc<TileSet>, config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        let grid = GridLayout::new(config.width, config.height, config.periodic)?;
        let wave = WaveState::new(grid.cell_count(), tiles.weights(), tiles.propagator());
        let pipeline = AdjusterPipeline::new(&config.adjusters, &tiles, &grid, &config.options)?;

        Ok(Self {
            picker: CellPicker::new(config.heuristic, &grid),
            usage: vec![0; tiles.tile_count()],
            tiles,
            grid,
            wave,
            pattern: config.pattern,
            pipeline,
            rng: RandomSource::new(0),
            status: RunStatus::Uninitialized,
            steps: 0,
            recorder: None,
            recorder_limit: usize::MAX,
            recorded: 0,
        })
    }

    /// Install a callback fired after reset and after every step
    ///
    /// The callback receives the model and the index of the recorded
    /// frame. It fires at most `limit` times per run; `None` is unbounded.
    pub fn set_step_recorder(
        &mut self,
        recorder: impl FnMut(&Self, usize) + Send + 'static,
        limit: Option<usize>,
    ) {
        self.recorder = Some(Box::new(recorder));
        self.recorder_limit = limit.filter(|&l| l > 0).unwrap_or(usize::MAX);
    }

    /// Remove the step callback
    pub fn clear_step_recorder(&mut self) {
        self.recorder = None;
    }

    /// Start a new attempt from `seed`
    pub fn reset(&mut self, seed: u64) {
        self.wave.reset();
        self.rng.reseed(seed);
        self.picker.reset();
        self.usage.fill(0);
        self.pipeline.reset();
        self.steps = 0;
        self.recorded = 0;
        self.status = RunStatus::Running;
        self.record();
    }

    /// Observe one cell and propagate the consequences
    ///
    /// A finished model returns its status unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::NotStarted`] before the first reset and
    /// [`WfcError::SamplingFailure`] if no tile can be chosen for a live cell
    pub fn step(&mut self) -> Result<RunStatus> {
        match self.status {
            RunStatus::Uninitialized => return Err(WfcError::NotStarted),
            RunStatus::Solved | RunStatus::Contradicted => return Ok(self.status),
            RunStatus::Running => {}
        }

        self.status = self.advance()?;
        self.record();
        Ok(self.status)
    }

    /// Reset with `seed` and step until finished or `limit` steps were taken
    ///
    /// Hitting the limit with every cell decided commits the grid as
    /// `Solved`. Otherwise the model stays `Running` with only the settled
    /// cells committed. Either way the final state is recorded.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Model::step`]
    pub fn run(&mut self, seed: u64, limit: Option<usize>) -> Result<RunStatus> {
        self.run_until(seed, limit, &AtomicBool::new(false))
    }

    /// Like [`Model::run`], stopping early once `cancel` is set
    ///
    /// The flag is checked between steps only, so the wave is always left
    /// fully propagated.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Model::step`]
    pub fn run_until(
        &mut self,
        seed: u64,
        limit: Option<usize>,
        cancel: &AtomicBool,
    ) -> Result<RunStatus> {
        self.reset(seed);
        let mut taken = 0;
        loop {
            if limit.is_some_and(|l| taken >= l) || cancel.load(Ordering::Relaxed) {
                self.halt();
                return Ok(self.status);
            }
            let status = self.step()?;
            taken += 1;
            if status.is_finished() {
                return Ok(status);
            }
        }
    }

    fn advance(&mut self) -> Result<RunStatus> {
        let Some(cell) = self.picker.pick(&self.wave, &self.grid, &mut self.rng) else {
            self.commit();
            return Ok(RunStatus::Solved);
        };

        self.observe(cell)?;
        self.steps += 1;

        Ok(if self.propagate() {
            RunStatus::Running
        } else {
            RunStatus::Contradicted
        })
    }

    fn observe(&mut self, cell: usize) -> Result<()> {
        let distribution = self.pipeline.distribution(cell, &self.wave, &self.grid);
        let empty = TileBitset::new(0);
        let available = self.wave.domain(cell).unwrap_or(&empty);
        let choice = select_pattern(
            self.pattern,
            distribution.weights(),
            &mut self.rng,
            &self.usage,
            available,
        )
        .ok_or(WfcError::SamplingFailure {
            cell,
            step: self.steps,
        })?;

        for tile in 0..self.wave.tile_count() {
            if tile != choice {
                self.wave.ban(cell, tile);
            }
        }
        self.wave.set_observed(cell, Some(choice));
        if let Some(count) = self.usage.get_mut(choice) {
            *count += 1;
        }
        self.pipeline.register(choice);
        Ok(())
    }

    /// Drain the pending bans; `false` as soon as a domain empties
    fn propagate(&mut self) -> bool {
        let propagator = self.tiles.propagator();

        while let Some((cell, tile)) = self.wave.pop_pending() {
            for (direction, neighbor) in self.grid.neighbors(cell) {
                for &other in propagator.allowed(direction, tile) {
                    if self.wave.decrement_support(neighbor, other, direction)
                        && self.wave.ban(neighbor, other)
                    {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Commit every cell to its remaining tile
    fn commit(&mut self) {
        for cell in 0..self.grid.cell_count() {
            let (count, first) = self
                .wave
                .domain(cell)
                .map_or((0, None), |domain| (domain.count(), domain.first()));
            if count > 1 {
                warn!(
                    cell,
                    candidates = count,
                    "committing undecided cell to its first candidate"
                );
            }
            self.wave.set_observed(cell, first);
        }
    }

    /// Wrap up a run stopped before the picker ran dry
    fn halt(&mut self) {
        let decided = (0..self.grid.cell_count()).all(|cell| self.wave.remaining(cell) == 1);
        if decided {
            self.commit();
            self.status = RunStatus::Solved;
        } else {
            self.commit_settled();
        }
        debug!(steps = self.steps, status = ?self.status, "run halted early");
        self.record();
    }

    /// Commit only the cells left with a single tile
    fn commit_settled(&mut self) {
        for cell in 0..self.grid.cell_count() {
            if self.wave.remaining(cell) == 1 {
                let first = self.wave.domain(cell).and_then(TileBitset::first);
                self.wave.set_observed(cell, first);
            }
        }
    }

    fn record(&mut self) {
        if self.recorded >= self.recorder_limit {
            return;
        }
        if let Some(mut recorder) = self.recorder.take() {
            recorder(self, self.recorded);
            self.recorded += 1;
            self.recorder = Some(recorder);
        }
    }

    /// Current status
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Observations made in the current attempt
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Shared tile set
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Grid topology
    pub const fn grid(&self) -> &GridLayout {
        &self.grid
    }

    /// Underlying wave
    pub const fn wave(&self) -> &WaveState {
        &self.wave
    }

    /// Adjuster pipeline
    pub const fn pipeline(&self) -> &AdjusterPipeline {
        &self.pipeline
    }

    /// Heuristic the model picks cells with
    pub const fn heuristic(&self) -> Heuristic {
        self.picker.heuristic()
    }

    /// Placements per tile in the current attempt
    pub fn usage(&self) -> &[u32] {
        &self.usage
    }

    /// Committed tile of a cell
    pub fn observed(&self, cell: usize) -> Option<usize> {
        self.wave.observed(cell)
    }

    /// Allowed tiles of a cell
    pub fn domain(&self, cell: usize) -> Option<&TileBitset> {
        self.wave.domain(cell)
    }

    /// Allowed tiles of a cell with their weights
    pub fn cell_candidates(&self, cell: usize) -> Vec<(usize, f64)> {
        self.wave.domain(cell).map_or_else(Vec::new, |domain| {
            domain
                .iter()
                .map(|tile| (tile, self.tiles.weights().get(tile).copied().unwrap_or(0.0)))
                .collect()
        })
    }

    /// Committed tiles of every cell in row-major order
    pub fn observed_tiles(&self) -> Vec<Option<usize>> {
        (0..self.grid.cell_count())
            .map(|cell| self.wave.observed(cell))
            .collect()
    }

    /// Whether every cell has a committed tile
    pub fn is_fully_observed(&self) -> bool {
        self.wave.is_fully_observed()
    }

    /// Uncertainty map and committed tiles
    pub fn snapshot(&self) -> WaveSnapshot {
        self.wave.snapshot()
    }
}
