//! Restart orchestration around [`Model`]
//!
//! Attempt `k` runs with seed `seed + k`. A contradicted attempt is thrown
//! away and the next seed is tried until the restart budget runs out. With a
//! parallel batch size, attempts are evaluated in batches on the rayon pool
//! and the lowest-numbered successful attempt of the first batch with a
//! success wins, so the outcome matches the sequential order.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::algorithm::model::{Model, ModelConfig, RunStatus};
use crate::io::configuration::{DEFAULT_RESTARTS, DEFAULT_SEED, EXTRA_FRAMES};
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::io::progress::AttemptProgress;
use crate::io::visualization::{CapturedFrame, FrameCapture};
use crate::spatial::tiles::TileSet;

/// Restart policy and per-run extras
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Seed of the first attempt
    pub seed: u64,
    /// Step limit per attempt; `None` runs to completion
    pub limit: Option<usize>,
    /// Attempts before giving up
    pub restarts: usize,
    /// Record frames of the winning attempt
    pub capture_frames: bool,
    /// Frame cap per attempt; `None` uses one per cell plus [`EXTRA_FRAMES`]
    pub frame_limit: Option<usize>,
    /// Attempts per parallel batch; `None` runs attempts one after another
    pub parallel_batch: Option<usize>,
    /// Hide the progress bar
    pub quiet: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            limit: None,
            restarts: DEFAULT_RESTARTS,
            capture_frames: false,
            frame_limit: None,
            parallel_batch: None,
            quiet: true,
        }
    }
}

/// Result of a generation run
pub struct Generation {
    /// Model of the accepted attempt
    pub model: Model,
    /// Attempts made, the accepted one included
    pub attempts: usize,
    /// Seed of the accepted attempt
    pub seed: u64,
    /// Frames of the accepted attempt, empty unless capture was enabled
    pub frames: Vec<CapturedFrame>,
}

impl Generation {
    /// Final status of the accepted attempt
    ///
    /// `Running` when the step limit stopped it before completion.
    pub const fn status(&self) -> RunStatus {
        self.model.status()
    }
}

struct Attempt {
    index: usize,
    seed: u64,
    model: Model,
    frames: Vec<CapturedFrame>,
}

impl Attempt {
    const fn accepted(&self) -> bool {
        !matches!(self.model.status(), RunStatus::Contradicted)
    }
}

/// Runs attempts over one shared tile set
pub struct Generator {
    tiles: Arc<TileSet>,
    model: ModelConfig,
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::InvalidParameter`] if the model configuration is
    /// invalid, the restart budget is zero or a batch size is zero
    pub fn new(tiles: Arc<TileSet>, model: ModelConfig, config: GeneratorConfig) -> Result<Self> {
        model.validate()?;
        if config.restarts == 0 {
            return Err(invalid_parameter(
                "restarts",
                &config.restarts,
                &"at least one attempt is required",
            ));
        }
        if config.parallel_batch == Some(0) {
            return Err(invalid_parameter(
                "parallel batch",
                &0,
                &"batch size must be positive",
            ));
        }
        Ok(Self {
            tiles,
            model,
            config,
        })
    }

    /// Generator configuration
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Frames recorded per attempt when capturing
    pub fn frame_limit(&self) -> usize {
        self.config
            .frame_limit
            .unwrap_or(self.model.width * self.model.height + EXTRA_FRAMES)
    }

    /// Seed used by attempt `index`
    pub const fn attempt_seed(&self, index: usize) -> u64 {
        self.config.seed.wrapping_add(index as u64)
    }

    /// Run attempts until one is accepted
    ///
    /// An attempt is accepted unless it contradicted. An attempt stopped by
    /// the step limit is accepted as it stands.
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::ExhaustedAttempts`] when every attempt
    /// contradicted, or the first error raised by an attempt
    pub fn generate(&self) -> Result<Generation> {
        let progress = AttemptProgress::new(self.config.restarts, self.config.quiet);
        let outcome = match self.config.parallel_batch {
            Some(batch) => self.generate_batched(batch, progress),
            None => self.generate_sequential(progress),
        }?;

        info!(
            attempts = outcome.index + 1,
            seed = outcome.seed,
            steps = outcome.model.steps(),
            status = ?outcome.model.status(),
            "generation finished"
        );
        Ok(Generation {
            attempts: outcome.index + 1,
            seed: outcome.seed,
            frames: outcome.frames,
            model: outcome.model,
        })
    }

    fn generate_sequential(&self, mut progress: AttemptProgress) -> Result<Attempt> {
        for index in 0..self.config.restarts {
            let attempt = self.attempt(index)?;
            if attempt.accepted() {
                progress.finish(Some(attempt.seed));
                return Ok(attempt);
            }
            debug!(
                attempt = index,
                seed = attempt.seed,
                steps = attempt.model.steps(),
                "attempt contradicted"
            );
            progress.fail_attempt(attempt.seed);
        }
        progress.finish(None);
        Err(self.exhausted())
    }

    fn generate_batched(&self, batch: usize, mut progress: AttemptProgress) -> Result<Attempt> {
        let mut start = 0;
        while start < self.config.restarts {
            let end = (start + batch).min(self.config.restarts);
            let results: Vec<Result<Attempt>> =
                (start..end).into_par_iter().map(|index| self.attempt(index)).collect();

            let mut failed = 0;
            for result in results {
                let attempt = result?;
                if attempt.accepted() {
                    if failed > 0 {
                        progress.fail_batch(failed, attempt.seed.wrapping_sub(1));
                    }
                    progress.finish(Some(attempt.seed));
                    return Ok(attempt);
                }
                failed += 1;
            }
            debug!(first = start, last = end - 1, "batch contradicted");
            progress.fail_batch(failed, self.attempt_seed(end - 1));
            start = end;
        }
        progress.finish(None);
        Err(self.exhausted())
    }

    fn attempt(&self, index: usize) -> Result<Attempt> {
        let seed = self.attempt_seed(index);
        let mut config = self.model.clone();
        // The noise field only takes the low bits of the seed.
        config.options.noise.seed = seed as u32;

        let mut model = Model::new(Arc::clone(&self.tiles), &config)?;
        let capture = self
            .config
            .capture_frames
            .then(|| FrameCapture::new(self.frame_limit()));
        if let Some(capture) = &capture {
            capture.attach(&mut model);
        }

        model.run(seed, self.config.limit)?;
        model.clear_step_recorder();

        Ok(Attempt {
            index,
            seed,
            model,
            frames: capture.map(FrameCapture::into_frames).unwrap_or_default(),
        })
    }

    fn exhausted(&self) -> WfcError {
        WfcError::ExhaustedAttempts {
            attempts: self.config.restarts,
            last_seed: self.attempt_seed(self.config.restarts.saturating_sub(1)),
        }
    }
}
