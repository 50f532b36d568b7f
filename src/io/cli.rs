//! Command-line interface for generating a grid from a tile catalog

use crate::algorithm::heuristics::Heuristic;
use crate::algorithm::model::ModelConfig;
use crate::algorithm::selection::PatternStrategy;
use crate::analysis::distribution::{AdjusterKind, AdjusterOptions};
use crate::io::catalog::load_catalog;
use crate::io::configuration::{
    ANIMATION_SUFFIX, DEFAULT_HEIGHT, DEFAULT_OUTPUT, DEFAULT_PARALLEL_BATCH, DEFAULT_RESTARTS,
    DEFAULT_SEED, DEFAULT_WIDTH, GIF_FRAME_DELAY_MS,
};
use crate::io::error::Result;
use crate::io::generator::{Generation, Generator, GeneratorConfig};
use crate::io::image::{export_png, render_model};
use crate::io::visualization::FrameCapture;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "tiledwfc")]
#[command(
    author,
    version,
    about = "Fill a grid with tiles under adjacency rules using wave function collapse"
)]
/// Command-line arguments for the generator
// Each adjuster and output extra is an independent switch
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Tile catalog XML file
    #[arg(short, long, value_name = "FILE")]
    pub xml: PathBuf,

    /// Directory holding `<name>.png` bitmaps for every tile
    #[arg(short, long, value_name = "DIR")]
    pub tiles: Option<PathBuf>,

    /// Grid width in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Grid height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Seed of the first attempt
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum observation steps per attempt
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Attempts before giving up
    #[arg(short, long, default_value_t = DEFAULT_RESTARTS)]
    pub restarts: usize,

    /// Wrap the grid around its edges
    #[arg(short, long)]
    pub periodic: bool,

    /// Rule for picking the next cell
    #[arg(long, value_enum, default_value_t = Heuristic::default())]
    pub heuristic: Heuristic,

    /// Rule for picking a tile within a cell
    #[arg(long, value_enum, default_value_t = PatternStrategy::default())]
    pub pattern: PatternStrategy,

    /// Disable neighbour-aware weighting
    #[arg(long)]
    pub no_context: bool,

    /// Enable spatial noise between tile groups
    #[arg(short, long)]
    pub noise: bool,

    /// Disable share correction toward tile weights
    #[arg(long)]
    pub no_coherence: bool,

    /// Output PNG path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write the run as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Maximum frames in the animation
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Evaluate attempts in parallel batches
    #[arg(long)]
    pub parallel: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Model settings selected by the flags
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            width: self.width,
            height: self.height,
            periodic: self.periodic,
            heuristic: self.heuristic,
            pattern: self.pattern,
            adjusters: AdjusterKind::canonical(!self.no_context, self.noise, !self.no_coherence),
            options: AdjusterOptions::default(),
        }
    }

    /// Restart settings selected by the flags
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            limit: self.limit,
            restarts: self.restarts,
            capture_frames: self.visualize,
            frame_limit: self.frames,
            parallel_batch: self.parallel.then_some(DEFAULT_PARALLEL_BATCH),
            quiet: !self.should_show_progress(),
        }
    }

    /// Path of the animation written next to the output image
    pub fn animation_path(&self) -> PathBuf {
        let stem = self.output.file_stem().unwrap_or_default();
        let name = format!("{}{ANIMATION_SUFFIX}.gif", stem.to_string_lossy());

        match self.output.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Loads the catalog, runs the generator and writes the outputs
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Generate and export according to the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or compiled, every
    /// attempt contradicts, or an output file cannot be written
    pub fn run(&self) -> Result<Generation> {
        let catalog = load_catalog(&self.cli.xml, self.cli.tiles.as_deref())?;
        let tiles = Arc::new(catalog.build()?);
        info!(
            tiles = catalog.tiles().len(),
            variants = tiles.tile_count(),
            rules = catalog.rules().len(),
            "tile set compiled"
        );

        let generator = Generator::new(
            tiles,
            self.cli.model_config(),
            self.cli.generator_config(),
        )?;
        let generation = generator.generate()?;
        if !generation.status().is_finished() {
            warn!(
                steps = generation.model.steps(),
                "step limit reached before the grid was complete"
            );
        }

        Self::export(&generation, &self.cli.output)?;
        if self.cli.visualize {
            let path = self.cli.animation_path();
            FrameCapture::export_gif(&generation.frames, &path, GIF_FRAME_DELAY_MS)?;
            info!(path = %path.display(), frames = generation.frames.len(), "animation written");
        }

        Ok(generation)
    }

    fn export(generation: &Generation, output: &Path) -> Result<()> {
        export_png(&render_model(&generation.model), output)?;
        info!(path = %output.display(), "image written");
        Ok(())
    }
}
