//! Generation constants and runtime configuration defaults

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default output grid width in cells
pub const DEFAULT_WIDTH: usize = 24;

/// Default output grid height in cells
pub const DEFAULT_HEIGHT: usize = 24;

/// Default number of restart attempts before giving up
pub const DEFAULT_RESTARTS: usize = 200;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Frames recorded beyond one per cell when capturing a run
pub const EXTRA_FRAMES: usize = 20;

/// Attempts evaluated together in one parallel batch
pub const DEFAULT_PARALLEL_BATCH: usize = 8;

// Distribution adjuster defaults
/// Boost per unit of neighbour support in contextual weighting
pub const DEFAULT_CONTEXT_BIAS: f64 = 1.0;
/// Multiplier for tiles without neighbour support
pub const DEFAULT_CONTEXT_PENALTY: f64 = 0.2;

/// Multiplier for the preferred tile group of a cell
pub const DEFAULT_NOISE_BOOST: f64 = 1.4;
/// Multiplier for every other tile group
pub const DEFAULT_NOISE_BLEED: f64 = 0.85;

/// Allowed drift of a tile's placed share before correcting
pub const DEFAULT_COHERENCE_TOLERANCE: f64 = 0.12;
/// Correction per unit of drift beyond the tolerance
pub const DEFAULT_COHERENCE_STRENGTH: f64 = 0.6;
/// Lowest multiplier applied to an over-represented tile
pub const DEFAULT_COHERENCE_FLOOR: f64 = 0.25;
/// Highest multiplier applied to an under-represented tile
pub const DEFAULT_COHERENCE_CAP: f64 = 2.0;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;

// Output settings
/// Default output image path
pub const DEFAULT_OUTPUT: &str = "output.png";
/// Suffix added to the animation file name
pub const ANIMATION_SUFFIX: &str = "_steps";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 20;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Edge length in pixels of a cell in bitmap-less renders
pub const PLACEHOLDER_CELL_SIZE: u32 = 4;
