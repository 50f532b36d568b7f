//! Loading, rendering and orchestration around the core engine

/// XML tile catalog parsing and bitmap loading
pub mod catalog;
/// Command-line arguments and the run driver
pub mod cli;
/// Defaults and limits
pub mod configuration;
/// Error type shared by the crate
pub mod error;
/// Restart loop over seeded attempts
pub mod generator;
/// Rasterising and PNG export
pub mod image;
/// Attempt progress bar
pub mod progress;
/// Frame capture and GIF export
pub mod visualization;
