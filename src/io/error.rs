//! Error types for catalog construction, generation and file output

use std::fmt;
use std::path::PathBuf;

/// Main error type for all tiled generation operations
///
/// A contradiction during an attempt is not an error: it is reported as
/// [`crate::algorithm::model::RunStatus::Contradicted`] and handled by the
/// restart loop.
#[derive(Debug)]
pub enum WfcError {
    /// Failed to load a tile bitmap from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Catalog document is malformed
    CatalogParse {
        /// Description of the parse failure
        reason: String,
    },

    /// Catalog content is structurally invalid
    InvalidCatalog {
        /// Description of what's wrong with the catalog
        reason: String,
    },

    /// Neighbour rule names a tile that is not in the catalog
    UnknownTile {
        /// The unresolved tile name
        name: String,
    },

    /// Neighbour rule uses a transform index outside `0..8`
    InvalidTransform {
        /// Tile the transform was applied to
        name: String,
        /// The rejected transform index
        index: usize,
    },

    /// A tile variant has no allowed neighbour in some direction
    IsolatedTile {
        /// Name of the isolated variant
        name: String,
        /// Direction with no allowed neighbour
        direction: &'static str,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Every restart attempt ended in a contradiction
    ExhaustedAttempts {
        /// Number of attempts made
        attempts: usize,
        /// Seed used by the final attempt
        last_seed: u64,
    },

    /// The pattern selector found nothing to place in a live cell
    SamplingFailure {
        /// Cell being observed
        cell: usize,
        /// Observation step when this occurred
        step: usize,
    },

    /// A model was stepped before its first reset
    NotStarted,
}

impl WfcError {
    /// Whether the error stems from the catalog or the configuration
    ///
    /// These are fatal at construction time and never worth a restart.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::CatalogParse { .. }
                | Self::InvalidCatalog { .. }
                | Self::UnknownTile { .. }
                | Self::InvalidTransform { .. }
                | Self::IsolatedTile { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl fmt::Display for WfcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::CatalogParse { reason } => write!(f, "Malformed tile catalog: {reason}"),
            Self::InvalidCatalog { reason } => write!(f, "Invalid tile catalog: {reason}"),
            Self::UnknownTile { name } => {
                write!(f, "Neighbour rule references unknown tile '{name}'")
            }
            Self::InvalidTransform { name, index } => {
                write!(f, "Transform {index} of tile '{name}' is outside 0..8")
            }
            Self::IsolatedTile { name, direction } => {
                write!(f, "Tile '{name}' has no allowed neighbour to the {direction}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ExhaustedAttempts {
                attempts,
                last_seed,
            } => {
                write!(
                    f,
                    "All {attempts} attempts ended in contradiction (last seed {last_seed})"
                )
            }
            Self::SamplingFailure { cell, step } => {
                write!(f, "No pattern could be sampled for cell {cell} at step {step}")
            }
            Self::NotStarted => write!(f, "Model was stepped before being reset"),
        }
    }
}

impl std::error::Error for WfcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, WfcError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WfcError {
    WfcError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid catalog error
pub fn invalid_catalog(reason: &impl ToString) -> WfcError {
    WfcError::InvalidCatalog {
        reason: reason.to_string(),
    }
}

/// Create a catalog parse error
pub fn catalog_parse(reason: &impl ToString) -> WfcError {
    WfcError::CatalogParse {
        reason: reason.to_string(),
    }
}
