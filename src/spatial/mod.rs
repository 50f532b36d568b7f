//! Grid topology, directions and tile catalogs
//!
//! This module contains spatial-related functionality including:
//! - The four cardinal directions and their rotation
//! - Grid layout with optional wrap-around
//! - Symmetry classes and the catalog expansion into tile variants

/// Cardinal directions of the 4-neighbourhood
pub mod direction;
/// Output grid layout and neighbour queries
pub mod grid;
/// Rotation and reflection tables of tile symmetry classes
pub mod symmetry;
/// Tile catalog, variants and the expanded tile set
pub mod tiles;

pub use grid::GridLayout;
