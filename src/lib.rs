//! Simple tiled model wave function collapse
//!
//! A catalog of tiles with symmetry classes and neighbour rules is compiled
//! into a [`spatial::tiles::TileSet`]. A [`algorithm::model::Model`] then
//! fills a grid cell by cell: it picks the most constrained cell, samples a
//! tile from an adjusted weight distribution and propagates the resulting
//! bans until the grid is solved or a cell runs out of tiles. Failed
//! attempts are retried with new seeds by [`io::generator::Generator`].

#![forbid(unsafe_code)]

/// Wave state, propagation, cell heuristics and tile selection
pub mod algorithm;
/// Distribution adjusters applied before each observation
pub mod analysis;
/// Catalog loading, rendering, restarts and the command line
pub mod io;
/// Entropy, hashing and random number utilities
pub mod math;
/// Directions, grid topology, symmetry and tile catalogs
pub mod spatial;

pub use io::error::{Result, WfcError};
