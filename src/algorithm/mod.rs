/// Per-cell tile domains backed by bit vectors
pub mod bitset;
/// Cell-selection heuristics
pub mod heuristics;
/// Observation, propagation and run control
pub mod model;
/// Dense and sparse adjacency between tile variants
pub mod propagator;
/// Tile choice within an observed cell
pub mod selection;
/// Wave state with incremental entropy and compatibility counters
pub mod wave;
