//! Distribution adjusters applied before a cell is observed

/// Drift correction towards weight shares
pub mod coherence;
/// Neighbour-aware weighting
pub mod contextual;
/// Adjuster pipeline and the distribution value type
pub mod distribution;
/// Hashed spatial bias between tile groups
pub mod noise;
