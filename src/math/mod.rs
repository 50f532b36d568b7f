//! Mathematical utilities for the generator

/// Entropy of weighted domains
pub mod entropy;
/// Coordinate hashing for deterministic noise
pub mod hashing;
/// Seeded uniform random source
pub mod random;
