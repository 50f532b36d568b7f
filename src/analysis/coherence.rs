//! Keeping placed-tile shares close to their weight shares
//!
//! The tracker counts every placement of the current attempt. Once at least
//! one tile has been placed, tiles whose share drifts beyond the tolerance
//! are damped or boosted in proportion to the drift.

use crate::analysis::distribution::Distribution;
use crate::io::configuration::{
    DEFAULT_COHERENCE_CAP, DEFAULT_COHERENCE_FLOOR, DEFAULT_COHERENCE_STRENGTH,
    DEFAULT_COHERENCE_TOLERANCE,
};
use crate::io::error::{Result, invalid_parameter};

/// Tunables of the coherence adjuster
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoherenceOptions {
    /// Allowed absolute drift before any correction
    pub tolerance: f64,
    /// Correction per unit of drift beyond the tolerance
    pub strength: f64,
    /// Lowest multiplier for an over-represented tile
    pub floor: f64,
    /// Highest multiplier for an under-represented tile
    pub cap: f64,
}

impl Default for CoherenceOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_COHERENCE_TOLERANCE,
            strength: DEFAULT_COHERENCE_STRENGTH,
            floor: DEFAULT_COHERENCE_FLOOR,
            cap: DEFAULT_COHERENCE_CAP,
        }
    }
}

impl CoherenceOptions {
    /// Check the option values
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or any other option is
    /// not finite and positive
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(invalid_parameter(
                "coherence tolerance",
                &self.tolerance,
                &"must be finite and non-negative",
            ));
        }
        for (name, value) in [
            ("coherence strength", self.strength),
            ("coherence floor", self.floor),
            ("coherence cap", self.cap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid_parameter(name, &value, &"must be finite and positive"));
            }
        }
        Ok(())
    }
}

/// Placement counts of the current attempt
#[derive(Clone, Debug, PartialEq)]
pub struct CoherenceTracker {
    counts: Vec<u32>,
    decisions: u32,
    target_shares: Vec<f64>,
    tolerance: f64,
}

impl CoherenceTracker {
    /// Tracker whose target shares follow `weights`
    pub fn new(weights: &[f64], tolerance: f64) -> Self {
        let sum: f64 = weights.iter().sum();
        let sum = if sum > 0.0 { sum } else { 1.0 };
        Self {
            counts: vec![0; weights.len()],
            decisions: 0,
            target_shares: weights.iter().map(|w| w / sum).collect(),
            tolerance,
        }
    }

    /// Count one placement; out-of-range tiles are ignored
    pub fn register(&mut self, tile: usize) {
        if let Some(count) = self.counts.get_mut(tile) {
            *count += 1;
            self.decisions += 1;
        }
    }

    /// Clear all counts
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.decisions = 0;
    }

    /// Placements so far
    pub const fn decisions(&self) -> u32 {
        self.decisions
    }

    /// Placements of one tile
    pub fn count(&self, tile: usize) -> u32 {
        self.counts.get(tile).copied().unwrap_or(0)
    }

    /// Current share of one tile, 0 before any placement
    pub fn share(&self, tile: usize) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            f64::from(self.count(tile)) / f64::from(self.decisions)
        }
    }

    /// Share of one tile implied by the weights
    pub fn target_share(&self, tile: usize) -> f64 {
        self.target_shares.get(tile).copied().unwrap_or(0.0)
    }

    /// Allowed drift before correcting
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Adjuster correcting drift away from the target shares
#[derive(Clone, Debug)]
pub struct CoherenceAdjuster {
    tracker: CoherenceTracker,
    options: CoherenceOptions,
}

impl CoherenceAdjuster {
    /// Adjuster with a fresh tracker over `weights`
    pub fn new(weights: &[f64], options: CoherenceOptions) -> Self {
        Self {
            tracker: CoherenceTracker::new(weights, options.tolerance),
            options,
        }
    }

    /// The placement tracker
    pub const fn tracker(&self) -> &CoherenceTracker {
        &self.tracker
    }

    /// The placement tracker, mutably
    pub const fn tracker_mut(&mut self) -> &mut CoherenceTracker {
        &mut self.tracker
    }

    /// Multiplier for one tile given the current counts
    pub fn modifier(&self, tile: usize) -> f64 {
        if self.tracker.decisions == 0 {
            return 1.0;
        }
        let tolerance = self.tracker.tolerance;
        let delta = self.tracker.share(tile) - self.tracker.target_share(tile);
        if delta.abs() <= tolerance {
            1.0
        } else if delta > 0.0 {
            (delta - tolerance)
                .mul_add(-self.options.strength, 1.0)
                .max(self.options.floor)
        } else {
            (-delta - tolerance)
                .mul_add(self.options.strength, 1.0)
                .min(self.options.cap)
        }
    }

    /// Apply the drift correction
    pub fn adjust(&self, distribution: &mut Distribution) {
        if self.tracker.decisions == 0 {
            return;
        }
        for tile in 0..distribution.len() {
            distribution.scale(tile, self.modifier(tile));
        }
    }
}
