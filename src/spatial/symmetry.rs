//! Symmetry classes of tile bitmaps
//!
//! A class fixes how many distinct orientations a tile has and how the
//! quarter-turn `rotate` and the mirror `reflect` permute them. Each class
//! is named after a letter with the same symmetry group.

use std::fmt;
use std::str::FromStr;

use crate::io::error::{WfcError, invalid_catalog};

/// Number of entries in a transform table
pub const TRANSFORM_COUNT: usize = 8;

/// Orientation set of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SymmetryClass {
    /// Invariant under every rotation and reflection
    #[default]
    X,
    /// Two orientations, mirror symmetric
    I,
    /// Two orientations, diagonal symmetric
    Backslash,
    /// Four rotations, reflection maps to a neighbouring rotation
    L,
    /// Four rotations, mirror symmetric about one axis
    T,
    /// All eight orientations are distinct
    F,
}

impl SymmetryClass {
    /// Number of distinct variants the class produces
    pub const fn cardinality(self) -> usize {
        match self {
            Self::X => 1,
            Self::I | Self::Backslash => 2,
            Self::L | Self::T => 4,
            Self::F => 8,
        }
    }

    /// Local variant index after a quarter turn
    pub const fn rotate(self, i: usize) -> usize {
        match self {
            Self::X => i,
            Self::I | Self::Backslash => 1 - i,
            Self::L | Self::T => (i + 1) % 4,
            Self::F => {
                if i < 4 {
                    (i + 1) % 4
                } else {
                    4 + (i - 1) % 4
                }
            }
        }
    }

    /// Local variant index after a mirror
    pub const fn reflect(self, i: usize) -> usize {
        match self {
            Self::X | Self::I => i,
            Self::Backslash => 1 - i,
            Self::L => {
                if i % 2 == 0 {
                    i + 1
                } else {
                    i - 1
                }
            }
            Self::T => {
                if i % 2 == 0 {
                    i
                } else {
                    4 - i
                }
            }
            Self::F => {
                if i < 4 {
                    i + 4
                } else {
                    i - 4
                }
            }
        }
    }

    /// Global ids reached from local variant `local` by each of the eight
    /// rotation/reflection combinations
    ///
    /// Slot `k < 4` is `k` quarter turns, slot `k >= 4` is a mirror applied
    /// after `k - 4` quarter turns.
    pub const fn transforms(self, base: usize, local: usize) -> [usize; TRANSFORM_COUNT] {
        let r1 = self.rotate(local);
        let r2 = self.rotate(r1);
        let r3 = self.rotate(r2);
        [
            base + local,
            base + r1,
            base + r2,
            base + r3,
            base + self.reflect(local),
            base + self.reflect(r1),
            base + self.reflect(r2),
            base + self.reflect(r3),
        ]
    }

    /// Catalog notation of the class
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::I => "I",
            Self::Backslash => "\\",
            Self::L => "L",
            Self::T => "T",
            Self::F => "F",
        }
    }
}

impl FromStr for SymmetryClass {
    type Err = WfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Self::X),
            "I" => Ok(Self::I),
            "\\" => Ok(Self::Backslash),
            "L" => Ok(Self::L),
            "T" => Ok(Self::T),
            "F" => Ok(Self::F),
            other => Err(invalid_catalog(&format!("unknown symmetry class '{other}'"))),
        }
    }
}

impl fmt::Display for SymmetryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
