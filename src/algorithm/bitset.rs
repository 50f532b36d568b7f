use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset holding the tiles still allowed in one cell
///
/// Indices are tile variant ids, starting at zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitset {
    bits: BitVec,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(tile_count: usize) -> Self {
        Self {
            bits: bitvec![0; tile_count],
        }
    }

    /// Create a bitset containing every tile
    pub fn all(tile_count: usize) -> Self {
        Self {
            bits: bitvec![1; tile_count],
        }
    }

    /// Size of the tile universe
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert a tile; out-of-range ids are ignored
    pub fn insert(&mut self, tile: usize) {
        if tile < self.bits.len() {
            self.bits.set(tile, true);
        }
    }

    /// Remove a tile, returning whether it was present
    pub fn remove(&mut self, tile: usize) -> bool {
        match self.bits.get_mut(tile) {
            Some(mut bit) if *bit => {
                *bit = false;
                true
            }
            _ => false,
        }
    }

    /// Put every tile back
    pub fn fill(&mut self) {
        self.bits.fill(true);
    }

    /// Test tile membership
    pub fn contains(&self, tile: usize) -> bool {
        self.bits.get(tile).as_deref() == Some(&true)
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Test if every tile is present
    pub fn is_full(&self) -> bool {
        self.bits.all()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Lowest tile id in the set
    pub fn first(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Iterate over present tile ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all tile ids as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileBitset({} tiles: {:?})", self.count(), self.to_vec())
    }
}
