//! Adjacency tables between tile variants
//!
//! [`AdjacencyMatrix`] is the dense boolean tensor filled while rules are
//! expanded under symmetry. [`Propagator`] is its sparse form used during
//! propagation: for every direction and tile, the sorted list of tiles that
//! may sit next to it in that direction.

use ndarray::{Array3, Axis};

use crate::io::error::{Result, WfcError};
use crate::spatial::direction::Direction;

/// Dense `[direction, from, to]` adjacency tensor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    dense: Array3<bool>,
}

impl AdjacencyMatrix {
    /// Create an empty matrix for `tile_count` variants
    pub fn new(tile_count: usize) -> Self {
        Self {
            dense: Array3::from_elem((Direction::COUNT, tile_count, tile_count), false),
        }
    }

    /// Number of tile variants covered
    pub fn tile_count(&self) -> usize {
        self.dense.dim().1
    }

    /// Allow `to` as the neighbour of `from` in `direction`
    pub fn allow(&mut self, direction: Direction, from: usize, to: usize) {
        if let Some(entry) = self.dense.get_mut((direction.index(), from, to)) {
            *entry = true;
        }
    }

    /// Whether `to` may be the neighbour of `from` in `direction`
    pub fn is_allowed(&self, direction: Direction, from: usize, to: usize) -> bool {
        self.dense
            .get((direction.index(), from, to))
            .copied()
            .unwrap_or(false)
    }

    /// Derive the east and north slices from west and south
    ///
    /// Any entry previously set in the east or north slice is replaced.
    pub fn mirror(&mut self) {
        for (source, target) in [
            (Direction::West, Direction::East),
            (Direction::South, Direction::North),
        ] {
            let transposed = self
                .dense
                .index_axis(Axis(0), source.index())
                .t()
                .to_owned();
            self.dense
                .index_axis_mut(Axis(0), target.index())
                .assign(&transposed);
        }
    }

    /// Compact into sparse neighbour lists
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::IsolatedTile`] naming the first variant that has
    /// no allowed neighbour in some direction
    pub fn compact(&self, name_of: impl Fn(usize) -> String) -> Result<Propagator> {
        let tile_count = self.tile_count();
        let mut allowed = Vec::with_capacity(Direction::COUNT);

        for direction in Direction::ALL {
            let slice = self.dense.index_axis(Axis(0), direction.index());
            let mut lists = Vec::with_capacity(tile_count);
            for (from, row) in slice.outer_iter().enumerate() {
                let list: Vec<usize> = row
                    .iter()
                    .enumerate()
                    .filter_map(|(to, &ok)| ok.then_some(to))
                    .collect();
                if list.is_empty() {
                    return Err(WfcError::IsolatedTile {
                        name: name_of(from),
                        direction: direction.name(),
                    });
                }
                lists.push(list);
            }
            allowed.push(lists);
        }

        Ok(Propagator {
            allowed,
            tile_count,
        })
    }
}

/// Sparse per-direction neighbour lists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Propagator {
    allowed: Vec<Vec<Vec<usize>>>,
    tile_count: usize,
}

impl Propagator {
    /// Number of tile variants
    pub const fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Tiles allowed as the neighbour of `tile` in `direction`, ascending
    pub fn allowed(&self, direction: Direction, tile: usize) -> &[usize] {
        self.allowed
            .get(direction.index())
            .and_then(|lists| lists.get(tile))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Starting value of the compatibility counter `[tile][direction]`
    ///
    /// Counts the tiles that may sit next to `tile` on the side opposite to
    /// `direction`, which are the tiles whose bans arrive travelling in
    /// `direction`.
    pub fn support(&self, direction: Direction, tile: usize) -> usize {
        self.allowed(direction.opposite(), tile).len()
    }

    /// Normalised co-occurrence rows `freq[d][t][u]`
    ///
    /// Every allowed neighbour `u` of `t` in direction `d` receives an equal
    /// share `1 / |allowed[d][t]|` of the row.
    pub fn frequency_rows(&self) -> Array3<f64> {
        let mut rows = Array3::zeros((Direction::COUNT, self.tile_count, self.tile_count));
        for direction in Direction::ALL {
            for tile in 0..self.tile_count {
                let allowed = self.allowed(direction, tile);
                if allowed.is_empty() {
                    continue;
                }
                let share = 1.0 / allowed.len() as f64;
                for &neighbor in allowed {
                    if let Some(entry) = rows.get_mut((direction.index(), tile, neighbor)) {
                        *entry += share;
                    }
                }
            }
        }
        rows
    }
}
