//! Output grid topology with optional wrap-around
//!
//! Cells are addressed by a flat row-major index `x + y * width`. The layout
//! answers neighbour queries for propagation and decides which cells are
//! allowed to be picked by a heuristic when the grid does not wrap.

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::direction::Direction;

/// Dimensions and boundary behaviour of the output grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    width: usize,
    height: usize,
    periodic: bool,
    footprint: usize,
}

impl GridLayout {
    /// Create a layout for a `width` x `height` grid
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn new(width: usize, height: usize, periodic: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "grid",
                &format!("{width}x{height}"),
                &"grid dimensions must be positive",
            ));
        }

        Ok(Self {
            width,
            height,
            periodic,
            footprint: 1,
        })
    }

    /// Use a square tile footprint spanning `footprint` cells
    ///
    /// The simple tiled model always places single-cell tiles; larger
    /// footprints only affect which cells may be picked on a bounded grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the footprint is zero or larger than the grid
    pub fn with_footprint(mut self, footprint: usize) -> Result<Self> {
        if footprint == 0 || footprint > self.width.min(self.height) {
            return Err(invalid_parameter(
                "footprint",
                &footprint,
                &"footprint must fit inside the grid",
            ));
        }
        self.footprint = footprint;
        Ok(self)
    }

    /// Grid width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether the grid wraps around at its edges
    pub const fn periodic(&self) -> bool {
        self.periodic
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Flat index of the cell at `(x, y)`
    pub const fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    /// `[x, y]` coordinates of a flat index
    pub const fn coordinates(&self, index: usize) -> [usize; 2] {
        [index % self.width, index / self.width]
    }

    /// Whether a heuristic may pick this cell
    ///
    /// On a bounded grid a cell is excluded when the footprint anchored at
    /// it would leave the grid.
    pub const fn is_candidate(&self, index: usize) -> bool {
        if self.periodic {
            return true;
        }
        let [x, y] = self.coordinates(index);
        x + self.footprint <= self.width && y + self.footprint <= self.height
    }

    /// Neighbouring cell in `direction`, if any
    pub const fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let [x, y] = self.coordinates(index);
        let [dx, dy] = direction.offset();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        let width = self.width as i64;
        let height = self.height as i64;

        if !self.periodic {
            let footprint = self.footprint as i64;
            if nx < 0 || ny < 0 || nx + footprint > width || ny + footprint > height {
                return None;
            }
        }

        let wrapped_x = nx.rem_euclid(width) as usize;
        let wrapped_y = ny.rem_euclid(height) as usize;
        Some(self.index(wrapped_x, wrapped_y))
    }

    /// Iterate over the neighbours of a cell with their directions
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.neighbor(index, direction).map(|n| (direction, n)))
    }

    /// Inward clockwise spiral over every cell, starting at the top-left
    pub fn spiral_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.cell_count());
        let mut left = 0_i64;
        let mut right = self.width as i64 - 1;
        let mut top = 0_i64;
        let mut bottom = self.height as i64 - 1;

        while left <= right && top <= bottom {
            for x in left..=right {
                order.push(self.index(x as usize, top as usize));
            }
            for y in top + 1..=bottom {
                order.push(self.index(right as usize, y as usize));
            }
            if top != bottom {
                for x in (left..right).rev() {
                    order.push(self.index(x as usize, bottom as usize));
                }
            }
            if left != right {
                for y in (top + 1..bottom).rev() {
                    order.push(self.index(left as usize, y as usize));
                }
            }
            left += 1;
            right -= 1;
            top += 1;
            bottom -= 1;
        }

        order
    }
}
