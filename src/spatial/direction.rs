//! Cardinal directions of the 4-neighbourhood in image coordinates
//!
//! The x axis grows to the right and the y axis grows downwards, so `South`
//! points at the next row. Direction indices are stable and used to index
//! propagator tables and compatibility counters.

use std::fmt;

/// One of the four grid neighbours of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Negative x
    West = 0,
    /// Positive y
    South = 1,
    /// Positive x
    East = 2,
    /// Negative y
    North = 3,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Self; 4] = [Self::West, Self::South, Self::East, Self::North];

    /// Number of directions in the neighbourhood
    pub const COUNT: usize = 4;

    /// Stable table index of this direction
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a table index
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::West),
            1 => Some(Self::South),
            2 => Some(Self::East),
            3 => Some(Self::North),
            _ => None,
        }
    }

    /// The direction pointing back at the origin cell
    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::North => Self::South,
        }
    }

    /// Grid offset `[dx, dy]`
    pub const fn offset(self) -> [i32; 2] {
        match self {
            Self::West => [-1, 0],
            Self::South => [0, 1],
            Self::East => [1, 0],
            Self::North => [0, -1],
        }
    }

    /// Direction after the quarter turn applied by transform slot 1
    ///
    /// Tile rotation is counter-clockwise on screen, so an eastern
    /// neighbour ends up to the north.
    pub const fn rotated(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }

    /// Lowercase name of the direction
    pub const fn name(self) -> &'static str {
        match self {
            Self::West => "west",
            Self::South => "south",
            Self::East => "east",
            Self::North => "north",
        }
    }

    /// Whether the direction runs along the x axis
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::West | Self::East)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
