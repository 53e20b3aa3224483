//! Grid coordinates and device grid bounds.
//!
//! A [`Location`] is either an absolute tile coordinate or, inside routing
//! graph records, an offset relative to the tile that owns the record. The
//! device [`Grid`] fixes the row-major traversal order that every per-tile
//! table in the output follows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile coordinate or a relative tile offset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Location {
    /// Column (absolute) or column delta (relative).
    pub x: i32,
    /// Row (absolute) or row delta (relative).
    pub y: i32,
}

impl Location {
    /// The reserved coordinate for global, non-tile resources.
    pub const GLOBAL: Location = Location { x: -2, y: -2 };

    /// Creates a location from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns `true` for the reserved global sentinel.
    pub fn is_global(self) -> bool {
        self == Self::GLOBAL
    }

    /// Applies a relative offset to this absolute location.
    pub fn offset(self, rel: Location) -> Location {
        Location::new(self.x + rel.x, self.y + rel.y)
    }

    /// The x component as the 16-bit value stored in the database.
    ///
    /// Negative relative offsets wrap to their two's-complement encoding.
    pub fn x_u16(self) -> u16 {
        self.x as u16
    }

    /// The y component as the 16-bit value stored in the database.
    pub fn y_u16(self) -> u16 {
        self.y as u16
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}/Y{}", self.x, self.y)
    }
}

/// Inclusive bounds of a device tile grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Grid {
    /// Largest valid column index.
    pub max_col: i32,
    /// Largest valid row index.
    pub max_row: i32,
}

impl Grid {
    /// Creates grid bounds from the largest column and row indices.
    pub const fn new(max_col: i32, max_row: i32) -> Self {
        Self { max_col, max_row }
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        (self.max_col + 1).max(0) as u32
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        (self.max_row + 1).max(0) as u32
    }

    /// Total number of grid cells.
    pub fn num_tiles(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Returns `true` if `loc` lies inside the grid.
    pub fn contains(&self, loc: Location) -> bool {
        (0..=self.max_col).contains(&loc.x) && (0..=self.max_row).contains(&loc.y)
    }

    /// Returns `true` if `loc` is on the last row of the device.
    pub fn is_bottom_row(&self, loc: Location) -> bool {
        loc.y == self.max_row
    }

    /// Row-major slot of `loc` in a per-tile table, if it lies inside the grid.
    pub fn index_of(&self, loc: Location) -> Option<usize> {
        if self.contains(loc) {
            Some(loc.y as usize * self.width() as usize + loc.x as usize)
        } else {
            None
        }
    }

    /// Iterates every coordinate in row-major order (y outer, x inner).
    pub fn locations(&self) -> impl Iterator<Item = Location> {
        let (max_col, max_row) = (self.max_col, self.max_row);
        (0..=max_row).flat_map(move |y| (0..=max_col).map(move |x| Location::new(x, y)))
    }
}
