//! Grid and coordinate types.

use std::cmp::Ordering;
use std::fmt;

/// A coordinate on the grid.
///
/// Coordinates order by row first, then column ("reading order"), which is
/// the order every tie-break in the simulation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Get adjacent coordinates in reading order (up, left, right, down).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.y > 0 {
            result[count as usize] = Coord::new(self.x, self.y - 1); // up
            count += 1;
        }
        if self.x > 0 {
            result[count as usize] = Coord::new(self.x - 1, self.y); // left
            count += 1;
        }
        if self.x + 1 < width {
            result[count as usize] = Coord::new(self.x + 1, self.y); // right
            count += 1;
        }
        if self.y + 1 < height {
            result[count as usize] = Coord::new(self.x, self.y + 1); // down
            count += 1;
        }

        (result, count)
    }

    /// Check whether `other` is one of the four orthogonal neighbours.
    #[must_use]
    pub const fn is_adjacent(&self, other: Coord) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Terrain of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Cell {
    /// Open floor - units may stand and walk here.
    Open = 0,
    /// Wall - impassable for the whole battle.
    Wall = 1,
}

impl Cell {
    /// Check if this cell can be stood on.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Cell::Open)
    }

    /// Map glyph for this cell.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
        }
    }
}

/// The battlefield layout. Fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width of the grid in cells.
    width: u16,
    /// Height of the grid in cells.
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from row-major cells.
    ///
    /// Returns `None` if either dimension is zero or the cell count does not
    /// match `width * height`.
    #[must_use]
    pub fn new(width: u16, height: u16, cells: Vec<Cell>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if cells.len() != usize::from(width) * usize::from(height) {
            return None;
        }

        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Build an all-open grid of the given size.
    #[must_use]
    pub fn open(width: u16, height: u16) -> Option<Self> {
        let size = usize::from(width) * usize::from(height);
        Self::new(width, height, vec![Cell::Open; size])
    }

    /// Get the width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells (`width * height`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if a coordinate is within the grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to a row-major index.
    #[must_use]
    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Whether a unit could stand on `coord`. Out-of-bounds is never open.
    #[must_use]
    #[inline]
    pub fn is_open(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_passable)
    }

    /// In-bounds orthogonal neighbours of `coord`, in reading order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + use<> {
        let (adjacent, count) = coord.adjacent(self.width, self.height);
        adjacent.into_iter().take(usize::from(count))
    }

    /// Iterate over all coordinates and cells in reading order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        let width = usize::from(self.width);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, *cell)
        })
    }
}
