//! The growable board.
//!
//! Rows are `im::Vector`s of cells inside an `im::Vector`, so cloning a grid
//! for an undo snapshot is O(1) and later edits only copy the touched chunks.
//!
//! Dimensions only grow: [`Grid::insert_line`] splices a full row or column of
//! empty cells and there is no removal.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// A grid position, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step by a signed offset; `None` if that would go below zero.
    #[must_use]
    pub fn offset(self, dr: isize, dc: isize) -> Option<Coord> {
        Some(Coord {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Which kind of line an expansion inserts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Rectangular board of cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: Vector<Vector<Cell>>,
    cols: usize,
}

impl Grid {
    /// Create a `size` × `size` grid of empty cells.
    #[must_use]
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Create a `rows` × `cols` grid of empty cells.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let row: Vector<Cell> = std::iter::repeat(Cell::empty()).take(cols).collect();
        Self {
            rows: std::iter::repeat(row).take(rows).collect(),
            cols,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of the axis a line of `axis` would be inserted along.
    #[must_use]
    pub fn line_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows(),
            Axis::Column => self.cols(),
        }
    }

    #[must_use]
    pub fn get(&self, at: Coord) -> Option<&Cell> {
        self.rows.get(at.row)?.get(at.col)
    }

    pub fn get_mut(&mut self, at: Coord) -> Option<&mut Cell> {
        self.rows.get_mut(at.row)?.get_mut(at.col)
    }

    /// The centre cell of an odd-sized square grid.
    #[must_use]
    pub fn center(&self) -> Option<Coord> {
        let n = self.rows();
        (n == self.cols && n % 2 == 1).then(|| Coord::new(n / 2, n / 2))
    }

    /// Insert a row or column of empty cells before `index`.
    ///
    /// `index` may equal the current line count to append at the end.
    /// Returns `false` (leaving the grid untouched) if `index` is out of range.
    pub fn insert_line(&mut self, index: usize, axis: Axis) -> bool {
        if index > self.line_count(axis) {
            return false;
        }
        match axis {
            Axis::Row => {
                let row: Vector<Cell> =
                    std::iter::repeat(Cell::empty()).take(self.cols).collect();
                self.rows.insert(index, row);
            }
            Axis::Column => {
                for row in self.rows.iter_mut() {
                    row.insert(index, Cell::empty());
                }
                self.cols += 1;
            }
        }
        true
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (Coord::new(r, c), cell))
        })
    }

    /// Coordinates of all empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(at, _)| at)
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use super::cell::Occupant;

        for row in self.rows.iter() {
            for cell in row.iter() {
                let c = match cell.occupant {
                    Occupant::Empty if cell.protected => '.',
                    Occupant::Empty => '_',
                    Occupant::Mark(mark) => mark.symbol(),
                    Occupant::PermanentBlocker => '^',
                    Occupant::DestructibleBlocker => '#',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Mark;

    #[test]
    fn test_square_grid() {
        let grid = Grid::square(3);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.empty_cells().len(), 9);
        assert_eq!(grid.center(), Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_even_grid_has_no_center() {
        assert_eq!(Grid::square(4).center(), None);
    }

    #[test]
    fn test_get_out_of_range() {
        let grid = Grid::new(3, 4);
        assert!(grid.get(Coord::new(2, 3)).is_some());
        assert!(grid.get(Coord::new(3, 0)).is_none());
        assert!(grid.get(Coord::new(0, 4)).is_none());
        assert!(grid.get(Coord::new(9, 9)).is_none());
    }

    #[test]
    fn test_insert_row_shifts_cells_down() {
        let mut grid = Grid::square(3);
        grid.get_mut(Coord::new(1, 2)).unwrap().set_mark(Mark::X);

        assert!(grid.insert_line(1, Axis::Row));

        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 3);
        assert!(grid.get(Coord::new(1, 2)).unwrap().is_empty());
        assert_eq!(grid.get(Coord::new(2, 2)).unwrap().mark(), Some(Mark::X));
    }

    #[test]
    fn test_insert_column_shifts_cells_right() {
        let mut grid = Grid::square(3);
        grid.get_mut(Coord::new(0, 0)).unwrap().set_mark(Mark::O);

        assert!(grid.insert_line(0, Axis::Column));

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.get(Coord::new(0, 1)).unwrap().mark(), Some(Mark::O));
    }

    #[test]
    fn test_insert_at_end() {
        let mut grid = Grid::square(3);
        assert!(grid.insert_line(3, Axis::Row));
        assert!(grid.insert_line(3, Axis::Column));
        assert_eq!((grid.rows(), grid.cols()), (4, 4));
    }

    #[test]
    fn test_insert_out_of_range_is_rejected() {
        let mut grid = Grid::square(3);
        assert!(!grid.insert_line(4, Axis::Row));
        assert_eq!(grid, Grid::square(3));
    }

    #[test]
    fn test_offset() {
        assert_eq!(Coord::new(1, 1).offset(1, -1), Some(Coord::new(2, 0)));
        assert_eq!(Coord::new(0, 1).offset(-1, 0), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let grid = Grid::square(3);
        let mut edited = grid.clone();
        edited.get_mut(Coord::new(0, 0)).unwrap().set_mark(Mark::X);

        assert!(grid.get(Coord::new(0, 0)).unwrap().is_empty());
        assert_ne!(grid, edited);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::square(3);
        grid.get_mut(Coord::new(0, 0)).unwrap().set_mark(Mark::X);
        grid.get_mut(Coord::new(1, 1)).unwrap().protected = true;
        assert_eq!(grid.to_string(), "X__\n_._\n___\n");
    }
}
