//! Three-in-a-row detection.
//!
//! The scan order is fixed so replays agree on which line is reported:
//! cells in row-major order, and for each mark cell the directions
//! horizontal, vertical, down-right, down-left. The first run of three
//! same-owner cells wins. Longer runs are reported by their first three cells.

use crate::core::{Coord, Grid, WinLine};

/// Scan directions as (row delta, column delta), in tie-break order.
pub const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // horizontal
    (1, 0),  // vertical
    (1, 1),  // diagonal down-right
    (1, -1), // diagonal down-left
];

/// Find the first winning line on the grid, if any.
#[must_use]
pub fn check_win(grid: &Grid) -> Option<WinLine> {
    for (origin, cell) in grid.cells() {
        let Some(owner) = cell.mark() else {
            continue;
        };

        for (dr, dc) in DIRECTIONS {
            let Some(second) = origin.offset(dr, dc) else {
                continue;
            };
            let Some(third) = second.offset(dr, dc) else {
                continue;
            };
            let owns = |at: Coord| grid.get(at).and_then(|c| c.mark()) == Some(owner);

            if owns(second) && owns(third) {
                return Some(WinLine {
                    winner: owner,
                    cells: [origin, second, third],
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BlockerKind, Mark};

    fn grid_with(size: usize, marks: &[(usize, usize, Mark)]) -> Grid {
        let mut grid = Grid::square(size);
        for &(r, c, mark) in marks {
            grid.get_mut(Coord::new(r, c)).unwrap().set_mark(mark);
        }
        grid
    }

    fn coords(cells: &[(usize, usize)]) -> [Coord; 3] {
        [cells[0].into(), cells[1].into(), cells[2].into()]
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(check_win(&Grid::square(3)), None);
    }

    #[test]
    fn test_horizontal() {
        let grid = grid_with(3, &[(0, 0, Mark::X), (0, 1, Mark::X), (0, 2, Mark::X)]);
        let line = check_win(&grid).unwrap();
        assert_eq!(line.winner, Mark::X);
        assert_eq!(line.cells, coords(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn test_vertical() {
        let grid = grid_with(4, &[(1, 3, Mark::O), (2, 3, Mark::O), (3, 3, Mark::O)]);
        let line = check_win(&grid).unwrap();
        assert_eq!(line.winner, Mark::O);
        assert_eq!(line.cells, coords(&[(1, 3), (2, 3), (3, 3)]));
    }

    #[test]
    fn test_diagonal_down_right() {
        let grid = grid_with(3, &[(0, 0, Mark::Z), (1, 1, Mark::Z), (2, 2, Mark::Z)]);
        assert_eq!(check_win(&grid).unwrap().cells, coords(&[(0, 0), (1, 1), (2, 2)]));
    }

    #[test]
    fn test_diagonal_down_left() {
        let grid = grid_with(3, &[(0, 2, Mark::A), (1, 1, Mark::A), (2, 0, Mark::A)]);
        assert_eq!(check_win(&grid).unwrap().cells, coords(&[(0, 2), (1, 1), (2, 0)]));
    }

    #[test]
    fn test_mixed_owners_do_not_win() {
        let grid = grid_with(3, &[(0, 0, Mark::X), (0, 1, Mark::O), (0, 2, Mark::X)]);
        assert_eq!(check_win(&grid), None);
    }

    #[test]
    fn test_blockers_break_lines() {
        let mut grid = grid_with(3, &[(0, 0, Mark::X), (0, 2, Mark::X)]);
        grid.get_mut(Coord::new(0, 1)).unwrap().set_blocker(BlockerKind::Permanent, 2);
        assert_eq!(check_win(&grid), None);
    }

    #[test]
    fn test_first_in_row_major_order_wins() {
        // O's line starts on row 1, X's on row 2.
        let grid = grid_with(
            5,
            &[
                (2, 0, Mark::X),
                (2, 1, Mark::X),
                (2, 2, Mark::X),
                (1, 4, Mark::O),
                (2, 4, Mark::O),
                (3, 4, Mark::O),
            ],
        );
        let line = check_win(&grid).unwrap();
        assert_eq!(line.winner, Mark::O);
    }

    #[test]
    fn test_direction_order_breaks_ties() {
        // (0,0) starts both a horizontal and a vertical line.
        let grid = grid_with(
            3,
            &[
                (0, 0, Mark::X),
                (0, 1, Mark::X),
                (0, 2, Mark::X),
                (1, 0, Mark::X),
                (2, 0, Mark::X),
            ],
        );
        assert_eq!(check_win(&grid).unwrap().cells, coords(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn test_longer_run_reports_first_three() {
        let grid = grid_with(
            5,
            &[(4, 0, Mark::K), (4, 1, Mark::K), (4, 2, Mark::K), (4, 3, Mark::K)],
        );
        assert_eq!(check_win(&grid).unwrap().cells, coords(&[(4, 0), (4, 1), (4, 2)]));
    }

    #[test]
    fn test_rectangular_grid() {
        let mut grid = Grid::new(2, 5);
        for c in 2..5 {
            grid.get_mut(Coord::new(1, c)).unwrap().set_mark(Mark::S);
        }
        assert_eq!(check_win(&grid).unwrap().cells, coords(&[(1, 2), (1, 3), (1, 4)]));
    }
}
