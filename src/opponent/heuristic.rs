//! Rule-of-thumb opponent.
//!
//! Priorities, highest first:
//! 1. full board: expand
//! 2. win now if possible
//! 3. block threats (cells where another mark would win next turn)
//! 4. place on the best-scoring cell, rarely expanding instead
//!
//! Scores add a little seeded noise so games vary but stay replayable.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::config::{BASIC_TOKEN, BLOCK_RECT, BLOCK_TRIANGLE, EXPAND};
use crate::core::{
    Action, ActionConfig, Axis, BlockerKind, ConfigId, Coord, GameRng, Grid, Mark,
};
use crate::rules::win::{check_win, DIRECTIONS};

use super::{OpponentPlan, OpponentPolicy};

/// Probability of using triangles against a single blockable threat.
const TRIANGLE_DEFENCE_CHANCE: f64 = 0.6;

/// Chance of expanding instead of playing a weak move.
const IDLE_EXPANSION_CHANCE: f64 = 0.05;

/// Best score below which the idle expansion is considered.
const WEAK_MOVE_SCORE: f64 = 5.0;

/// Heuristic simulated opponent.
#[derive(Clone, Debug)]
pub struct HeuristicOpponent {
    rng: GameRng,
}

impl HeuristicOpponent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    fn score(&mut self, grid: &Grid, at: Coord, me: Mark) -> f64 {
        let mut score = self.rng.gen_unit() * 5.0;

        let center_r = grid.rows() as f64 / 2.0;
        let center_c = grid.cols() as f64 / 2.0;
        score -= (at.row as f64 - center_r).abs() + (at.col as f64 - center_c).abs();

        for (dr, dc) in DIRECTIONS {
            let neighbours = [at.offset(dr, dc), at.offset(-dr, -dc)];
            let mut mine = 0;
            let mut open = 0;
            let mut theirs = 0;

            for cell in neighbours.into_iter().flatten().filter_map(|n| grid.get(n)) {
                match cell.mark() {
                    Some(owner) if owner == me => mine += 1,
                    Some(_) => theirs += 1,
                    None if cell.is_empty() => open += 1,
                    None => {}
                }
            }

            if mine >= 1 {
                score += 20.0;
            }
            if mine == 1 && open == 1 {
                score += 30.0;
            }
            if theirs >= 1 {
                score += 15.0;
            }
        }
        score
    }

    /// Empty cells by descending score.
    fn ranked(&mut self, grid: &Grid, cells: &[Coord], me: Mark) -> Vec<(Coord, f64)> {
        let mut scored: Vec<_> = cells.iter().map(|&at| (at, self.score(grid, at, me))).collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }

    fn idle_expansion(&mut self, grid: &Grid) -> OpponentPlan {
        let axis = if self.rng.gen_bool(0.5) { Axis::Row } else { Axis::Column };
        let index = self.rng.gen_range_usize(0..grid.line_count(axis).max(1));
        OpponentPlan::new(EXPAND, [Action::Expand { index, axis }])
    }
}

impl Default for HeuristicOpponent {
    fn default() -> Self {
        Self::new(42)
    }
}

impl OpponentPolicy for HeuristicOpponent {
    fn plan(&mut self, grid: &Grid, me: Mark, catalogue: &[ActionConfig]) -> OpponentPlan {
        let offered = |id: ConfigId| catalogue.iter().any(|c| c.id == id);

        let mut empty = grid.empty_cells();
        if empty.is_empty() {
            return OpponentPlan::new(
                EXPAND,
                [Action::Expand { index: grid.rows() / 2, axis: Axis::Row }],
            );
        }

        if let Some(&at) = empty.iter().find(|&&at| wins_at(grid, at, me)) {
            debug!(player = %me, %at, "opponent takes the win");
            return OpponentPlan::new(BASIC_TOKEN, [Action::PlaceMark(at)]);
        }

        let rivals: Vec<Mark> = present_marks(grid).into_iter().filter(|m| *m != me).collect();
        let threats: Vec<Coord> = empty
            .iter()
            .copied()
            .filter(|&at| rivals.iter().any(|&rival| wins_at(grid, at, rival)))
            .collect();

        // The opener may not take the centre of a fresh 3x3 board.
        if me == Mark::X && empty.len() == 9 && grid.rows() == 3 && grid.cols() == 3 {
            if let Some(center) = grid.center() {
                empty.retain(|&at| at != center);
            }
        }

        if !threats.is_empty() {
            let blockable: Vec<Coord> = threats
                .iter()
                .copied()
                .filter(|&at| grid.get(at).is_some_and(|c| !c.protected))
                .collect();
            let filler: Vec<Coord> = self
                .ranked(grid, &empty, me)
                .into_iter()
                .map(|(at, _)| at)
                .filter(|&at| grid.get(at).is_some_and(|c| !c.protected))
                .collect();

            let use_rects = blockable.len() > 2 && offered(BLOCK_RECT);
            let use_triangles = !use_rects
                && offered(BLOCK_TRIANGLE)
                && (blockable.len() == 2
                    || (blockable.len() == 1 && self.rng.gen_bool(TRIANGLE_DEFENCE_CHANCE)));

            if use_rects || use_triangles {
                let (config, count, kind) = if use_rects {
                    (BLOCK_RECT, 3, BlockerKind::Destructible)
                } else {
                    (BLOCK_TRIANGLE, 2, BlockerKind::Permanent)
                };
                let mut chosen: FxHashSet<Coord> = FxHashSet::default();
                let targets: Vec<Coord> = blockable
                    .iter()
                    .chain(filler.iter())
                    .copied()
                    .filter(|at| chosen.insert(*at))
                    .take(count)
                    .collect();

                debug!(player = %me, threats = threats.len(), ?targets, "opponent blocks");
                return OpponentPlan::new(
                    config,
                    targets.into_iter().map(|at| Action::PlaceBlocker { at, kind }),
                );
            }

            return OpponentPlan::new(BASIC_TOKEN, [Action::PlaceMark(threats[0])]);
        }

        let ranked = self.ranked(grid, &empty, me);
        let Some(&(best, best_score)) = ranked.first() else {
            return self.idle_expansion(grid);
        };

        if best_score < WEAK_MOVE_SCORE
            && offered(EXPAND)
            && self.rng.gen_bool(IDLE_EXPANSION_CHANCE)
        {
            return self.idle_expansion(grid);
        }

        OpponentPlan::new(BASIC_TOKEN, [Action::PlaceMark(best)])
    }
}

/// Would placing `who` at `at` complete a line for `who`?
fn wins_at(grid: &Grid, at: Coord, who: Mark) -> bool {
    let mut trial = grid.clone();
    match trial.get_mut(at) {
        Some(cell) if cell.is_empty() => cell.set_mark(who),
        _ => return false,
    }
    check_win(&trial).is_some_and(|line| line.winner == who)
}

/// Marks with at least one piece on the board, in seat order.
fn present_marks(grid: &Grid) -> Vec<Mark> {
    let mut seen = [false; crate::core::MAX_PLAYERS];
    for (_, cell) in grid.cells() {
        if let Some(mark) = cell.mark() {
            seen[mark.index()] = true;
        }
    }
    Mark::ALL.into_iter().filter(|m| seen[m.index()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CATALOGUE;

    fn grid_with(size: usize, marks: &[(usize, usize, Mark)]) -> Grid {
        let mut grid = Grid::square(size);
        for &(r, c, mark) in marks {
            grid.get_mut(Coord::new(r, c)).unwrap().set_mark(mark);
        }
        grid
    }

    #[test]
    fn test_takes_immediate_win() {
        let grid = grid_with(3, &[(0, 0, Mark::O), (0, 1, Mark::O), (1, 0, Mark::X), (2, 2, Mark::X)]);
        let plan = HeuristicOpponent::new(1).plan(&grid, Mark::O, CATALOGUE);

        assert_eq!(plan.config, BASIC_TOKEN);
        assert_eq!(plan.actions.as_slice(), &[Action::PlaceMark(Coord::new(0, 2))]);
    }

    #[test]
    fn test_win_beats_blocking() {
        // X threatens (2,0); O can win at (0,2).
        let grid = grid_with(
            3,
            &[(0, 0, Mark::O), (0, 1, Mark::O), (1, 0, Mark::X), (1, 1, Mark::X)],
        );
        let plan = HeuristicOpponent::new(3).plan(&grid, Mark::O, CATALOGUE);
        assert_eq!(plan.actions.as_slice(), &[Action::PlaceMark(Coord::new(0, 2))]);
    }

    #[test]
    fn test_single_threat_is_covered() {
        let grid = grid_with(4, &[(0, 0, Mark::X), (0, 1, Mark::X), (3, 3, Mark::O)]);
        let threat = Coord::new(0, 2);

        for seed in 0..20 {
            let plan = HeuristicOpponent::new(seed).plan(&grid, Mark::O, CATALOGUE);
            let first = plan.actions[0];
            assert_eq!(first.target(), Some(threat), "seed {seed}: {plan:?}");
            match plan.config {
                c if c == BASIC_TOKEN => assert_eq!(plan.actions.len(), 1),
                c if c == BLOCK_TRIANGLE => assert_eq!(plan.actions.len(), 2),
                other => panic!("unexpected config {other}"),
            }
        }
    }

    #[test]
    fn test_two_threats_use_triangles() {
        // X threatens (0,2) and (2,0).
        let grid = grid_with(
            4,
            &[(0, 0, Mark::X), (0, 1, Mark::X), (1, 0, Mark::X), (3, 3, Mark::O)],
        );
        let plan = HeuristicOpponent::new(9).plan(&grid, Mark::O, CATALOGUE);

        assert_eq!(plan.config, BLOCK_TRIANGLE);
        let targets: Vec<_> = plan.actions.iter().filter_map(|a| a.target()).collect();
        assert!(targets.contains(&Coord::new(0, 2)));
        assert!(targets.contains(&Coord::new(2, 0)));
    }

    #[test]
    fn test_many_threats_use_rectangles() {
        // X threatens (0,2), (2,0) and (2,2).
        let grid = grid_with(
            4,
            &[
                (0, 0, Mark::X),
                (0, 1, Mark::X),
                (1, 0, Mark::X),
                (1, 1, Mark::X),
                (3, 3, Mark::O),
            ],
        );
        let plan = HeuristicOpponent::new(5).plan(&grid, Mark::O, CATALOGUE);

        assert_eq!(plan.config, BLOCK_RECT);
        assert_eq!(plan.actions.len(), 3);
        assert!(plan
            .actions
            .iter()
            .all(|a| matches!(a, Action::PlaceBlocker { kind: BlockerKind::Destructible, .. })));
    }

    #[test]
    fn test_blockers_avoid_protected_cells() {
        let mut grid = grid_with(
            4,
            &[(0, 0, Mark::X), (0, 1, Mark::X), (1, 0, Mark::X), (3, 3, Mark::O)],
        );
        grid.get_mut(Coord::new(0, 2)).unwrap().protected = true;

        for seed in 0..10 {
            let plan = HeuristicOpponent::new(seed).plan(&grid, Mark::O, CATALOGUE);
            for action in &plan.actions {
                if let Action::PlaceBlocker { at, .. } = action {
                    assert_ne!(*at, Coord::new(0, 2));
                }
            }
        }
    }

    #[test]
    fn test_full_board_expands() {
        let mut grid = Grid::square(3);
        let marks = [Mark::X, Mark::O];
        for r in 0..3 {
            for c in 0..3 {
                grid.get_mut(Coord::new(r, c)).unwrap().set_mark(marks[(r + c) % 2]);
            }
        }
        let plan = HeuristicOpponent::new(0).plan(&grid, Mark::O, CATALOGUE);
        assert_eq!(plan.config, EXPAND);
        assert_eq!(
            plan.actions.as_slice(),
            &[Action::Expand { index: 1, axis: Axis::Row }]
        );
    }

    #[test]
    fn test_opener_avoids_center() {
        let grid = Grid::square(3);
        for seed in 0..20 {
            let plan = HeuristicOpponent::new(seed).plan(&grid, Mark::X, CATALOGUE);
            assert_ne!(plan.actions[0].target(), Some(Coord::new(1, 1)));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let grid = grid_with(5, &[(2, 2, Mark::X), (1, 3, Mark::Z)]);
        let a = HeuristicOpponent::new(77).plan(&grid, Mark::O, CATALOGUE);
        let b = HeuristicOpponent::new(77).plan(&grid, Mark::O, CATALOGUE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_present_marks() {
        let grid = grid_with(3, &[(0, 0, Mark::Z), (1, 1, Mark::X)]);
        assert_eq!(present_marks(&grid), vec![Mark::X, Mark::Z]);
    }
}
