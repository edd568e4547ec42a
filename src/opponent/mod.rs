//! Simulated opponents.
//!
//! A policy looks at the board and returns a plan: one action config plus
//! the concrete actions to spend it on. The engine applies the plan through
//! its normal validation, so a policy can never do anything a human could not.

pub mod heuristic;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, ActionConfig, ConfigId, Grid, Mark};

pub use heuristic::HeuristicOpponent;

/// A config choice plus the actions to take with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentPlan {
    pub config: ConfigId,
    /// Applied in order. Most plans use one to three actions.
    pub actions: SmallVec<[Action; 3]>,
}

impl OpponentPlan {
    #[must_use]
    pub fn new(config: ConfigId, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            config,
            actions: actions.into_iter().collect(),
        }
    }
}

/// Policy for choosing the simulated opponent's turn.
pub trait OpponentPolicy: Send {
    /// Plan a full turn for `me` on `grid`, choosing from `catalogue`.
    fn plan(&mut self, grid: &Grid, me: Mark, catalogue: &[ActionConfig]) -> OpponentPlan;
}

/// Always places a mark on the first empty cell in row-major order.
///
/// Handy as a deterministic stand-in in tests.
#[derive(Clone, Debug, Default)]
pub struct FirstEmpty;

impl OpponentPolicy for FirstEmpty {
    fn plan(&mut self, grid: &Grid, _me: Mark, _catalogue: &[ActionConfig]) -> OpponentPlan {
        let actions = grid.empty_cells().into_iter().next().map(Action::PlaceMark);
        OpponentPlan::new(crate::core::config::BASIC_TOKEN, actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coord, CATALOGUE};

    #[test]
    fn test_first_empty() {
        let mut grid = Grid::square(3);
        grid.get_mut(Coord::new(0, 0)).unwrap().set_mark(Mark::X);

        let plan = FirstEmpty.plan(&grid, Mark::O, CATALOGUE);

        assert_eq!(plan.actions.as_slice(), &[Action::PlaceMark(Coord::new(0, 1))]);
    }

    #[test]
    fn test_plan_serialization() {
        let plan = OpponentPlan::new(
            crate::core::config::BASIC_TOKEN,
            [Action::PlaceMark(Coord::new(1, 2))],
        );
        let json = serde_json::to_string(&plan).unwrap();
        let deserialized: OpponentPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, deserialized);
    }
}
