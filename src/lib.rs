//! # expanse-ttt
//!
//! A match engine for tic-tac-toe on a board that can grow, for two to
//! eight players, with blockers, protection, damage and undo.
//!
//! ## Design Principles
//!
//! 1. **N-Player First**: Seats, turn order and the session tally are all
//!    indexed by [`Mark`]. Two-player rules (the forbidden centre opener)
//!    are the exception, not the default.
//!
//! 2. **One Authority**: Only [`MatchEngine`] mutates a match. Every
//!    operation is either applied fully or rejected with a [`MoveError`]
//!    that leaves the state untouched.
//!
//! 3. **Configuration Over Convention**: Budgets come from the
//!    [`ActionConfig`] catalogue and tunables from [`MatchConfig`].
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The grid and action log use `im-rs`,
//!   so an undo snapshot is an O(1) clone of the whole [`MatchState`].
//!
//! - **Pluggable Opponents**: The simulated opponent is any
//!   [`OpponentPolicy`]. Its plan runs through the same validation as a
//!   human's moves.
//!
//! ## Modules
//!
//! - `core`: Marks, cells, grid, actions, configs, state, RNG, errors
//! - `rules`: The match engine and win detection
//! - `history`: Bounded undo snapshots
//! - `opponent`: Opponent policies, including the heuristic one

pub mod core;
pub mod history;
pub mod opponent;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionBudget, ActionConfig, ActionKind, ActionRecord, Axis, BlockerKind, Cell,
    ConfigId, Coord, GameMode, GameRng, GameRngState, Grid, InvalidReason, Mark, MatchConfig,
    MatchState, MatchStatus, MoveError, Occupant, PlayerMap, SnapshotError, TurnState, WinLine,
    CATALOGUE, MAX_PLAYERS,
};

pub use crate::history::UndoHistory;

pub use crate::opponent::{HeuristicOpponent, OpponentPlan, OpponentPolicy};

pub use crate::rules::{check_win, MatchEngine, Outcome};
