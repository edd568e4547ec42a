//! Core types: marks, cells, grid, actions, configuration, state, RNG, errors.
//!
//! Nothing in here enforces the rules; `rules::MatchEngine` does.

pub mod player;
pub mod cell;
pub mod grid;
pub mod action;
pub mod config;
pub mod error;
pub mod state;
pub mod rng;

pub use player::{Mark, PlayerMap, MAX_PLAYERS};
pub use cell::{Cell, Occupant};
pub use grid::{Axis, Coord, Grid};
pub use action::{Action, ActionBudget, ActionKind, ActionRecord, BlockerKind};
pub use config::{ActionConfig, ConfigId, GameMode, MatchConfig, CATALOGUE};
pub use error::{InvalidReason, MoveError, SnapshotError};
pub use state::{MatchState, MatchStatus, TurnState, WinLine};
pub use rng::{GameRng, GameRngState};
