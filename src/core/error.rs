//! Rejection reasons for engine operations.
//!
//! Nothing here is fatal: a rejected operation leaves the match untouched
//! and the caller typically just flashes the offending cell.

use thiserror::Error;

use super::action::ActionKind;
use super::grid::Coord;

/// Why an action was refused.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("target is outside the grid")]
    OutOfBounds,

    #[error("cell is occupied")]
    Occupied,

    #[error("cell is protected against blockers")]
    Protected,

    #[error("the centre cell is not allowed as the opening move")]
    ForbiddenOpening,

    #[error("cell holds no destructible blocker")]
    NotDestructible,

    #[error("selected tool is {selected:?}, not {attempted}")]
    WrongTool {
        selected: Option<ActionKind>,
        attempted: ActionKind,
    },

    #[error("an action was already committed this turn")]
    AlreadyCommitted,

    #[error("unknown action config")]
    UnknownConfig,

    #[error("the match is over")]
    MatchOver,

    #[error("the simulated opponent is to move")]
    OpponentsTurn,

    #[error("the active seat is not played by the simulated opponent")]
    NotOpponentsTurn,
}

/// Errors returned by `MatchEngine` operations.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("invalid move{}: {reason}", fmt_at(.at))]
    InvalidMove {
        at: Option<Coord>,
        reason: InvalidReason,
    },

    #[error("no {0} actions left this turn")]
    BudgetExhausted(ActionKind),
}

fn fmt_at(at: &Option<Coord>) -> String {
    at.map(|c| format!(" at {c}")).unwrap_or_default()
}

impl MoveError {
    /// A rejection tied to a cell.
    #[must_use]
    pub const fn at(at: Coord, reason: InvalidReason) -> Self {
        MoveError::InvalidMove { at: Some(at), reason }
    }

    /// A rejection not tied to a cell.
    #[must_use]
    pub const fn invalid(reason: InvalidReason) -> Self {
        MoveError::InvalidMove { at: None, reason }
    }

    /// The cell a presenter should flag, if any.
    #[must_use]
    pub const fn flash_cell(&self) -> Option<Coord> {
        match self {
            MoveError::InvalidMove { at, .. } => *at,
            MoveError::BudgetExhausted(_) => None,
        }
    }

    #[must_use]
    pub const fn reason(&self) -> Option<InvalidReason> {
        match self {
            MoveError::InvalidMove { reason, .. } => Some(*reason),
            MoveError::BudgetExhausted(_) => None,
        }
    }
}

/// Convenience Result type for engine operations.
pub type Result<T> = std::result::Result<T, MoveError>;

/// Failure to decode a saved match snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),
}
