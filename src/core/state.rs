//! Match state: everything an undo snapshot captures.
//!
//! ## TurnState
//!
//! Whose turn it is and what they may still do:
//! - Active mark and turn number
//! - Remaining action budget and the selected config/tool
//! - Whether anything was committed this turn
//!
//! ## MatchState
//!
//! The grid, the turn, the terminal status, the action log and the
//! session win tally. Uses `im` structures so cloning is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{ActionBudget, ActionKind, ActionRecord};
use super::config::{ActionConfig, ConfigId, BASIC_TOKEN};
use super::error::SnapshotError;
use super::grid::{Coord, Grid};
use super::player::{Mark, PlayerMap};

/// Three aligned same-owner cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinLine {
    pub winner: Mark,
    /// In scan order, starting at the first cell found.
    pub cells: [Coord; 3],
}

/// Match-level status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    InProgress,
    /// Terminal. Only reset, mode change and undo apply from here.
    Won(WinLine),
}

impl MatchStatus {
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, MatchStatus::Won(_))
    }

    #[must_use]
    pub const fn winner(&self) -> Option<Mark> {
        match self {
            MatchStatus::Won(line) => Some(line.winner),
            MatchStatus::InProgress => None,
        }
    }
}

/// Per-turn state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    /// Whose turn it is.
    pub active: Mark,

    /// Turn number (starts at 1, one per rotation step).
    pub number: u32,

    /// Uses left this turn.
    pub budget: ActionBudget,

    /// The config the budget came from.
    pub config: Option<ConfigId>,

    /// The tool the next cell/edge action uses.
    pub tool: Option<ActionKind>,

    /// Whether an action was committed this turn.
    pub has_acted: bool,
}

impl TurnState {
    /// Start of a turn with the default single-mark budget.
    #[must_use]
    pub fn start(active: Mark, number: u32) -> Self {
        let mut turn = Self {
            active,
            number,
            budget: ActionBudget::empty(),
            config: None,
            tool: None,
            has_acted: false,
        };
        if let Some(config) = ActionConfig::get(BASIC_TOKEN) {
            turn.apply_config(config);
        }
        turn
    }

    /// Replace the budget with a config's cost and select its first tool.
    pub fn apply_config(&mut self, config: &ActionConfig) {
        self.budget = config.budget();
        self.config = Some(config.id);
        self.tool = config.first_kind();
    }

    /// Drop everything left in the budget.
    pub fn clear_budget(&mut self) {
        self.budget = ActionBudget::empty();
        self.tool = None;
    }
}

/// Full match state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// The board.
    pub grid: Grid,

    /// The current turn.
    pub turn: TurnState,

    /// In progress or won.
    pub status: MatchStatus,

    /// Committed actions, oldest first.
    pub history: Vector<ActionRecord>,

    /// Matches won per mark in this session. Survives reset.
    pub session_wins: PlayerMap<u32>,

    /// Next action-log sequence number.
    sequence: u32,
}

impl MatchState {
    /// A fresh match: empty `grid_size` square board, X to move on turn 1.
    #[must_use]
    pub fn new(grid_size: usize) -> Self {
        Self::with_session_wins(grid_size, PlayerMap::with_value(0))
    }

    /// A fresh match that carries an existing session tally.
    #[must_use]
    pub fn with_session_wins(grid_size: usize, session_wins: PlayerMap<u32>) -> Self {
        Self {
            grid: Grid::square(grid_size),
            turn: TurnState::start(Mark::X, 1),
            status: MatchStatus::InProgress,
            history: Vector::new(),
            session_wins,
            sequence: 0,
        }
    }

    /// Append to the action log.
    pub fn record(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    /// Get the next action sequence number and increment.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }

    /// Encode with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a state produced by [`MatchState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
