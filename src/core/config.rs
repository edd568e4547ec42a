//! Match configuration.
//!
//! - `ActionConfig`: the fixed menu of per-turn action bundles
//! - `GameMode`: player count, seating and starting board size
//! - `MatchConfig`: everything a new match is created from

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::action::{ActionBudget, ActionKind};
use super::player::{Mark, MAX_PLAYERS};

/// Identifier of an entry in [`CATALOGUE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigId(pub u16);

impl ConfigId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ConfigId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config({})", self.0)
    }
}

/// A named bundle of action-kind quantities a player picks once per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionConfig {
    pub id: ConfigId,
    /// Stable string key.
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Uses granted per kind, in tool order.
    pub cost: &'static [(ActionKind, u8)],
    /// Mixes more than one kind.
    pub combo: bool,
}

impl ActionConfig {
    /// Look up a config by id.
    #[must_use]
    pub fn get(id: ConfigId) -> Option<&'static ActionConfig> {
        CATALOGUE.iter().find(|c| c.id == id)
    }

    /// Look up a config by key.
    #[must_use]
    pub fn by_key(key: &str) -> Option<&'static ActionConfig> {
        CATALOGUE.iter().find(|c| c.key == key)
    }

    /// The budget this config grants.
    #[must_use]
    pub fn budget(&self) -> ActionBudget {
        ActionBudget::from_cost(self.cost)
    }

    /// The tool selected when this config is picked.
    #[must_use]
    pub fn first_kind(&self) -> Option<ActionKind> {
        self.cost.first().map(|(kind, _)| *kind)
    }
}

/// The default single-mark config every turn starts with.
pub const BASIC_TOKEN: ConfigId = ConfigId(0);
pub const BLOCK_TRIANGLE: ConfigId = ConfigId(1);
pub const BLOCK_RECT: ConfigId = ConfigId(2);
pub const PLACE_DOTS: ConfigId = ConfigId(3);
pub const EXPAND: ConfigId = ConfigId(4);
pub const DESTROY: ConfigId = ConfigId(5);
pub const COMBO_TRI_LINE: ConfigId = ConfigId(6);
pub const COMBO_RECT_LINE: ConfigId = ConfigId(7);
pub const COMBO_DOT_LINE: ConfigId = ConfigId(8);
pub const COMBO_DEST_DOT: ConfigId = ConfigId(9);

/// Every action config offered to players.
pub const CATALOGUE: &[ActionConfig] = &[
    ActionConfig {
        id: BASIC_TOKEN,
        key: "basic-token",
        label: "Place Token",
        description: "Place 1 mark.",
        cost: &[(ActionKind::PlaceMark, 1)],
        combo: false,
    },
    ActionConfig {
        id: BLOCK_TRIANGLE,
        key: "block-triangle",
        label: "2 Triangles",
        description: "Place 2 permanent blockers.",
        cost: &[(ActionKind::PlacePermanentBlocker, 2)],
        combo: false,
    },
    ActionConfig {
        id: BLOCK_RECT,
        key: "block-rect",
        label: "3 Rectangles",
        description: "Place 3 destructible blockers.",
        cost: &[(ActionKind::PlaceDestructibleBlocker, 3)],
        combo: false,
    },
    ActionConfig {
        id: PLACE_DOTS,
        key: "place-dots",
        label: "4 Dots",
        description: "Protect 4 cells from blockers.",
        cost: &[(ActionKind::PlaceProtection, 4)],
        combo: false,
    },
    ActionConfig {
        id: EXPAND,
        key: "expand",
        label: "Expand Board",
        description: "Insert 2 rows or columns.",
        cost: &[(ActionKind::Expand, 2)],
        combo: false,
    },
    ActionConfig {
        id: DESTROY,
        key: "destroy",
        label: "Crush",
        description: "Deal 5 damage to destructible blockers.",
        cost: &[(ActionKind::Damage, 5)],
        combo: false,
    },
    ActionConfig {
        id: COMBO_TRI_LINE,
        key: "combo-tri-line",
        label: "Combo: Tri + Line",
        description: "1 permanent blocker + 1 line.",
        cost: &[(ActionKind::PlacePermanentBlocker, 1), (ActionKind::Expand, 1)],
        combo: true,
    },
    ActionConfig {
        id: COMBO_RECT_LINE,
        key: "combo-rect-line",
        label: "Combo: Rect + Line",
        description: "2 destructible blockers + 1 line.",
        cost: &[(ActionKind::PlaceDestructibleBlocker, 2), (ActionKind::Expand, 1)],
        combo: true,
    },
    ActionConfig {
        id: COMBO_DOT_LINE,
        key: "combo-dot-line",
        label: "Combo: Dot + Line",
        description: "2 protections + 1 line.",
        cost: &[(ActionKind::PlaceProtection, 2), (ActionKind::Expand, 1)],
        combo: true,
    },
    ActionConfig {
        id: COMBO_DEST_DOT,
        key: "combo-dest-dot",
        label: "Combo: Crush + Dot",
        description: "4 damage + 1 protection.",
        cost: &[(ActionKind::Damage, 4), (ActionKind::PlaceProtection, 1)],
        combo: true,
    },
];

/// Who is playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// X is human, O is the simulated opponent.
    #[default]
    VsOpponent,
    /// All seats human; holds the player count (2-8).
    Hotseat(u8),
}

impl GameMode {
    /// All modes in cycling order.
    pub const ALL: [GameMode; 8] = [
        GameMode::VsOpponent,
        GameMode::Hotseat(2),
        GameMode::Hotseat(3),
        GameMode::Hotseat(4),
        GameMode::Hotseat(5),
        GameMode::Hotseat(6),
        GameMode::Hotseat(7),
        GameMode::Hotseat(8),
    ];

    /// Number of seated players, clamped to 2-8.
    #[must_use]
    pub fn player_count(self) -> usize {
        match self {
            GameMode::VsOpponent => 2,
            GameMode::Hotseat(n) => usize::from(n).clamp(2, MAX_PLAYERS),
        }
    }

    /// Side length of the starting square grid.
    #[must_use]
    pub fn initial_grid_size(self) -> usize {
        match self.player_count() {
            0..=3 => 3,
            4 | 5 => 4,
            6 | 7 => 5,
            _ => 6,
        }
    }

    /// The seat played by the simulated opponent, if any.
    #[must_use]
    pub fn opponent_seat(self) -> Option<Mark> {
        match self {
            GameMode::VsOpponent => Some(Mark::O),
            GameMode::Hotseat(_) => None,
        }
    }

    /// The next mode in the cycle, wrapping after eight players.
    #[must_use]
    pub fn next(self) -> GameMode {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::VsOpponent => write!(f, "PvAI"),
            GameMode::Hotseat(_) => write!(f, "{}P", self.player_count()),
        }
    }
}

/// Complete configuration for a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seating and board size.
    pub mode: GameMode,

    /// Hits a destructible blocker takes before it is removed.
    pub max_durability: u8,

    /// Undo snapshots kept; older ones are dropped.
    pub undo_capacity: usize,

    /// Pause a presenter should show before the next player's turn.
    /// The engine itself advances immediately.
    pub turn_advance_delay: Duration,

    /// Pause before the simulated opponent's plan is applied.
    pub opponent_delay: Duration,

    /// Seed for the simulated opponent's noise.
    pub opponent_seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::VsOpponent,
            max_durability: 2,
            undo_capacity: 50,
            turn_advance_delay: Duration::from_millis(200),
            opponent_delay: Duration::from_millis(1000),
            opponent_seed: 42,
        }
    }
}

impl MatchConfig {
    /// Default config for a mode.
    #[must_use]
    pub fn for_mode(mode: GameMode) -> Self {
        Self::default().with_mode(mode)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_durability(mut self, durability: u8) -> Self {
        self.max_durability = durability.max(1);
        self
    }

    #[must_use]
    pub fn with_undo_capacity(mut self, capacity: usize) -> Self {
        self.undo_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_opponent_seed(mut self, seed: u64) -> Self {
        self.opponent_seed = seed;
        self
    }

    #[must_use]
    pub fn with_turn_advance_delay(mut self, delay: Duration) -> Self {
        self.turn_advance_delay = delay;
        self
    }
}
