//! Action representation: kinds, concrete intents, budgets and log records.
//!
//! An [`ActionKind`] is the "tool" a turn budget counts uses of.
//! An [`Action`] is one concrete use of a tool against the board.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::grid::{Axis, Coord};
use super::player::Mark;

/// The two blocker types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockerKind {
    /// Never removed once placed.
    Permanent,
    /// Removed after enough damage.
    Destructible,
}

/// A unit counted by a turn budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    PlaceMark,
    PlacePermanentBlocker,
    PlaceDestructibleBlocker,
    PlaceProtection,
    Expand,
    Damage,
}

impl ActionKind {
    /// The kind that places a given blocker.
    #[must_use]
    pub const fn for_blocker(kind: BlockerKind) -> Self {
        match kind {
            BlockerKind::Permanent => ActionKind::PlacePermanentBlocker,
            BlockerKind::Destructible => ActionKind::PlaceDestructibleBlocker,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::PlaceMark => "place-mark",
            ActionKind::PlacePermanentBlocker => "place-permanent-blocker",
            ActionKind::PlaceDestructibleBlocker => "place-destructible-blocker",
            ActionKind::PlaceProtection => "place-protection",
            ActionKind::Expand => "expand",
            ActionKind::Damage => "damage",
        };
        f.write_str(name)
    }
}

/// A concrete intent against the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    PlaceMark(Coord),
    PlaceBlocker { at: Coord, kind: BlockerKind },
    PlaceProtection(Coord),
    Damage(Coord),
    Expand { index: usize, axis: Axis },
    /// End the turn by hand.
    Pass,
}

impl Action {
    /// The budget kind this action consumes. `Pass` consumes nothing.
    #[must_use]
    pub const fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::PlaceMark(_) => Some(ActionKind::PlaceMark),
            Action::PlaceBlocker { kind, .. } => Some(ActionKind::for_blocker(*kind)),
            Action::PlaceProtection(_) => Some(ActionKind::PlaceProtection),
            Action::Damage(_) => Some(ActionKind::Damage),
            Action::Expand { .. } => Some(ActionKind::Expand),
            Action::Pass => None,
        }
    }

    /// The targeted cell, for cell actions.
    #[must_use]
    pub const fn target(&self) -> Option<Coord> {
        match self {
            Action::PlaceMark(at)
            | Action::PlaceBlocker { at, .. }
            | Action::PlaceProtection(at)
            | Action::Damage(at) => Some(*at),
            Action::Expand { .. } | Action::Pass => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::PlaceMark(at) => write!(f, "Placed mark at {at}"),
            Action::PlaceBlocker { at, kind: BlockerKind::Permanent } => {
                write!(f, "Placed permanent blocker at {at}")
            }
            Action::PlaceBlocker { at, kind: BlockerKind::Destructible } => {
                write!(f, "Placed destructible blocker at {at}")
            }
            Action::PlaceProtection(at) => write!(f, "Protected {at}"),
            Action::Damage(at) => write!(f, "Damaged blocker at {at}"),
            Action::Expand { index, axis } => write!(f, "Inserted {axis} at {index}"),
            Action::Pass => write!(f, "Passed turn"),
        }
    }
}

/// Remaining uses per action kind for the current turn.
///
/// Entries keep the order of the config they came from; the first entry with
/// uses left is the tool the engine falls back to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionBudget {
    entries: SmallVec<[(ActionKind, u8); 2]>,
}

impl ActionBudget {
    /// An empty budget (no actions available).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A budget from `(kind, count)` pairs.
    #[must_use]
    pub fn from_cost(cost: &[(ActionKind, u8)]) -> Self {
        Self {
            entries: SmallVec::from_slice(cost),
        }
    }

    /// Uses left for `kind`.
    #[must_use]
    pub fn remaining(&self, kind: ActionKind) -> u8 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    /// Spend one use of `kind`. Returns `false` if none were left.
    pub fn consume(&mut self, kind: ActionKind) -> bool {
        match self.entries.iter_mut().find(|(k, n)| *k == kind && *n > 0) {
            Some((_, n)) => {
                *n -= 1;
                true
            }
            None => false,
        }
    }

    /// True when no kind has a use left.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.entries.iter().all(|(_, n)| *n == 0)
    }

    /// First kind (in config order) with a use left.
    #[must_use]
    pub fn first_available(&self) -> Option<ActionKind> {
        self.entries.iter().find(|(_, n)| *n > 0).map(|(k, _)| *k)
    }

    /// Iterate over `(kind, remaining)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, u8)> + '_ {
        self.entries.iter().copied()
    }
}

/// An action-log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who acted.
    pub player: Mark,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number across the match (for ordering).
    pub sequence: u32,

    /// Extra detail, e.g. whether a damaged blocker was crushed.
    pub note: Option<String>,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: Mark, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl std::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[turn {}] {}: {}", self.turn, self.player, self.action)?;
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind() {
        assert_eq!(Action::PlaceMark(Coord::new(0, 0)).kind(), Some(ActionKind::PlaceMark));
        assert_eq!(
            Action::PlaceBlocker { at: Coord::new(0, 0), kind: BlockerKind::Destructible }.kind(),
            Some(ActionKind::PlaceDestructibleBlocker)
        );
        assert_eq!(
            Action::Expand { index: 0, axis: Axis::Row }.kind(),
            Some(ActionKind::Expand)
        );
        assert_eq!(Action::Pass.kind(), None);
    }

    #[test]
    fn test_action_target() {
        assert_eq!(Action::Damage(Coord::new(2, 1)).target(), Some(Coord::new(2, 1)));
        assert_eq!(Action::Expand { index: 1, axis: Axis::Column }.target(), None);
    }

    #[test]
    fn test_budget_consume() {
        let mut budget = ActionBudget::from_cost(&[
            (ActionKind::PlacePermanentBlocker, 1),
            (ActionKind::Expand, 1),
        ]);

        assert_eq!(budget.first_available(), Some(ActionKind::PlacePermanentBlocker));
        assert!(budget.consume(ActionKind::PlacePermanentBlocker));
        assert!(!budget.consume(ActionKind::PlacePermanentBlocker));
        assert_eq!(budget.remaining(ActionKind::PlacePermanentBlocker), 0);
        assert_eq!(budget.first_available(), Some(ActionKind::Expand));
        assert!(!budget.is_exhausted());

        assert!(budget.consume(ActionKind::Expand));
        assert!(budget.is_exhausted());
        assert_eq!(budget.first_available(), None);
    }

    #[test]
    fn test_budget_unknown_kind() {
        let mut budget = ActionBudget::from_cost(&[(ActionKind::PlaceMark, 1)]);
        assert_eq!(budget.remaining(ActionKind::Damage), 0);
        assert!(!budget.consume(ActionKind::Damage));
        assert_eq!(budget.remaining(ActionKind::PlaceMark), 1);
    }

    #[test]
    fn test_empty_budget_is_exhausted() {
        assert!(ActionBudget::empty().is_exhausted());
    }

    #[test]
    fn test_record_display() {
        let record = ActionRecord::new(Mark::O, Action::Damage(Coord::new(1, 2)), 4, 9)
            .with_note("crushed");
        assert_eq!(record.to_string(), "[turn 4] O: Damaged blocker at (1,2) (crushed)");
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(
            Mark::Z,
            Action::Expand { index: 2, axis: Axis::Row },
            2,
            3,
        );

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
