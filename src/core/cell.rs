//! Board cells and their occupants.
//!
//! A cell only ever moves forward through its lifecycle:
//! - `Empty` may become a mark, a blocker, or gain the protection flag
//! - marks and permanent blockers never change again
//! - destructible blockers lose durability and fall back to `Empty` at zero
//! - the protection flag is dropped when a mark lands on the cell

use serde::{Deserialize, Serialize};

use super::action::BlockerKind;
use super::player::Mark;

/// What occupies a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    /// A player's mark. Immutable once placed.
    Mark(Mark),
    /// A blocker that can never be removed.
    PermanentBlocker,
    /// A blocker with finite durability.
    DestructibleBlocker,
}

impl Occupant {
    /// The occupant a blocker placement produces.
    #[must_use]
    pub const fn blocker(kind: BlockerKind) -> Self {
        match kind {
            BlockerKind::Permanent => Occupant::PermanentBlocker,
            BlockerKind::Destructible => Occupant::DestructibleBlocker,
        }
    }
}

/// One grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub occupant: Occupant,
    /// Remaining hits for a destructible blocker; zero otherwise.
    pub durability: u8,
    /// Blocks blocker placement, not marks.
    pub protected: bool,
}

impl Cell {
    /// An empty, unprotected cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            occupant: Occupant::Empty,
            durability: 0,
            protected: false,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.occupant, Occupant::Empty)
    }

    /// The owning mark, if a player occupies this cell.
    #[must_use]
    pub const fn mark(&self) -> Option<Mark> {
        match self.occupant {
            Occupant::Mark(mark) => Some(mark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_destructible(&self) -> bool {
        matches!(self.occupant, Occupant::DestructibleBlocker)
    }

    /// Occupy with a player's mark. Protection no longer applies afterwards.
    pub fn set_mark(&mut self, mark: Mark) {
        self.occupant = Occupant::Mark(mark);
        self.protected = false;
    }

    /// Occupy with a blocker. Destructible blockers start at `max_durability`,
    /// and never below one.
    pub fn set_blocker(&mut self, kind: BlockerKind, max_durability: u8) {
        self.occupant = Occupant::blocker(kind);
        self.durability = match kind {
            BlockerKind::Permanent => 0,
            BlockerKind::Destructible => max_durability.max(1),
        };
    }

    /// Deal one point of damage to a destructible blocker.
    ///
    /// Returns `true` if the blocker was destroyed by this hit.
    pub fn hit(&mut self) -> bool {
        self.durability = self.durability.saturating_sub(1);
        if self.durability == 0 {
            self.occupant = Occupant::Empty;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell() {
        let cell = Cell::empty();
        assert!(cell.is_empty());
        assert_eq!(cell.mark(), None);
        assert!(!cell.protected);
        assert_eq!(cell, Cell::default());
    }

    #[test]
    fn test_mark_clears_protection() {
        let mut cell = Cell::empty();
        cell.protected = true;

        cell.set_mark(Mark::O);

        assert_eq!(cell.mark(), Some(Mark::O));
        assert!(!cell.protected);
    }

    #[test]
    fn test_destructible_lifecycle() {
        let mut cell = Cell::empty();
        cell.set_blocker(BlockerKind::Destructible, 2);
        assert!(cell.is_destructible());
        assert_eq!(cell.durability, 2);

        assert!(!cell.hit());
        assert_eq!(cell.durability, 1);
        assert!(cell.is_destructible());

        assert!(cell.hit());
        assert!(cell.is_empty());
        assert_eq!(cell.durability, 0);
    }

    #[test]
    fn test_destructible_durability_floor() {
        let mut cell = Cell::empty();
        cell.set_blocker(BlockerKind::Destructible, 0);
        assert_eq!(cell.durability, 1);
        assert!(cell.hit());
        assert!(cell.is_empty());
    }

    #[test]
    fn test_permanent_blocker_has_no_durability() {
        let mut cell = Cell::empty();
        cell.set_blocker(BlockerKind::Permanent, 2);
        assert_eq!(cell.occupant, Occupant::PermanentBlocker);
        assert_eq!(cell.durability, 0);
    }
}
