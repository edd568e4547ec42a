//! Player identification and per-player data storage.
//!
//! ## Mark
//!
//! The eight fixed player identities. A match uses a prefix of
//! [`Mark::ALL`] as its cyclic turn order.
//!
//! ## PlayerMap
//!
//! Per-mark storage backed by a `Vec` for O(1) access.
//! Supports iteration and indexing by `Mark`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Maximum number of players in a match.
pub const MAX_PLAYERS: usize = 8;

/// A player identity, which is also the symbol that player places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
    Z,
    A,
    M,
    S,
    T,
    K,
}

impl Mark {
    /// All marks in canonical seating order.
    pub const ALL: [Mark; MAX_PLAYERS] = [
        Mark::X,
        Mark::O,
        Mark::Z,
        Mark::A,
        Mark::M,
        Mark::S,
        Mark::T,
        Mark::K,
    ];

    /// Seat index of this mark (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The marks seated in a match with `player_count` players.
    ///
    /// ```
    /// use expanse_ttt::core::Mark;
    ///
    /// let seated: Vec<_> = Mark::seated(3).collect();
    /// assert_eq!(seated, vec![Mark::X, Mark::O, Mark::Z]);
    /// ```
    pub fn seated(player_count: usize) -> impl Iterator<Item = Mark> {
        Self::ALL.into_iter().take(player_count.min(MAX_PLAYERS))
    }

    /// Next mark in the cyclic turn order of a `player_count` match.
    #[must_use]
    pub fn next_in(self, player_count: usize) -> Mark {
        let count = player_count.clamp(1, MAX_PLAYERS);
        Self::ALL[(self.index() + 1) % count]
    }

    /// The display symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
            Mark::Z => 'Z',
            Mark::A => 'A',
            Mark::M => 'M',
            Mark::S => 'S',
            Mark::T => 'T',
            Mark::K => 'K',
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Per-mark data storage with O(1) access.
///
/// Always holds one entry for each of the eight marks, so a tally survives
/// switching between modes with different player counts.
///
/// ## Example
///
/// ```
/// use expanse_ttt::core::{Mark, PlayerMap};
///
/// let mut wins: PlayerMap<u32> = PlayerMap::with_value(0);
/// wins[Mark::O] += 1;
/// assert_eq!(wins[Mark::O], 1);
/// assert_eq!(wins[Mark::X], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(Mark) -> T) -> Self {
        Self {
            data: Mark::ALL.into_iter().map(factory).collect(),
        }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a mark's data.
    #[must_use]
    pub fn get(&self, mark: Mark) -> &T {
        &self.data[mark.index()]
    }

    /// Get a mutable reference to a mark's data.
    pub fn get_mut(&mut self, mark: Mark) -> &mut T {
        &mut self.data[mark.index()]
    }

    /// Iterate over (Mark, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Mark, &T)> {
        Mark::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Mark> for PlayerMap<T> {
    type Output = T;

    fn index(&self, mark: Mark) -> &Self::Output {
        self.get(mark)
    }
}

impl<T> IndexMut<Mark> for PlayerMap<T> {
    fn index_mut(&mut self, mark: Mark) -> &mut Self::Output {
        self.get_mut(mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_basics() {
        assert_eq!(Mark::X.index(), 0);
        assert_eq!(Mark::K.index(), 7);
        assert_eq!(Mark::ALL[2], Mark::Z);
        assert_eq!(format!("{}", Mark::A), "A");
    }

    #[test]
    fn test_two_player_order() {
        assert_eq!(Mark::X.next_in(2), Mark::O);
        assert_eq!(Mark::O.next_in(2), Mark::X);
    }

    #[test]
    fn test_eight_player_order_wraps() {
        let mut mark = Mark::X;
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(mark);
            mark = mark.next_in(8);
        }
        assert_eq!(seen, Mark::ALL.to_vec());
        assert_eq!(mark, Mark::X);
    }

    #[test]
    fn test_seated() {
        assert_eq!(Mark::seated(2).count(), 2);
        assert_eq!(Mark::seated(5).last(), Some(Mark::M));
        assert_eq!(Mark::seated(20).count(), MAX_PLAYERS);
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<usize> = PlayerMap::new(|m| m.index() * 10);

        assert_eq!(map[Mark::X], 0);
        assert_eq!(map[Mark::O], 10);
        assert_eq!(map[Mark::K], 70);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<u32> = PlayerMap::with_value(0);

        map[Mark::Z] = 3;
        *map.get_mut(Mark::S) += 2;

        assert_eq!(map[Mark::Z], 3);
        assert_eq!(map[Mark::S], 2);
        assert_eq!(map[Mark::X], 0);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<usize> = PlayerMap::new(|m| m.index());

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), MAX_PLAYERS);
        assert_eq!(pairs[0], (Mark::X, &0));
        assert_eq!(pairs[7], (Mark::K, &7));
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<u32> = PlayerMap::new(|m| m.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
