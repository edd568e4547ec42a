//! Undo support.
//!
//! Every committed action pushes a snapshot of the whole `MatchState`
//! before it is applied; undo restores one.

pub mod undo;

pub use undo::UndoHistory;
