//! Rules: the match engine and win detection.
//!
//! `MatchEngine` is the only thing allowed to mutate a `MatchState`. It
//! validates every operation, keeps the undo history and rotates turns.
//! `check_win` is a pure scan over a `Grid` and can be used on its own.

pub mod engine;
pub mod win;

pub use engine::{MatchEngine, Outcome};
pub use win::check_win;
