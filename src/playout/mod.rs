//! Playout engine: drives one game to a win or a loss.
//!
//! - [`Playout`]: the turn loop, plus the live-play surface
//! - [`TableState`] / [`DrawPile`]: the per-game mutable state
//! - [`GameOutcome`]: what the tuner aggregates

pub mod engine;
pub mod outcome;
pub mod state;

pub use engine::{simulate, Playout, PlayoutSnapshot, TurnReport};
pub(crate) use engine::validate_inputs;
pub use outcome::{GameOutcome, GamePhase, LossReason};
pub use state::{DrawPile, TableState};
