//! Board arena and coverage model.
//!
//! The arena owns every card of one game; the coverage functions answer
//! "what can be played" and perform cascading reveals.

pub mod arena;
pub mod coverage;

pub use arena::Board;
pub use coverage::{
    covers, coverers, is_covered, playable_cards, reveal_newly_uncovered, uncover_count,
};
