//! Turn policy: play legality and the heuristic autoplayer.
//!
//! There is exactly one policy, expressed as an ordered rule cascade in
//! [`choose`]. It is a total function of the candidate set and the board.

pub mod heuristic;

pub use heuristic::{
    can_play, card_score, choose, legal_candidates, row_mates, zap_clear_count, Decision,
    PolicyRule, BOMB_PANIC_COUNTDOWN, ZAP_MIN_CLEAR,
};
