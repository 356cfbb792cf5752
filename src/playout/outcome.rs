//! Terminal playout records.

use serde::{Deserialize, Serialize};

/// Why a game was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    /// No legal play and the draw pile is empty.
    Stuck,
    /// A face-up bomb's countdown ran out.
    Bomb,
    /// The turn cap was hit. Never expected for valid levels.
    Runaway,
}

impl LossReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LossReason::Stuck => "stuck",
            LossReason::Bomb => "bomb",
            LossReason::Runaway => "runaway",
        }
    }
}

impl std::fmt::Display for LossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a game is in its lifecycle.
///
/// Setup happens inside the constructor, so a live game is always one of
/// these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Won,
    Lost(LossReason),
}

impl GamePhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Result of one finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub won: bool,

    /// Won with at most the close-win threshold of cards left to draw.
    pub close_win: bool,

    /// Cards left in the draw pile at the end.
    pub draw_remaining: usize,

    /// Plays and draws made.
    pub moves: u32,

    /// Set exactly when `won` is false.
    pub loss_reason: Option<LossReason>,
}

impl GameOutcome {
    #[must_use]
    pub fn win(draw_remaining: usize, moves: u32, close_win_threshold: usize) -> Self {
        Self {
            won: true,
            close_win: draw_remaining <= close_win_threshold,
            draw_remaining,
            moves,
            loss_reason: None,
        }
    }

    #[must_use]
    pub fn loss(reason: LossReason, draw_remaining: usize, moves: u32) -> Self {
        Self {
            won: false,
            close_win: false,
            draw_remaining,
            moves,
            loss_reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_win_boundary() {
        assert!(GameOutcome::win(2, 10, 2).close_win);
        assert!(!GameOutcome::win(3, 10, 2).close_win);
        assert!(GameOutcome::win(0, 10, 2).close_win);
    }

    #[test]
    fn test_loss_is_never_close() {
        let outcome = GameOutcome::loss(LossReason::Bomb, 0, 4);
        assert!(!outcome.won);
        assert!(!outcome.close_win);
        assert_eq!(outcome.loss_reason, Some(LossReason::Bomb));
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!GamePhase::Playing.is_terminal());
        assert!(GamePhase::Won.is_terminal());
        assert!(GamePhase::Lost(LossReason::Stuck).is_terminal());
        assert_eq!(LossReason::Runaway.to_string(), "runaway");
    }
}
