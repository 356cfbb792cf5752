//! Per-deck-size aggregate statistics.
//!
//! Playouts are reduced into a [`Tally`] of integer counts and sums, which
//! merges associatively and commutatively, so a parallel batch reduces to
//! the same numbers however the pool schedules it. Rates and averages are
//! derived once at the end in [`SizeStats::from_tally`].

use serde::{Deserialize, Serialize};

use crate::playout::{GameOutcome, LossReason};

/// Raw counts for a batch of playouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub games: u32,
    pub wins: u32,
    pub close_wins: u32,
    pub losses: LossBreakdown,
    pub total_moves: u64,
    pub win_moves: u64,
    pub win_remaining: u64,
}

impl Tally {
    /// Tally of a single game.
    #[must_use]
    pub fn from_outcome(outcome: &GameOutcome) -> Self {
        let mut tally = Self::default();
        tally.record(outcome);
        tally
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        self.total_moves += u64::from(outcome.moves);
        if outcome.won {
            self.wins += 1;
            self.win_moves += u64::from(outcome.moves);
            self.win_remaining += outcome.draw_remaining as u64;
            if outcome.close_win {
                self.close_wins += 1;
            }
        } else if let Some(reason) = outcome.loss_reason {
            self.losses.record(reason);
        }
    }

    /// Combine two tallies.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            games: self.games + other.games,
            wins: self.wins + other.wins,
            close_wins: self.close_wins + other.close_wins,
            losses: self.losses.merge(other.losses),
            total_moves: self.total_moves + other.total_moves,
            win_moves: self.win_moves + other.win_moves,
            win_remaining: self.win_remaining + other.win_remaining,
        }
    }
}

/// Losses by reason.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossBreakdown {
    pub stuck: u32,
    pub bomb: u32,
    pub runaway: u32,
}

impl LossBreakdown {
    pub fn record(&mut self, reason: LossReason) {
        match reason {
            LossReason::Stuck => self.stuck += 1,
            LossReason::Bomb => self.bomb += 1,
            LossReason::Runaway => self.runaway += 1,
        }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            stuck: self.stuck + other.stuck,
            bomb: self.bomb + other.bomb,
            runaway: self.runaway + other.runaway,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.stuck + self.bomb + self.runaway
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Aggregate statistics for one deck size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    pub deck_size: usize,
    pub games: u32,
    pub wins: u32,
    pub close_wins: u32,

    /// `wins / games`.
    pub win_rate: f64,

    /// `close_wins / wins`, 0 with no wins.
    pub close_win_rate: f64,

    pub avg_moves_on_win: f64,
    pub avg_remaining_on_win: f64,

    /// Average moves over every game, won or lost.
    pub avg_moves: f64,

    pub losses: LossBreakdown,

    /// At least one win and a close-win rate at or above the target.
    pub meets_target: bool,
}

impl SizeStats {
    /// Derive rates and averages from raw counts.
    #[must_use]
    pub fn from_tally(deck_size: usize, tally: &Tally, target_close_win_rate: f64) -> Self {
        let wins = u64::from(tally.wins);
        let mut stats = Self {
            deck_size,
            games: tally.games,
            wins: tally.wins,
            close_wins: tally.close_wins,
            win_rate: ratio(wins, u64::from(tally.games)),
            close_win_rate: ratio(u64::from(tally.close_wins), wins),
            avg_moves_on_win: ratio(tally.win_moves, wins),
            avg_remaining_on_win: ratio(tally.win_remaining, wins),
            avg_moves: ratio(tally.total_moves, u64::from(tally.games)),
            losses: tally.losses,
            meets_target: false,
        };
        stats.meets_target = stats.meets(target_close_win_rate);
        stats
    }

    /// Whether this size qualifies for `target`.
    #[must_use]
    pub fn meets(&self, target_close_win_rate: f64) -> bool {
        self.wins > 0 && self.close_win_rate >= target_close_win_rate
    }

    #[must_use]
    pub fn losses(&self) -> u32 {
        self.games - self.wins
    }
}
