//! Mutable state of one game.
//!
//! ## DrawPile
//!
//! An ordered run of slots plus a cursor. Slots start unresolved (or fixed,
//! for authored piles) and are resolved the moment they are drawn.
//!
//! ## TableState
//!
//! Board arena, draw pile, play-pile top, move counter and phase. Both
//! containers are `im` persistent structures, so cloning a `TableState` is
//! O(1). That is what `Playout::snapshot` relies on.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::outcome::GamePhase;
use crate::board::Board;
use crate::cards::{CardValue, DrawPileEntry, Rank};

// =============================================================================
// Draw pile
// =============================================================================

/// The draw pile for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawPile {
    slots: Vector<CardValue>,
    cursor: usize,
}

impl DrawPile {
    /// A pile of `size` unresolved slots.
    #[must_use]
    pub fn unresolved(size: usize) -> Self {
        Self {
            slots: std::iter::repeat(CardValue::Unresolved).take(size).collect(),
            cursor: 0,
        }
    }

    /// A pile from an authored spec. Random entries stay unresolved.
    ///
    /// Entries must already be validated; a fixed entry outside 1..=13 is
    /// treated as random.
    #[must_use]
    pub fn from_entries(entries: &[DrawPileEntry]) -> Self {
        Self {
            slots: entries
                .iter()
                .map(|entry| {
                    entry
                        .fixed_rank()
                        .map_or(CardValue::Unresolved, CardValue::Resolved)
                })
                .collect(),
            cursor: 0,
        }
    }

    /// Total slots, drawn or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.cursor
    }

    /// Slots left to draw.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.cursor
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.slots.len()
    }

    /// The next slot, without drawing it.
    #[must_use]
    pub fn peek(&self) -> Option<CardValue> {
        self.slots.get(self.cursor).copied()
    }

    /// Draw the next slot.
    ///
    /// An unresolved slot is resolved by `resolve`, which is passed the
    /// number of slots left after this one. The resolved rank is written
    /// back so the pile history stays readable.
    pub fn draw_with<F>(&mut self, resolve: F) -> Option<Rank>
    where
        F: FnOnce(usize) -> Rank,
    {
        let slot = self.peek()?;
        self.cursor += 1;
        let rank = match slot {
            CardValue::Resolved(rank) => rank,
            CardValue::Unresolved => {
                let rank = resolve(self.remaining());
                self.slots.set(self.cursor - 1, CardValue::Resolved(rank));
                rank
            }
        };
        Some(rank)
    }

    /// Ranks drawn so far, oldest first.
    pub fn history(&self) -> impl Iterator<Item = Rank> + '_ {
        self.slots
            .iter()
            .take(self.cursor)
            .filter_map(|slot| slot.rank())
    }
}

// =============================================================================
// Table state
// =============================================================================

/// Everything that changes during one game.
#[derive(Clone, Debug)]
pub struct TableState {
    pub board: Board,
    pub draw_pile: DrawPile,

    /// The value in play. `None` until something is drawn or a value card
    /// is played.
    pub play_top: Option<Rank>,

    /// Plays plus draws, not counting the setup draw.
    pub moves: u32,

    pub phase: GamePhase,
}

impl TableState {
    #[must_use]
    pub fn new(board: Board, draw_pile: DrawPile) -> Self {
        Self {
            board,
            draw_pile,
            play_top: None,
            moves: 0,
            phase: GamePhase::Playing,
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn draw_remaining(&self) -> usize {
        self.draw_pile.remaining()
    }

    /// Cards still on the board.
    #[must_use]
    pub fn cards_left(&self) -> usize {
        self.board.on_board_count()
    }
}
