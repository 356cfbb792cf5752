//! Player actions.
//!
//! A turn is exactly one action: play a board card or draw from the pile.
//! The simulator picks actions with the turn policy; a live game submits
//! the player's choice through the same type.

use serde::{Deserialize, Serialize};

use crate::cards::CardIndex;

/// One turn's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play the board card at this arena index.
    Play(CardIndex),
    /// Draw the next draw-pile card onto the play pile.
    Draw,
}

impl Action {
    /// The played card, if this is a play.
    #[must_use]
    pub fn card(self) -> Option<CardIndex> {
        match self {
            Action::Play(index) => Some(index),
            Action::Draw => None,
        }
    }

    /// Short label for logs and reports.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Action::Play(index) => format!("play:{}", index.raw()),
            Action::Draw => "draw".to_string(),
        }
    }
}

/// A recorded action with the move number it was taken on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: Action,
    pub move_number: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(action: Action, move_number: u32) -> Self {
        Self {
            action,
            move_number,
        }
    }
}
