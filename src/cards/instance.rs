//! Simulation cards - per-game mutable card state.
//!
//! One `SimCard` is created per template at game start and dropped when the
//! playout ends. Cards live in the board arena and are addressed by
//! [`CardIndex`].
//!
//! ## Deferred values
//!
//! A random card that starts face-down has no value yet
//! ([`CardValue::Unresolved`]). Its value is chosen when it is revealed, so
//! the favorable generator can use the board as it is at that moment.
//! Resolution happens exactly once.

use serde::{Deserialize, Serialize};

use super::definition::{CardKind, CardTemplate};
use super::rank::Rank;
use crate::core::GameRng;

/// Index of a card in the board arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardIndex(pub u32);

impl CardIndex {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A card value that may not have been chosen yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardValue {
    Unresolved,
    Resolved(Rank),
}

impl CardValue {
    #[must_use]
    pub fn rank(self) -> Option<Rank> {
        match self {
            CardValue::Resolved(rank) => Some(rank),
            CardValue::Unresolved => None,
        }
    }

    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, CardValue::Resolved(_))
    }
}

/// Bomb attached to a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BombTimer {
    /// Countdown the level started it at.
    pub initial: i32,
    /// Moves left; the game is lost when this reaches zero.
    pub countdown: i32,
}

impl BombTimer {
    #[must_use]
    pub fn new(initial: i32) -> Self {
        Self {
            initial,
            countdown: initial,
        }
    }

    /// Moves elapsed since the bomb started ticking.
    #[must_use]
    pub fn elapsed(&self) -> i32 {
        self.initial - self.countdown
    }

    #[must_use]
    pub fn has_detonated(&self) -> bool {
        self.countdown <= 0
    }
}

/// A card instance in one playout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimCard {
    pub kind: CardKind,
    pub tier: i32,
    pub x: f32,
    pub y: f32,

    /// Only meaningful for value cards.
    pub value: CardValue,

    /// Still on the board (not played or cleared).
    pub on_board: bool,

    pub face_up: bool,

    /// Locked cards can never be played.
    pub locked: bool,

    pub bomb: Option<BombTimer>,
}

impl SimCard {
    /// Instantiate a template for a new game.
    ///
    /// Random cards that start face-up get a uniform value now, since nothing
    /// is hidden about them. Random face-down cards stay unresolved.
    pub fn from_template(template: &CardTemplate, rng: &mut GameRng) -> Self {
        let value = match (template.kind, template.random) {
            (CardKind::Value, true) if template.face_up => CardValue::Resolved(rng.rank()),
            (CardKind::Value, true) => CardValue::Unresolved,
            _ => template
                .fixed_rank()
                .map_or(CardValue::Unresolved, CardValue::Resolved),
        };

        Self {
            kind: template.kind,
            tier: template.tier,
            x: template.x,
            y: template.y,
            value,
            on_board: true,
            face_up: template.face_up,
            locked: template.kind == CardKind::Lock,
            bomb: template.bomb.map(BombTimer::new),
        }
    }

    #[must_use]
    pub fn rank(&self) -> Option<Rank> {
        self.value.rank()
    }

    /// Value card still waiting for its value.
    #[must_use]
    pub fn needs_resolution(&self) -> bool {
        self.kind == CardKind::Value && !self.value.is_resolved()
    }

    /// Assign a deferred value. A resolved value is never overwritten.
    pub fn resolve(&mut self, rank: Rank) {
        if !self.value.is_resolved() {
            self.value = CardValue::Resolved(rank);
        }
    }

    #[must_use]
    pub fn is_bomb(&self) -> bool {
        self.bomb.is_some()
    }

    #[must_use]
    pub fn bomb_countdown(&self) -> Option<i32> {
        self.bomb.map(|b| b.countdown)
    }

    /// On board and visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.on_board && self.face_up
    }

    /// Planar distance to another card.
    #[must_use]
    pub fn distance_to(&self, other: &SimCard) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
