//! Card templates - static card data from the level file.
//!
//! `CardTemplate` holds the immutable properties of one board card: where
//! it sits, what tier it is on, how it starts, and what it does. Mutable
//! per-game state lives in [`SimCard`](super::SimCard).

use serde::{Deserialize, Serialize};

use super::rank::Rank;
use crate::core::TemplateError;

/// What a card does when played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Ordinary card: playable on an adjacent rank, becomes the new play top.
    Value,
    /// Never playable; removed when a key is played.
    Lock,
    /// Always playable; removes every lock on the board.
    Key,
    /// Always playable; clears every other card in its row.
    Zap,
}

impl CardKind {
    /// Short label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CardKind::Value => "value",
            CardKind::Lock => "lock",
            CardKind::Key => "key",
            CardKind::Zap => "zap",
        }
    }
}

/// Static card template.
///
/// Constructors produce face-up cards; chain `face_down()` for buried ones.
///
/// ```
/// use peak_balance::cards::{CardKind, CardTemplate};
///
/// let card = CardTemplate::random("b3", 0, 1.5, 0.0)
///     .face_down()
///     .with_bomb(6);
///
/// assert_eq!(card.kind, CardKind::Value);
/// assert!(card.random && !card.face_up);
/// assert_eq!(card.bomb, Some(6));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Unique identifier within the level.
    pub id: String,

    pub kind: CardKind,

    /// Layer index. Higher tiers sit on top of lower ones.
    pub tier: i32,

    /// Board coordinates in layout units.
    pub x: f32,
    pub y: f32,

    /// Starts face-up.
    #[serde(default)]
    pub face_up: bool,

    /// Value is chosen at play time instead of fixed by the level.
    #[serde(default)]
    pub random: bool,

    /// Fixed value, ignored when `random` is set.
    #[serde(default)]
    pub value: Option<i64>,

    /// Initial bomb countdown, if the card carries a bomb.
    #[serde(default)]
    pub bomb: Option<i32>,
}

impl CardTemplate {
    fn base(id: impl Into<String>, kind: CardKind, tier: i32, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            kind,
            tier,
            x,
            y,
            face_up: true,
            random: false,
            value: None,
            bomb: None,
        }
    }

    /// Value card with a fixed rank.
    pub fn value_card(id: impl Into<String>, tier: i32, x: f32, y: f32, value: u8) -> Self {
        let mut card = Self::base(id, CardKind::Value, tier, x, y);
        card.value = Some(i64::from(value));
        card
    }

    /// Value card whose rank is chosen during play.
    pub fn random(id: impl Into<String>, tier: i32, x: f32, y: f32) -> Self {
        let mut card = Self::base(id, CardKind::Value, tier, x, y);
        card.random = true;
        card
    }

    pub fn lock(id: impl Into<String>, tier: i32, x: f32, y: f32) -> Self {
        Self::base(id, CardKind::Lock, tier, x, y)
    }

    pub fn key(id: impl Into<String>, tier: i32, x: f32, y: f32) -> Self {
        Self::base(id, CardKind::Key, tier, x, y)
    }

    pub fn zap(id: impl Into<String>, tier: i32, x: f32, y: f32) -> Self {
        Self::base(id, CardKind::Zap, tier, x, y)
    }

    /// Start face-down.
    #[must_use]
    pub fn face_down(mut self) -> Self {
        self.face_up = false;
        self
    }

    /// Attach a bomb with the given initial countdown.
    #[must_use]
    pub fn with_bomb(mut self, countdown: i32) -> Self {
        self.bomb = Some(countdown);
        self
    }

    /// The fixed rank, when the card is a non-random value card.
    #[must_use]
    pub fn fixed_rank(&self) -> Option<Rank> {
        if self.random {
            return None;
        }
        self.value.and_then(Rank::from_i64)
    }

    /// Check this template in isolation. `index` is its position in the level.
    pub fn validate(&self, index: usize) -> Result<(), TemplateError> {
        if self.id.trim().is_empty() {
            return Err(TemplateError::EmptyId(index));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(TemplateError::InvalidPosition {
                id: self.id.clone(),
                x: self.x,
                y: self.y,
            });
        }
        if self.kind == CardKind::Value && !self.random {
            match self.value {
                None => return Err(TemplateError::MissingValue(self.id.clone())),
                Some(value) if Rank::from_i64(value).is_none() => {
                    return Err(TemplateError::InvalidValue {
                        id: self.id.clone(),
                        value,
                    })
                }
                Some(_) => {}
            }
        }
        if let Some(countdown) = self.bomb {
            if countdown <= 0 {
                return Err(TemplateError::InvalidBomb {
                    id: self.id.clone(),
                    countdown,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let card = CardTemplate::value_card("a", 2, 1.0, 0.5, 9);
        assert_eq!(card.kind, CardKind::Value);
        assert_eq!(card.fixed_rank(), Rank::new(9));
        assert!(card.face_up);

        let key = CardTemplate::key("k", 0, 0.0, 0.0);
        assert_eq!(key.kind, CardKind::Key);
        assert_eq!(key.fixed_rank(), None);
    }

    #[test]
    fn test_random_ignores_fixed_value() {
        let mut card = CardTemplate::random("r", 0, 0.0, 0.0);
        card.value = Some(99);
        assert!(card.validate(0).is_ok());
        assert_eq!(card.fixed_rank(), None);
    }

    #[test]
    fn test_validate_rejects_bad_value() {
        let card = CardTemplate::value_card("a", 0, 0.0, 0.0, 14);
        assert_eq!(
            card.validate(0),
            Err(TemplateError::InvalidValue {
                id: "a".into(),
                value: 14
            })
        );

        let mut card = CardTemplate::value_card("b", 0, 0.0, 0.0, 3);
        card.value = None;
        assert_eq!(card.validate(1), Err(TemplateError::MissingValue("b".into())));
    }

    #[test]
    fn test_validate_rejects_bad_bomb_and_position() {
        let card = CardTemplate::value_card("a", 0, 0.0, 0.0, 3).with_bomb(0);
        assert!(matches!(card.validate(0), Err(TemplateError::InvalidBomb { .. })));

        let card = CardTemplate::value_card("a", 0, f32::NAN, 0.0, 3);
        assert!(matches!(
            card.validate(0),
            Err(TemplateError::InvalidPosition { .. })
        ));

        let card = CardTemplate::value_card("  ", 0, 0.0, 0.0, 3);
        assert_eq!(card.validate(4), Err(TemplateError::EmptyId(4)));
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{"id":"c1","kind":"value","tier":1,"x":0.5,"y":1.0,"value":4}"#;
        let card: CardTemplate = serde_json::from_str(json).unwrap();
        assert!(!card.face_up);
        assert!(!card.random);
        assert_eq!(card.bomb, None);
        assert_eq!(card.fixed_rank(), Rank::new(4));
    }
}
