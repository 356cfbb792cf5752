//! Level templates: the board layout plus draw-pile settings.
//!
//! A level is loaded once and shared read-only by every playout. It is
//! validated as a whole before any simulation starts.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::definition::CardTemplate;
use super::rank::Rank;
use crate::core::TemplateError;

/// The only win condition the engine plays.
pub const CLEAR_ALL: &str = "clear_all";

/// One slot of an authored draw pile.
///
/// Serialized as either a number (fixed value) or the string `"random"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry", into = "RawEntry")]
pub enum DrawPileEntry {
    Fixed(i64),
    Random,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Fixed(i64),
    Marker(String),
}

impl TryFrom<RawEntry> for DrawPileEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        match raw {
            RawEntry::Fixed(value) => Ok(DrawPileEntry::Fixed(value)),
            RawEntry::Marker(marker) if marker.eq_ignore_ascii_case("random") => {
                Ok(DrawPileEntry::Random)
            }
            RawEntry::Marker(other) => Err(format!("unknown draw pile marker `{other}`")),
        }
    }
}

impl From<DrawPileEntry> for RawEntry {
    fn from(entry: DrawPileEntry) -> Self {
        match entry {
            DrawPileEntry::Fixed(value) => RawEntry::Fixed(value),
            DrawPileEntry::Random => RawEntry::Marker("random".to_string()),
        }
    }
}

impl DrawPileEntry {
    /// The fixed rank, if any.
    #[must_use]
    pub fn fixed_rank(self) -> Option<Rank> {
        match self {
            DrawPileEntry::Fixed(value) => Rank::from_i64(value),
            DrawPileEntry::Random => None,
        }
    }
}

fn default_win_condition() -> String {
    CLEAR_ALL.to_string()
}

/// Level-wide settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    /// Authored draw pile; its length is the nominal deck size.
    #[serde(default, alias = "drawPileSpec")]
    pub draw_pile_spec: Vec<DrawPileEntry>,

    #[serde(default = "default_win_condition", alias = "winCondition")]
    pub win_condition: String,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            draw_pile_spec: Vec::new(),
            win_condition: default_win_condition(),
        }
    }
}

/// A complete level.
///
/// ```
/// use peak_balance::cards::{CardTemplate, LevelTemplate};
///
/// let level = LevelTemplate::new("tiny", vec![
///     CardTemplate::value_card("a", 0, 0.0, 0.0, 5),
///     CardTemplate::random("b", 0, 1.0, 0.0),
/// ]);
/// assert!(level.validate().is_ok());
///
/// let tuned = level.with_random_draw_pile(12);
/// assert_eq!(tuned.nominal_deck_size(), 12);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    #[serde(default)]
    pub name: String,

    pub cards: Vec<CardTemplate>,

    #[serde(default)]
    pub settings: LevelSettings,
}

impl LevelTemplate {
    /// Create a level with default settings and an empty authored pile.
    pub fn new(name: impl Into<String>, cards: Vec<CardTemplate>) -> Self {
        Self {
            name: name.into(),
            cards,
            settings: LevelSettings::default(),
        }
    }

    /// Set the authored draw pile.
    #[must_use]
    pub fn with_draw_pile(mut self, entries: Vec<DrawPileEntry>) -> Self {
        self.settings.draw_pile_spec = entries;
        self
    }

    /// Length of the authored draw pile.
    #[must_use]
    pub fn nominal_deck_size(&self) -> usize {
        self.settings.draw_pile_spec.len()
    }

    /// Copy of this level whose draw pile is `size` random markers.
    #[must_use]
    pub fn with_random_draw_pile(&self, size: usize) -> Self {
        let mut level = self.clone();
        level.settings.draw_pile_spec = vec![DrawPileEntry::Random; size];
        level
    }

    /// Reject malformed input. Nothing is coerced.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.cards.is_empty() {
            return Err(TemplateError::EmptyBoard);
        }

        let mut seen = FxHashSet::default();
        for (index, card) in self.cards.iter().enumerate() {
            card.validate(index)?;
            if !seen.insert(card.id.as_str()) {
                return Err(TemplateError::DuplicateId(card.id.clone()));
            }
        }

        for (index, entry) in self.settings.draw_pile_spec.iter().enumerate() {
            if let DrawPileEntry::Fixed(value) = *entry {
                if Rank::from_i64(value).is_none() {
                    return Err(TemplateError::InvalidDrawEntry { index, value });
                }
            }
        }

        if self.settings.win_condition != CLEAR_ALL {
            return Err(TemplateError::UnsupportedWinCondition(
                self.settings.win_condition.clone(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a level from JSON.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let level: Self =
            serde_json::from_str(json).map_err(|e| TemplateError::Parse(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
