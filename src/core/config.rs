//! Configuration types.
//!
//! Everything a tuning run is parameterised by lives here:
//! - `SpatialConfig`: layout-scale constants for coverage and row clears
//! - `FavorableParams`: favorable-draw probabilities and their thresholds
//! - `PlayoutConfig`: per-game limits
//! - `EngineConfig`: the three above, as one playout consumes them
//! - `TuningConfig`: the deck-size sweep, combining all of the above
//!
//! Configs are plain data with `with_*` builders. Call `validate()` before
//! handing one to the engine: out-of-range values are rejected up front
//! instead of being clamped mid-run.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            name,
            value: f64::from(value),
        })
    }
}

// =============================================================================
// Spatial
// =============================================================================

/// Spatial constants tied to the level layout's coordinate scale.
///
/// The defaults match a layout where neighbouring cards of one tier sit
/// 1.0 units apart and each stacked tier is offset by 0.5 units, so a card
/// half a step up and to the side covers the one below it while its
/// same-tier neighbour does not.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialConfig {
    /// Planar distance below which a higher-tier card covers a lower one.
    pub overlap_threshold: f32,

    /// Maximum |dy| for two cards to count as the same row (zap clears).
    pub row_tolerance: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.75,
            row_tolerance: 0.1,
        }
    }
}

impl SpatialConfig {
    /// Set the overlap threshold.
    #[must_use]
    pub fn with_overlap_threshold(mut self, threshold: f32) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    /// Set the row tolerance.
    #[must_use]
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Reject non-finite or non-positive distances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("overlap_threshold", self.overlap_threshold)?;
        check_positive("row_tolerance", self.row_tolerance)
    }
}

// =============================================================================
// Favorable draws
// =============================================================================

/// Probability parameters for the favorable card generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FavorableParams {
    /// Favorable probability before any boost.
    pub base_probability: f64,

    /// Added when the draw pile is nearly exhausted.
    pub final_stage_boost: f64,

    /// Added while any bomb is close to detonating.
    pub bomb_boost: f64,

    /// Remaining draw-pile count at or below which the final boost applies.
    pub final_stage_threshold: usize,

    /// Bomb countdown at or below which a bomb counts as urgent.
    pub bomb_urgency_threshold: i32,
}

impl Default for FavorableParams {
    fn default() -> Self {
        Self {
            base_probability: 0.35,
            final_stage_boost: 0.25,
            bomb_boost: 0.30,
            final_stage_threshold: 3,
            bomb_urgency_threshold: 3,
        }
    }
}

impl FavorableParams {
    /// Set the base probability.
    #[must_use]
    pub fn with_base(mut self, p: f64) -> Self {
        self.base_probability = p;
        self
    }

    /// Set the final-stage boost and its draw-pile threshold.
    #[must_use]
    pub fn with_final_stage(mut self, boost: f64, threshold: usize) -> Self {
        self.final_stage_boost = boost;
        self.final_stage_threshold = threshold;
        self
    }

    /// Set the bomb boost and its urgency threshold.
    #[must_use]
    pub fn with_bomb(mut self, boost: f64, urgency_threshold: i32) -> Self {
        self.bomb_boost = boost;
        self.bomb_urgency_threshold = urgency_threshold;
        self
    }

    /// Every probability and boost must lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("base_probability", self.base_probability)?;
        check_probability("final_stage_boost", self.final_stage_boost)?;
        check_probability("bomb_boost", self.bomb_boost)
    }
}

// =============================================================================
// Playout
// =============================================================================

/// Per-game limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Hard turn cap. Hitting it ends the game as a runaway loss.
    pub max_turns: u32,

    /// A win with at most this many cards left in the draw pile is close.
    pub close_win_threshold: usize,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_turns: 1000,
            close_win_threshold: 2,
        }
    }
}

impl PlayoutConfig {
    /// Set the turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::Zero("max_turns"));
        }
        Ok(())
    }

    /// Reject a cap that a legal game could reach.
    ///
    /// Every move removes a board card or uses a draw, so a game on
    /// `board_cards` cards and `deck_size` draws ends within their sum.
    pub fn check_turn_cap(&self, board_cards: usize, deck_size: usize) -> Result<(), ConfigError> {
        let longest = board_cards.saturating_add(deck_size);
        if longest >= self.max_turns as usize {
            return Err(ConfigError::TurnCapTooLow {
                max_turns: self.max_turns,
                longest,
            });
        }
        Ok(())
    }
}

/// Everything one playout needs besides the level and its RNG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub favorable: FavorableParams,
    pub spatial: SpatialConfig,
    pub playout: PlayoutConfig,
}

impl EngineConfig {
    #[must_use]
    pub fn with_favorable(mut self, params: FavorableParams) -> Self {
        self.favorable = params;
        self
    }

    #[must_use]
    pub fn with_spatial(mut self, spatial: SpatialConfig) -> Self {
        self.spatial = spatial;
        self
    }

    #[must_use]
    pub fn with_playout(mut self, playout: PlayoutConfig) -> Self {
        self.playout = playout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.favorable.validate()?;
        self.spatial.validate()?;
        self.playout.validate()
    }
}

// =============================================================================
// Tuning
// =============================================================================

/// A complete tuning request.
///
/// ```
/// use peak_balance::core::TuningConfig;
///
/// let config = TuningConfig::default()
///     .with_deck_range(5, 15)
///     .with_simulations(500)
///     .with_target(0.7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.deck_sizes().count(), 11);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Smallest deck size tested (inclusive).
    pub min_deck_size: usize,

    /// Largest deck size tested (inclusive).
    pub max_deck_size: usize,

    /// Playouts per deck size.
    pub simulations_per_size: u32,

    /// Close-win rate a size must reach to qualify.
    pub target_close_win_rate: f64,

    /// Base seed all playout streams are derived from.
    pub seed: u64,

    /// Minimum wins a size needs to be considered by the fallback pick.
    pub min_fallback_wins: u32,

    pub favorable: FavorableParams,
    pub spatial: SpatialConfig,
    pub playout: PlayoutConfig,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            min_deck_size: 5,
            max_deck_size: 30,
            simulations_per_size: 500,
            target_close_win_rate: 0.7,
            seed: 0x5EED,
            min_fallback_wins: 5,
            favorable: FavorableParams::default(),
            spatial: SpatialConfig::default(),
            playout: PlayoutConfig::default(),
        }
    }
}

impl TuningConfig {
    /// Set the inclusive deck-size range.
    #[must_use]
    pub fn with_deck_range(mut self, min: usize, max: usize) -> Self {
        self.min_deck_size = min;
        self.max_deck_size = max;
        self
    }

    /// Set playouts per size.
    #[must_use]
    pub fn with_simulations(mut self, count: u32) -> Self {
        self.simulations_per_size = count;
        self
    }

    /// Set the target close-win rate.
    #[must_use]
    pub fn with_target(mut self, rate: f64) -> Self {
        self.target_close_win_rate = rate;
        self
    }

    /// Set the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the favorable-draw parameters.
    #[must_use]
    pub fn with_favorable(mut self, params: FavorableParams) -> Self {
        self.favorable = params;
        self
    }

    /// Set the spatial constants.
    #[must_use]
    pub fn with_spatial(mut self, spatial: SpatialConfig) -> Self {
        self.spatial = spatial;
        self
    }

    /// Set the per-game limits.
    #[must_use]
    pub fn with_playout(mut self, playout: PlayoutConfig) -> Self {
        self.playout = playout;
        self
    }

    /// The per-playout part of the request.
    #[must_use]
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            favorable: self.favorable,
            spatial: self.spatial,
            playout: self.playout,
        }
    }

    /// Deck sizes in sweep order.
    pub fn deck_sizes(&self) -> std::ops::RangeInclusive<usize> {
        self.min_deck_size..=self.max_deck_size
    }

    /// Validate the whole request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_deck_size > self.max_deck_size {
            return Err(ConfigError::EmptyRange {
                min: self.min_deck_size,
                max: self.max_deck_size,
            });
        }
        if self.simulations_per_size == 0 {
            return Err(ConfigError::Zero("simulations_per_size"));
        }
        check_probability("target_close_win_rate", self.target_close_win_rate)?;
        self.favorable.validate()?;
        self.spatial.validate()?;
        self.playout.validate()
    }

    /// Parse and validate a tuning request from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
