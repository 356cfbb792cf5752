//! Monte-Carlo batches and the deck-size sweep.
//!
//! ## Parallelism
//!
//! Every playout is a pure function of the level, the engine config and its
//! own RNG stream, so a batch runs on the rayon pool with no locking. Stream
//! `i` of deck size `n` is `GameRng::for_playout(seed, n, i)`; nothing is
//! shared or reused between playouts.
//!
//! ## Cancellation
//!
//! A [`CancelToken`] is checked between deck sizes. A playout batch, once
//! started, always finishes. A cancelled sweep still returns the sizes it
//! completed.
//!
//! ```
//! use peak_balance::cards::{CardTemplate, LevelTemplate};
//! use peak_balance::core::TuningConfig;
//! use peak_balance::tuner::Tuner;
//!
//! let level = LevelTemplate::new(
//!     "pair",
//!     vec![
//!         CardTemplate::random("a", 0, 0.0, 0.0),
//!         CardTemplate::random("b", 0, 1.0, 0.0),
//!     ],
//! );
//! let config = TuningConfig::default()
//!     .with_deck_range(1, 4)
//!     .with_simulations(50);
//! let report = Tuner::new(config).unwrap().run(&level).unwrap();
//! assert_eq!(report.sizes.len(), 4);
//! assert!(report.recommendation.is_some());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::search::{find_optimal_range, RangeRecommendation};
use super::stats::{SizeStats, Tally};
use crate::cards::LevelTemplate;
use crate::core::{BalanceError, ConfigError, GameRng, TuningConfig};
use crate::playout::{validate_inputs, DrawPile, GameOutcome, Playout};

// =============================================================================
// Batches
// =============================================================================

/// Run `simulations` playouts in parallel and tally them. Playout `i`
/// gets the RNG stream `stream(i)`.
fn tally_batch<S, F>(simulations: u32, stream: S, play: F) -> Tally
where
    S: Fn(u64) -> GameRng + Sync + Send,
    F: Fn(GameRng) -> GameOutcome + Sync + Send,
{
    (0..simulations)
        .into_par_iter()
        .map(|i| Tally::from_outcome(&play(stream(u64::from(i)))))
        .reduce(Tally::default, Tally::merge)
}

/// Aggregate statistics for `deck_size` random draw-pile slots.
///
/// Uses the config's simulation count, seed, target and engine settings.
/// The level and config are validated before any playout runs.
pub fn run_for_size(
    level: &LevelTemplate,
    deck_size: usize,
    config: &TuningConfig,
) -> Result<SizeStats, BalanceError> {
    config.validate()?;
    validate_inputs(level, deck_size, &config.engine())?;
    Ok(size_stats(level, deck_size, config))
}

fn size_stats(level: &LevelTemplate, deck_size: usize, config: &TuningConfig) -> SizeStats {
    let engine = config.engine();
    let tally = tally_batch(
        config.simulations_per_size,
        |i| GameRng::for_playout(config.seed, deck_size, i),
        |rng| Playout::with_pile(level, DrawPile::unresolved(deck_size), &engine, rng).run(),
    );
    let stats = SizeStats::from_tally(deck_size, &tally, config.target_close_win_rate);
    info!(
        "deck {:>3}: win {:.3}, close {:.3}, moves {:.1}, losses {}/{}/{} (stuck/bomb/runaway)",
        deck_size,
        stats.win_rate,
        stats.close_win_rate,
        stats.avg_moves_on_win,
        stats.losses.stuck,
        stats.losses.bomb,
        stats.losses.runaway
    );
    if stats.losses.runaway > 0 {
        warn!(
            "deck {}: {} playouts hit the turn cap",
            deck_size, stats.losses.runaway
        );
    }
    stats
}

// =============================================================================
// Cancellation
// =============================================================================

/// Shared flag that stops a sweep at the next deck-size boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Sweep
// =============================================================================

/// Result of a deck-size sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TuningReport {
    pub level_name: String,
    pub config: TuningConfig,

    /// One row per completed size, ascending.
    pub sizes: Vec<SizeStats>,

    /// `None` only if the sweep was cancelled before any size finished.
    pub recommendation: Option<RangeRecommendation>,

    pub cancelled: bool,
}

impl TuningReport {
    /// Stats for one tested size.
    #[must_use]
    pub fn size(&self, deck_size: usize) -> Option<&SizeStats> {
        self.sizes.iter().find(|stats| stats.deck_size == deck_size)
    }

    #[must_use]
    pub fn recommended_size(&self) -> Option<usize> {
        self.recommendation.as_ref().map(|r| r.recommended_size)
    }
}

/// Sweeps deck sizes for one tuning request.
#[derive(Clone, Debug)]
pub struct Tuner {
    config: TuningConfig,
    cancel: CancelToken,
}

impl Tuner {
    /// Validate `config` and build a tuner.
    pub fn new(config: TuningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Use an externally owned cancel token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that cancels this tuner's sweeps.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn config(&self) -> &TuningConfig {
        &self.config
    }

    /// Sweep every deck size in the configured range.
    pub fn run(&self, level: &LevelTemplate) -> Result<TuningReport, BalanceError> {
        self.run_with_observer(level, |_| {})
    }

    /// Sweep, calling `observer` after each size completes.
    pub fn run_with_observer<F>(
        &self,
        level: &LevelTemplate,
        mut observer: F,
    ) -> Result<TuningReport, BalanceError>
    where
        F: FnMut(&SizeStats),
    {
        validate_inputs(level, self.config.max_deck_size, &self.config.engine())?;

        let mut sizes = Vec::new();
        let mut cancelled = false;
        for deck_size in self.config.deck_sizes() {
            if self.cancel.is_cancelled() {
                warn!(
                    "sweep cancelled before deck {}; keeping {} completed sizes",
                    deck_size,
                    sizes.len()
                );
                cancelled = true;
                break;
            }
            let stats = size_stats(level, deck_size, &self.config);
            observer(&stats);
            sizes.push(stats);
        }

        let recommendation = find_optimal_range(
            &sizes,
            self.config.target_close_win_rate,
            self.config.min_fallback_wins,
        );
        if let Some(rec) = &recommendation {
            info!(
                "recommended deck size {} (range {}..={}, close-win {:.3}, target met: {})",
                rec.recommended_size,
                rec.min_size,
                rec.max_size,
                rec.recommended_stats.close_win_rate,
                rec.meets_target
            );
        }

        Ok(TuningReport {
            level_name: level.name.clone(),
            config: self.config.clone(),
            sizes,
            recommendation,
            cancelled,
        })
    }

    /// Baseline stats for the level's own authored draw pile.
    ///
    /// Fixed entries are dealt as written; random entries are generated
    /// when drawn. The baseline has its own RNG streams, apart from the
    /// sweep rows.
    pub fn evaluate_authored(&self, level: &LevelTemplate) -> Result<SizeStats, BalanceError> {
        let deck_size = level.nominal_deck_size();
        let engine = self.config.engine();
        validate_inputs(level, deck_size, &engine)?;
        let seed = self.config.seed;
        let tally = tally_batch(
            self.config.simulations_per_size,
            |i| GameRng::for_authored(seed, deck_size, i),
            |rng| {
                let pile = DrawPile::from_entries(&level.settings.draw_pile_spec);
                Playout::with_pile(level, pile, &engine, rng).run()
            },
        );
        let stats = SizeStats::from_tally(deck_size, &tally, self.config.target_close_win_rate);
        info!(
            "authored pile ({} cards): win {:.3}, close {:.3}",
            deck_size, stats.win_rate, stats.close_win_rate
        );
        Ok(stats)
    }
}
