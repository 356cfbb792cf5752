//! # peak-balance
//!
//! Difficulty balancing for peak-style patience card games.
//!
//! Given a board layout, the tuner plays thousands of simulated games with a
//! fixed heuristic autoplayer at each candidate draw-pile size and picks the
//! range of sizes whose "close win" rate (a win with at most two cards left
//! to draw) hits a target.
//!
//! ## Design Principles
//!
//! 1. **Stateless rules**: Coverage, the favorable generator and the turn
//!    policy are pure functions over an explicit board snapshot. A live game
//!    and the simulator call the same functions.
//!
//! 2. **Deferred randomness**: A random card that starts face-down gets its
//!    value only when revealed (`CardValue::Unresolved` until then), so the
//!    favorable generator can use the board as it is at that moment.
//!
//! 3. **Deterministic batches**: Every playout owns a `GameRng` stream
//!    derived from `(seed, deck_size, index)`. Batches run in parallel and
//!    reduce to identical statistics on every run.
//!
//! ## Architecture
//!
//! - **Card arena**: Cards live in an `im::Vector` addressed by `CardIndex`;
//!   removal clears a flag, so indices never move and snapshots are O(1).
//!
//! - **Rule cascade**: The autoplayer is one ordered chain of guarded rules
//!   (defuse bomb > unlock > zap > best score).
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors, actions
//! - `cards`: Ranks, card and level templates, per-game card state
//! - `board`: Card arena and coverage model
//! - `generator`: Favorable card generator
//! - `policy`: Play legality and the heuristic autoplayer
//! - `playout`: One game from setup to outcome
//! - `tuner`: Monte-Carlo batches, range search, exports
//!
//! ## Example
//!
//! ```
//! use peak_balance::{CardTemplate, LevelTemplate, Tuner, TuningConfig};
//!
//! let level = LevelTemplate::new(
//!     "demo",
//!     (0..4)
//!         .map(|i| CardTemplate::random(format!("c{i}"), 0, i as f32, 0.0))
//!         .collect(),
//! );
//! let tuner = Tuner::new(TuningConfig::default().with_deck_range(2, 5).with_simulations(40))?;
//! let report = tuner.run(&level)?;
//! assert_eq!(report.sizes.len(), 4);
//! # Ok::<(), peak_balance::BalanceError>(())
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod generator;
pub mod playout;
pub mod policy;
pub mod tuner;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionRecord, BalanceError, ConfigError, EngineConfig, FavorableParams,
    GameRng, GameRngState, PlayoutConfig, SpatialConfig, TemplateError, TuningConfig,
};

pub use crate::cards::{
    BombTimer, CardIndex, CardKind, CardTemplate, CardValue, DrawPileEntry, LevelSettings,
    LevelTemplate, Rank, SimCard,
};

pub use crate::board::{is_covered, playable_cards, reveal_newly_uncovered, Board};

pub use crate::generator::{effective_probability, generate_value, FavorableGenerator, TableView};

pub use crate::policy::{can_play, choose, Decision, PolicyRule};

pub use crate::playout::{
    simulate, DrawPile, GameOutcome, GamePhase, LossReason, Playout, PlayoutSnapshot, TableState,
    TurnReport,
};

pub use crate::tuner::{
    find_optimal_range, optimized_template, run_for_size, CancelToken, LossBreakdown,
    RangeRecommendation, SizeStats, Tuner, TuningReport,
};
