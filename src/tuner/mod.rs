//! Monte-Carlo tuner: per-size batches, range search and exports.
//!
//! 1. [`run_for_size`] plays many independent games at one deck size and
//!    aggregates them into [`SizeStats`].
//! 2. [`Tuner`] sweeps a deck-size range, with cancellation between sizes.
//! 3. [`find_optimal_range`] picks the qualifying range and a recommended
//!    size, or a fallback flagged as missing the target.

pub mod export;
pub mod runner;
pub mod search;
pub mod stats;

pub use export::{optimized_template, CSV_HEADER};
pub use runner::{run_for_size, CancelToken, Tuner, TuningReport};
pub use search::{find_optimal_range, RangeRecommendation};
pub use stats::{LossBreakdown, SizeStats, Tally};
