//! Range search over per-size results.

use log::warn;
use serde::{Deserialize, Serialize};

use super::stats::SizeStats;

/// The tuner's answer: which deck sizes qualify and which one to ship.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeRecommendation {
    /// Smallest qualifying size. Equal to `recommended_size` on fallback.
    pub min_size: usize,

    /// Largest qualifying size. Equal to `recommended_size` on fallback.
    pub max_size: usize,

    /// Qualifying sizes, ascending. Empty on fallback.
    pub qualifying_sizes: Vec<usize>,

    pub recommended_size: usize,
    pub recommended_stats: SizeStats,

    /// False when no size qualified and this is the fallback pick.
    pub meets_target: bool,
}

impl RangeRecommendation {
    fn fallback(stats: &SizeStats) -> Self {
        Self {
            min_size: stats.deck_size,
            max_size: stats.deck_size,
            qualifying_sizes: Vec::new(),
            recommended_size: stats.deck_size,
            recommended_stats: stats.clone(),
            meets_target: false,
        }
    }

    #[must_use]
    pub fn contains(&self, deck_size: usize) -> bool {
        self.qualifying_sizes.contains(&deck_size)
    }
}

/// Pick the qualifying range and a recommended size.
///
/// 1. Sizes with at least one win and a close-win rate at or above
///    `target` qualify.
/// 2. With none qualifying, fall back to the best close-win rate among
///    sizes with at least `min_fallback_wins` wins (ties to the smaller
///    size), else to the smallest tested size.
/// 3. Otherwise recommend the qualifying size closest to the mean of the
///    qualifying sizes, ties to the smaller size.
///
/// Returns `None` only for an empty result set.
#[must_use]
pub fn find_optimal_range(
    results: &[SizeStats],
    target_close_win_rate: f64,
    min_fallback_wins: u32,
) -> Option<RangeRecommendation> {
    let mut sorted: Vec<&SizeStats> = results.iter().collect();
    sorted.sort_by_key(|stats| stats.deck_size);

    let qualifying: Vec<&SizeStats> = sorted
        .iter()
        .copied()
        .filter(|stats| stats.meets(target_close_win_rate))
        .collect();

    if qualifying.is_empty() {
        let pick = fallback_pick(&sorted, min_fallback_wins)?;
        warn!(
            "no deck size reached close-win rate {:.2}; falling back to {} ({:.2})",
            target_close_win_rate, pick.deck_size, pick.close_win_rate
        );
        return Some(RangeRecommendation::fallback(pick));
    }

    let sizes: Vec<usize> = qualifying.iter().map(|stats| stats.deck_size).collect();
    let mean = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;

    let mut best = qualifying[0];
    for &stats in &qualifying[1..] {
        let distance = (stats.deck_size as f64 - mean).abs();
        let best_distance = (best.deck_size as f64 - mean).abs();
        if distance < best_distance {
            best = stats;
        }
    }

    Some(RangeRecommendation {
        min_size: sizes[0],
        max_size: sizes[sizes.len() - 1],
        qualifying_sizes: sizes,
        recommended_size: best.deck_size,
        recommended_stats: best.clone(),
        meets_target: true,
    })
}

/// `sorted` is ascending by deck size.
fn fallback_pick<'a>(sorted: &[&'a SizeStats], min_fallback_wins: u32) -> Option<&'a SizeStats> {
    let mut best: Option<&SizeStats> = None;
    for &stats in sorted.iter().filter(|stats| stats.wins >= min_fallback_wins) {
        if best.map_or(true, |b| stats.close_win_rate > b.close_win_rate) {
            best = Some(stats);
        }
    }
    best.or_else(|| sorted.first().copied())
}
