//! Report exports: CSV table, JSON, text summary and the optimized level.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::runner::TuningReport;
use super::search::RangeRecommendation;
use crate::cards::LevelTemplate;
use crate::core::BalanceError;

/// Column order of [`TuningReport::to_csv`].
pub const CSV_HEADER: &str = "deck_size,total_games,wins,close_wins,win_rate,close_win_rate,\
avg_moves_on_win,avg_remaining_on_win,meets_target,is_recommended";

/// The level with its draw pile replaced by `recommended_size` random slots.
#[must_use]
pub fn optimized_template(level: &LevelTemplate, recommendation: &RangeRecommendation) -> LevelTemplate {
    level.with_random_draw_pile(recommendation.recommended_size)
}

impl TuningReport {
    /// One header row, then one row per tested size. Rates and averages
    /// use four decimal places.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let recommended = self.recommended_size();
        let mut out = String::with_capacity(64 * (self.sizes.len() + 1));
        out.push_str(CSV_HEADER);
        out.push('\n');
        for stats in &self.sizes {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{},{},{},{},{:.4},{:.4},{:.4},{:.4},{},{}",
                stats.deck_size,
                stats.games,
                stats.wins,
                stats.close_wins,
                stats.win_rate,
                stats.close_win_rate,
                stats.avg_moves_on_win,
                stats.avg_remaining_on_win,
                stats.meets_target,
                recommended == Some(stats.deck_size)
            );
        }
        out
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), BalanceError> {
        fs::write(path, self.to_csv())?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, BalanceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BalanceError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// The tuned level, if a size was recommended.
    #[must_use]
    pub fn optimized_template(&self, level: &LevelTemplate) -> Option<LevelTemplate> {
        self.recommendation
            .as_ref()
            .map(|rec| optimized_template(level, rec))
    }

    /// Human-readable summary table.
    #[must_use]
    pub fn to_text_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Deck size tuning: {} ===", self.level_name);
        let _ = writeln!(
            out,
            "target close-win rate {:.2}, {} playouts per size, seed {:#x}",
            self.config.target_close_win_rate,
            self.config.simulations_per_size,
            self.config.seed
        );
        if self.cancelled {
            let _ = writeln!(out, "(sweep cancelled; partial results)");
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>5} {:>7} {:>7} {:>8} {:>8} {:>8} {:>6} {:>6} {:>7}",
            "deck", "win%", "close%", "moves", "left", "stuck", "bomb", "cap", ""
        );

        let recommendation = self.recommendation.as_ref();
        for stats in &self.sizes {
            let marker = match recommendation {
                Some(rec) if rec.recommended_size == stats.deck_size => "<- best",
                _ if stats.meets_target => "ok",
                _ => "",
            };
            let _ = writeln!(
                out,
                "{:>5} {:>6.1}% {:>6.1}% {:>8.1} {:>8.2} {:>8} {:>6} {:>6} {:>7}",
                stats.deck_size,
                stats.win_rate * 100.0,
                stats.close_win_rate * 100.0,
                stats.avg_moves_on_win,
                stats.avg_remaining_on_win,
                stats.losses.stuck,
                stats.losses.bomb,
                stats.losses.runaway,
                marker
            );
        }

        let _ = writeln!(out);
        match recommendation {
            Some(rec) if rec.meets_target => {
                let _ = writeln!(
                    out,
                    "qualifying range {}..={} ({} sizes), recommended {}",
                    rec.min_size,
                    rec.max_size,
                    rec.qualifying_sizes.len(),
                    rec.recommended_size
                );
            }
            Some(rec) => {
                let _ = writeln!(
                    out,
                    "target not met; closest size {} (close-win {:.1}%)",
                    rec.recommended_size,
                    rec.recommended_stats.close_win_rate * 100.0
                );
            }
            None => {
                let _ = writeln!(out, "no sizes tested");
            }
        }
        out
    }
}
