//! Shared level builders for integration tests.

#![allow(dead_code)]

use peak_balance::cards::{CardTemplate, DrawPileEntry, LevelTemplate};
use peak_balance::core::{EngineConfig, GameRng};
use peak_balance::playout::Playout;

/// A 20-card, four-tier peak.
///
/// Tier 0 is a row of ten cards 1.0 apart; each higher tier sits half a
/// step up and to the side, covering the two cards below it. Only the
/// uncovered cards start face-up. Every value is random.
pub fn peak_level() -> LevelTemplate {
    let mut cards = Vec::with_capacity(20);
    for i in 0..10 {
        let x = i as f32;
        let covered = (1..=8).contains(&i);
        let card = CardTemplate::random(format!("t0-{i}"), 0, x, 0.0);
        cards.push(if covered { card.face_down() } else { card });
    }
    for (i, x) in [1.5, 2.5, 3.5, 5.5, 6.5, 7.5].into_iter().enumerate() {
        let covered = x != 5.5;
        let card = CardTemplate::random(format!("t1-{i}"), 1, x, 0.5);
        cards.push(if covered { card.face_down() } else { card });
    }
    cards.push(CardTemplate::random("t2-0", 2, 2.0, 1.0).face_down());
    cards.push(CardTemplate::random("t2-1", 2, 3.0, 1.0).face_down());
    cards.push(CardTemplate::random("t2-2", 2, 7.0, 1.0));
    cards.push(CardTemplate::random("t3-0", 3, 2.5, 1.5));
    LevelTemplate::new("peak", cards)
}

/// The peak with a bomb on each end of the bottom row.
pub fn bomb_peak_level(countdown: i32) -> LevelTemplate {
    let mut level = peak_level();
    level.name = "bomb-peak".to_string();
    level.cards[0] = level.cards[0].clone().with_bomb(countdown);
    level.cards[9] = level.cards[9].clone().with_bomb(countdown);
    level
}

/// Same-tier cards in one row with fixed values, 2.0 apart.
pub fn flat_level(values: &[u8]) -> LevelTemplate {
    LevelTemplate::new(
        "flat",
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| CardTemplate::value_card(format!("v{i}"), 0, 2.0 * i as f32, 0.0, v))
            .collect(),
    )
}

pub fn fixed_pile(values: &[i64]) -> Vec<DrawPileEntry> {
    values.iter().map(|&v| DrawPileEntry::Fixed(v)).collect()
}

/// Playout over `level` with an authored, fully fixed draw pile.
pub fn authored(level: LevelTemplate, pile: &[i64]) -> Playout {
    let level = level.with_draw_pile(fixed_pile(pile));
    Playout::from_level(&level, &EngineConfig::default(), GameRng::new(1)).unwrap()
}
