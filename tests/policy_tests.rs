//! Turn policy integration tests.

mod common;

use peak_balance::board::Board;
use peak_balance::cards::{CardIndex, CardTemplate, LevelTemplate, Rank};
use peak_balance::core::{GameRng, SpatialConfig};
use peak_balance::policy::{can_play, choose, legal_candidates, Decision, PolicyRule};
use proptest::prelude::*;

fn board(cards: Vec<CardTemplate>) -> Board {
    let mut rng = GameRng::new(11);
    Board::from_level(&LevelTemplate::new("t", cards), &mut rng)
}

fn idx(i: u32) -> CardIndex {
    CardIndex::new(i)
}

/// A table where every rule of the cascade has something to grab.
fn busy_board(bomb_countdown: i32) -> Board {
    board(vec![
        // 0: high card that uncovers two others
        CardTemplate::value_card("hi", 2, 10.0, 0.5, 4),
        CardTemplate::value_card("under-a", 1, 9.5, 0.0, 9).face_down(),
        CardTemplate::value_card("under-b", 1, 10.5, 0.0, 9).face_down(),
        // 3: bomb
        CardTemplate::value_card("bomb", 0, 0.0, 3.0, 6).with_bomb(bomb_countdown),
        // 4: key, 5: lock
        CardTemplate::key("key", 0, 2.0, 3.0),
        CardTemplate::lock("lock", 0, 4.0, 6.0),
        // 6: zap with three row mates
        CardTemplate::zap("zap", 0, 0.0, 9.0),
        CardTemplate::value_card("r1", 0, 2.0, 9.0, 1),
        CardTemplate::value_card("r2", 0, 4.0, 9.0, 1),
        CardTemplate::value_card("r3", 0, 6.0, 9.0, 1),
    ])
}

// =============================================================================
// Cascade order
// =============================================================================

#[test]
fn test_bomb_beats_everything() {
    let b = busy_board(2);
    let spatial = SpatialConfig::default();
    let candidates = legal_candidates(&b, &spatial, Rank::new(5));
    assert!(candidates.contains(&idx(3)));
    assert_eq!(
        choose(&b, &candidates, &spatial),
        Some(Decision { card: idx(3), rule: PolicyRule::DefuseBomb })
    );
}

#[test]
fn test_key_before_zap_when_bomb_is_calm() {
    let b = busy_board(5);
    let spatial = SpatialConfig::default();
    let candidates = legal_candidates(&b, &spatial, Rank::new(5));
    assert_eq!(
        choose(&b, &candidates, &spatial),
        Some(Decision { card: idx(4), rule: PolicyRule::UnlockWithKey })
    );
}

#[test]
fn test_zap_before_score_once_unlocked() {
    let mut b = busy_board(5);
    b.remove(idx(5));
    let spatial = SpatialConfig::default();
    let candidates = legal_candidates(&b, &spatial, Rank::new(5));
    assert_eq!(
        choose(&b, &candidates, &spatial),
        Some(Decision { card: idx(6), rule: PolicyRule::ZapRow })
    );
}

#[test]
fn test_score_picks_high_uncovering_card() {
    let mut b = busy_board(5);
    b.remove(idx(5));
    b.remove(idx(7));
    let spatial = SpatialConfig::default();
    let candidates = legal_candidates(&b, &spatial, Rank::new(5));
    // hi: 10*2 + 20*2 = 60; bomb: 0; key: 0; zap: 0
    assert_eq!(
        choose(&b, &candidates, &spatial),
        Some(Decision { card: idx(0), rule: PolicyRule::BestScore })
    );
}

#[test]
fn test_bomb_needs_to_be_legal() {
    let b = busy_board(1);
    let spatial = SpatialConfig::default();
    // Top 1 does not fit the bomb's 6, so the bomb is not a candidate.
    let candidates = legal_candidates(&b, &spatial, Rank::new(1));
    assert!(!candidates.contains(&idx(3)));
    let decision = choose(&b, &candidates, &spatial).unwrap();
    assert_ne!(decision.rule, PolicyRule::DefuseBomb);
}

#[test]
fn test_lowest_countdown_bomb_wins() {
    let mut rng = GameRng::new(1);
    let level = LevelTemplate::new(
        "t",
        vec![
            CardTemplate::value_card("b2", 3, 0.0, 0.0, 6).with_bomb(2),
            CardTemplate::value_card("b1", 0, 5.0, 0.0, 6).with_bomb(1),
        ],
    );
    let b = Board::from_level(&level, &mut rng);
    let spatial = SpatialConfig::default();
    let d = choose(&b, &[idx(0), idx(1)], &spatial).unwrap();
    assert_eq!(d.card, idx(1));
}

// =============================================================================
// Legality
// =============================================================================

#[test]
fn test_wraparound_adjacency() {
    let b = board(vec![
        CardTemplate::value_card("king", 0, 0.0, 0.0, 13),
        CardTemplate::value_card("ace", 0, 2.0, 0.0, 1),
    ]);
    assert!(can_play(b.card(idx(0)), Rank::new(1)));
    assert!(can_play(b.card(idx(1)), Rank::new(13)));
    assert!(can_play(b.card(idx(1)), Rank::new(2)));
    assert!(!can_play(b.card(idx(1)), Rank::new(3)));
}

#[test]
fn test_covered_cards_are_never_candidates() {
    let level = common::peak_level();
    let mut rng = GameRng::new(4);
    let b = Board::from_level(&level, &mut rng);
    let spatial = SpatialConfig::default();
    for top in Rank::all() {
        for index in legal_candidates(&b, &spatial, Some(top)) {
            assert!(b.card(index).face_up);
            assert!(!peak_balance::board::is_covered(&b, index, &spatial));
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_choice_ignores_candidate_order(seed in any::<u64>(), countdown in 1..6i32, top in 1u8..=13) {
        let b = busy_board(countdown);
        let spatial = SpatialConfig::default();
        let mut candidates = legal_candidates(&b, &spatial, Rank::new(top));
        let forward = choose(&b, &candidates, &spatial);

        let mut rng = GameRng::new(seed);
        for i in (1..candidates.len()).rev() {
            let j = rng.index(i + 1);
            candidates.swap(i, j);
        }
        prop_assert_eq!(forward, choose(&b, &candidates, &spatial));
        if let Some(decision) = forward {
            prop_assert!(candidates.contains(&decision.card));
        }
    }
}
