//! Playout engine integration tests.

mod common;

use common::{authored, flat_level};
use peak_balance::cards::{CardTemplate, LevelTemplate};
use peak_balance::core::{
    Action, ActionError, BalanceError, ConfigError, EngineConfig, GameRng, PlayoutConfig,
};
use peak_balance::playout::{simulate, GamePhase, LossReason, Playout};

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_deck_zero_nothing_playable_is_stuck_at_once() {
    let level = flat_level(&[5, 9, 12]);
    for seed in 0..20 {
        let mut playout = Playout::new(&level, 0, &EngineConfig::default(), GameRng::new(seed)).unwrap();
        assert_eq!(playout.phase(), GamePhase::Lost(LossReason::Stuck));
        let outcome = playout.run();
        assert_eq!(outcome.moves, 0);
        assert_eq!(outcome.loss_reason, Some(LossReason::Stuck));
    }
}

#[test]
fn test_deck_zero_plays_board_only_moves() {
    let level = LevelTemplate::new(
        "specials",
        vec![
            CardTemplate::key("key", 0, 0.0, 0.0),
            CardTemplate::zap("zap", 0, 0.0, 4.0),
            CardTemplate::value_card("v", 0, 0.0, 8.0, 5),
        ],
    );
    let mut playout = Playout::new(&level, 0, &EngineConfig::default(), GameRng::new(1)).unwrap();
    assert_eq!(playout.play_top(), None);
    let outcome = playout.run();
    assert_eq!(outcome.moves, 2);
    assert_eq!(outcome.loss_reason, Some(LossReason::Stuck));
    assert!(playout.board().card(playout.board().index_of("v").unwrap()).on_board);
}

#[test]
fn test_deck_zero_can_win_with_specials() {
    let level = LevelTemplate::new(
        "specials",
        vec![
            CardTemplate::zap("zap", 0, 0.0, 0.0),
            CardTemplate::value_card("a", 0, 2.0, 0.0, 5),
            CardTemplate::value_card("b", 0, 4.0, 0.0, 9),
        ],
    );
    let outcome = simulate(&level, 0, &EngineConfig::default(), GameRng::new(1)).unwrap();
    assert!(outcome.won);
    assert!(outcome.close_win);
    assert_eq!(outcome.moves, 1);
}

#[test]
fn test_deck_one_cannot_clear_unchainable_pair() {
    // 5 and 9 are never adjacent, so one draw can never clear both.
    let level = flat_level(&[5, 9]);
    for seed in 0..200 {
        let outcome = simulate(&level, 1, &EngineConfig::default(), GameRng::new(seed)).unwrap();
        assert!(!outcome.won, "seed {seed} won");
        assert_eq!(outcome.loss_reason, Some(LossReason::Stuck));
        assert_eq!(outcome.draw_remaining, 0);
    }
}

#[test]
fn test_long_pile_ends_stuck_not_runaway() {
    let level = LevelTemplate::new("locked", vec![CardTemplate::lock("lock", 0, 0.0, 0.0)]);
    let engine = EngineConfig::default().with_playout(PlayoutConfig::default().with_max_turns(2000));
    let outcome = simulate(&level, 1100, &engine, GameRng::new(4)).unwrap();
    assert_eq!(outcome.loss_reason, Some(LossReason::Stuck));
    assert_eq!(outcome.moves, 1099);
    assert_eq!(outcome.draw_remaining, 0);
}

#[test]
fn test_turn_cap_below_longest_game_is_rejected() {
    let level = LevelTemplate::new("locked", vec![CardTemplate::lock("lock", 0, 0.0, 0.0)]);
    let result = simulate(&level, 1100, &EngineConfig::default(), GameRng::new(4));
    assert!(matches!(
        result,
        Err(BalanceError::Config(ConfigError::TurnCapTooLow {
            max_turns: 1000,
            longest: 1101
        }))
    ));
}

// =============================================================================
// Close-win boundary
// =============================================================================

#[test]
fn test_win_with_two_left_is_close() {
    let mut playout = authored(flat_level(&[5]), &[4, 1, 1]);
    let outcome = playout.run();
    assert!(outcome.won);
    assert_eq!(outcome.draw_remaining, 2);
    assert!(outcome.close_win);
}

#[test]
fn test_win_with_three_left_is_not_close() {
    let mut playout = authored(flat_level(&[5]), &[4, 1, 1, 1]);
    let outcome = playout.run();
    assert!(outcome.won);
    assert_eq!(outcome.draw_remaining, 3);
    assert!(!outcome.close_win);
}

// =============================================================================
// Full games
// =============================================================================

#[test]
fn test_peak_games_terminate_without_runaway() {
    let level = common::bomb_peak_level(5);
    let engine = EngineConfig::default();
    for seed in 0..300 {
        for deck_size in [0, 5, 15, 40] {
            let rng = GameRng::for_playout(seed, deck_size, 0);
            let outcome = simulate(&level, deck_size, &engine, rng).unwrap();
            assert_ne!(outcome.loss_reason, Some(LossReason::Runaway));
            assert!(outcome.moves as usize <= 20 + deck_size);
            assert_eq!(outcome.won, outcome.loss_reason.is_none());
        }
    }
}

#[test]
fn test_playout_is_deterministic() {
    let level = common::bomb_peak_level(5);
    let engine = EngineConfig::default();
    for seed in 0..50 {
        let a = simulate(&level, 12, &engine, GameRng::new(seed)).unwrap();
        let b = simulate(&level, 12, &engine, GameRng::new(seed)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_history_matches_moves() {
    let level = common::peak_level();
    let mut playout = Playout::new(&level, 20, &EngineConfig::default(), GameRng::new(77)).unwrap();
    let outcome = playout.run();
    assert_eq!(playout.history().len(), outcome.moves as usize);
    for (i, record) in playout.history().iter().enumerate() {
        assert_eq!(record.move_number as usize, i + 1);
    }
    let draws = playout
        .history()
        .iter()
        .filter(|r| r.action == Action::Draw)
        .count();
    assert_eq!(draws + 1, playout.state().draw_pile.drawn());
}

#[test]
fn test_revealed_cards_get_values() {
    let level = common::peak_level();
    let mut playout = Playout::new(&level, 30, &EngineConfig::default(), GameRng::new(5)).unwrap();
    while let Some(report) = playout.step() {
        for index in report.revealed {
            let card = playout.board().card(index);
            assert!(card.face_up);
            assert!(card.rank().is_some());
        }
    }
}

// =============================================================================
// Live play
// =============================================================================

#[test]
fn test_live_play_mirrors_policy() {
    let level = common::peak_level();
    let engine = EngineConfig::default();
    let mut auto = Playout::new(&level, 15, &engine, GameRng::new(31)).unwrap();
    let mut live = Playout::new(&level, 15, &engine, GameRng::new(31)).unwrap();

    while let Some(report) = auto.step() {
        let mirrored = live.apply(report.action).unwrap();
        assert_eq!(mirrored.removed, report.removed);
        assert_eq!(mirrored.revealed, report.revealed);
        assert_eq!(mirrored.phase, report.phase);
    }
    assert_eq!(auto.outcome(), live.outcome());
    assert_eq!(live.apply(Action::Draw), Err(ActionError::GameOver));
}

#[test]
fn test_undo_restores_random_stream() {
    let level = common::peak_level();
    let mut playout = Playout::new(&level, 15, &EngineConfig::default(), GameRng::new(8)).unwrap();
    playout.step();
    let snapshot = playout.snapshot();
    let next: Vec<_> = std::iter::from_fn(|| playout.step()).take(3).collect();

    playout.restore(&snapshot);
    let again: Vec<_> = std::iter::from_fn(|| playout.step()).take(3).collect();
    assert_eq!(next, again);
}
