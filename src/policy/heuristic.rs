//! Heuristic autoplayer.
//!
//! Picks one card from the legal candidates with a fixed rule cascade
//! (first match wins):
//!
//! 1. A bomb about to go off (countdown <= 2): defuse the most urgent one
//! 2. A lock is on the board and a key is playable: play the key
//! 3. A zap would clear 3+ cards: play the biggest zap
//! 4. Otherwise play the highest-scoring card, where
//!    `score = 10*tier + 20*uncovers + 5*bomb_elapsed + 50*(key while locked)`
//!
//! Ties are broken by higher tier, then lower arena index, so the choice is
//! a deterministic function of the board.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::board::{playable_cards, uncover_count, Board};
use crate::cards::{CardIndex, CardKind, Rank, SimCard};
use crate::core::SpatialConfig;

/// Bombs at or below this countdown are defused before anything else.
pub const BOMB_PANIC_COUNTDOWN: i32 = 2;

/// Smallest row clear worth playing a zap for.
pub const ZAP_MIN_CLEAR: usize = 3;

const TIER_WEIGHT: i64 = 10;
const UNCOVER_WEIGHT: i64 = 20;
const BOMB_ELAPSED_WEIGHT: i64 = 5;
const KEY_WHILE_LOCKED_BONUS: i64 = 50;

/// Which rule of the cascade made the choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyRule {
    DefuseBomb,
    UnlockWithKey,
    ZapRow,
    BestScore,
}

/// A policy choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub card: CardIndex,
    pub rule: PolicyRule,
}

/// Whether a card may be played on the given play-pile top.
///
/// Keys and zaps always can; locked cards never can; value cards need a
/// rank one step from the top.
#[must_use]
pub fn can_play(card: &SimCard, play_top: Option<Rank>) -> bool {
    if card.locked {
        return false;
    }
    match card.kind {
        CardKind::Key | CardKind::Zap => true,
        CardKind::Lock => false,
        CardKind::Value => match (card.rank(), play_top) {
            (Some(rank), Some(top)) => rank.is_adjacent(top),
            _ => false,
        },
    }
}

/// Playable cards that are also legal on the current top.
#[must_use]
pub fn legal_candidates(
    board: &Board,
    spatial: &SpatialConfig,
    play_top: Option<Rank>,
) -> Vec<CardIndex> {
    playable_cards(board, spatial)
        .into_iter()
        .filter(|&index| can_play(board.card(index), play_top))
        .collect()
}

/// On-board cards sharing a row with `index`, excluding it.
pub fn row_mates<'a>(
    board: &'a Board,
    index: CardIndex,
    spatial: &'a SpatialConfig,
) -> impl Iterator<Item = CardIndex> + 'a {
    let y = board.card(index).y;
    board
        .on_board()
        .filter(move |(other, card)| *other != index && (card.y - y).abs() <= spatial.row_tolerance)
        .map(|(other, _)| other)
}

/// How many cards a zap at `index` would clear.
#[must_use]
pub fn zap_clear_count(board: &Board, index: CardIndex, spatial: &SpatialConfig) -> usize {
    row_mates(board, index, spatial).count()
}

/// Heuristic score for rule 4.
#[must_use]
pub fn card_score(board: &Board, index: CardIndex, spatial: &SpatialConfig) -> i64 {
    let card = board.card(index);
    let mut score = TIER_WEIGHT * i64::from(card.tier)
        + UNCOVER_WEIGHT * uncover_count(board, index, spatial) as i64;
    if let Some(bomb) = card.bomb {
        score += BOMB_ELAPSED_WEIGHT * i64::from(bomb.elapsed());
    }
    if card.kind == CardKind::Key && board.has_lock() {
        score += KEY_WHILE_LOCKED_BONUS;
    }
    score
}

/// Tie-break key: higher tier first, then lower index.
fn tie_key(board: &Board, index: CardIndex) -> (i32, Reverse<CardIndex>) {
    (board.card(index).tier, Reverse(index))
}

/// Run the cascade over `candidates`. Returns `None` only when it is empty.
#[must_use]
pub fn choose(board: &Board, candidates: &[CardIndex], spatial: &SpatialConfig) -> Option<Decision> {
    if candidates.is_empty() {
        return None;
    }

    // 1. Defuse
    let urgent = candidates
        .iter()
        .copied()
        .filter_map(|index| {
            let countdown = board.card(index).bomb_countdown()?;
            (countdown <= BOMB_PANIC_COUNTDOWN).then_some((index, countdown))
        })
        .max_by_key(|&(index, countdown)| (Reverse(countdown), tie_key(board, index)));
    if let Some((card, _)) = urgent {
        return Some(Decision {
            card,
            rule: PolicyRule::DefuseBomb,
        });
    }

    // 2. Unlock
    if board.has_lock() {
        let key = candidates
            .iter()
            .copied()
            .filter(|&index| board.card(index).kind == CardKind::Key)
            .max_by_key(|&index| tie_key(board, index));
        if let Some(card) = key {
            return Some(Decision {
                card,
                rule: PolicyRule::UnlockWithKey,
            });
        }
    }

    // 3. Zap
    let zap = candidates
        .iter()
        .copied()
        .filter(|&index| board.card(index).kind == CardKind::Zap)
        .map(|index| (index, zap_clear_count(board, index, spatial)))
        .filter(|&(_, cleared)| cleared >= ZAP_MIN_CLEAR)
        .max_by_key(|&(index, cleared)| (cleared, tie_key(board, index)));
    if let Some((card, _)) = zap {
        return Some(Decision {
            card,
            rule: PolicyRule::ZapRow,
        });
    }

    // 4. Score
    candidates
        .iter()
        .copied()
        .max_by_key(|&index| (card_score(board, index, spatial), tie_key(board, index)))
        .map(|card| Decision {
            card,
            rule: PolicyRule::BestScore,
        })
}
