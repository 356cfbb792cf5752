//! Board coverage model.
//!
//! Card A covers card B when both are on the board, A's tier is strictly
//! greater than B's, and their positions are closer than the configured
//! overlap threshold. Because covering needs a strictly greater tier, the
//! relation cannot cycle.
//!
//! A card is playable when it is on the board, face-up and uncovered.
//!
//! All functions are pure reads of a [`Board`] except
//! [`reveal_newly_uncovered`], which flips face-up flags and fills in
//! deferred values. None of them ever change `on_board`.

use crate::cards::{CardIndex, Rank, SimCard};
use crate::core::SpatialConfig;

use super::arena::Board;

/// True if `over` covers `under`.
#[must_use]
pub fn covers(over: &SimCard, under: &SimCard, spatial: &SpatialConfig) -> bool {
    over.on_board
        && under.on_board
        && over.tier > under.tier
        && over.distance_to(under) < spatial.overlap_threshold
}

/// Cards currently covering `index`.
pub fn coverers<'a>(
    board: &'a Board,
    index: CardIndex,
    spatial: &'a SpatialConfig,
) -> impl Iterator<Item = CardIndex> + 'a {
    let target = board.card(index);
    board
        .on_board()
        .filter(move |(other, card)| *other != index && covers(card, target, spatial))
        .map(|(other, _)| other)
}

/// True if any on-board card of greater tier overlaps `index`.
#[must_use]
pub fn is_covered(board: &Board, index: CardIndex, spatial: &SpatialConfig) -> bool {
    coverers(board, index, spatial).next().is_some()
}

/// On-board, face-up, uncovered cards, in arena order.
#[must_use]
pub fn playable_cards(board: &Board, spatial: &SpatialConfig) -> Vec<CardIndex> {
    board
        .on_board()
        .filter(|(index, card)| card.face_up && !is_covered(board, *index, spatial))
        .map(|(index, _)| index)
        .collect()
}

/// Number of cards whose only coverer is `index`.
///
/// These are exactly the cards that become uncovered if `index` is removed.
#[must_use]
pub fn uncover_count(board: &Board, index: CardIndex, spatial: &SpatialConfig) -> usize {
    let card = board.card(index);
    board
        .on_board()
        .filter(|(other, under)| *other != index && covers(card, under, spatial))
        .filter(|(other, _)| coverers(board, *other, spatial).all(|c| c == index))
        .count()
}

/// Flip every on-board, face-down, uncovered card face-up.
///
/// Cards with a deferred value get one from `resolve` first. The callback
/// sees the board as it is at that moment, including cards revealed
/// earlier in the same pass. Returns the revealed cards in arena order.
///
/// Idempotent: a second call with no board change in between reveals
/// nothing.
pub fn reveal_newly_uncovered<F>(
    board: &mut Board,
    spatial: &SpatialConfig,
    mut resolve: F,
) -> Vec<CardIndex>
where
    F: FnMut(&Board, CardIndex) -> Rank,
{
    let view: &Board = board;
    let pending: Vec<CardIndex> = view
        .on_board()
        .filter(|(index, card)| !card.face_up && !is_covered(view, *index, spatial))
        .map(|(index, _)| index)
        .collect();

    for &index in &pending {
        if board.card(index).needs_resolution() {
            let rank = resolve(&*board, index);
            board.card_mut(index).resolve(rank);
        }
        board.card_mut(index).face_up = true;
    }

    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardTemplate, LevelTemplate};
    use crate::core::GameRng;

    fn board(cards: Vec<CardTemplate>) -> Board {
        let mut rng = GameRng::new(3);
        Board::from_level(&LevelTemplate::new("t", cards), &mut rng)
    }

    fn idx(i: u32) -> CardIndex {
        CardIndex::new(i)
    }

    #[test]
    fn test_uncovered_alone() {
        let b = board(vec![CardTemplate::value_card("a", 0, 0.0, 0.0, 1)]);
        let spatial = SpatialConfig::default();
        assert!(!is_covered(&b, idx(0), &spatial));
        assert_eq!(playable_cards(&b, &spatial), vec![idx(0)]);
    }

    #[test]
    fn test_same_tier_does_not_cover() {
        let b = board(vec![
            CardTemplate::value_card("a", 0, 0.0, 0.0, 1),
            CardTemplate::value_card("b", 0, 0.1, 0.0, 2),
        ]);
        let spatial = SpatialConfig::default();
        assert!(!is_covered(&b, idx(0), &spatial));
        assert!(!is_covered(&b, idx(1), &spatial));
    }

    #[test]
    fn test_higher_tier_nearby_covers() {
        let b = board(vec![
            CardTemplate::value_card("low", 0, 0.0, 0.0, 1),
            CardTemplate::value_card("high", 1, 0.5, 0.5, 2),
        ]);
        let spatial = SpatialConfig::default();
        assert!(is_covered(&b, idx(0), &spatial));
        assert!(!is_covered(&b, idx(1), &spatial));
        assert_eq!(playable_cards(&b, &spatial), vec![idx(1)]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let b = board(vec![
            CardTemplate::value_card("low", 0, 0.0, 0.0, 1),
            CardTemplate::value_card("high", 1, 0.75, 0.0, 2),
        ]);
        let spatial = SpatialConfig::default();
        assert!(!is_covered(&b, idx(0), &spatial));
    }

    #[test]
    fn test_removed_card_does_not_cover() {
        let mut b = board(vec![
            CardTemplate::value_card("low", 0, 0.0, 0.0, 1),
            CardTemplate::value_card("high", 1, 0.5, 0.5, 2),
        ]);
        let spatial = SpatialConfig::default();
        b.remove(idx(1));
        assert!(!is_covered(&b, idx(0), &spatial));
    }

    #[test]
    fn test_face_down_not_playable() {
        let b = board(vec![CardTemplate::value_card("a", 0, 0.0, 0.0, 1).face_down()]);
        assert!(playable_cards(&b, &SpatialConfig::default()).is_empty());
    }

    #[test]
    fn test_uncover_count_only_sole_coverer() {
        // c0 is covered only by c2; c1 is covered by c2 and c3.
        let b = board(vec![
            CardTemplate::value_card("c0", 0, 0.0, 0.0, 1),
            CardTemplate::value_card("c1", 0, 1.0, 0.0, 1),
            CardTemplate::value_card("c2", 1, 0.5, 0.5, 1),
            CardTemplate::value_card("c3", 1, 1.5, 0.5, 1),
        ]);
        let spatial = SpatialConfig::default();
        assert_eq!(uncover_count(&b, idx(2), &spatial), 1);
        assert_eq!(uncover_count(&b, idx(3), &spatial), 0);
        assert_eq!(uncover_count(&b, idx(0), &spatial), 0);
    }

    #[test]
    fn test_reveal_resolves_and_is_idempotent() {
        let mut b = board(vec![
            CardTemplate::random("low", 0, 0.0, 0.0).face_down(),
            CardTemplate::value_card("high", 1, 0.5, 0.5, 2),
        ]);
        let spatial = SpatialConfig::default();

        // Still covered: nothing happens.
        let revealed = reveal_newly_uncovered(&mut b, &spatial, |_, _| Rank::new(7).unwrap());
        assert!(revealed.is_empty());

        b.remove(idx(1));
        let mut calls = 0;
        let revealed = reveal_newly_uncovered(&mut b, &spatial, |_, _| {
            calls += 1;
            Rank::new(7).unwrap()
        });
        assert_eq!(revealed, vec![idx(0)]);
        assert_eq!(calls, 1);
        assert!(b.card(idx(0)).face_up);
        assert_eq!(b.card(idx(0)).rank(), Rank::new(7));

        let again = reveal_newly_uncovered(&mut b, &spatial, |_, _| Rank::new(1).unwrap());
        assert!(again.is_empty());
        assert_eq!(b.card(idx(0)).rank(), Rank::new(7));
    }

    #[test]
    fn test_reveal_keeps_fixed_value() {
        let mut b = board(vec![CardTemplate::value_card("a", 0, 0.0, 0.0, 4).face_down()]);
        let spatial = SpatialConfig::default();
        let revealed = reveal_newly_uncovered(&mut b, &spatial, |_, _| Rank::new(9).unwrap());
        assert_eq!(revealed.len(), 1);
        assert_eq!(b.card(idx(0)).rank(), Rank::new(4));
    }
}
