//! Card arena for one board.
//!
//! Cards are stored in a flat `im::Vector` indexed by [`CardIndex`]. Removal
//! only clears a card's `on_board` flag, so indices stay stable for the whole
//! game. The persistent vector makes `Board::clone` O(1), which is what live
//! play uses for undo snapshots.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;

use crate::cards::{CardIndex, CardKind, LevelTemplate, SimCard};
use crate::core::GameRng;

/// Card ids, shared by every clone of a board.
#[derive(Debug, Default)]
struct CardIds {
    names: Vec<String>,
    lookup: FxHashMap<String, CardIndex>,
}

/// The board: every card of the level, on or off the table.
#[derive(Clone, Debug)]
pub struct Board {
    cards: Vector<SimCard>,
    ids: Arc<CardIds>,
}

impl Board {
    /// Instantiate a fresh board from a level.
    pub fn from_level(level: &LevelTemplate, rng: &mut GameRng) -> Self {
        let mut cards = Vector::new();
        let mut ids = CardIds::default();

        for (i, template) in level.cards.iter().enumerate() {
            let index = CardIndex::new(i as u32);
            cards.push_back(SimCard::from_template(template, rng));
            ids.names.push(template.id.clone());
            ids.lookup.insert(template.id.clone(), index);
        }

        Self {
            cards,
            ids: Arc::new(ids),
        }
    }

    /// Build a board directly from cards. Ids are `"0"`, `"1"`, ...
    pub fn from_cards(cards: impl IntoIterator<Item = SimCard>) -> Self {
        let cards: Vector<SimCard> = cards.into_iter().collect();
        let mut ids = CardIds::default();
        for i in 0..cards.len() {
            let name = i.to_string();
            ids.lookup.insert(name.clone(), CardIndex::new(i as u32));
            ids.names.push(name);
        }
        Self {
            cards,
            ids: Arc::new(ids),
        }
    }

    /// Total cards, including removed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get a card. Panics on an index this board did not hand out.
    #[must_use]
    pub fn card(&self, index: CardIndex) -> &SimCard {
        &self.cards[index.as_usize()]
    }

    /// Get a card, returning `None` for unknown indices.
    #[must_use]
    pub fn get(&self, index: CardIndex) -> Option<&SimCard> {
        self.cards.get(index.as_usize())
    }

    /// Mutable access to a card.
    pub fn card_mut(&mut self, index: CardIndex) -> &mut SimCard {
        &mut self.cards[index.as_usize()]
    }

    /// The level id of a card.
    #[must_use]
    pub fn id(&self, index: CardIndex) -> &str {
        self.ids
            .names
            .get(index.as_usize())
            .map_or("?", String::as_str)
    }

    /// Look up a card by level id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<CardIndex> {
        self.ids.lookup.get(id).copied()
    }

    /// Iterate over all cards with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (CardIndex, &SimCard)> + '_ {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, card)| (CardIndex::new(i as u32), card))
    }

    /// Iterate over cards still on the board.
    pub fn on_board(&self) -> impl Iterator<Item = (CardIndex, &SimCard)> + '_ {
        self.iter().filter(|(_, card)| card.on_board)
    }

    #[must_use]
    pub fn on_board_count(&self) -> usize {
        self.cards.iter().filter(|card| card.on_board).count()
    }

    /// No cards left: the level is cleared.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.cards.iter().all(|card| !card.on_board)
    }

    /// Any lock still on the board, visible or not.
    #[must_use]
    pub fn has_lock(&self) -> bool {
        self.cards
            .iter()
            .any(|card| card.on_board && card.kind == CardKind::Lock)
    }

    /// Take a card off the board.
    pub fn remove(&mut self, index: CardIndex) {
        self.card_mut(index).on_board = false;
    }

    /// Indices of on-board cards matching a predicate.
    pub fn select(&self, mut pred: impl FnMut(&SimCard) -> bool) -> Vec<CardIndex> {
        self.on_board()
            .filter(|(_, card)| pred(card))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardTemplate;

    fn level() -> LevelTemplate {
        LevelTemplate::new(
            "t",
            vec![
                CardTemplate::value_card("top", 1, 0.5, 0.5, 3),
                CardTemplate::lock("lock", 0, 0.0, 0.0).face_down(),
                CardTemplate::key("key", 0, 1.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_from_level() {
        let mut rng = GameRng::new(1);
        let board = Board::from_level(&level(), &mut rng);
        assert_eq!(board.len(), 3);
        assert_eq!(board.on_board_count(), 3);
        assert_eq!(board.index_of("lock"), Some(CardIndex::new(1)));
        assert_eq!(board.id(CardIndex::new(2)), "key");
        assert_eq!(board.index_of("missing"), None);
        assert!(board.has_lock());
    }

    #[test]
    fn test_remove_and_cleared() {
        let mut rng = GameRng::new(1);
        let mut board = Board::from_level(&level(), &mut rng);
        for i in 0..3 {
            board.remove(CardIndex::new(i));
        }
        assert!(board.is_cleared());
        assert!(!board.has_lock());
        assert_eq!(board.on_board().count(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = GameRng::new(1);
        let mut board = Board::from_level(&level(), &mut rng);
        let snapshot = board.clone();
        board.remove(CardIndex::new(0));
        assert!(!board.card(CardIndex::new(0)).on_board);
        assert!(snapshot.card(CardIndex::new(0)).on_board);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut rng = GameRng::new(1);
        let board = Board::from_level(&level(), &mut rng);
        assert!(board.get(CardIndex::new(9)).is_none());
        assert_eq!(board.id(CardIndex::new(9)), "?");
    }
}
