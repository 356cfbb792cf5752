//! The playout engine: one game from setup to a terminal outcome.
//!
//! ## Lifecycle
//!
//! `Setup -> Playing -> {Won, Lost}`. Setup runs inside the constructor:
//! cards are instantiated, the draw pile is built, and its first card is
//! drawn onto the play pile (this consumes a slot but is not a move).
//!
//! ## A turn
//!
//! 1. Legal plays are the playable cards that fit the play-pile top.
//! 2. If there are any, the turn policy picks one. Its effect is applied
//!    (a key removes every lock, a zap clears its row), the card leaves the
//!    board, a value card becomes the new top, and newly uncovered cards
//!    are revealed with deferred values drawn from the favorable generator.
//! 3. Otherwise the next draw-pile card becomes the top.
//! 4. Either way every on-board, face-up bomb ticks once and the move
//!    counter goes up. A bomb at zero loses the game.
//! 5. An empty board wins. No legal play with an empty draw pile loses.
//!
//! The same functions serve live play: [`Playout::apply`] takes a player's
//! [`Action`], [`Playout::step`] takes the policy's.
//!
//! ```
//! use peak_balance::cards::{CardTemplate, LevelTemplate};
//! use peak_balance::core::{EngineConfig, GameRng};
//! use peak_balance::playout::Playout;
//!
//! let level = LevelTemplate::new(
//!     "tiny",
//!     vec![
//!         CardTemplate::value_card("a", 0, 0.0, 0.0, 5),
//!         CardTemplate::value_card("b", 0, 1.0, 0.0, 6),
//!     ],
//! );
//! let mut playout = Playout::new(&level, 8, &EngineConfig::default(), GameRng::new(3))?;
//! let outcome = playout.run();
//! assert!(outcome.moves <= 2 + 7);
//! # Ok::<(), peak_balance::BalanceError>(())
//! ```

use im::Vector;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::outcome::{GameOutcome, GamePhase, LossReason};
use super::state::{DrawPile, TableState};
use crate::board::{reveal_newly_uncovered, Board};
use crate::cards::{CardIndex, CardKind, LevelTemplate, Rank};
use crate::core::{
    Action, ActionError, ActionRecord, BalanceError, EngineConfig, GameRng, GameRngState,
    PlayoutConfig, SpatialConfig,
};
use crate::generator::{effective_probability, FavorableGenerator, TableView};
use crate::policy::{choose, legal_candidates, row_mates, PolicyRule};

/// What one move did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub action: Action,

    /// Policy rule behind the move; `None` for player actions and draws.
    pub rule: Option<PolicyRule>,

    /// Cards taken off the board, the played card first.
    pub removed: Vec<CardIndex>,

    /// Cards flipped face-up after the move.
    pub revealed: Vec<CardIndex>,

    /// Rank drawn, for draws.
    pub drawn: Option<Rank>,

    /// Phase after the move.
    pub phase: GamePhase,
}

/// Saved point in a game, for undo.
#[derive(Clone, Debug)]
pub struct PlayoutSnapshot {
    state: TableState,
    rng: GameRngState,
    history: Vector<ActionRecord>,
}

impl PlayoutSnapshot {
    #[must_use]
    pub fn state(&self) -> &TableState {
        &self.state
    }
}

/// One game in progress.
#[derive(Clone, Debug)]
pub struct Playout {
    state: TableState,
    rng: GameRng,
    generator: FavorableGenerator,
    spatial: SpatialConfig,
    config: PlayoutConfig,
    history: Vector<ActionRecord>,
}

impl Playout {
    /// Start a game with `deck_size` unresolved draw-pile slots.
    ///
    /// Rejects a malformed level, an out-of-range config, or a turn cap a
    /// legal game could reach.
    pub fn new(
        level: &LevelTemplate,
        deck_size: usize,
        engine: &EngineConfig,
        rng: GameRng,
    ) -> Result<Self, BalanceError> {
        validate_inputs(level, deck_size, engine)?;
        Ok(Self::with_pile(level, DrawPile::unresolved(deck_size), engine, rng))
    }

    /// Start a game with the level's authored draw pile.
    pub fn from_level(
        level: &LevelTemplate,
        engine: &EngineConfig,
        rng: GameRng,
    ) -> Result<Self, BalanceError> {
        validate_inputs(level, level.nominal_deck_size(), engine)?;
        let pile = DrawPile::from_entries(&level.settings.draw_pile_spec);
        Ok(Self::with_pile(level, pile, engine, rng))
    }

    /// Start a game without checking its inputs. Batches validate once.
    pub(crate) fn with_pile(
        level: &LevelTemplate,
        pile: DrawPile,
        engine: &EngineConfig,
        mut rng: GameRng,
    ) -> Self {
        let board = Board::from_level(level, &mut rng);
        let mut playout = Self {
            state: TableState::new(board, pile),
            rng,
            generator: FavorableGenerator::new(engine.favorable),
            spatial: engine.spatial,
            config: engine.playout,
            history: Vector::new(),
        };
        playout.setup();
        playout
    }

    fn setup(&mut self) {
        if let Some(rank) = self.draw_from_pile() {
            self.state.play_top = Some(rank);
        }
        self.reveal();
        self.settle();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> &TableState {
        &self.state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn play_top(&self) -> Option<Rank> {
        self.state.play_top
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.state.moves
    }

    #[must_use]
    pub fn spatial(&self) -> &SpatialConfig {
        &self.spatial
    }

    /// Every move made so far.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// The state as the favorable generator sees it.
    #[must_use]
    pub fn view(&self) -> TableView<'_> {
        TableView {
            board: &self.state.board,
            spatial: &self.spatial,
            play_top: self.state.play_top,
            draw_remaining: self.state.draw_pile.remaining(),
        }
    }

    /// Chance that the next generated value is favorable.
    #[must_use]
    pub fn favorable_probability(&self) -> f64 {
        effective_probability(self.generator.params(), &self.view())
    }

    /// Cards that may be played right now. Empty once the game is over.
    #[must_use]
    pub fn legal_plays(&self) -> Vec<CardIndex> {
        if self.is_over() {
            return Vec::new();
        }
        legal_candidates(&self.state.board, &self.spatial, self.state.play_top)
    }

    /// Terminal record, once the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        let remaining = self.state.draw_pile.remaining();
        match self.state.phase {
            GamePhase::Playing => None,
            GamePhase::Won => Some(GameOutcome::win(
                remaining,
                self.state.moves,
                self.config.close_win_threshold,
            )),
            GamePhase::Lost(reason) => Some(GameOutcome::loss(reason, remaining, self.state.moves)),
        }
    }

    // =========================================================================
    // Driving the game
    // =========================================================================

    /// Apply a player's action.
    pub fn apply(&mut self, action: Action) -> Result<TurnReport, ActionError> {
        if self.is_over() {
            return Err(ActionError::GameOver);
        }
        match action {
            Action::Play(index) => {
                let card = self
                    .state
                    .board
                    .get(index)
                    .ok_or(ActionError::UnknownCard(index.as_usize()))?;
                if !card.on_board || !self.legal_plays().contains(&index) {
                    return Err(ActionError::NotPlayable(self.state.board.id(index).to_string()));
                }
                Ok(self.play(index, None))
            }
            Action::Draw => {
                if self.state.draw_pile.is_exhausted() {
                    return Err(ActionError::DrawPileEmpty);
                }
                Ok(self.draw())
            }
        }
    }

    /// Let the turn policy make one move. `None` once the game is over.
    pub fn step(&mut self) -> Option<TurnReport> {
        if self.is_over() {
            return None;
        }
        let candidates = self.legal_plays();
        match choose(&self.state.board, &candidates, &self.spatial) {
            Some(decision) => Some(self.play(decision.card, Some(decision.rule))),
            None if !self.state.draw_pile.is_exhausted() => Some(self.draw()),
            None => {
                self.state.phase = GamePhase::Lost(LossReason::Stuck);
                None
            }
        }
    }

    /// Play the game out with the turn policy.
    pub fn run(&mut self) -> GameOutcome {
        loop {
            if let Some(outcome) = self.outcome() {
                debug!(
                    "playout over: {:?} after {} moves, {} left to draw",
                    self.state.phase, outcome.moves, outcome.draw_remaining
                );
                return outcome;
            }
            self.step();
        }
    }

    /// Save the current point of the game. O(1).
    #[must_use]
    pub fn snapshot(&self) -> PlayoutSnapshot {
        PlayoutSnapshot {
            state: self.state.clone(),
            rng: self.rng.state(),
            history: self.history.clone(),
        }
    }

    /// Return to a saved point, including the random stream.
    pub fn restore(&mut self, snapshot: &PlayoutSnapshot) {
        self.state = snapshot.state.clone();
        self.rng = GameRng::from_state(&snapshot.rng);
        self.history = snapshot.history.clone();
    }

    // =========================================================================
    // Moves
    // =========================================================================

    fn play(&mut self, index: CardIndex, rule: Option<PolicyRule>) -> TurnReport {
        let card = self.state.board.card(index);
        let kind = card.kind;
        let rank = card.rank();

        let mut removed = vec![index];
        match kind {
            CardKind::Key => {
                removed.extend(self.state.board.select(|c| c.kind == CardKind::Lock));
            }
            CardKind::Zap => {
                removed.extend(row_mates(&self.state.board, index, &self.spatial));
            }
            CardKind::Value | CardKind::Lock => {}
        }
        for &card in &removed {
            self.state.board.remove(card);
        }

        if kind == CardKind::Value {
            if let Some(rank) = rank {
                self.state.play_top = Some(rank);
            }
        }

        let revealed = self.reveal();
        self.finish_move(Action::Play(index), rule, removed, revealed, None)
    }

    fn draw(&mut self) -> TurnReport {
        let drawn = self.draw_from_pile();
        if let Some(rank) = drawn {
            self.state.play_top = Some(rank);
        }
        self.finish_move(Action::Draw, None, Vec::new(), Vec::new(), drawn)
    }

    fn finish_move(
        &mut self,
        action: Action,
        rule: Option<PolicyRule>,
        removed: Vec<CardIndex>,
        revealed: Vec<CardIndex>,
        drawn: Option<Rank>,
    ) -> TurnReport {
        let detonated = self.tick_bombs();
        self.state.moves += 1;
        self.history.push_back(ActionRecord::new(action, self.state.moves));
        if detonated {
            self.state.phase = GamePhase::Lost(LossReason::Bomb);
        }
        self.settle();

        TurnReport {
            action,
            rule,
            removed,
            revealed,
            drawn,
            phase: self.state.phase,
        }
    }

    /// Decide whether the game just ended.
    fn settle(&mut self) {
        if self.is_over() {
            return;
        }
        if self.state.board.is_cleared() {
            self.state.phase = GamePhase::Won;
        } else if self.state.moves >= self.config.max_turns {
            warn!(
                "playout hit the {} turn cap with {} cards on the board",
                self.config.max_turns,
                self.state.board.on_board_count()
            );
            self.state.phase = GamePhase::Lost(LossReason::Runaway);
        } else if self.state.draw_pile.is_exhausted() && self.legal_plays().is_empty() {
            self.state.phase = GamePhase::Lost(LossReason::Stuck);
        }
    }

    /// Tick every on-board, face-up bomb. True if one went off.
    fn tick_bombs(&mut self) -> bool {
        let ticking = self
            .state
            .board
            .select(|card| card.face_up && card.is_bomb());
        let mut detonated = false;
        for index in ticking {
            if let Some(bomb) = self.state.board.card_mut(index).bomb.as_mut() {
                bomb.countdown -= 1;
                detonated |= bomb.has_detonated();
            }
        }
        detonated
    }

    fn draw_from_pile(&mut self) -> Option<Rank> {
        let board = &self.state.board;
        let spatial = &self.spatial;
        let generator = &self.generator;
        let rng = &mut self.rng;
        let play_top = self.state.play_top;
        self.state.draw_pile.draw_with(|draw_remaining| {
            let view = TableView {
                board,
                spatial,
                play_top,
                draw_remaining,
            };
            generator.draw(&view, rng)
        })
    }

    fn reveal(&mut self) -> Vec<CardIndex> {
        let spatial = &self.spatial;
        let generator = &self.generator;
        let rng = &mut self.rng;
        let play_top = self.state.play_top;
        let draw_remaining = self.state.draw_pile.remaining();
        reveal_newly_uncovered(&mut self.state.board, spatial, |board, _| {
            let view = TableView {
                board,
                spatial,
                play_top,
                draw_remaining,
            };
            generator.draw(&view, rng)
        })
    }
}

/// Check a level and engine config before any game starts.
pub(crate) fn validate_inputs(
    level: &LevelTemplate,
    deck_size: usize,
    engine: &EngineConfig,
) -> Result<(), BalanceError> {
    level.validate()?;
    engine.validate()?;
    engine.playout.check_turn_cap(level.cards.len(), deck_size)?;
    Ok(())
}

/// Run one policy-driven game with `deck_size` random draw-pile slots.
pub fn simulate(
    level: &LevelTemplate,
    deck_size: usize,
    engine: &EngineConfig,
    rng: GameRng,
) -> Result<GameOutcome, BalanceError> {
    Ok(Playout::new(level, deck_size, engine, rng)?.run())
}
