//! Favorable card generation.
//!
//! Draws and deferred board values are biased toward ranks the current
//! game state can use, while staying random:
//!
//! 1. `effective_probability` turns the base rate plus situational boosts
//!    into the chance `p` that a draw is favorable.
//! 2. `generate_value` rolls once. With probability `1 - p` it returns a
//!    uniform rank. Otherwise it picks uniformly from the neighbours of
//!    urgent bombs, playable value cards and the play-pile top.
//!
//! Everything here is a pure function of its arguments and the RNG stream.

use smallvec::SmallVec;

use crate::board::{playable_cards, Board};
use crate::cards::{CardKind, Rank};
use crate::core::{FavorableParams, GameRng, SpatialConfig};

/// Read-only view of the game state the generator conditions on.
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    pub board: &'a Board,
    pub spatial: &'a SpatialConfig,
    pub play_top: Option<Rank>,
    pub draw_remaining: usize,
}

/// Candidate ranks, at most one of each.
pub type Candidates = SmallVec<[Rank; Rank::COUNT]>;

/// Values of on-board, face-up bombs at or below the urgency threshold,
/// most urgent first.
#[must_use]
pub fn urgent_bomb_values(view: &TableView<'_>, urgency_threshold: i32) -> SmallVec<[Rank; 4]> {
    let mut urgent: SmallVec<[(i32, Rank); 4]> = view
        .board
        .on_board()
        .filter(|(_, card)| card.face_up)
        .filter_map(|(_, card)| {
            let countdown = card.bomb_countdown()?;
            let rank = card.rank()?;
            (countdown <= urgency_threshold).then_some((countdown, rank))
        })
        .collect();
    urgent.sort_by_key(|(countdown, _)| *countdown);
    urgent.into_iter().map(|(_, rank)| rank).collect()
}

/// Base probability plus boosts, capped at 1.
///
/// Each boost applies only when its condition holds.
#[must_use]
pub fn boosted_probability(
    base: f64,
    final_stage_boost: f64,
    bomb_boost: f64,
    in_final_stage: bool,
    bombs_urgent: bool,
) -> f64 {
    let mut p = base;
    if in_final_stage {
        p += final_stage_boost;
    }
    if bombs_urgent {
        p += bomb_boost;
    }
    p.min(1.0)
}

/// Favorable probability for the current state.
#[must_use]
pub fn effective_probability(params: &FavorableParams, view: &TableView<'_>) -> f64 {
    let in_final_stage = view.draw_remaining <= params.final_stage_threshold;
    let bombs_urgent = !urgent_bomb_values(view, params.bomb_urgency_threshold).is_empty();
    boosted_probability(
        params.base_probability,
        params.final_stage_boost,
        params.bomb_boost,
        in_final_stage,
        bombs_urgent,
    )
}

/// Ranks adjacent to what the state wants, in priority order.
///
/// Urgent bombs first, then playable value cards, then the play top. Order
/// decides which ranks get in; once in, every rank has the same weight.
#[must_use]
pub fn candidate_values(view: &TableView<'_>, params: &FavorableParams) -> Candidates {
    let mut seen = [false; Rank::COUNT];
    let mut out = Candidates::new();
    let mut push_neighbors = |rank: Rank, out: &mut Candidates| {
        for n in rank.neighbors() {
            if !seen[n.index()] {
                seen[n.index()] = true;
                out.push(n);
            }
        }
    };

    for rank in urgent_bomb_values(view, params.bomb_urgency_threshold) {
        push_neighbors(rank, &mut out);
    }

    for index in playable_cards(view.board, view.spatial) {
        let card = view.board.card(index);
        if card.kind != CardKind::Value {
            continue;
        }
        if let Some(rank) = card.rank() {
            push_neighbors(rank, &mut out);
        }
    }

    if let Some(top) = view.play_top {
        push_neighbors(top, &mut out);
    }

    out
}

/// Draw one rank with favorable probability `p`.
///
/// The unfavorable branch is checked first, so over many draws the share
/// that took the favorable branch is exactly `p`.
pub fn generate_value(
    p: f64,
    view: &TableView<'_>,
    params: &FavorableParams,
    rng: &mut GameRng,
) -> Rank {
    if rng.unit() >= p {
        return rng.rank();
    }
    let candidates = candidate_values(view, params);
    match rng.pick(&candidates) {
        Some(rank) => *rank,
        None => rng.rank(),
    }
}

/// Favorable generator bound to one set of parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct FavorableGenerator {
    params: FavorableParams,
}

impl FavorableGenerator {
    #[must_use]
    pub fn new(params: FavorableParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &FavorableParams {
        &self.params
    }

    /// Effective probability, then a draw at that probability.
    pub fn draw(&self, view: &TableView<'_>, rng: &mut GameRng) -> Rank {
        let p = effective_probability(&self.params, view);
        generate_value(p, view, &self.params, rng)
    }
}
