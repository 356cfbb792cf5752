//! Favorable card generator for draws and deferred board values.

pub mod favorable;

pub use favorable::{
    boosted_probability, candidate_values, effective_probability, generate_value,
    urgent_bomb_values, Candidates, FavorableGenerator, TableView,
};
