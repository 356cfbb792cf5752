//! Card templates and per-game card instances.
//!
//! - [`CardTemplate`] / [`LevelTemplate`]: immutable level data, loaded once
//! - [`SimCard`]: mutable per-playout card state
//! - [`Rank`]: the 13-value ring card values live on

pub mod definition;
pub mod instance;
pub mod level;
pub mod rank;

pub use definition::{CardKind, CardTemplate};
pub use instance::{BombTimer, CardIndex, CardValue, SimCard};
pub use level::{DrawPileEntry, LevelSettings, LevelTemplate, CLEAR_ALL};
pub use rank::Rank;
