//! Core engine types: RNG, configuration, errors, actions.
//!
//! These are shared by every other module and carry no game rules.

pub mod action;
pub mod config;
pub mod error;
pub mod rng;

pub use action::{Action, ActionRecord};
pub use config::{EngineConfig, FavorableParams, PlayoutConfig, SpatialConfig, TuningConfig};
pub use error::{ActionError, BalanceError, ConfigError, TemplateError};
pub use rng::{derive_seed, GameRng, GameRngState};
