//! Core engine types: players, state, actions, RNG, configuration, errors.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod state;

pub use player::{PlayerId, PlayerPair, SEATS};
pub use rng::{GameRng, GameRngState};
pub use config::{FightStart, PowerRule, RulesConfig};
pub use action::{Action, ActionRecord};
pub use error::{EngineError, Result};
pub use state::{GameState, MatchSetup, Phase, Player};
