//! # bluemoon
//!
//! Rules engine for the Blue Moon two-player card game.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: No globals. Every rule is a function over
//!    `GameState`; controllers only ever see a shared reference.
//!
//! 2. **Decisions Are Delegated**: Whenever a player must decide, the engine
//!    asks the `Controller` bound to that seat. Autonomous and interactive
//!    controllers share one trait.
//!
//! 3. **Copies Are Cheap**: Cards, draw piles and history live in `im`
//!    vectors, so undo snapshots and simulation forks are whole-value
//!    clones.
//!
//! ## Modules
//!
//! - `core`: players, state, actions, RNG, configuration, errors
//! - `cards`: designs, per-match card instances, the catalog
//! - `rules`: phases, combat, special powers, the choice protocol, dispatch
//! - `control`: the `Controller` trait and its implementations
//! - `table`: hosting a match with undo, and self-play

pub mod core;
pub mod cards;
pub mod rules;
pub mod control;
pub mod table;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, EngineError, FightStart, GameRng, GameRngState, GameState, MatchSetup,
    Phase, Player, PlayerId, PlayerPair, PowerRule, Result, RulesConfig,
};

pub use crate::cards::{
    Card, CardType, Catalog, CatalogBuilder, Design, Element, Icons, Location, People, PeopleId,
    Restriction, Special, SpecialCategory, Timing,
};

pub use crate::rules::{
    apply, choose, is_action_legal, legal_actions, start_turn, CardRef, ChoicePurpose,
    ChoiceRequest, GameResult, Outcome, Selection, Validator,
};

pub use crate::control::{
    AutonomousController, ControlKind, Controller, Evaluator, FrontEnd, HeuristicEvaluator,
    InteractiveController, Prompt, Reply, SeatMap, Seats, StandIns,
};

pub use crate::table::{MatchReport, Menu, SelfPlay, SelfPlayConfig, Table};
