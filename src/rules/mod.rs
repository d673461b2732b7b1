//! Blue Moon rules.
//!
//! - `phase`: turn structure and play legality
//! - `combat`: power, announcing, retreating, dragons and crystals
//! - `effects`: special powers, obligations, bluff calls
//! - `choice`: the multi-candidate choice protocol
//! - `engine`: action dispatch, turn start, legal action enumeration
//!
//! Everything here is a free function over `GameState`; decisions are
//! delegated to controllers through a `SeatMap`.

pub mod phase;
pub mod combat;
pub mod effects;
pub mod choice;
pub mod engine;

pub use choice::{choose, CardRef, ChoicePurpose, ChoiceRequest, Selection, Validator};
pub use combat::{announce_legal, compute_power, forecast_end_support, has_shield, power_in};
pub use engine::{apply, is_action_legal, legal_actions, result, start_turn, GameResult, Outcome};
pub use phase::is_legal;
