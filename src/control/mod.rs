//! Controllers: where a player's decisions come from.
//!
//! The engine never decides for a player. Whenever a decision is needed it
//! asks the `Controller` bound to that player's seat:
//!
//! - `take_action`: the next action on the player's own turn
//! - `choose`: an answer to a choice request
//! - `call_bluff`: whether to challenge the opponent's bluffs
//!
//! Two controllers ship with the crate: [`AutonomousController`], which
//! scores candidate actions on simulation copies, and
//! [`InteractiveController`], which forwards every decision to an external
//! front end over channels and waits for its reply.
//!
//! Controllers only ever see `&GameState`. On a simulation copy an
//! interactive controller must answer immediately with a neutral result.

pub mod autonomous;
pub mod interactive;

use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::player::{PlayerId, PlayerPair};
use crate::core::state::GameState;
use crate::rules::choice::{ChoiceRequest, Selection, Validator};

pub use autonomous::{AutonomousController, Evaluator, HeuristicEvaluator};
pub use interactive::{FrontEnd, InteractiveController, Prompt, Reply};

/// Which kind of controller drives a seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    Interactive,
    #[default]
    Autonomous,
}

/// A source of decisions for one seat.
pub trait Controller {
    fn kind(&self) -> ControlKind;

    /// Called once when a match starts.
    fn init(&mut self, _state: &GameState, _who: PlayerId) {}

    /// Answer a choice request. `validator` reports whether a selection
    /// would be accepted, without side effects.
    fn choose(
        &mut self,
        state: &GameState,
        request: &ChoiceRequest,
        validator: &Validator<'_>,
    ) -> Selection;

    /// Whether to call the bluffs the player to act just played.
    fn call_bluff(&mut self, state: &GameState, who: PlayerId) -> bool;

    /// Next action on `who`'s own turn.
    fn take_action(&mut self, state: &GameState, who: PlayerId) -> Action;

    /// Called once when the match ends.
    fn on_game_over(&mut self, _state: &GameState, _who: PlayerId) {}

    /// Called when the table is torn down.
    fn shutdown(&mut self, _state: &GameState, _who: PlayerId) {}
}

/// Lookup of the controller deciding for a seat.
pub trait SeatMap {
    fn seat(&mut self, who: PlayerId) -> &mut dyn Controller;
}

/// The controllers bound to both seats of a table.
pub struct Seats {
    controllers: PlayerPair<Box<dyn Controller>>,
}

impl Seats {
    #[must_use]
    pub fn new(first: Box<dyn Controller>, second: Box<dyn Controller>) -> Self {
        Self {
            controllers: PlayerPair::from_array([first, second]),
        }
    }

    /// Two heuristic autonomous controllers.
    #[must_use]
    pub fn autonomous() -> Self {
        Self::new(
            Box::new(AutonomousController::heuristic()),
            Box::new(AutonomousController::heuristic()),
        )
    }

    #[must_use]
    pub fn kind(&self, who: PlayerId) -> ControlKind {
        self.controllers[who].kind()
    }
}

impl SeatMap for Seats {
    fn seat(&mut self, who: PlayerId) -> &mut dyn Controller {
        self.controllers[who].as_mut()
    }
}

/// Seats every player with a greedy autonomous controller.
///
/// Used for forecasts on simulation copies, where no real controller may
/// be consulted.
pub struct StandIns {
    greedy: AutonomousController,
}

impl Default for StandIns {
    fn default() -> Self {
        Self {
            greedy: AutonomousController::greedy(),
        }
    }
}

impl SeatMap for StandIns {
    fn seat(&mut self, _who: PlayerId) -> &mut dyn Controller {
        &mut self.greedy
    }
}
