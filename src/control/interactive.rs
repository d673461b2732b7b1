//! Interactive controller.
//!
//! The engine runs on one thread; the human front end on another. They talk
//! through a pair of channels:
//!
//! - the controller sends a [`Prompt`] carrying a snapshot of the game;
//! - the front end answers with [`Reply`] messages.
//!
//! While a choice is open the front end may send any number of
//! `Reply::Check` selections; each one is validated against a simulation
//! copy and answered with `Prompt::Verdict`. A `Reply::Submit` that passes
//! validation completes the choice. The engine thread blocks in between.
//!
//! On a simulation copy the controller answers at once with an empty
//! selection or `false`, without contacting the front end.
//!
//! ```
//! use std::thread;
//! use bluemoon::control::{interactive, Prompt, Reply};
//!
//! let (_controller, front_end) = interactive::channel();
//! let ui = thread::spawn(move || {
//!     while let Some(prompt) = front_end.next_prompt() {
//!         if let Prompt::CallBluff { .. } = prompt {
//!             front_end.reply(Reply::CallBluff(false));
//!         }
//!     }
//! });
//! // Dropping the controller closes the channel and ends the UI loop.
//! drop(_controller);
//! ui.join().unwrap();
//! ```

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{error, trace};

use super::{ControlKind, Controller};
use crate::core::action::Action;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::rules::choice::{ChoiceRequest, Selection, Validator};

/// Message from the engine to the front end.
#[derive(Clone, Debug)]
pub enum Prompt {
    /// A match started; `who` is the front end's seat.
    Init { snapshot: Box<GameState>, who: PlayerId },
    /// Pick the next action.
    TakeAction { snapshot: Box<GameState>, who: PlayerId },
    /// Answer a choice request.
    Choose { snapshot: Box<GameState>, request: ChoiceRequest },
    /// Answer to the last `Reply::Check` or rejected `Reply::Submit`.
    Verdict { valid: bool },
    /// Decide whether to call the opponent's bluffs.
    CallBluff { snapshot: Box<GameState>, who: PlayerId },
    GameOver { snapshot: Box<GameState>, who: PlayerId },
    Shutdown,
}

/// Message from the front end to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Action(Action),
    /// Ask whether a selection would be accepted.
    Check(Selection),
    /// Final selection.
    Submit(Selection),
    CallBluff(bool),
}

/// Engine-side half: a controller that forwards decisions to a front end.
pub struct InteractiveController {
    prompts: Sender<Prompt>,
    replies: Receiver<Reply>,
}

/// Front-end half of the channel pair.
pub struct FrontEnd {
    prompts: Receiver<Prompt>,
    replies: Sender<Reply>,
}

/// Create a connected controller and front-end handle.
#[must_use]
pub fn channel() -> (InteractiveController, FrontEnd) {
    let (prompt_tx, prompt_rx) = mpsc::channel();
    let (reply_tx, reply_rx) = mpsc::channel();
    (
        InteractiveController {
            prompts: prompt_tx,
            replies: reply_rx,
        },
        FrontEnd {
            prompts: prompt_rx,
            replies: reply_tx,
        },
    )
}

impl FrontEnd {
    /// Block until the engine asks something. `None` once the engine is gone.
    #[must_use]
    pub fn next_prompt(&self) -> Option<Prompt> {
        self.prompts.recv().ok()
    }

    /// Non-blocking variant of [`FrontEnd::next_prompt`].
    #[must_use]
    pub fn try_prompt(&self) -> Option<Prompt> {
        self.prompts.try_recv().ok()
    }

    /// Send a reply. Returns `false` once the engine is gone.
    pub fn reply(&self, reply: Reply) -> bool {
        self.replies.send(reply).is_ok()
    }
}

impl InteractiveController {
    fn send(&self, prompt: Prompt) -> bool {
        if self.prompts.send(prompt).is_err() {
            error!("front end disconnected");
            return false;
        }
        true
    }

    fn recv(&self) -> Option<Reply> {
        match self.replies.recv() {
            Ok(reply) => Some(reply),
            Err(_) => {
                error!("front end disconnected");
                None
            }
        }
    }
}

impl Controller for InteractiveController {
    fn kind(&self) -> ControlKind {
        ControlKind::Interactive
    }

    fn init(&mut self, state: &GameState, who: PlayerId) {
        self.send(Prompt::Init { snapshot: Box::new(state.clone()), who });
    }

    fn choose(
        &mut self,
        state: &GameState,
        request: &ChoiceRequest,
        validator: &Validator<'_>,
    ) -> Selection {
        if state.simulation {
            return Selection::new();
        }
        if !self.send(Prompt::Choose {
            snapshot: Box::new(state.clone()),
            request: request.clone(),
        }) {
            return Selection::new();
        }

        while let Some(reply) = self.recv() {
            match reply {
                Reply::Check(selection) => {
                    let valid = validator.validate(&selection);
                    if !self.send(Prompt::Verdict { valid }) {
                        break;
                    }
                }
                Reply::Submit(selection) => {
                    if validator.validate(&selection) {
                        return selection;
                    }
                    if !self.send(Prompt::Verdict { valid: false }) {
                        break;
                    }
                }
                other => trace!(?other, "ignoring reply while a choice is open"),
            }
        }
        Selection::new()
    }

    fn call_bluff(&mut self, state: &GameState, who: PlayerId) -> bool {
        if state.simulation {
            return false;
        }
        if !self.send(Prompt::CallBluff { snapshot: Box::new(state.clone()), who }) {
            return false;
        }
        while let Some(reply) = self.recv() {
            match reply {
                Reply::CallBluff(call) => return call,
                other => trace!(?other, "ignoring reply while a bluff call is open"),
            }
        }
        false
    }

    fn take_action(&mut self, state: &GameState, who: PlayerId) -> Action {
        if !self.send(Prompt::TakeAction { snapshot: Box::new(state.clone()), who }) {
            return Action::Retreat;
        }
        while let Some(reply) = self.recv() {
            match reply {
                Reply::Action(action) => return action,
                other => trace!(?other, "ignoring reply while an action is open"),
            }
        }
        Action::Retreat
    }

    fn on_game_over(&mut self, state: &GameState, who: PlayerId) {
        self.send(Prompt::GameOver { snapshot: Box::new(state.clone()), who });
    }

    fn shutdown(&mut self, _state: &GameState, _who: PlayerId) {
        self.send(Prompt::Shutdown);
    }
}
