//! Engine error type.

use thiserror::Error;

use super::action::Action;
use super::player::PlayerId;
use crate::rules::choice::ChoicePurpose;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the rules engine and the host loop.
///
/// A refused action never mutates state; the caller may keep using the
/// game it was refused on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The action is not legal for this player in the current state.
    #[error("{player} may not {action}")]
    IllegalAction { player: PlayerId, action: Action },

    /// No undo snapshot is held.
    #[error("nothing to undo")]
    NothingToUndo,

    /// A controller submitted a selection the choice does not accept.
    #[error("selection rejected for {purpose:?}")]
    RejectedSelection { purpose: ChoicePurpose },

    /// A controller kept acting without ending its turn.
    #[error("{player} took {actions} actions without ending the turn")]
    ControllerStalled { player: PlayerId, actions: usize },

    #[error("unknown people `{0}`")]
    UnknownPeople(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}
