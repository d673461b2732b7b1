//! Player actions.
//!
//! An `Action` is one step a player takes on their own turn. Cards are
//! addressed by their index in the acting player's deck (`u8`), except for
//! `Satisfy`, which names the opponent's obligation card.
//!
//! Choices made through the choice protocol and bluff calls are not actions:
//! they happen inside an action on behalf of whichever player must decide.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::state::Phase;
use crate::cards::Element;

/// A complete player action.
///
/// ## Example
///
/// ```
/// use bluemoon::cards::Element;
/// use bluemoon::core::Action;
///
/// let play = Action::Play { card: 4, no_effect: false };
/// assert_eq!(play.to_string(), "play card 4");
/// assert_eq!(Action::Announce(Element::Fire).to_string(), "announce fire");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move explicitly to a later phase.
    Advance(Phase),
    /// Play a card from hand face up. `no_effect` declines its text.
    Play { card: u8, no_effect: bool },
    /// Play a card from hand face down as a bluff.
    Bluff { card: u8 },
    /// Load a card from hand onto one of the player's ships.
    Load { card: u8, ship: u8 },
    /// Land a loaded ship; its cargo returns to hand.
    Land { ship: u8 },
    /// Take a played Support card back to hand.
    Retrieve { card: u8 },
    /// Turn a face-down bluff over and discard it.
    RevealBluff { card: u8 },
    /// Use the special power of an active card.
    UseSpecial { card: u8 },
    /// Satisfy the opponent's obligation card by discarding.
    Satisfy { card: u8 },
    /// End support and announce power in an element.
    Announce(Element),
    /// Give up the fight.
    Retreat,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Advance(phase) => write!(f, "advance to {phase:?}"),
            Action::Play { card, no_effect: false } => write!(f, "play card {card}"),
            Action::Play { card, no_effect: true } => write!(f, "play card {card} with no effect"),
            Action::Bluff { card } => write!(f, "bluff with card {card}"),
            Action::Load { card, ship } => write!(f, "load card {card} onto ship {ship}"),
            Action::Land { ship } => write!(f, "land ship {ship}"),
            Action::Retrieve { card } => write!(f, "retrieve card {card}"),
            Action::RevealBluff { card } => write!(f, "reveal bluff {card}"),
            Action::UseSpecial { card } => write!(f, "use the power of card {card}"),
            Action::Satisfy { card } => write!(f, "satisfy obligation {card}"),
            Action::Announce(Element::Fire) => write!(f, "announce fire"),
            Action::Announce(Element::Earth) => write!(f, "announce earth"),
            Action::Retreat => write!(f, "retreat"),
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    /// Turn number when the action was taken.
    pub turn: u32,
    /// Sequence number within the turn.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
