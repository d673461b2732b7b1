//! The choice protocol.
//!
//! Whenever a rule needs a player to pick cards (which card satisfies an
//! obligation, which cards to discard, which card to silence) the engine
//! builds a `ChoiceRequest` and calls [`choose`]. The deciding player's
//! controller receives the candidates together with a [`Validator`] that
//! tries any selection on a simulation copy and reports whether the game
//! would accept it, without side effects.
//!
//! ## Flow
//!
//! 1. A request whose `min` equals the number of candidates is forced: all
//!    candidates are taken and no controller is asked.
//! 2. Otherwise the chooser's controller answers, checking selections
//!    through the validator as often as it likes.
//! 3. The final selection is validated once more and applied.
//!
//! A selection made by an interactive controller on the canonical game sets
//! `random_event`, since it may reveal hidden information.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::cards::Location;
use crate::control::{ControlKind, SeatMap};
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// A card addressed by owner and deck index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    pub owner: PlayerId,
    pub index: u8,
}

impl CardRef {
    #[must_use]
    pub const fn new(owner: PlayerId, index: u8) -> Self {
        Self { owner, index }
    }
}

/// Cards picked in answer to a request.
pub type Selection = SmallVec<[CardRef; 4]>;

/// What a choice is for; decides how the selection is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoicePurpose {
    /// Discard one card to satisfy the opponent's obligation card.
    Satisfy { obligation: u8 },
    /// Discard from hand.
    Discard,
    /// Return cards from the discard pile to hand.
    Recycle,
    /// Cancel the text and icons of opponent cards in play.
    Silence,
    /// Discard from hand after calling a good bluff.
    BluffPenalty,
}

/// A bounded multi-select request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    /// Player whose controller decides.
    pub chooser: PlayerId,
    pub purpose: ChoicePurpose,
    pub candidates: Vec<CardRef>,
    pub min: usize,
    pub max: usize,
    /// Human-readable prompt for front ends.
    pub prompt: String,
}

impl ChoiceRequest {
    /// A request for exactly `count` cards, clamped to what is available.
    #[must_use]
    pub fn exactly(
        chooser: PlayerId,
        purpose: ChoicePurpose,
        candidates: Vec<CardRef>,
        count: usize,
        prompt: impl Into<String>,
    ) -> Self {
        let count = count.min(candidates.len());
        Self {
            chooser,
            purpose,
            candidates,
            min: count,
            max: count,
            prompt: prompt.into(),
        }
    }

    /// Whether the request has only one possible answer.
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.min == self.candidates.len()
    }
}

/// Side-effect-free acceptance check handed to controllers.
pub struct Validator<'a> {
    state: &'a GameState,
    request: &'a ChoiceRequest,
}

impl<'a> Validator<'a> {
    #[must_use]
    pub fn new(state: &'a GameState, request: &'a ChoiceRequest) -> Self {
        Self { state, request }
    }

    /// Would the game accept `selection` as the final answer?
    ///
    /// Runs the selection on a simulation copy; the state the request was
    /// raised on is never touched.
    #[must_use]
    pub fn validate(&self, selection: &[CardRef]) -> bool {
        let mut sim = self.state.fork_simulation();
        apply_selection(&mut sim, self.request, selection)
    }

    #[must_use]
    pub fn request(&self) -> &ChoiceRequest {
        self.request
    }
}

/// Run a choice through the chooser's controller and apply the result.
pub fn choose(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    request: &ChoiceRequest,
) -> Result<Selection> {
    if request.is_forced() {
        let all: Selection = request.candidates.iter().copied().collect();
        trace!(purpose = ?request.purpose, picked = all.len(), "forced choice");
        apply_selection(state, request, &all);
        return Ok(all);
    }

    let kind = state.player(request.chooser).control;
    let validator = Validator::new(state, request);
    let mut selection = seats.seat(request.chooser).choose(state, request, &validator);

    if state.simulation && selection.is_empty() && request.min > 0 {
        selection = request.candidates.iter().take(request.min).copied().collect();
    }

    if !Validator::new(state, request).validate(&selection) {
        warn!(
            chooser = %request.chooser,
            purpose = ?request.purpose,
            ?selection,
            "selection rejected"
        );
        return Err(EngineError::RejectedSelection { purpose: request.purpose });
    }

    if kind == ControlKind::Interactive && !state.simulation {
        state.random_event = true;
    }
    trace!(chooser = %request.chooser, purpose = ?request.purpose, ?selection, "choice made");
    apply_selection(state, request, &selection);
    Ok(selection)
}

/// Apply a selection, reporting whether the rules accept it.
///
/// On `false` the state may be partially changed; callers only apply
/// unvalidated selections to simulation copies.
pub fn apply_selection(
    state: &mut GameState,
    request: &ChoiceRequest,
    selection: &[CardRef],
) -> bool {
    if selection.len() < request.min || selection.len() > request.max {
        return false;
    }
    for (i, pick) in selection.iter().enumerate() {
        if !request.candidates.contains(pick) || selection[..i].contains(pick) {
            return false;
        }
    }

    match request.purpose {
        ChoicePurpose::Satisfy { obligation } => {
            let [pick] = selection else {
                return false;
            };
            let owner = request.chooser.opponent();
            let Some(mask) = state.design(owner, obligation).map(|d| d.special.mask) else {
                return false;
            };
            let fits = state
                .design(pick.owner, pick.index)
                .is_some_and(|d| mask.contains(d.card_type));
            if pick.owner != request.chooser || !in_location(state, pick, Location::Hand) || !fits {
                return false;
            }
            state.move_card(pick.owner, pick.index, Location::Discard);
            if let Some(card) = state.card_mut(owner, obligation) {
                card.used = true;
            }
        }
        ChoicePurpose::Discard | ChoicePurpose::BluffPenalty => {
            for pick in selection {
                if pick.owner != request.chooser || !in_location(state, pick, Location::Hand) {
                    return false;
                }
                state.move_card(pick.owner, pick.index, Location::Discard);
            }
        }
        ChoicePurpose::Recycle => {
            for pick in selection {
                if pick.owner != request.chooser || !in_location(state, pick, Location::Discard) {
                    return false;
                }
                state.move_card(pick.owner, pick.index, Location::Hand);
            }
        }
        ChoicePurpose::Silence => {
            for pick in selection {
                let Some(card) = state.card_mut(pick.owner, pick.index) else {
                    return false;
                };
                if pick.owner == request.chooser
                    || !card.text_applies()
                    || !card.location.in_play()
                {
                    return false;
                }
                card.text_ignored = true;
                card.icons = crate::cards::Icons::NONE;
            }
        }
    }
    true
}

fn in_location(state: &GameState, pick: &CardRef, location: Location) -> bool {
    state
        .card(pick.owner, pick.index)
        .is_some_and(|c| c.location == location)
}
