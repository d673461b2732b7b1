//! Special powers, obligations and bluff calls.
//!
//! Powers with `Timing::MyTurn` are used as actions; `Timing::OnPlay` powers
//! resolve as the card is played; `Timing::Continuous` powers (obligations)
//! apply for as long as the card is active. Any power whose card text is
//! ignored does nothing.

use tracing::{debug, info};

use super::choice::{choose, CardRef, ChoicePurpose, ChoiceRequest};
use super::phase::acting;
use crate::cards::{Element, Location, SpecialCategory, Timing};
use crate::control::{ControlKind, SeatMap};
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase};

/// Whether `who` may use the special power of card `index` now.
#[must_use]
pub fn special_usable(state: &GameState, who: PlayerId, index: u8) -> bool {
    if !acting(state, who) || state.player(who).phase > Phase::Support {
        return false;
    }
    let (Some(card), Some(design)) = (state.card(who, index), state.design(who, index)) else {
        return false;
    };
    if !card.text_applies() || card.used || !card.location.in_play() {
        return false;
    }
    design.special.timing == Timing::MyTurn && has_targets(state, who, design.special.category)
}

fn has_targets(state: &GameState, who: PlayerId, category: SpecialCategory) -> bool {
    let me = state.player(who);
    let them = state.player(who.opponent());
    match category {
        SpecialCategory::Draw => me.draw_pile_len() > 0,
        SpecialCategory::Recycle => me.count(Location::Discard) > 0,
        SpecialCategory::ForceDiscard => them.count(Location::Hand) > 0,
        SpecialCategory::Silence => silence_targets(state, who).next().is_some(),
        SpecialCategory::Obligation | SpecialCategory::None => false,
    }
}

fn silence_targets(state: &GameState, who: PlayerId) -> impl Iterator<Item = CardRef> + '_ {
    let them = who.opponent();
    state
        .player(them)
        .cards()
        .filter(|c| c.text_applies() && c.location.in_play())
        .map(move |c| CardRef::new(them, c.index))
}

/// Resolve the special power of `who`'s card `index` and mark it used.
pub(crate) fn resolve_special(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
    index: u8,
) -> Result<()> {
    let Some(special) = state.design(who, index).map(|d| d.special) else {
        return Ok(());
    };
    let amount = usize::from(special.amount);
    let them = who.opponent();
    debug!(player = %who, card = index, category = ?special.category, "resolving special power");

    match special.category {
        SpecialCategory::Draw => {
            for _ in 0..amount {
                if state.draw(who).is_none() {
                    break;
                }
            }
        }
        SpecialCategory::Recycle => {
            let candidates = state
                .player(who)
                .at(Location::Discard)
                .map(|c| CardRef::new(who, c.index))
                .collect();
            let request = ChoiceRequest::exactly(
                who,
                ChoicePurpose::Recycle,
                candidates,
                amount,
                "Return cards from your discard pile to hand",
            );
            choose(state, seats, &request)?;
        }
        SpecialCategory::ForceDiscard => {
            let candidates = state.player(them).hand().map(|i| CardRef::new(them, i)).collect();
            let request = ChoiceRequest::exactly(
                them,
                ChoicePurpose::Discard,
                candidates,
                amount,
                "Discard cards from your hand",
            );
            choose(state, seats, &request)?;
        }
        SpecialCategory::Silence => {
            let candidates = silence_targets(state, who).collect();
            let request = ChoiceRequest::exactly(
                who,
                ChoicePurpose::Silence,
                candidates,
                amount,
                "Cancel the text of an opposing card",
            );
            choose(state, seats, &request)?;
        }
        SpecialCategory::Obligation | SpecialCategory::None => {}
    }

    if let Some(card) = state.card_mut(who, index) {
        card.used = true;
    }
    Ok(())
}

/// Opponent cards whose obligation `who` still has to meet this turn.
#[must_use]
pub fn pending_obligations(state: &GameState, who: PlayerId) -> Vec<u8> {
    let them = who.opponent();
    state
        .player(them)
        .cards()
        .filter(|c| c.text_applies() && !c.used && c.location.in_play())
        .filter(|c| {
            state
                .design(them, c.index)
                .is_some_and(|d| d.special.category == SpecialCategory::Obligation)
        })
        .map(|c| c.index)
        .collect()
}

fn satisfying_cards(state: &GameState, who: PlayerId, obligation: u8) -> Vec<CardRef> {
    let Some(mask) = state.design(who.opponent(), obligation).map(|d| d.special.mask) else {
        return Vec::new();
    };
    state
        .player(who)
        .hand()
        .filter(|&i| state.design(who, i).is_some_and(|d| mask.contains(d.card_type)))
        .map(|i| CardRef::new(who, i))
        .collect()
}

/// `who` holds a card that would satisfy the obligation.
#[must_use]
pub fn satisfy_possible(state: &GameState, who: PlayerId, obligation: u8) -> bool {
    !satisfying_cards(state, who, obligation).is_empty()
}

/// Whether `who` may satisfy the opponent's obligation card now.
#[must_use]
pub fn satisfy_legal(state: &GameState, who: PlayerId, obligation: u8) -> bool {
    acting(state, who)
        && state.player(who).phase <= Phase::Support
        && pending_obligations(state, who).contains(&obligation)
        && satisfy_possible(state, who, obligation)
}

/// Discard a matching card against the obligation.
pub(crate) fn satisfy(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
    obligation: u8,
) -> Result<()> {
    let candidates = satisfying_cards(state, who, obligation);
    let request = ChoiceRequest::exactly(
        who,
        ChoicePurpose::Satisfy { obligation },
        candidates,
        1,
        "Discard a card to meet an obligation",
    );
    choose(state, seats, &request)?;
    Ok(())
}

/// Meet every outstanding obligation before support ends.
///
/// Returns `false` when one cannot be met, in which case ending support
/// is not allowed.
pub fn check_end_support(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
) -> Result<bool> {
    for obligation in pending_obligations(state, who) {
        if !satisfy_possible(state, who, obligation) {
            return Ok(false);
        }
        satisfy(state, seats, who, obligation)?;
    }
    Ok(true)
}

/// Offer the opponent a chance to call `who`'s bluffs from this turn.
///
/// Called bluffs lacking the bluff icon for `element` are discarded. If
/// every called bluff holds up, the caller discards a card instead.
pub(crate) fn offer_bluff_call(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
    element: Element,
) -> Result<()> {
    let fresh: Vec<u8> = state
        .player(who)
        .cards()
        .filter(|c| c.bluff && c.fresh && !c.disclosed && c.location.in_play())
        .map(|c| c.index)
        .collect();
    if fresh.is_empty() {
        return Ok(());
    }

    let caller = who.opponent();
    let called = seats.seat(caller).call_bluff(state, caller);
    if state.player(caller).control == ControlKind::Interactive && !state.simulation {
        state.random_event = true;
    }
    if !called {
        return Ok(());
    }

    let mut caught = 0;
    for index in fresh {
        let honest = state
            .design(who, index)
            .is_some_and(|d| d.icons.bluffs(element));
        if honest {
            if let Some(card) = state.card_mut(who, index) {
                card.disclosed = true;
            }
        } else {
            state.move_card(who, index, Location::Discard);
            caught += 1;
        }
    }
    info!(caller = %caller, bluffer = %who, caught, "bluff called");

    if caught == 0 {
        let candidates = state.player(caller).hand().map(|i| CardRef::new(caller, i)).collect();
        let request = ChoiceRequest::exactly(
            caller,
            ChoicePurpose::BluffPenalty,
            candidates,
            1,
            "The bluff was good: discard a card",
        );
        choose(state, seats, &request)?;
    }
    Ok(())
}
