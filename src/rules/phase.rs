//! Turn structure and play legality.
//!
//! A turn moves through `Begin`, `Leader`, `Character`, `Support` and
//! `Retreat`. Each kind of play has a phase ceiling:
//!
//! | Play | Allowed while |
//! |------|---------------|
//! | Leadership / Influence | phase ≤ `Leader` |
//! | Character | phase ≤ `Character` |
//! | Support / Booster / bluff | a Character was played this turn, phase ≤ `Support` |
//! | retrieve, reveal bluff, land ship | phase = `Begin` |
//! | load ship | `Begin` ≤ phase ≤ `Support` |
//! | retreat | any phase of the turn |
//!
//! Playing a card raises the phase to at least the phase the card belongs
//! to, so the phase never decreases within a turn.

use crate::cards::{CardType, Design, Location, Restriction};
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase};

/// `who` may act right now: the game runs, it is their turn, and the turn
/// has begun.
#[must_use]
pub fn acting(state: &GameState, who: PlayerId) -> bool {
    !state.game_over
        && state.turn == who
        && (Phase::Begin..=Phase::Retreat).contains(&state.player(who).phase)
}

/// Phase a turn is in after playing a card of `card_type`.
#[must_use]
pub fn phase_after(card_type: CardType, current: Phase) -> Phase {
    let floor = match card_type {
        CardType::Leadership | CardType::Influence => Phase::Leader,
        CardType::Character | CardType::Support | CardType::Booster => Phase::Support,
    };
    current.max(floor)
}

/// The printed restriction of a design holds for `who`.
#[must_use]
pub fn restriction_met(state: &GameState, who: PlayerId, design: &Design) -> bool {
    match design.restriction {
        Restriction::None => true,
        Restriction::OpponentHasDragon => state.player(who.opponent()).dragons > 0,
        Restriction::FightNotStarted => state.fight_element.is_none(),
        Restriction::FightIn(element) => state.fight_element == Some(element),
    }
}

/// Support-phase plays are open to `who`.
#[must_use]
pub fn support_allowed(state: &GameState, who: PlayerId) -> bool {
    let player = state.player(who);
    acting(state, who) && player.char_played && player.phase <= Phase::Support
}

fn in_hand(state: &GameState, who: PlayerId, index: u8) -> bool {
    state
        .card(who, index)
        .is_some_and(|c| c.location == Location::Hand)
}

/// Whether `who` may play card `index` from hand face up.
#[must_use]
pub fn is_legal(state: &GameState, who: PlayerId, index: u8) -> bool {
    if !acting(state, who) || !in_hand(state, who, index) {
        return false;
    }
    let Some(design) = state.design(who, index) else {
        return false;
    };
    let phase = state.player(who).phase;
    let window = match design.card_type {
        CardType::Leadership | CardType::Influence => phase <= Phase::Leader,
        CardType::Character => phase <= Phase::Character,
        CardType::Support | CardType::Booster => support_allowed(state, who),
    };
    window && restriction_met(state, who, design)
}

/// Whether `who` may play card `index` face down.
#[must_use]
pub fn bluff_legal(state: &GameState, who: PlayerId, index: u8) -> bool {
    support_allowed(state, who)
        && in_hand(state, who, index)
        && state.design(who, index).is_some_and(|d| d.icons.can_bluff())
        && state.player(who).bluffs_in_play() < state.rules.max_bluffs
}

/// Whether `who` may load card `index` onto their ship `ship`.
#[must_use]
pub fn load_legal(state: &GameState, who: PlayerId, index: u8, ship: u8) -> bool {
    if !acting(state, who) || state.player(who).phase > Phase::Support || index == ship {
        return false;
    }
    let loadable = state.design(who, index).is_some_and(|d| {
        matches!(d.card_type, CardType::Character | CardType::Booster | CardType::Support)
    });
    loadable && in_hand(state, who, index) && ship_has_room(state, who, ship)
}

fn ship_has_room(state: &GameState, who: PlayerId, ship: u8) -> bool {
    let (Some(card), Some(design)) = (state.card(who, ship), state.design(who, ship)) else {
        return false;
    };
    design.is_ship()
        && card.active
        && card.location == Location::Support
        && !card.landed
        && state.player(who).cargo(ship).count() < usize::from(design.capacity)
}

/// Whether `who` may land their loaded ship `ship`.
#[must_use]
pub fn land_legal(state: &GameState, who: PlayerId, ship: u8) -> bool {
    let is_ship = state.design(who, ship).is_some_and(Design::is_ship);
    let ready = state
        .card(who, ship)
        .is_some_and(|c| c.active && c.location == Location::Support && !c.landed);
    acting(state, who)
        && state.player(who).phase == Phase::Begin
        && is_ship
        && ready
        && state.player(who).cargo(ship).next().is_some()
}

/// Whether `who` may take their played Support card `index` back to hand.
#[must_use]
pub fn retrieve_legal(state: &GameState, who: PlayerId, index: u8) -> bool {
    let is_support = state
        .design(who, index)
        .is_some_and(|d| d.card_type == CardType::Support);
    let placed = state.card(who, index).is_some_and(|c| {
        c.active && !c.bluff && c.location == Location::Support && c.loaded_on.is_none()
    });
    acting(state, who) && state.player(who).phase == Phase::Begin && is_support && placed
}

/// Whether `who` may turn over their face-down bluff `index`.
#[must_use]
pub fn reveal_legal(state: &GameState, who: PlayerId, index: u8) -> bool {
    acting(state, who)
        && state.player(who).phase == Phase::Begin
        && state
            .card(who, index)
            .is_some_and(|c| c.bluff && c.location.in_play())
}

/// Whether `who` may move explicitly to `target`.
#[must_use]
pub fn advance_legal(state: &GameState, who: PlayerId, target: Phase) -> bool {
    acting(state, who)
        && (Phase::Leader..=Phase::Retreat).contains(&target)
        && target > state.player(who).phase
}

/// Retreat is open for the whole turn.
#[must_use]
pub fn retreat_legal(state: &GameState, who: PlayerId) -> bool {
    acting(state, who)
}
