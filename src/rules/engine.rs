//! Action dispatch.
//!
//! [`apply`] is the single entry point for mutating a game: it re-checks
//! legality, refuses illegal actions without touching the state, and then
//! carries the action out, consulting controllers through the seat map
//! wherever a player has to decide something.
//!
//! [`start_turn`] moves the player to act from `Start` to `Begin`, and
//! [`legal_actions`] enumerates everything the player to act may do.

use tracing::debug;

use super::combat::{self, active_in_combat};
use super::effects::{self, special_usable};
use super::phase::{self, phase_after};
use crate::cards::{CardType, Element, Location, Timing};
use crate::control::SeatMap;
use crate::core::action::Action;
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase};
use crate::core::FightStart;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Winner(PlayerId),
    /// Equal dragons when the cards ran out.
    Draw,
}

impl GameResult {
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// `Some(result)` once the game has ended.
#[must_use]
pub fn result(state: &GameState) -> Option<GameResult> {
    state
        .game_over
        .then(|| state.winner.map_or(GameResult::Draw, GameResult::Winner))
}

/// What applying an action did to the flow of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Same player keeps acting.
    Continue,
    /// The turn passed to the opponent.
    TurnEnded,
    GameOver,
}

/// Begin the turn of the player to act.
///
/// Clears per-turn flags on both sides. A player who starts a turn with no
/// cards in hand or draw pile ends the game.
pub fn start_turn(state: &mut GameState) -> Outcome {
    if state.game_over {
        return Outcome::GameOver;
    }
    let who = state.turn;
    if state.player(who).phase != Phase::Start {
        return Outcome::Continue;
    }

    for side in PlayerId::both() {
        let indices: Vec<u8> = state.player(side).cards().map(|c| c.index).collect();
        for index in indices {
            if let Some(card) = state.card_mut(side, index) {
                card.used = false;
                card.fresh = false;
            }
        }
    }

    let player = state.player(who);
    if player.count(Location::Hand) == 0 && player.draw_pile_len() == 0 {
        debug!(player = %who, "out of cards");
        combat::finish_game(state, None);
        return Outcome::GameOver;
    }

    let player = state.player_mut(who);
    player.char_played = false;
    player.phase = Phase::Begin;
    debug!(player = %who, turn = state.turn_number, "turn begins");
    Outcome::Continue
}

/// Whether `who` may take `action` now.
#[must_use]
pub fn is_action_legal(state: &GameState, who: PlayerId, action: &Action) -> bool {
    match *action {
        Action::Advance(target) => phase::advance_legal(state, who, target),
        Action::Play { card, no_effect } => {
            phase::is_legal(state, who, card)
                && (!no_effect || state.design(who, card).is_some_and(|d| !d.special.is_none()))
        }
        Action::Bluff { card } => phase::bluff_legal(state, who, card),
        Action::Load { card, ship } => phase::load_legal(state, who, card, ship),
        Action::Land { ship } => phase::land_legal(state, who, ship),
        Action::Retrieve { card } => phase::retrieve_legal(state, who, card),
        Action::RevealBluff { card } => phase::reveal_legal(state, who, card),
        Action::UseSpecial { card } => special_usable(state, who, card),
        Action::Satisfy { card } => effects::satisfy_legal(state, who, card),
        Action::Announce(element) => combat::announce_legal(state, who, element),
        Action::Retreat => phase::retreat_legal(state, who),
    }
}

/// Every action `who` may take now.
#[must_use]
pub fn legal_actions(state: &GameState, who: PlayerId) -> Vec<Action> {
    let mut actions = Vec::new();
    if !phase::acting(state, who) {
        return actions;
    }

    let hand: Vec<u8> = state.player(who).hand().collect();
    let ships: Vec<u8> = state
        .player(who)
        .cards()
        .filter(|c| c.location == Location::Support && c.active)
        .filter(|c| state.design(who, c.index).is_some_and(|d| d.is_ship()))
        .map(|c| c.index)
        .collect();

    for &card in &hand {
        for no_effect in [false, true] {
            let action = Action::Play { card, no_effect };
            if is_action_legal(state, who, &action) {
                actions.push(action);
            }
        }
        if phase::bluff_legal(state, who, card) {
            actions.push(Action::Bluff { card });
        }
        for &ship in &ships {
            if phase::load_legal(state, who, card, ship) {
                actions.push(Action::Load { card, ship });
            }
        }
    }

    for card in state.player(who).cards().filter(|c| c.location.in_play()) {
        let index = card.index;
        if phase::land_legal(state, who, index) {
            actions.push(Action::Land { ship: index });
        }
        if phase::retrieve_legal(state, who, index) {
            actions.push(Action::Retrieve { card: index });
        }
        if phase::reveal_legal(state, who, index) {
            actions.push(Action::RevealBluff { card: index });
        }
        if special_usable(state, who, index) {
            actions.push(Action::UseSpecial { card: index });
        }
    }

    for obligation in effects::pending_obligations(state, who) {
        if effects::satisfy_legal(state, who, obligation) {
            actions.push(Action::Satisfy { card: obligation });
        }
    }

    for element in Element::BOTH {
        if combat::announce_legal(state, who, element) {
            actions.push(Action::Announce(element));
        }
    }

    for target in [Phase::Leader, Phase::Character, Phase::Support, Phase::Retreat] {
        if phase::advance_legal(state, who, target) {
            actions.push(Action::Advance(target));
        }
    }

    actions.push(Action::Retreat);
    actions
}

/// Apply `who`'s action.
///
/// Illegal actions are refused with `EngineError::IllegalAction` and leave
/// the state unchanged. Controller failures during the action (a rejected
/// selection) may leave it partially applied; the host applies actions to
/// a working copy and commits only on success.
pub fn apply(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
    action: &Action,
) -> Result<Outcome> {
    if !is_action_legal(state, who, action) {
        return Err(EngineError::IllegalAction { player: who, action: *action });
    }
    debug!(player = %who, %action, simulation = state.simulation, "applying action");
    state.record(who, *action);

    let outcome = match *action {
        Action::Advance(target) => {
            state.player_mut(who).phase = target;
            Outcome::Continue
        }
        Action::Play { card, no_effect } => {
            play(state, seats, who, card, no_effect)?;
            Outcome::Continue
        }
        Action::Bluff { card } => {
            state.move_card(who, card, Location::Support);
            if let Some(c) = state.card_mut(who, card) {
                c.active = true;
                c.bluff = true;
                c.fresh = true;
                c.disclosed = false;
            }
            raise_phase(state, who, Phase::Support);
            Outcome::Continue
        }
        Action::Load { card, ship } => {
            state.move_card(who, card, Location::Support);
            if let Some(c) = state.card_mut(who, card) {
                c.active = false;
                c.loaded_on = Some(ship);
                c.fresh = true;
                c.disclosed = false;
            }
            raise_phase(state, who, Phase::Support);
            Outcome::Continue
        }
        Action::Land { ship } => {
            let cargo: Vec<u8> = state.player(who).cargo(ship).map(|c| c.index).collect();
            if let Some(c) = state.card_mut(who, ship) {
                c.landed = true;
            }
            for index in cargo {
                state.move_card(who, index, Location::Hand);
            }
            Outcome::Continue
        }
        Action::Retrieve { card } => {
            state.move_card(who, card, Location::Hand);
            Outcome::Continue
        }
        Action::RevealBluff { card } => {
            state.move_card(who, card, Location::Discard);
            Outcome::Continue
        }
        Action::UseSpecial { card } => {
            effects::resolve_special(state, seats, who, card)?;
            Outcome::Continue
        }
        Action::Satisfy { card } => {
            effects::satisfy(state, seats, who, card)?;
            Outcome::Continue
        }
        Action::Announce(element) => combat::announce(state, seats, who, element)?,
        Action::Retreat => combat::retreat(state, who),
    };

    Ok(if state.game_over { Outcome::GameOver } else { outcome })
}

fn raise_phase(state: &mut GameState, who: PlayerId, floor: Phase) {
    let player = state.player_mut(who);
    player.phase = player.phase.max(floor);
}

fn play(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
    card: u8,
    no_effect: bool,
) -> Result<()> {
    let Some(design) = state.design(who, card) else {
        return Ok(());
    };
    let card_type = design.card_type;
    let resolves_now = design.special.timing == Timing::OnPlay && !design.special.is_none();

    match card_type {
        CardType::Leadership => {
            if let Some(previous) = state.player(who).last_leader {
                state.move_card(who, previous, Location::Discard);
            }
            state.move_card(who, card, Location::Support);
            state.player_mut(who).last_leader = Some(card);
        }
        CardType::Influence | CardType::Support => {
            state.move_card(who, card, Location::Support);
        }
        CardType::Character => {
            for covered in active_in_combat(state, who, CardType::Character)
                .into_iter()
                .chain(active_in_combat(state, who, CardType::Booster))
            {
                if let Some(c) = state.card_mut(who, covered) {
                    c.active = false;
                }
            }
            state.move_card(who, card, Location::Combat);
            state.player_mut(who).char_played = true;
            if state.rules.fight_start == FightStart::OnCharacter {
                state.fight_started = true;
            }
        }
        CardType::Booster => {
            state.move_card(who, card, Location::Combat);
        }
    }

    if let Some(c) = state.card_mut(who, card) {
        c.active = true;
        c.fresh = true;
        c.disclosed = true;
        c.text_ignored = no_effect;
    }
    let current = state.player(who).phase;
    raise_phase(state, who, phase_after(card_type, current));

    if resolves_now && !no_effect {
        effects::resolve_special(state, seats, who, card)?;
    }
    Ok(())
}
