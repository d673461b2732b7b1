//! Combat resolution: power, announcing, retreating, dragons and crystals.
//!
//! ## Power
//!
//! A player's power in an element is the sum over their active cards in
//! play of the printed value in that element, with face-down bluffs worth
//! `PowerRule::bluff_value`. Before the fight element is fixed the power of
//! a player is 0.
//!
//! ## Announcing
//!
//! Announcing element E is legal when all of these hold:
//!
//! 1. a Character was played this turn;
//! 2. no element is fixed yet, or E is the fixed element and either own
//!    power ≥ opponent power or an active shield for E is in play;
//! 3. a simulation copy, with the announcing seat run by the autonomous
//!    controller, can end support without leaving an obligation unmet.

use tracing::{debug, info};

use super::effects::{check_end_support, offer_bluff_call};
use super::engine::Outcome;
use super::phase::support_allowed;
use crate::cards::{CardType, Element, Location};
use crate::control::{ControlKind, SeatMap, StandIns};
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// Power of `who` in the current fight element; 0 before it is fixed.
#[must_use]
pub fn compute_power(state: &GameState, who: PlayerId) -> i32 {
    state
        .fight_element
        .map_or(0, |element| power_in(state, who, element))
}

/// Power `who` would have in `element`.
#[must_use]
pub fn power_in(state: &GameState, who: PlayerId, element: Element) -> i32 {
    let rule = state.rules.power;
    state
        .player(who)
        .cards()
        .filter(|c| c.active && c.location.in_play())
        .map(|card| {
            if card.bluff {
                return rule.bluff_value;
            }
            let value = state.design(who, card.index).map_or(0, |d| d.value(element));
            match card.location {
                Location::Combat => value,
                _ if rule.count_support => value,
                _ => 0,
            }
        })
        .sum()
}

/// `who` has an active shield icon for `element` in play.
#[must_use]
pub fn has_shield(state: &GameState, who: PlayerId, element: Element) -> bool {
    state
        .player(who)
        .cards()
        .any(|c| c.active && !c.bluff && c.location.in_play() && c.icons.shields(element))
}

/// Own power matches the opponent's, or a shield covers the gap.
#[must_use]
pub fn power_holds(state: &GameState, who: PlayerId, element: Element) -> bool {
    power_in(state, who, element) >= power_in(state, who.opponent(), element)
        || has_shield(state, who, element)
}

/// The cheap part of announce legality: everything but the forecast.
#[must_use]
pub fn announce_allowed(state: &GameState, who: PlayerId, element: Element) -> bool {
    if !support_allowed(state, who) {
        return false;
    }
    match state.fight_element {
        None => true,
        Some(fixed) => fixed == element && power_holds(state, who, fixed),
    }
}

/// Full announce legality, including the end-of-support forecast.
#[must_use]
pub fn announce_legal(state: &GameState, who: PlayerId, element: Element) -> bool {
    announce_allowed(state, who, element) && forecast_end_support(state, who)
}

/// Would ending support now succeed?
///
/// Runs on a simulation copy with `who` seated as autonomous; the canonical
/// state is not touched.
#[must_use]
pub fn forecast_end_support(state: &GameState, who: PlayerId) -> bool {
    let mut sim = state.fork_simulation();
    sim.set_control(who, ControlKind::Autonomous);
    let mut stand_ins = StandIns::default();
    check_end_support(&mut sim, &mut stand_ins, who).unwrap_or(false)
}

/// End support and announce. Legality must have been checked.
pub(crate) fn announce(
    state: &mut GameState,
    seats: &mut dyn SeatMap,
    who: PlayerId,
    element: Element,
) -> Result<Outcome> {
    if !check_end_support(state, seats, who)? {
        info!(player = %who, "obligation unmet at announce, forced to retreat");
        return Ok(retreat(state, who));
    }
    offer_bluff_call(state, seats, who, element)?;

    let was_fixed = state.fight_element.is_some();
    if !was_fixed {
        state.fight_element = Some(element);
        state.fight_started = true;
    }
    if was_fixed && !power_holds(state, who, element) {
        info!(player = %who, "power fell short after bluff call, forced to retreat");
        return Ok(retreat(state, who));
    }

    debug!(
        player = %who,
        ?element,
        power = power_in(state, who, element),
        opposing = power_in(state, who.opponent(), element),
        "announced"
    );
    state.refill(who);
    state.pass_turn();
    Ok(Outcome::TurnEnded)
}

/// Give up the fight. Legality must have been checked.
pub(crate) fn retreat(state: &mut GameState, who: PlayerId) -> Outcome {
    let winner = who.opponent();
    if state.fight_started {
        let routed = state.player(who).cards_in_play() <= state.rules.rout_threshold;
        let dragons = if routed { 2 } else { 1 };
        info!(loser = %who, winner = %winner, dragons, "fight lost by retreat");
        award_dragons(state, winner, dragons);
    }

    clear_fight(state);
    if state.game_over {
        return Outcome::GameOver;
    }
    state.refill(who);
    state.pass_turn();
    Outcome::TurnEnded
}

/// Discard the fight display of both players.
///
/// Leadership and Influence cards stay in play, as does ship cargo.
fn clear_fight(state: &mut GameState) {
    for who in PlayerId::both() {
        let leaving: Vec<u8> = state
            .player(who)
            .cards()
            .filter(|c| c.location.in_play() && c.loaded_on.is_none())
            .filter(|c| {
                c.bluff
                    || !c.active
                    || state
                        .design(who, c.index)
                        .is_some_and(|d| !d.card_type.is_leadership())
            })
            .map(|c| c.index)
            .collect();
        for index in leaving {
            state.move_card(who, index, Location::Discard);
        }
        state.player_mut(who).char_played = false;
    }
    state.fight_started = false;
    state.fight_element = None;
}

/// Move dragons to `winner`: first from the loser, then from the pool.
fn award_dragons(state: &mut GameState, winner: PlayerId, count: u8) {
    let total = state.rules.dragons_to_win;
    for _ in 0..count {
        let pool = total
            .saturating_sub(state.player(winner).dragons)
            .saturating_sub(state.player(winner.opponent()).dragons);
        if state.player(winner.opponent()).dragons > 0 {
            state.player_mut(winner.opponent()).dragons -= 1;
        } else if pool == 0 {
            break;
        }
        state.player_mut(winner).dragons += 1;
    }
    if state.player(winner).dragons >= total {
        finish_game(state, Some(winner));
    }
}

/// End the match and score crystals for dragons held.
///
/// `instant` is the player who took every dragon, if any; they score the
/// top entry of the crystal table whatever the dragon count.
pub(crate) fn finish_game(state: &mut GameState, instant: Option<PlayerId>) {
    let top = state.rules.crystals[state.rules.crystals.len() - 1];
    for who in PlayerId::both() {
        let crystals = if instant == Some(who) {
            top
        } else {
            state.rules.crystals_for(state.player(who).dragons)
        };
        state.player_mut(who).crystals = crystals;
    }
    let [first, second] = [PlayerId::new(0), PlayerId::new(1)].map(|p| state.player(p).dragons);
    state.winner = match first.cmp(&second) {
        std::cmp::Ordering::Greater => Some(PlayerId::new(0)),
        std::cmp::Ordering::Less => Some(PlayerId::new(1)),
        std::cmp::Ordering::Equal => None,
    };
    state.game_over = true;
    let crystals: Vec<u32> = PlayerId::both().map(|p| state.player(p).crystals).collect();
    info!(
        winner = ?state.winner,
        ?crystals,
        instant = instant.is_some(),
        "game over"
    );
}

/// Cards of `card_type` that `who` holds active in combat.
pub(crate) fn active_in_combat(state: &GameState, who: PlayerId, card_type: CardType) -> Vec<u8> {
    state
        .player(who)
        .at(Location::Combat)
        .filter(|c| c.active)
        .filter(|c| state.design(who, c.index).is_some_and(|d| d.card_type == card_type))
        .map(|c| c.index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{Catalog, PeopleId};
    use crate::core::{MatchSetup, Phase, RulesConfig};

    fn state() -> GameState {
        let setup = MatchSetup::new(PeopleId::new(0), PeopleId::new(1), 5);
        GameState::new(Arc::new(Catalog::standard()), &setup, RulesConfig::default()).unwrap()
    }

    fn place(state: &mut GameState, who: PlayerId, index: u8, location: Location) {
        state.stage_in_hand(who, index);
        state.move_card(who, index, location);
        state.card_mut(who, index).unwrap().active = true;
    }

    #[test]
    fn test_power_zero_before_element() {
        let mut state = state();
        let me = PlayerId::new(0);
        place(&mut state, me, 3, Location::Combat);

        assert_eq!(compute_power(&state, me), 0);
        assert!(power_in(&state, me, Element::Fire) > 0);
    }

    #[test]
    fn test_power_sums_active_cards_and_bluffs() {
        let mut state = state();
        let me = PlayerId::new(0);
        place(&mut state, me, 3, Location::Combat); // Hoax Scout: fire 1, earth 3
        place(&mut state, me, 17, Location::Combat); // Hoax Blade: fire 1
        place(&mut state, me, 18, Location::Support);
        state.card_mut(me, 18).unwrap().bluff = true;
        state.fight_element = Some(Element::Fire);

        assert_eq!(compute_power(&state, me), 1 + 1 + 2);

        state.card_mut(me, 17).unwrap().active = false;
        assert_eq!(compute_power(&state, me), 1 + 2);
    }

    #[test]
    fn test_count_support_rule() {
        let mut state = state();
        let me = PlayerId::new(0);
        place(&mut state, me, 25, Location::Support); // Hoax Well: fire 2
        state.fight_element = Some(Element::Fire);
        assert_eq!(compute_power(&state, me), 2);

        state.rules.power.count_support = false;
        assert_eq!(compute_power(&state, me), 0);
    }

    #[test]
    fn test_shield_ignores_silenced_and_bluffs() {
        let mut state = state();
        let me = PlayerId::new(0);
        place(&mut state, me, 23, Location::Support); // Banner: fire shield
        assert!(has_shield(&state, me, Element::Fire));
        assert!(!has_shield(&state, me, Element::Earth));

        state.card_mut(me, 23).unwrap().bluff = true;
        assert!(!has_shield(&state, me, Element::Fire));
    }

    #[test]
    fn test_retreat_awards_dragons_and_clears_fight() {
        let mut state = state();
        let me = PlayerId::new(0);
        state.player_mut(me).phase = Phase::Support;
        place(&mut state, me, 0, Location::Support); // Leadership stays
        place(&mut state, me, 3, Location::Combat);
        state.fight_started = true;
        state.fight_element = Some(Element::Earth);

        let outcome = retreat(&mut state, me);

        assert_eq!(outcome, Outcome::TurnEnded);
        assert_eq!(state.player(me.opponent()).dragons, 2);
        assert_eq!(state.card(me, 3).unwrap().location, Location::Discard);
        assert_eq!(state.card(me, 0).unwrap().location, Location::Support);
        assert!(!state.fight_started);
        assert_eq!(state.fight_element, None);
        assert_eq!(state.turn, me.opponent());
    }

    #[test]
    fn test_dragons_move_from_loser_first() {
        let mut state = state();
        let me = PlayerId::new(0);
        state.player_mut(me).dragons = 1;

        award_dragons(&mut state, me.opponent(), 1);

        assert_eq!(state.player(me).dragons, 0);
        assert_eq!(state.player(me.opponent()).dragons, 1);
        assert!(!state.game_over);
    }

    #[test]
    fn test_all_dragons_win_instantly() {
        let mut state = state();
        let winner = PlayerId::new(1);
        state.player_mut(winner).dragons = 2;

        award_dragons(&mut state, winner, 2);

        assert!(state.game_over);
        assert_eq!(state.winner, Some(winner));
        assert_eq!(state.player(winner).dragons, 3);
        assert_eq!(state.player(winner).crystals, 4);
        assert_eq!(state.player(winner.opponent()).crystals, 0);
    }

    #[test]
    fn test_instant_win_scores_top_crystals_with_fewer_dragons() {
        let mut state = state();
        state.rules = RulesConfig::default().with_dragons_to_win(2);
        let winner = PlayerId::new(0);

        award_dragons(&mut state, winner, 2);

        assert!(state.game_over);
        assert_eq!(state.winner, Some(winner));
        assert_eq!(state.player(winner).dragons, 2);
        assert_eq!(state.player(winner).crystals, 4);
    }

    #[test]
    fn test_running_out_scores_by_dragons_held() {
        let mut state = state();
        state.player_mut(PlayerId::new(0)).dragons = 2;

        finish_game(&mut state, None);

        assert_eq!(state.winner, Some(PlayerId::new(0)));
        assert_eq!(state.player(PlayerId::new(0)).crystals, 2);
        assert_eq!(state.player(PlayerId::new(1)).crystals, 0);
    }
}
