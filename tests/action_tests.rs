//! Per-action integration tests.
//!
//! Ships, Begin-phase actions, special powers and declined text, each
//! driven through `apply` on a small fixed catalog.

use std::sync::Arc;

use bluemoon::cards::{
    CardType, Catalog, Design, Element, Icons, Location, PeopleId, Special, SpecialCategory, Timing,
};
use bluemoon::control::{ControlKind, Controller, Seats};
use bluemoon::core::{Action, EngineError, GameState, MatchSetup, Phase, PlayerId, RulesConfig};
use bluemoon::rules::{
    apply, is_action_legal, is_legal, power_in, start_turn, ChoiceRequest, Outcome, Selection,
    Validator,
};

const CHIEF: u8 = 0;
const ELDER: u8 = 1;
const ARK: u8 = 2;
const RAIDER: u8 = 3;
const SCOUT: u8 = 4;
const HOOK: u8 = 5;
const WELL: u8 = 6;
const CRATE: u8 = 7;
const DRUM: u8 = 8;

const GUARD: u8 = 0;

const A: PlayerId = PlayerId::new(0);
const B: PlayerId = PlayerId::new(1);

/// Never calls bluffs, takes the first candidates of every choice.
struct Passive;

impl Controller for Passive {
    fn kind(&self) -> ControlKind {
        ControlKind::Autonomous
    }

    fn choose(&mut self, _: &GameState, request: &ChoiceRequest, _: &Validator<'_>) -> Selection {
        request.candidates.iter().take(request.min).copied().collect()
    }

    fn call_bluff(&mut self, _: &GameState, _: PlayerId) -> bool {
        false
    }

    fn take_action(&mut self, _: &GameState, _: PlayerId) -> Action {
        Action::Retreat
    }
}

fn catalog() -> Arc<Catalog> {
    let mut builder = Catalog::builder();
    let alpha = builder.people("Alpha");
    let beta = builder.people("Beta");
    builder
        .add(Design::new(alpha, CHIEF, "Chief", CardType::Leadership))
        .add(Design::new(alpha, ELDER, "Elder", CardType::Leadership))
        .add(Design::new(alpha, ARK, "Ark", CardType::Influence).with_capacity(2))
        .add(Design::new(alpha, RAIDER, "Raider", CardType::Character).with_values(2, 0))
        .add(Design::new(alpha, SCOUT, "Scout", CardType::Character).with_values(1, 1))
        .add(
            Design::new(alpha, HOOK, "Hook", CardType::Character)
                .with_values(1, 0)
                .with_special(Special::new(SpecialCategory::ForceDiscard, 1, Timing::OnPlay)),
        )
        .add(
            Design::new(alpha, WELL, "Well", CardType::Support)
                .with_values(1, 0)
                .with_special(Special::new(SpecialCategory::Draw, 1, Timing::MyTurn)),
        )
        .add(
            Design::new(alpha, CRATE, "Crate", CardType::Support)
                .with_special(Special::new(SpecialCategory::Recycle, 1, Timing::MyTurn)),
        )
        .add(
            Design::new(alpha, DRUM, "Drum", CardType::Booster)
                .with_values(1, 0)
                .with_icons(Icons::FIRE_BLUFF),
        );
    for index in 9..12 {
        builder.add(Design::new(alpha, index, "Pebble", CardType::Booster));
    }
    builder.add(Design::new(beta, GUARD, "Guard", CardType::Character).with_values(5, 0));
    for index in 1..8 {
        builder.add(Design::new(beta, index, "Reed", CardType::Booster).with_values(0, 1));
    }
    Arc::new(builder.build().unwrap())
}

/// A fresh match with `staged` of Alpha's cards in hand.
fn deal(rules: RulesConfig, staged: &[u8]) -> (GameState, Seats) {
    let catalog = catalog();
    let setup = MatchSetup::new(PeopleId::new(0), PeopleId::new(1), 2718);
    let mut state = GameState::new(catalog, &setup, rules).unwrap();
    for &index in staged {
        state.stage_in_hand(A, index);
    }
    state.stage_in_hand(B, GUARD);
    (state, Seats::new(Box::new(Passive), Box::new(Passive)))
}

fn play(state: &mut GameState, seats: &mut Seats, who: PlayerId, card: u8) {
    let action = Action::Play { card, no_effect: false };
    assert_eq!(apply(state, seats, who, &action), Ok(Outcome::Continue), "{action}");
}

/// The action is refused and nothing changes.
fn refused(state: &mut GameState, seats: &mut Seats, who: PlayerId, action: Action) {
    let before = state.clone();
    let err = apply(state, seats, who, &action).unwrap_err();
    assert_eq!(err, EngineError::IllegalAction { player: who, action });
    assert_eq!(*state, before);
}

fn location(state: &GameState, who: PlayerId, index: u8) -> Location {
    state.card(who, index).unwrap().location
}

// =============================================================================
// Ships
// =============================================================================

#[test]
fn test_load_closes_early_windows_then_land_returns_cargo() {
    let (mut state, mut seats) = deal(RulesConfig::default(), &[ARK, RAIDER, CHIEF, SCOUT]);
    start_turn(&mut state);

    play(&mut state, &mut seats, A, ARK);
    assert_eq!(state.player(A).phase, Phase::Leader);
    refused(&mut state, &mut seats, A, Action::Load { card: CHIEF, ship: ARK });
    refused(&mut state, &mut seats, A, Action::Land { ship: ARK });

    apply(&mut state, &mut seats, A, &Action::Load { card: RAIDER, ship: ARK }).unwrap();

    assert_eq!(state.player(A).phase, Phase::Support);
    assert!(!is_legal(&state, A, CHIEF));
    assert!(!is_legal(&state, A, SCOUT));
    let cargo = state.card(A, RAIDER).unwrap();
    assert_eq!(cargo.location, Location::Support);
    assert_eq!(cargo.loaded_on, Some(ARK));
    assert!(!cargo.active);
    assert_eq!(power_in(&state, A, Element::Fire), 0);

    // Cargo rides out the turn end on its ship.
    apply(&mut state, &mut seats, A, &Action::Retreat).unwrap();
    assert_eq!(location(&state, A, ARK), Location::Support);
    assert_eq!(state.card(A, RAIDER).unwrap().loaded_on, Some(ARK));

    start_turn(&mut state);
    apply(&mut state, &mut seats, B, &Action::Retreat).unwrap();
    start_turn(&mut state);
    assert_eq!(state.player(A).phase, Phase::Begin);

    apply(&mut state, &mut seats, A, &Action::Land { ship: ARK }).unwrap();

    let landed = state.card(A, RAIDER).unwrap();
    assert_eq!(landed.location, Location::Hand);
    assert_eq!(landed.loaded_on, None);
    assert!(state.card(A, ARK).unwrap().landed);
    refused(&mut state, &mut seats, A, Action::Land { ship: ARK });
    refused(&mut state, &mut seats, A, Action::Load { card: SCOUT, ship: ARK });
}

// =============================================================================
// Begin phase
// =============================================================================

#[test]
fn test_retrieve_and_reveal_only_in_begin() {
    let (mut state, mut seats) = deal(RulesConfig::default(), &[RAIDER, WELL, DRUM]);
    start_turn(&mut state);
    refused(&mut state, &mut seats, A, Action::Retrieve { card: WELL });

    play(&mut state, &mut seats, A, RAIDER);
    play(&mut state, &mut seats, A, WELL);
    apply(&mut state, &mut seats, A, &Action::Bluff { card: DRUM }).unwrap();
    refused(&mut state, &mut seats, A, Action::Retrieve { card: WELL });
    refused(&mut state, &mut seats, A, Action::RevealBluff { card: DRUM });

    // Raider 2, Well 1, a bluff 2.
    assert_eq!(power_in(&state, A, Element::Fire), 5);
    let outcome = apply(&mut state, &mut seats, A, &Action::Announce(Element::Fire)).unwrap();
    assert_eq!(outcome, Outcome::TurnEnded);

    start_turn(&mut state);
    play(&mut state, &mut seats, B, GUARD);
    assert_eq!(power_in(&state, B, Element::Fire), 5);
    apply(&mut state, &mut seats, B, &Action::Announce(Element::Fire)).unwrap();

    start_turn(&mut state);
    apply(&mut state, &mut seats, A, &Action::Retrieve { card: WELL }).unwrap();
    apply(&mut state, &mut seats, A, &Action::RevealBluff { card: DRUM }).unwrap();

    assert_eq!(location(&state, A, WELL), Location::Hand);
    assert_eq!(location(&state, A, DRUM), Location::Discard);
    assert_eq!(power_in(&state, A, Element::Fire), 2);
    refused(&mut state, &mut seats, A, Action::Retrieve { card: WELL });
    refused(&mut state, &mut seats, A, Action::RevealBluff { card: DRUM });
}

// =============================================================================
// Special powers
// =============================================================================

#[test]
fn test_draw_power_once_per_turn() {
    let (mut state, mut seats) = deal(RulesConfig::default(), &[RAIDER, WELL]);
    start_turn(&mut state);
    refused(&mut state, &mut seats, A, Action::UseSpecial { card: WELL });

    play(&mut state, &mut seats, A, RAIDER);
    play(&mut state, &mut seats, A, WELL);
    let hand = state.player(A).count(Location::Hand);
    let pile = state.player(A).draw_pile_len();
    assert!(pile > 0);

    apply(&mut state, &mut seats, A, &Action::UseSpecial { card: WELL }).unwrap();

    assert_eq!(state.player(A).count(Location::Hand), hand + 1);
    assert_eq!(state.player(A).draw_pile_len(), pile - 1);
    assert!(state.card(A, WELL).unwrap().used);
    refused(&mut state, &mut seats, A, Action::UseSpecial { card: WELL });
}

#[test]
fn test_force_discard_on_play_and_declined_text() {
    let (mut state, mut seats) = deal(RulesConfig::default(), &[HOOK, RAIDER]);
    start_turn(&mut state);
    let held = state.player(B).count(Location::Hand);
    let declined = state.clone();

    // Only cards with text can be played without it.
    refused(&mut state, &mut seats, A, Action::Play { card: RAIDER, no_effect: true });

    play(&mut state, &mut seats, A, HOOK);
    assert_eq!(state.player(B).count(Location::Hand), held - 1);
    assert_eq!(state.player(B).count(Location::Discard), 1);

    let mut state = declined;
    apply(&mut state, &mut seats, A, &Action::Play { card: HOOK, no_effect: true }).unwrap();

    let hook = state.card(A, HOOK).unwrap();
    assert_eq!(hook.location, Location::Combat);
    assert!(hook.text_ignored);
    assert!(state.player(A).char_played);
    assert_eq!(state.player(B).count(Location::Hand), held);
    assert_eq!(state.player(B).count(Location::Discard), 0);
}

#[test]
fn test_recycle_returns_a_discarded_card() {
    let (mut state, mut seats) = deal(RulesConfig::default(), &[CHIEF, ELDER, RAIDER, CRATE]);
    start_turn(&mut state);

    play(&mut state, &mut seats, A, CHIEF);
    play(&mut state, &mut seats, A, ELDER);
    assert_eq!(location(&state, A, CHIEF), Location::Discard);
    play(&mut state, &mut seats, A, RAIDER);
    play(&mut state, &mut seats, A, CRATE);

    apply(&mut state, &mut seats, A, &Action::UseSpecial { card: CRATE }).unwrap();

    assert_eq!(location(&state, A, CHIEF), Location::Hand);
    assert_eq!(state.player(A).count(Location::Discard), 0);
    assert!(state.card(A, CRATE).unwrap().used);
}

// =============================================================================
// Dragons
// =============================================================================

#[test]
fn test_rout_in_a_two_dragon_game_scores_top_crystals() {
    let rules = RulesConfig::default().with_dragons_to_win(2);
    let (mut state, mut seats) = deal(rules, &[RAIDER]);
    start_turn(&mut state);
    play(&mut state, &mut seats, A, RAIDER);
    apply(&mut state, &mut seats, A, &Action::Announce(Element::Fire)).unwrap();

    start_turn(&mut state);
    let outcome = apply(&mut state, &mut seats, B, &Action::Retreat).unwrap();

    assert_eq!(outcome, Outcome::GameOver);
    assert!(state.game_over);
    assert_eq!(state.winner, Some(A));
    assert_eq!(state.player(A).dragons, 2);
    assert_eq!(state.player(A).crystals, 4);
    assert_eq!(state.player(B).crystals, 0);
}
