//! End-to-end tests: whole turns through the engine, the table host with
//! undo and an interactive seat, and self-play.

use std::sync::Arc;
use std::thread;

use bluemoon::cards::{CardType, Catalog, Design, Element, Location, PeopleId};
use bluemoon::control::{interactive, AutonomousController, Prompt, Reply, Seats};
use bluemoon::core::{Action, EngineError, GameState, MatchSetup, Phase, PlayerId, RulesConfig};
use bluemoon::rules::{announce_legal, apply, power_in, result, start_turn, GameResult, Outcome};
use bluemoon::table::{SelfPlay, SelfPlayConfig, Table};

fn skirmish_catalog() -> (Arc<Catalog>, PeopleId, PeopleId) {
    let mut builder = Catalog::builder();
    let alpha = builder.people("Alpha");
    let beta = builder.people("Beta");
    builder
        .add(Design::new(alpha, 0, "Chief", CardType::Leadership).with_values(1, 0))
        .add(Design::new(alpha, 1, "Raider", CardType::Character).with_values(3, 1))
        .add(Design::new(alpha, 2, "Drum", CardType::Support).with_values(1, 1))
        .add(Design::new(beta, 0, "Guard", CardType::Character).with_values(1, 0))
        .add(Design::new(beta, 1, "Scout", CardType::Character).with_values(1, 2))
        .add(Design::new(beta, 2, "Beacon", CardType::Influence).with_values(3, 0));
    (Arc::new(builder.build().unwrap()), alpha, beta)
}

#[test]
fn test_announce_retreat_and_game_end() {
    let (catalog, alpha, beta) = skirmish_catalog();
    let setup = MatchSetup::new(alpha, beta, 1234);
    let mut state = GameState::new(catalog, &setup, RulesConfig::default()).unwrap();
    let mut seats = Seats::autonomous();
    let (a, b) = (PlayerId::new(0), PlayerId::new(1));

    // Opening turns: Alpha passes, Beta sets up a Beacon that outlasts the turn.
    assert_eq!(start_turn(&mut state), Outcome::Continue);
    apply(&mut state, &mut seats, a, &Action::Retreat).unwrap();
    start_turn(&mut state);
    apply(&mut state, &mut seats, b, &Action::Play { card: 2, no_effect: false }).unwrap();
    apply(&mut state, &mut seats, b, &Action::Retreat).unwrap();
    assert_eq!(state.card(b, 2).unwrap().location, Location::Support);
    assert_eq!(state.player(a).dragons + state.player(b).dragons, 0);

    // Alpha: Leadership, Character, Support, then Fire at 5 against 3.
    start_turn(&mut state);
    for card in 0..3 {
        apply(&mut state, &mut seats, a, &Action::Play { card, no_effect: false }).unwrap();
    }
    assert_eq!(state.player(a).phase, Phase::Support);
    assert_eq!(power_in(&state, a, Element::Fire), 5);
    assert_eq!(power_in(&state, b, Element::Fire), 3);

    let outcome = apply(&mut state, &mut seats, a, &Action::Announce(Element::Fire)).unwrap();
    assert_eq!(outcome, Outcome::TurnEnded);
    assert!(state.fight_started);
    assert_eq!(state.fight_element, Some(Element::Fire));
    assert_eq!(state.turn, b);

    // Beta reaches 4 and cannot hold Fire.
    start_turn(&mut state);
    apply(&mut state, &mut seats, b, &Action::Play { card: 0, no_effect: false }).unwrap();
    assert_eq!(power_in(&state, b, Element::Fire), 4);
    assert!(!announce_legal(&state, b, Element::Fire));

    let before = state.clone();
    let err = apply(&mut state, &mut seats, b, &Action::Announce(Element::Fire)).unwrap_err();
    assert!(matches!(err, EngineError::IllegalAction { .. }));
    assert_eq!(state, before);

    // A retreat with two cards in play is a rout: two dragons.
    apply(&mut state, &mut seats, b, &Action::Retreat).unwrap();
    assert_eq!(state.player(a).dragons, 2);
    assert!(!state.fight_started);
    assert_eq!(state.fight_element, None);
    assert_eq!(state.card(a, 0).unwrap().location, Location::Support);
    assert_eq!(state.card(a, 1).unwrap().location, Location::Discard);
    assert_eq!(state.card(b, 0).unwrap().location, Location::Discard);
    assert_eq!(state.card(b, 2).unwrap().location, Location::Support);

    // Alpha has nothing left to play.
    assert_eq!(start_turn(&mut state), Outcome::GameOver);
    assert_eq!(result(&state), Some(GameResult::Winner(a)));
    assert_eq!(state.player(a).crystals, 2);
    assert_eq!(state.player(b).crystals, 0);
}

// =============================================================================
// Table
// =============================================================================

fn table(local: Option<PlayerId>, seed: u64) -> Table {
    let setup = MatchSetup::new(PeopleId::new(1), PeopleId::new(8), seed);
    Table::new(
        Arc::new(Catalog::standard()),
        &setup,
        RulesConfig::default(),
        Seats::autonomous(),
        local,
    )
    .unwrap()
}

#[test]
fn test_undo_restores_the_turn_start() {
    let mut table = table(Some(PlayerId::new(0)), 40);
    let before = table.state().clone();

    table.act(Action::Advance(Phase::Character)).unwrap();
    table.act(Action::Advance(Phase::Support)).unwrap();
    assert!(table.can_undo());

    table.undo().unwrap();
    assert_eq!(table.state(), &before);
    assert_eq!(table.undo(), Err(EngineError::NothingToUndo));

    // Spent for the rest of the turn.
    table.act(Action::Advance(Phase::Retreat)).unwrap();
    assert!(!table.can_undo());
    assert_eq!(table.undo(), Err(EngineError::NothingToUndo));
}

#[test]
fn test_turn_change_drops_the_snapshot() {
    let mut table = table(Some(PlayerId::new(0)), 41);

    table.act(Action::Advance(Phase::Character)).unwrap();
    let outcome = table.act(Action::Retreat).unwrap();

    assert_ne!(outcome, Outcome::Continue);
    assert!(!table.can_undo());
    assert_eq!(table.undo(), Err(EngineError::NothingToUndo));
    if !table.state().game_over {
        assert_eq!(table.state().turn, PlayerId::new(0));
        assert_eq!(table.state().phase(), Phase::Begin);
    }
}

#[test]
fn test_menu_follows_play() {
    let mut table = table(Some(PlayerId::new(0)), 42);
    let menu = table.menu();
    assert!(menu.retreat);
    assert!(!menu.fire && !menu.earth);

    let character = table
        .state()
        .player(PlayerId::new(0))
        .hand()
        .find(|&i| {
            let state = table.state();
            state.design(PlayerId::new(0), i).is_some_and(|d| d.card_type == CardType::Character)
                && bluemoon::rules::is_legal(state, PlayerId::new(0), i)
        });
    if let Some(card) = character {
        table.act(Action::Play { card, no_effect: false }).unwrap();
        let menu = table.menu();
        assert!(menu.retreat);
        assert_eq!(menu.fire, announce_legal(table.state(), PlayerId::new(0), Element::Fire));
    }
}

#[test]
fn test_interactive_seat_through_the_table() {
    let (controller, front_end) = interactive::channel();
    let ui = thread::spawn(move || {
        let mut prompts = 0;
        while let Some(prompt) = front_end.next_prompt() {
            prompts += 1;
            match prompt {
                Prompt::CallBluff { .. } => {
                    front_end.reply(Reply::CallBluff(false));
                }
                Prompt::Choose { request, .. } => {
                    let pick = request.candidates.iter().take(request.min).copied().collect();
                    front_end.reply(Reply::Submit(pick));
                }
                Prompt::Shutdown => break,
                _ => {}
            }
        }
        prompts
    });

    let setup = MatchSetup::new(PeopleId::new(0), PeopleId::new(9), 7);
    let seats = Seats::new(Box::new(controller), Box::new(AutonomousController::heuristic()));
    let mut table = Table::new(
        Arc::new(Catalog::standard()),
        &setup,
        RulesConfig::default(),
        seats,
        Some(PlayerId::new(0)),
    )
    .unwrap();
    assert_eq!(table.state().player(PlayerId::new(0)).control, bluemoon::ControlKind::Interactive);

    for _ in 0..3 {
        if table.state().game_over {
            break;
        }
        table.act(Action::Retreat).unwrap();
    }
    table.shutdown();
    drop(table);

    // Init and Shutdown at least.
    assert!(ui.join().unwrap() >= 2);
}

// =============================================================================
// Self-play
// =============================================================================

#[test]
fn test_self_play_runs_matches() {
    let config = SelfPlayConfig::new().with_matches(2).with_seed_offset(1000).with_max_turns(150);
    let play = SelfPlay::new(Arc::new(Catalog::standard()), config);

    let reports = play.run(|_| Seats::autonomous()).unwrap();

    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_ne!(report.people[0], report.people[1]);
        assert!(report.turns >= 1);
        if report.finished {
            for who in PlayerId::both() {
                assert_eq!(
                    report.crystals[who],
                    RulesConfig::default().crystals_for(report.dragons[who])
                );
            }
        }
    }
}
