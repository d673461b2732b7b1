//! Game state.
//!
//! ## Player
//!
//! One seat's cards, draw pile, turn progress and score. Cards are stored in
//! an `im::Vector` indexed by deck index, so copying a player is O(1).
//!
//! ## GameState
//!
//! Both players plus turn and fight status, the RNG and the action history.
//! The catalog is shared behind an `Arc` and never mutated.
//!
//! Whole-state copies back both the one-level undo and simulation:
//! `fork_simulation` returns a copy flagged `simulation` with a derived RNG
//! stream, so nothing done to it can reach the canonical game.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::{Action, ActionRecord};
use super::config::RulesConfig;
use super::error::{EngineError, Result};
use super::player::{PlayerId, PlayerPair};
use super::rng::GameRng;
use crate::cards::{Card, CardType, Catalog, Design, Element, Location, PeopleId};
use crate::control::ControlKind;

/// Turn phases, in the order a turn moves through them.
///
/// Within a turn the phase never decreases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for `start_turn`.
    Start,
    Begin,
    Leader,
    Character,
    Support,
    Retreat,
    /// Turn over.
    None,
}

/// Which peoples meet, and the seed for the deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub people: [PeopleId; 2],
    pub seed: u64,
}

impl MatchSetup {
    #[must_use]
    pub fn new(first: PeopleId, second: PeopleId, seed: u64) -> Self {
        Self {
            people: [first, second],
            seed,
        }
    }

    /// Seat order: the people with the lower catalog index sits as player 0.
    #[must_use]
    pub fn seated(&self) -> [PeopleId; 2] {
        let [a, b] = self.people;
        if b < a {
            [b, a]
        } else {
            [a, b]
        }
    }
}

/// One seat's side of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub people: PeopleId,
    cards: Vector<Card>,
    /// Deck indices; the top of the pile is the back.
    draw_pile: Vector<u8>,
    counts: [u8; Location::COUNT],
    pub phase: Phase,
    pub char_played: bool,
    pub dragons: u8,
    pub crystals: u32,
    pub last_discard: Option<u8>,
    pub last_leader: Option<u8>,
    pub control: ControlKind,
}

impl Player {
    fn new(people: PeopleId, deck: &[Design], rng: &mut GameRng) -> Self {
        let cards: Vector<Card> = deck.iter().map(Card::new).collect();
        let mut order: Vec<u8> = (0..deck.len() as u8).collect();
        rng.shuffle(&mut order);

        let mut counts = [0; Location::COUNT];
        counts[Location::Draw.slot()] = deck.len() as u8;

        Self {
            people,
            cards,
            draw_pile: order.into_iter().collect(),
            counts,
            phase: Phase::None,
            char_played: false,
            dragons: 0,
            crystals: 0,
            last_discard: None,
            last_leader: None,
            control: ControlKind::Autonomous,
        }
    }

    #[must_use]
    pub fn card(&self, index: u8) -> Option<&Card> {
        self.cards.get(usize::from(index))
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cards currently in `location`.
    pub fn at(&self, location: Location) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.location == location)
    }

    /// Deck indices of the cards in hand.
    pub fn hand(&self) -> impl Iterator<Item = u8> + '_ {
        self.at(Location::Hand).map(|c| c.index)
    }

    /// Cards in a location.
    #[must_use]
    pub fn count(&self, location: Location) -> usize {
        usize::from(self.counts[location.slot()])
    }

    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    /// Face-down bluffs in play.
    #[must_use]
    pub fn bluffs_in_play(&self) -> usize {
        self.cards.iter().filter(|c| c.bluff && c.location.in_play()).count()
    }

    /// Cards loaded on a ship.
    pub fn cargo(&self, ship: u8) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.loaded_on == Some(ship))
    }

    /// Active cards that form part of the fight display.
    #[must_use]
    pub fn cards_in_play(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.active && c.location.in_play())
            .count()
    }

    pub(crate) fn card_mut(&mut self, index: u8) -> Option<&mut Card> {
        self.cards.get_mut(usize::from(index))
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    catalog: Arc<Catalog>,
    pub rules: RulesConfig,
    players: PlayerPair<Player>,

    /// Player whose turn it is.
    pub turn: PlayerId,
    /// Turn number (starts at 1).
    pub turn_number: u32,
    sequence: u32,

    pub fight_started: bool,
    pub fight_element: Option<Element>,

    pub game_over: bool,
    pub winner: Option<PlayerId>,

    /// This copy is a forecast and must never be treated as canonical.
    pub simulation: bool,
    /// Set once hidden information has been revealed through a human choice.
    pub random_event: bool,

    /// Running RNG; its position is the current random seed.
    pub rng: GameRng,
    pub start_seed: u64,

    history: Vector<ActionRecord>,
}

impl GameState {
    /// Deal a new match.
    pub fn new(catalog: Arc<Catalog>, setup: &MatchSetup, rules: RulesConfig) -> Result<Self> {
        let seated = setup.seated();
        for people in seated {
            if catalog.people(people).is_none() {
                return Err(EngineError::UnknownPeople(format!("#{}", people.0)));
            }
        }
        if seated[0] == seated[1] {
            return Err(EngineError::InvalidCatalog(
                "both seats chose the same people".into(),
            ));
        }

        let mut rng = GameRng::new(setup.seed);
        let first = Player::new(seated[0], catalog.deck(seated[0]), &mut rng);
        let second = Player::new(seated[1], catalog.deck(seated[1]), &mut rng);

        let mut state = Self {
            catalog,
            rules,
            players: PlayerPair::from_array([first, second]),
            turn: PlayerId::new(0),
            turn_number: 1,
            sequence: 0,
            fight_started: false,
            fight_element: None,
            game_over: false,
            winner: None,
            simulation: false,
            random_event: false,
            rng,
            start_seed: setup.seed,
            history: Vector::new(),
        };

        for who in PlayerId::both() {
            state.refill(who);
        }
        state.players[state.turn].phase = Phase::Start;

        debug!(seed = setup.seed, first = ?seated[0], second = ?seated[1], "dealt new match");
        Ok(state)
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn player(&self, who: PlayerId) -> &Player {
        &self.players[who]
    }

    pub(crate) fn player_mut(&mut self, who: PlayerId) -> &mut Player {
        &mut self.players[who]
    }

    #[must_use]
    pub fn card(&self, who: PlayerId, index: u8) -> Option<&Card> {
        self.players[who].card(index)
    }

    pub(crate) fn card_mut(&mut self, who: PlayerId, index: u8) -> Option<&mut Card> {
        self.players[who].card_mut(index)
    }

    /// Design of one of a player's cards.
    #[must_use]
    pub fn design(&self, who: PlayerId, index: u8) -> Option<&Design> {
        self.catalog.design(self.players[who].people, index)
    }

    /// Phase of the player whose turn it is.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.players[self.turn].phase
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Independent forecasting copy.
    ///
    /// The copy carries `simulation = true` and an RNG stream derived from
    /// the current position, so draws on the copy reveal nothing about the
    /// canonical deck order. `self` is not modified.
    #[must_use]
    pub fn fork_simulation(&self) -> GameState {
        let mut copy = self.clone();
        copy.simulation = true;
        copy.rng = self.rng.derive(u64::from(self.sequence));
        copy
    }

    // === Mutation helpers ===

    /// Move a card, keeping location counts, cargo and lookups consistent.
    ///
    /// A card leaving play is reset to its printed state; a ship leaving
    /// play takes its cargo to the discard pile.
    pub(crate) fn move_card(&mut self, who: PlayerId, index: u8, to: Location) {
        let catalog = Arc::clone(&self.catalog);
        let Some(design) = catalog.design(self.players[who].people, index) else {
            return;
        };
        let Some(from) = self.players[who].card(index).map(|c| c.location) else {
            return;
        };

        if from.in_play() && !to.in_play() && design.is_ship() {
            let cargo: Vec<u8> = self.players[who].cargo(index).map(|c| c.index).collect();
            for loaded in cargo {
                if let Some(card) = self.players[who].card_mut(loaded) {
                    card.loaded_on = None;
                }
                self.move_card(who, loaded, Location::Discard);
            }
        }

        let player = &mut self.players[who];
        player.counts[from.slot()] = player.counts[from.slot()].saturating_sub(1);
        player.counts[to.slot()] += 1;
        if let Some(card) = player.card_mut(index) {
            card.location = to;
            if !to.in_play() {
                card.reset(design);
            }
        }
        if to == Location::Discard {
            player.last_discard = Some(index);
        }
        if !to.in_play() && player.last_leader == Some(index) {
            player.last_leader = None;
        }
        if to == Location::Draw {
            player.draw_pile.push_front(index);
        }
    }

    /// Draw the top card of a player's pile into hand.
    pub(crate) fn draw(&mut self, who: PlayerId) -> Option<u8> {
        let index = self.players[who].draw_pile.pop_back()?;
        self.move_card(who, index, Location::Hand);
        Some(index)
    }

    /// Draw until the hand holds `hand_limit` cards or the pile runs out.
    pub(crate) fn refill(&mut self, who: PlayerId) {
        while self.players[who].count(Location::Hand) < self.rules.hand_limit {
            if self.draw(who).is_none() {
                break;
            }
        }
    }

    pub(crate) fn record(&mut self, who: PlayerId, action: Action) {
        let record = ActionRecord::new(who, action, self.turn_number, self.sequence);
        self.sequence += 1;
        self.history.push_back(record);
    }

    /// Hand the turn to the opponent.
    pub(crate) fn pass_turn(&mut self) {
        let who = self.turn;
        self.players[who].phase = Phase::None;
        self.turn = who.opponent();
        self.turn_number += 1;
        self.sequence = 0;
        self.players[self.turn].phase = Phase::Start;
    }

    /// Seat `who` with a given control kind.
    pub fn set_control(&mut self, who: PlayerId, control: ControlKind) {
        self.players[who].control = control;
    }

    /// Move a card straight into hand, bypassing the deal. Test setup only.
    #[doc(hidden)]
    pub fn stage_in_hand(&mut self, who: PlayerId, index: u8) {
        if self.card(who, index).map(|c| c.location) == Some(Location::Draw) {
            self.players[who].draw_pile.retain(|&i| i != index);
            self.move_card(who, index, Location::Hand);
        }
    }
}
