//! The table: canonical game, seated controllers, and one level of undo.
//!
//! ## Turn flow
//!
//! After every turn change the table runs the autonomous side: it starts
//! the turn, asks the seated controller for actions and applies them until
//! the turn passes, repeating until it is the local player's turn again or
//! the game ends. The local player then acts through [`Table::act`].
//!
//! ## Undo
//!
//! Before the first state-changing local action of a turn the table keeps a
//! copy of the canonical state. [`Table::undo`] restores it once; no new copy
//! is taken until the turn changes, when the slot is reset.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cards::{Catalog, Element, Location};
use crate::control::{AutonomousController, Controller, SeatMap, Seats};
use crate::core::action::Action;
use crate::core::config::RulesConfig;
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::core::state::{GameState, MatchSetup, Phase};
use crate::rules::combat::announce_legal;
use crate::rules::engine::{apply, is_action_legal, start_turn, Outcome};
use crate::rules::phase::{acting, retreat_legal};

/// Which of the turn-ending buttons a front end should enable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    pub fire: bool,
    pub earth: bool,
    pub retreat: bool,
}

/// A match in progress.
pub struct Table {
    catalog: Arc<Catalog>,
    rules: RulesConfig,
    state: GameState,
    seats: Seats,
    undo: Option<GameState>,
    /// Undo was used this turn.
    undo_spent: bool,
    /// Seat driven through `act`; `None` when every seat is autonomous.
    local: Option<PlayerId>,
    notified: bool,
}

impl Table {
    /// Deal a match, seat the controllers and run until the local player
    /// is to act.
    pub fn new(
        catalog: Arc<Catalog>,
        setup: &MatchSetup,
        rules: RulesConfig,
        seats: Seats,
        local: Option<PlayerId>,
    ) -> Result<Self> {
        let state = GameState::new(Arc::clone(&catalog), setup, rules.clone())?;
        let mut table = Self {
            catalog,
            rules,
            state,
            seats,
            undo: None,
            undo_spent: false,
            local,
            notified: false,
        };
        table.seat_controllers();
        table.handle_end_turn()?;
        Ok(table)
    }

    /// Start a fresh match at the same table.
    pub fn new_game(&mut self, setup: &MatchSetup) -> Result<()> {
        self.state = GameState::new(Arc::clone(&self.catalog), setup, self.rules.clone())?;
        self.reset_undo();
        self.notified = false;
        self.seat_controllers();
        self.handle_end_turn()
    }

    fn seat_controllers(&mut self) {
        for who in PlayerId::both() {
            let kind = self.seats.kind(who);
            self.state.set_control(who, kind);
        }
        for who in PlayerId::both() {
            self.seats.seat(who).init(&self.state, who);
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn local(&self) -> Option<PlayerId> {
        self.local
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Turn-ending options for the local player.
    #[must_use]
    pub fn menu(&self) -> Menu {
        let Some(me) = self.local else {
            return Menu::default();
        };
        Menu {
            fire: announce_legal(&self.state, me, Element::Fire),
            earth: announce_legal(&self.state, me, Element::Earth),
            retreat: retreat_legal(&self.state, me),
        }
    }

    /// The action the heuristic controller would take for the local
    /// player now, if it is their turn.
    #[must_use]
    pub fn assist(&self) -> Option<Action> {
        let me = self.local?;
        if !acting(&self.state, me) {
            return None;
        }
        let action = AutonomousController::heuristic().take_action(&self.state, me);
        debug!(player = %me, %action, "assist");
        Some(action)
    }

    /// Turn the opponent's hand face up for the local player. Returns how
    /// many cards were disclosed.
    pub fn disclose_opponent_hand(&mut self) -> usize {
        let Some(me) = self.local else {
            return 0;
        };
        let them = me.opponent();
        let hand: Vec<u8> = self.state.player(them).hand().collect();
        for &index in &hand {
            if let Some(card) = self.state.card_mut(them, index) {
                card.disclosed = true;
            }
        }
        info!(seed = self.state.start_seed, cards = hand.len(), "opponent hand disclosed");
        hand.len()
    }

    /// Perform an action for the local player.
    pub fn act(&mut self, action: Action) -> Result<Outcome> {
        let who = self.state.turn;
        if self.local != Some(who) || !is_action_legal(&self.state, who, &action) {
            return Err(EngineError::IllegalAction { player: who, action });
        }
        let snapshot = (self.undo.is_none() && !self.undo_spent).then(|| self.state.clone());

        let outcome = self.commit(who, &action)?;
        if snapshot.is_some() {
            self.undo = snapshot;
        }
        if outcome != Outcome::Continue {
            self.reset_undo();
            self.handle_end_turn()?;
        }
        Ok(outcome)
    }

    /// Restore the state from before the local player's first action this
    /// turn. Works once per turn.
    pub fn undo(&mut self) -> Result<()> {
        let snapshot = self.undo.take().ok_or(EngineError::NothingToUndo)?;
        debug!(turn = snapshot.turn_number, "undo");
        self.state = snapshot;
        self.undo_spent = true;
        Ok(())
    }

    fn reset_undo(&mut self) {
        self.undo = None;
        self.undo_spent = false;
    }

    /// Apply on a working copy and keep it only if the action completes.
    fn commit(&mut self, who: PlayerId, action: &Action) -> Result<Outcome> {
        let mut next = self.state.clone();
        let outcome = apply(&mut next, &mut self.seats, who, action)?;
        self.state = next;
        Ok(outcome)
    }

    /// Run autonomous turns until the local player is to act or the game
    /// ends.
    pub fn handle_end_turn(&mut self) -> Result<()> {
        loop {
            if self.state.game_over {
                self.notify_game_over();
                return Ok(());
            }
            if self.state.phase() == Phase::Start
                && start_turn(&mut self.state) == Outcome::GameOver
            {
                continue;
            }
            let who = self.state.turn;
            if self.local == Some(who) {
                return Ok(());
            }
            self.run_turn(who)?;
        }
    }

    fn run_turn(&mut self, who: PlayerId) -> Result<()> {
        let limit = self.rules.action_limit;
        for _ in 0..limit {
            let action = self.seats.seat(who).take_action(&self.state, who);
            if self.commit(who, &action)? != Outcome::Continue {
                return Ok(());
            }
        }
        Err(EngineError::ControllerStalled { player: who, actions: limit })
    }

    fn notify_game_over(&mut self) {
        if self.notified {
            return;
        }
        self.notified = true;
        info!(
            winner = ?self.state.winner,
            turns = self.state.turn_number,
            "match finished"
        );
        for who in PlayerId::both() {
            self.seats.seat(who).on_game_over(&self.state, who);
        }
    }

    /// Tell every controller the table is closing.
    pub fn shutdown(&mut self) {
        for who in PlayerId::both() {
            self.seats.seat(who).shutdown(&self.state, who);
        }
    }
}
