//! Self-play: autonomous matches back to back.
//!
//! Used to exercise evaluators and to smoke-test rules changes. Each match
//! gets its own seed (`seed_offset + match index`) so a run is reproducible.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cards::{Catalog, PeopleId};
use crate::control::{SeatMap, Seats};
use crate::core::config::RulesConfig;
use crate::core::error::{EngineError, Result};
use crate::core::player::{PlayerId, PlayerPair};
use crate::core::state::{GameState, MatchSetup, Phase};
use crate::rules::engine::{apply, start_turn, Outcome};

/// Configuration for a self-play run.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    pub matches: usize,

    /// Added to the match index to form each match's seed.
    pub seed_offset: u64,

    pub rules: RulesConfig,

    /// Fixed pairing; `None` rotates through the catalog's peoples.
    pub people: Option<[PeopleId; 2]>,

    /// Turns after which an unfinished match is abandoned.
    pub max_turns: u32,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            matches: 1,
            seed_offset: 0,
            rules: RulesConfig::default(),
            people: None,
            max_turns: 500,
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(mut self, matches: usize) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_people(mut self, first: PeopleId, second: PeopleId) -> Self {
        self.people = Some([first, second]);
        self
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }
}

/// Summary of one finished (or abandoned) match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    pub seed: u64,
    /// Peoples in seat order.
    pub people: [PeopleId; 2],
    pub crystals: PlayerPair<u32>,
    pub dragons: PlayerPair<u8>,
    pub turns: u32,
    /// Actions applied over the whole match.
    pub actions: usize,
    pub winner: Option<PlayerId>,
    /// `false` when the match hit `max_turns`.
    pub finished: bool,
}

/// Runs self-play matches over a catalog.
pub struct SelfPlay {
    catalog: Arc<Catalog>,
    config: SelfPlayConfig,
}

impl SelfPlay {
    pub fn new(catalog: Arc<Catalog>, config: SelfPlayConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play every configured match. `seats` builds fresh controllers for
    /// each match from its seed.
    pub fn run(&self, mut seats: impl FnMut(u64) -> Seats) -> Result<Vec<MatchReport>> {
        let mut reports = Vec::with_capacity(self.config.matches);
        for game in 0..self.config.matches {
            let seed = self.config.seed_offset.wrapping_add(game as u64);
            let setup = self.pairing(game, seed)?;
            let report = self.play_match(&setup, &mut seats(seed))?;
            debug!(seed, winner = ?report.winner, turns = report.turns, "self-play match done");
            reports.push(report);
        }

        let finished = reports.iter().filter(|r| r.finished).count();
        info!(matches = reports.len(), finished, "self-play run complete");
        Ok(reports)
    }

    fn pairing(&self, game: usize, seed: u64) -> Result<MatchSetup> {
        if let Some([first, second]) = self.config.people {
            return Ok(MatchSetup::new(first, second, seed));
        }
        let peoples = self.catalog.len();
        if peoples < 2 {
            return Err(EngineError::InvalidCatalog("self-play needs two peoples".into()));
        }
        let first = game % peoples;
        let second = (first + 1 + game / peoples % (peoples - 1)) % peoples;
        Ok(MatchSetup::new(
            PeopleId::new(first as u8),
            PeopleId::new(second as u8),
            seed,
        ))
    }

    /// Play one match to completion with the given controllers.
    pub fn play_match(&self, setup: &MatchSetup, seats: &mut Seats) -> Result<MatchReport> {
        let mut state =
            GameState::new(Arc::clone(&self.catalog), setup, self.config.rules.clone())?;
        for who in PlayerId::both() {
            let kind = seats.kind(who);
            state.set_control(who, kind);
            seats.seat(who).init(&state, who);
        }

        while !state.game_over && state.turn_number <= self.config.max_turns {
            if state.phase() == Phase::Start && start_turn(&mut state) == Outcome::GameOver {
                break;
            }
            play_turn(&mut state, seats)?;
        }

        for who in PlayerId::both() {
            if state.game_over {
                seats.seat(who).on_game_over(&state, who);
            }
            seats.seat(who).shutdown(&state, who);
        }

        Ok(MatchReport {
            seed: setup.seed,
            people: [
                state.player(PlayerId::new(0)).people,
                state.player(PlayerId::new(1)).people,
            ],
            crystals: PlayerPair::new(|p| state.player(p).crystals),
            dragons: PlayerPair::new(|p| state.player(p).dragons),
            turns: state.turn_number,
            actions: state.history().len(),
            winner: state.winner,
            finished: state.game_over,
        })
    }
}

fn play_turn(state: &mut GameState, seats: &mut Seats) -> Result<()> {
    let who = state.turn;
    let limit = state.rules.action_limit;
    for _ in 0..limit {
        let action = seats.seat(who).take_action(state, who);
        if apply(state, seats, who, &action)? != Outcome::Continue {
            return Ok(());
        }
    }
    Err(EngineError::ControllerStalled { player: who, actions: limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(config: SelfPlayConfig) -> SelfPlay {
        SelfPlay::new(Arc::new(Catalog::standard()), config)
    }

    #[test]
    fn test_config_builders() {
        let play = runner(
            SelfPlayConfig::new()
                .with_matches(4)
                .with_seed_offset(100)
                .with_max_turns(60),
        );
        let config = play.config();

        assert_eq!(config.matches, 4);
        assert_eq!(config.seed_offset, 100);
        assert_eq!(config.max_turns, 60);
        assert!(config.people.is_none());
    }

    #[test]
    fn test_pairings_rotate() {
        let play = runner(SelfPlayConfig::default());

        for game in 0..30 {
            let setup = play.pairing(game, 0).unwrap();
            assert_ne!(setup.people[0], setup.people[1]);
        }
        assert_ne!(play.pairing(0, 0).unwrap().people, play.pairing(1, 0).unwrap().people);
    }

    #[test]
    fn test_run_reports_every_match() {
        let play = runner(
            SelfPlayConfig::new()
                .with_matches(2)
                .with_seed_offset(7)
                .with_people(PeopleId::new(0), PeopleId::new(5)),
        );

        let reports = play.run(|_| Seats::autonomous()).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].seed, 7);
        assert_eq!(reports[1].seed, 8);
        for report in &reports {
            assert!(report.actions > 0);
            assert!(report.actions + 1 >= report.turns as usize);
            if report.finished {
                assert!(report
                    .winner
                    .map_or(true, |w| report.dragons[w] >= report.dragons[w.opponent()]));
            }
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        let play = runner(SelfPlayConfig::new().with_people(PeopleId::new(2), PeopleId::new(7)));
        let setup = MatchSetup::new(PeopleId::new(2), PeopleId::new(7), 99);

        let first = play.play_match(&setup, &mut Seats::autonomous()).unwrap();
        let second = play.play_match(&setup, &mut Seats::autonomous()).unwrap();

        assert_eq!(first, second);
    }
}
