//! Autonomous controller.
//!
//! Decides by trying every legal action on a simulation copy and scoring
//! the result with an [`Evaluator`]. Choices are scored the same way, one
//! candidate at a time. Inside a simulation, and in its greedy form, the
//! controller never looks ahead: it returns the first selection the
//! validator accepts, which keeps nested forecasts cheap and finite.

use std::cmp::Ordering;

use super::{ControlKind, Controller, StandIns};
use crate::cards::{Element, Location};
use crate::core::action::Action;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::rules::choice::{apply_selection, ChoiceRequest, Selection, Validator};
use crate::rules::combat::{has_shield, power_in};
use crate::rules::engine::{apply, legal_actions};

// =============================================================================
// Evaluator
// =============================================================================

/// Scores positions and casts bluff votes for an autonomous controller.
///
/// A trained model plugs in here; only this contract matters to the engine.
pub trait Evaluator {
    /// Desirability of `state` for `who`; higher is better.
    fn evaluate(&self, state: &GameState, who: PlayerId) -> f64;

    /// Whether `who` should call the bluffs of the player to act.
    fn vote(&self, state: &GameState, who: PlayerId) -> bool;
}

/// Hand-tuned evaluation over dragons, hand size and the power balance.
#[derive(Clone, Debug)]
pub struct HeuristicEvaluator {
    pub dragon: f64,
    pub hand_card: f64,
    pub power: f64,
    /// Bonus for standing safely on one's own turn (able to announce).
    pub safe: f64,
    /// Bonus for having announced and handed the fight over.
    pub announced: f64,
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self {
            dragon: 100.0,
            hand_card: 0.5,
            power: 1.0,
            safe: 20.0,
            announced: 25.0,
        }
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, state: &GameState, who: PlayerId) -> f64 {
        let them = who.opponent();
        let mine = state.player(who);
        let theirs = state.player(them);

        if state.game_over {
            let crystals = f64::from(mine.crystals) - f64::from(theirs.crystals);
            let verdict = match state.winner {
                Some(w) if w == who => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            };
            return 1000.0 * (crystals + verdict);
        }

        let mut score = self.dragon * (f64::from(mine.dragons) - f64::from(theirs.dragons))
            + self.hand_card * mine.count(Location::Hand) as f64;

        match state.fight_element {
            Some(element) => {
                let lead = power_in(state, who, element) - power_in(state, them, element);
                if state.turn == who {
                    if lead >= 0 || has_shield(state, who, element) {
                        score += self.safe + self.power * f64::from(lead.min(10));
                    } else {
                        score += self.power * f64::from(lead.max(-10)) - self.safe;
                    }
                } else {
                    score += self.announced + self.power * f64::from(lead.min(10));
                }
            }
            None if state.turn == who => {
                let best = Element::BOTH
                    .iter()
                    .map(|&e| power_in(state, who, e))
                    .max()
                    .unwrap_or(0);
                score += self.power * f64::from(best);
            }
            None => {}
        }
        score
    }

    fn vote(&self, state: &GameState, who: PlayerId) -> bool {
        let bluffer = state.turn;
        let bluffs = state
            .player(bluffer)
            .cards()
            .filter(|c| c.bluff && c.fresh && !c.disclosed)
            .count() as i32;
        if bluffs == 0 {
            return false;
        }
        let honest = |p: PlayerId, e: Element| power_in(state, p, e);
        let carried = Element::BOTH.iter().all(|&e| {
            honest(bluffer, e) - bluffs * state.rules.power.bluff_value < honest(who, e)
        });
        bluffs >= 2 || carried
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Controller that decides by simulation and evaluation.
pub struct AutonomousController {
    evaluator: Box<dyn Evaluator>,
    lookahead: bool,
}

impl AutonomousController {
    pub fn new(evaluator: impl Evaluator + 'static) -> Self {
        Self {
            evaluator: Box::new(evaluator),
            lookahead: true,
        }
    }

    /// Evaluating controller using [`HeuristicEvaluator`].
    #[must_use]
    pub fn heuristic() -> Self {
        Self::new(HeuristicEvaluator::default())
    }

    /// Lookahead-free controller for forecasts.
    #[must_use]
    pub fn greedy() -> Self {
        Self {
            evaluator: Box::new(HeuristicEvaluator::default()),
            lookahead: false,
        }
    }

    fn score(&self, state: &GameState, who: PlayerId, action: &Action) -> Option<f64> {
        let mut sim = state.fork_simulation();
        let mut stand_ins = StandIns::default();
        apply(&mut sim, &mut stand_ins, who, action).ok()?;
        Some(self.evaluator.evaluate(&sim, who))
    }
}

impl Controller for AutonomousController {
    fn kind(&self) -> ControlKind {
        ControlKind::Autonomous
    }

    fn choose(
        &mut self,
        state: &GameState,
        request: &ChoiceRequest,
        validator: &Validator<'_>,
    ) -> Selection {
        if !self.lookahead || state.simulation {
            return first_valid(request, validator);
        }

        let single = ChoiceRequest {
            min: 1,
            max: 1,
            ..request.clone()
        };
        let mut ranked: Vec<(f64, usize)> = request
            .candidates
            .iter()
            .enumerate()
            .filter_map(|(i, pick)| {
                let mut sim = state.fork_simulation();
                apply_selection(&mut sim, &single, &[*pick])
                    .then(|| (self.evaluator.evaluate(&sim, request.chooser), i))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let picked: Selection = ranked
            .iter()
            .take(request.min)
            .map(|&(_, i)| request.candidates[i])
            .collect();
        if validator.validate(&picked) {
            picked
        } else {
            first_valid(request, validator)
        }
    }

    fn call_bluff(&mut self, state: &GameState, who: PlayerId) -> bool {
        self.evaluator.vote(state, who)
    }

    fn take_action(&mut self, state: &GameState, who: PlayerId) -> Action {
        let actions = legal_actions(state, who);
        if !self.lookahead {
            return actions.first().copied().unwrap_or(Action::Retreat);
        }

        let mut best: Option<(f64, Action)> = None;
        for action in actions {
            let Some(score) = self.score(state, who, &action) else {
                continue;
            };
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, action));
            }
        }
        best.map_or(Action::Retreat, |(_, action)| action)
    }
}

/// First selection the validator accepts, scanning contiguous windows of
/// the candidate list from the smallest allowed size up.
fn first_valid(request: &ChoiceRequest, validator: &Validator<'_>) -> Selection {
    let len = request.candidates.len();
    for size in request.min..=request.max.min(len) {
        for start in 0..len.max(1) {
            let pick: Selection = (0..size)
                .map(|k| request.candidates[(start + k) % len])
                .collect();
            if validator.validate(&pick) {
                return pick;
            }
            if size == 0 {
                break;
            }
        }
    }
    Selection::new()
}
