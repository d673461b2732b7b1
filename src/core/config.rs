//! Rules configuration.
//!
//! `RulesConfig` gathers every tunable of a match: hand size, bluff limits,
//! how dragons and crystals are awarded, and the two rule points that differ
//! between printings (when a fight starts and what counts toward power).
//!
//! ## Example
//!
//! ```
//! use bluemoon::core::{FightStart, RulesConfig};
//!
//! let rules = RulesConfig::default()
//!     .with_hand_limit(8)
//!     .with_fight_start(FightStart::OnCharacter);
//!
//! assert_eq!(rules.hand_limit, 8);
//! ```

use serde::{Deserialize, Serialize};

/// When a fight counts as started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FightStart {
    /// The first announcement fixes the element and starts the fight.
    #[default]
    OnAnnounce,
    /// Playing the first Character of a fight starts it; the element is
    /// still fixed by the first announcement.
    OnCharacter,
}

/// What contributes to a player's power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerRule {
    /// Power of a face-down bluff in either element.
    pub bluff_value: i32,
    /// Whether active cards in the support area add their element value.
    pub count_support: bool,
}

impl Default for PowerRule {
    fn default() -> Self {
        Self {
            bluff_value: 2,
            count_support: true,
        }
    }
}

/// Match-wide rules configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Cards a player refills to at the end of a turn.
    pub hand_limit: usize,

    /// Face-down bluffs a player may have in play at once.
    pub max_bluffs: usize,

    /// Dragons in the game; holding all of them wins instantly.
    pub dragons_to_win: u8,

    /// A retreating player with at most this many cards in play is routed
    /// and the winner gains two dragons instead of one.
    pub rout_threshold: usize,

    /// Crystals scored at game end, indexed by dragons held.
    pub crystals: [u32; 4],

    pub fight_start: FightStart,

    pub power: PowerRule,

    /// Actions a controller may take in a single turn before the host
    /// declares it stalled.
    pub action_limit: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hand_limit: 6,
            max_bluffs: 3,
            dragons_to_win: 3,
            rout_threshold: 2,
            crystals: [0, 1, 2, 4],
            fight_start: FightStart::default(),
            power: PowerRule::default(),
            action_limit: 200,
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hand_limit(mut self, cards: usize) -> Self {
        self.hand_limit = cards;
        self
    }

    pub fn with_max_bluffs(mut self, bluffs: usize) -> Self {
        self.max_bluffs = bluffs;
        self
    }

    pub fn with_dragons_to_win(mut self, dragons: u8) -> Self {
        self.dragons_to_win = dragons;
        self
    }

    pub fn with_fight_start(mut self, rule: FightStart) -> Self {
        self.fight_start = rule;
        self
    }

    pub fn with_power(mut self, rule: PowerRule) -> Self {
        self.power = rule;
        self
    }

    pub fn with_action_limit(mut self, actions: usize) -> Self {
        self.action_limit = actions;
        self
    }

    /// Crystals for holding `dragons` at the end of the game.
    #[must_use]
    pub fn crystals_for(&self, dragons: u8) -> u32 {
        let last = self.crystals.len() - 1;
        self.crystals[usize::from(dragons).min(last)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RulesConfig::default();

        assert_eq!(rules.hand_limit, 6);
        assert_eq!(rules.fight_start, FightStart::OnAnnounce);
        assert_eq!(rules.crystals_for(0), 0);
        assert_eq!(rules.crystals_for(2), 2);
        assert_eq!(rules.crystals_for(3), 4);
        assert_eq!(rules.crystals_for(9), 4);
    }

    #[test]
    fn test_json_roundtrip() {
        let rules = RulesConfig::default()
            .with_max_bluffs(1)
            .with_power(PowerRule { bluff_value: 0, count_support: false });

        let json = serde_json::to_string(&rules).unwrap();
        let back: RulesConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back, rules);
    }
}
