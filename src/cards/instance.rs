//! Card instances - per-match card state.
//!
//! Each player owns exactly one `Card` per design in their people's deck,
//! addressed by the design's deck index. A card never leaves its owner; it
//! only moves between locations and toggles flags.

use serde::{Deserialize, Serialize};

use super::definition::{Design, Icons};

/// Where a card currently lies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Hand,
    /// Leadership, Influence, Support cards, bluffs and ship cargo.
    Support,
    /// Characters and Boosters.
    Combat,
    Discard,
    Draw,
    /// Outside the game.
    Nowhere,
}

impl Location {
    pub const COUNT: usize = 6;

    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Whether cards here are part of the current fight display.
    #[must_use]
    pub fn in_play(self) -> bool {
        matches!(self, Location::Support | Location::Combat)
    }
}

/// A card in a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Deck index of the design this card instantiates.
    pub index: u8,

    pub location: Location,

    /// Counts toward power and projects its icons and text.
    pub active: bool,

    /// Special power spent (or obligation satisfied) this turn.
    pub used: bool,

    /// Text cancelled, either declined on play or silenced.
    pub text_ignored: bool,

    /// Known to the opponent.
    pub disclosed: bool,

    /// Lies face down as a bluff.
    pub bluff: bool,

    /// Ship has landed.
    pub landed: bool,

    /// Played during the current turn.
    pub fresh: bool,

    /// Deck index of the ship this card is loaded on.
    pub loaded_on: Option<u8>,

    /// Current icons; silencing clears them.
    pub icons: Icons,
}

impl Card {
    /// A fresh card in the draw pile.
    #[must_use]
    pub fn new(design: &Design) -> Self {
        Self {
            index: design.index,
            location: Location::Draw,
            active: false,
            used: false,
            text_ignored: false,
            disclosed: false,
            bluff: false,
            landed: false,
            fresh: false,
            loaded_on: None,
            icons: design.icons,
        }
    }

    /// Reset everything a card remembers from a previous placement.
    pub(crate) fn reset(&mut self, design: &Design) {
        let location = self.location;
        *self = Card::new(design);
        self.location = location;
    }

    /// Whether the card's text currently applies.
    #[must_use]
    pub fn text_applies(&self) -> bool {
        self.active && !self.text_ignored && !self.bluff
    }
}
