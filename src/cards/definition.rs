//! Card designs - static card data.
//!
//! A `Design` holds the printed, immutable properties of one card of one
//! people's deck: type, element values, icons, special power, restriction
//! and ship capacity. Everything that changes during a match lives on the
//! per-match `Card` instead.

use serde::{Deserialize, Serialize};

/// Identifier of one of the peoples (decks) in a catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeopleId(pub u8);

impl PeopleId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The two elements a fight can be fought in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire = 0,
    Earth = 1,
}

impl Element {
    pub const BOTH: [Element; 2] = [Element::Fire, Element::Earth];
}

/// Printed card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Leadership,
    Influence,
    Character,
    Support,
    Booster,
}

impl CardType {
    pub const ALL: [CardType; 5] = [
        CardType::Leadership,
        CardType::Influence,
        CardType::Character,
        CardType::Support,
        CardType::Booster,
    ];

    /// Leadership and Influence cards share the early-phase window.
    #[must_use]
    pub fn is_leadership(self) -> bool {
        matches!(self, CardType::Leadership | CardType::Influence)
    }

    /// Types that need a Character in play before they can be played.
    #[must_use]
    pub fn needs_character(self) -> bool {
        matches!(self, CardType::Support | CardType::Booster)
    }

    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of card types, used by obligations to say what must be discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMask(pub u8);

impl TypeMask {
    pub const NONE: TypeMask = TypeMask(0);

    #[must_use]
    pub fn of(types: &[CardType]) -> Self {
        Self(types.iter().fold(0, |acc, t| acc | t.bit()))
    }

    #[must_use]
    pub fn contains(self, card_type: CardType) -> bool {
        self.0 & card_type.bit() != 0
    }
}

/// Icon bitmask printed on a card.
///
/// Bits 0 and 1 are the Fire and Earth shields (`1 << element`); bits 2
/// and 3 mark a card that may be played as a bluff in that element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Icons(pub u8);

impl Icons {
    pub const NONE: Icons = Icons(0);
    pub const FIRE_SHIELD: Icons = Icons(1 << 0);
    pub const EARTH_SHIELD: Icons = Icons(1 << 1);
    pub const FIRE_BLUFF: Icons = Icons(1 << 2);
    pub const EARTH_BLUFF: Icons = Icons(1 << 3);

    const BLUFF_MASK: u8 = Self::FIRE_BLUFF.0 | Self::EARTH_BLUFF.0;

    #[must_use]
    pub const fn union(self, other: Icons) -> Icons {
        Icons(self.0 | other.0)
    }

    /// Shield in the given element.
    #[must_use]
    pub fn shields(self, element: Element) -> bool {
        self.0 & (1 << element as u8) != 0
    }

    /// Bluff icon in the given element.
    #[must_use]
    pub fn bluffs(self, element: Element) -> bool {
        self.0 & (1 << (element as u8 + 2)) != 0
    }

    /// Whether the card can be played face down at all.
    #[must_use]
    pub fn can_bluff(self) -> bool {
        self.0 & Self::BLUFF_MASK != 0
    }
}

/// What a special power does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCategory {
    #[default]
    None,
    /// Draw `amount` cards.
    Draw,
    /// Return up to `amount` cards from the discard pile to hand.
    Recycle,
    /// The opponent discards `amount` cards of their choice.
    ForceDiscard,
    /// While active, the opponent must discard a card of a masked type
    /// before they may announce.
    Obligation,
    /// Cancel the text and icons of one of the opponent's active cards.
    Silence,
}

/// When a special power applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timing {
    /// Used on the owner's turn as an action.
    #[default]
    MyTurn,
    /// Resolves as the card is played.
    OnPlay,
    /// Applies continuously while the card is active.
    Continuous,
}

/// Special power descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Special {
    pub category: SpecialCategory,
    /// Card types the power cares about (obligations).
    pub mask: TypeMask,
    pub amount: u8,
    pub timing: Timing,
}

impl Special {
    pub const NONE: Special = Special {
        category: SpecialCategory::None,
        mask: TypeMask::NONE,
        amount: 0,
        timing: Timing::MyTurn,
    };

    #[must_use]
    pub fn new(category: SpecialCategory, amount: u8, timing: Timing) -> Self {
        Self {
            category,
            mask: TypeMask::NONE,
            amount,
            timing,
        }
    }

    /// An obligation demanding a discard of one of `types`.
    #[must_use]
    pub fn obligation(types: &[CardType]) -> Self {
        Self {
            category: SpecialCategory::Obligation,
            mask: TypeMask::of(types),
            amount: 1,
            timing: Timing::Continuous,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.category == SpecialCategory::None
    }
}

/// Extra play condition printed on a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    #[default]
    None,
    /// Playable only while the opponent holds at least one dragon.
    OpponentHasDragon,
    /// Playable only before the fight element is fixed.
    FightNotStarted,
    /// Playable only in a fight in this element.
    FightIn(Element),
}

/// Static card design.
///
/// ## Example
///
/// ```
/// use bluemoon::cards::{CardType, Design, Icons, PeopleId};
///
/// let guard = Design::new(PeopleId::new(0), 3, "Gate Guard", CardType::Character)
///     .with_values(5, 2)
///     .with_icons(Icons::EARTH_SHIELD);
///
/// assert_eq!(guard.fire, 5);
/// assert!(guard.icons.shields(bluemoon::cards::Element::Earth));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Design {
    pub people: PeopleId,
    /// Position within the people's deck.
    pub index: u8,
    pub name: String,
    pub card_type: CardType,
    pub fire: i32,
    pub earth: i32,
    pub icons: Icons,
    pub special: Special,
    pub restriction: Restriction,
    /// Cards this design can carry; non-zero only for ships.
    pub capacity: u8,
}

impl Design {
    #[must_use]
    pub fn new(people: PeopleId, index: u8, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            people,
            index,
            name: name.into(),
            card_type,
            fire: 0,
            earth: 0,
            icons: Icons::NONE,
            special: Special::NONE,
            restriction: Restriction::None,
            capacity: 0,
        }
    }

    #[must_use]
    pub fn with_values(mut self, fire: i32, earth: i32) -> Self {
        self.fire = fire;
        self.earth = earth;
        self
    }

    #[must_use]
    pub fn with_icons(mut self, icons: Icons) -> Self {
        self.icons = icons;
        self
    }

    #[must_use]
    pub fn with_special(mut self, special: Special) -> Self {
        self.special = special;
        self
    }

    #[must_use]
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = restriction;
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: u8) -> Self {
        self.capacity = capacity;
        self
    }

    /// Printed value in an element.
    #[must_use]
    pub fn value(&self, element: Element) -> i32 {
        match element {
            Element::Fire => self.fire,
            Element::Earth => self.earth,
        }
    }

    #[must_use]
    pub fn is_ship(&self) -> bool {
        self.capacity > 0
    }
}
