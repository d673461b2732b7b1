//! The built-in reference catalog: ten peoples of thirty cards each.
//!
//! Every deck shares one layout (two Leadership cards, one Influence card,
//! fourteen Characters, six Boosters, seven Support cards) with values
//! rotated per people, so matches between any two peoples are playable and
//! exercise every rule the engine knows.

use super::definition::{
    CardType, Design, Element, Icons, PeopleId, Restriction, Special, SpecialCategory, Timing,
};
use super::registry::Catalog;

/// People names in catalog order.
pub const PEOPLES: [&str; 10] = [
    "Hoax", "Vulca", "Mimix", "Flit", "Khind", "Terrah", "Pillar", "Aqua", "Buka", "Mutant",
];

const CHARACTERS: [&str; 14] = [
    "Scout", "Warrior", "Sage", "Hunter", "Guardian", "Seer", "Champion", "Raider", "Healer",
    "Trickster", "Captain", "Mystic", "Sentinel", "Hero",
];

const BOOSTERS: [&str; 6] = ["Blade", "Torch", "Stone", "Spear", "Charm", "Drum"];

const SUPPORTS: [&str; 7] = ["Banner", "Shelter", "Well", "Messenger", "Archive", "Mask", "Oath"];

/// Peoples whose Influence card is a ship.
const SEAFARERS: [&str; 2] = ["Flit", "Aqua"];

impl Catalog {
    /// Build the reference catalog.
    #[must_use]
    pub fn standard() -> Catalog {
        let mut builder = Catalog::builder();
        for name in PEOPLES {
            let people = builder.people(name);
            for design in standard_deck(people, name) {
                builder.add(design);
            }
        }
        match builder.build() {
            Ok(catalog) => catalog,
            Err(err) => unreachable!("reference catalog is well formed: {err}"),
        }
    }
}

fn standard_deck(people: PeopleId, name: &str) -> Vec<Design> {
    let p = people.index() as i32;
    let mut deck = Vec::with_capacity(30);
    let next = |deck: &[Design], title: String, card_type: CardType| -> Design {
        Design::new(people, deck.len() as u8, title, card_type)
    };

    let elder = next(&deck, format!("{name} Elder"), CardType::Leadership);
    deck.push(elder);

    let warlord = next(&deck, format!("{name} Warlord"), CardType::Leadership)
        .with_restriction(Restriction::OpponentHasDragon)
        .with_special(Special::new(SpecialCategory::Draw, 1, Timing::MyTurn));
    deck.push(warlord);

    let influence = if SEAFARERS.contains(&name) {
        next(&deck, format!("{name} Ark"), CardType::Influence).with_capacity(2)
    } else {
        next(&deck, format!("{name} Decree"), CardType::Influence)
            .with_special(Special::obligation(&[CardType::Support, CardType::Booster]))
    };
    deck.push(influence);

    for (k, title) in CHARACTERS.iter().enumerate() {
        let k = k as i32;
        let mut design = next(&deck, format!("{name} {title}"), CardType::Character)
            .with_values(1 + (k * 5 + p * 3) % 8, 1 + (k * 3 + p * 5 + 2) % 8);
        design = match k {
            4 => design.with_icons(Icons::FIRE_SHIELD),
            9 => design.with_special(Special::new(
                SpecialCategory::ForceDiscard,
                1,
                Timing::OnPlay,
            )),
            10 => design.with_icons(Icons::EARTH_SHIELD),
            12 => design.with_special(Special::new(SpecialCategory::Silence, 1, Timing::MyTurn)),
            13 => design.with_restriction(Restriction::FightNotStarted),
            _ => design,
        };
        deck.push(design);
    }

    for (b, title) in BOOSTERS.iter().enumerate() {
        let b = b as i32;
        let bluff = if b % 2 == 0 { Icons::FIRE_BLUFF } else { Icons::EARTH_BLUFF };
        let mut design = next(&deck, format!("{name} {title}"), CardType::Booster)
            .with_values(1 + (b + p) % 3, 1 + (b + p + 1) % 3)
            .with_icons(bluff);
        if b == 5 {
            let element = if p % 2 == 0 { Element::Fire } else { Element::Earth };
            design = design.with_restriction(Restriction::FightIn(element));
        }
        deck.push(design);
    }

    for (s, title) in SUPPORTS.iter().enumerate() {
        let s = s as i32;
        let design = next(&deck, format!("{name} {title}"), CardType::Support)
            .with_values(s % 3, (s + 1) % 3);
        let design = match s {
            0 => design.with_icons(Icons::FIRE_SHIELD.union(Icons::EARTH_BLUFF)),
            1 => design.with_icons(Icons::EARTH_SHIELD.union(Icons::FIRE_BLUFF)),
            2 => design.with_special(Special::new(SpecialCategory::Draw, 1, Timing::MyTurn)),
            3 => design.with_special(Special::new(SpecialCategory::Recycle, 1, Timing::MyTurn)),
            4 => design.with_special(Special::new(
                SpecialCategory::ForceDiscard,
                1,
                Timing::OnPlay,
            )),
            5 => design.with_special(Special::new(SpecialCategory::Silence, 1, Timing::MyTurn)),
            _ => design.with_special(Special::obligation(&[CardType::Character])),
        };
        deck.push(design);
    }

    deck
}
