//! Card catalog: every people's deck of designs.
//!
//! The `Catalog` is built once, validated, and then shared read-only by all
//! game states through an `Arc`. Lookups are by `(PeopleId, deck index)`;
//! people can also be found by case-insensitive name.
//!
//! ## Example
//!
//! ```
//! use bluemoon::cards::{CardType, Catalog, Design, PeopleId};
//!
//! let mut builder = Catalog::builder();
//! let vulca = builder.people("Vulca");
//! builder.add(Design::new(vulca, 0, "Fire Elder", CardType::Leadership));
//! builder.add(Design::new(vulca, 1, "Ember", CardType::Character).with_values(3, 1));
//! let catalog = builder.build().unwrap();
//!
//! assert_eq!(catalog.people_by_name("vulca").unwrap(), PeopleId::new(0));
//! assert_eq!(catalog.design(vulca, 1).unwrap().fire, 3);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{Design, PeopleId};
use crate::core::error::{EngineError, Result};

/// Largest deck a people may have; cards are addressed by `u8`.
pub const MAX_DECK: usize = 64;

/// One people and its deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct People {
    pub id: PeopleId,
    pub name: String,
    pub deck: Vec<Design>,
}

/// Immutable catalog of all peoples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    peoples: Vec<People>,
    by_name: FxHashMap<String, PeopleId>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Look up one design.
    #[must_use]
    pub fn design(&self, people: PeopleId, index: u8) -> Option<&Design> {
        self.peoples
            .get(people.index())
            .and_then(|p| p.deck.get(usize::from(index)))
    }

    /// All designs of a people's deck, in deck-index order.
    #[must_use]
    pub fn deck(&self, people: PeopleId) -> &[Design] {
        self.peoples
            .get(people.index())
            .map_or(&[][..], |p| p.deck.as_slice())
    }

    #[must_use]
    pub fn people(&self, people: PeopleId) -> Option<&People> {
        self.peoples.get(people.index())
    }

    /// Find a people by name, ignoring case.
    pub fn people_by_name(&self, name: &str) -> Result<PeopleId> {
        self.by_name
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| EngineError::UnknownPeople(name.to_string()))
    }

    pub fn peoples(&self) -> impl Iterator<Item = &People> {
        self.peoples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peoples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peoples.is_empty()
    }

    /// Iterate over every design of every people.
    pub fn iter(&self) -> impl Iterator<Item = &Design> {
        self.peoples.iter().flat_map(|p| p.deck.iter())
    }
}

/// Incremental catalog construction.
#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    peoples: Vec<People>,
}

impl CatalogBuilder {
    /// Register a people and return its id.
    pub fn people(&mut self, name: impl Into<String>) -> PeopleId {
        let id = PeopleId(self.peoples.len() as u8);
        self.peoples.push(People {
            id,
            name: name.into(),
            deck: Vec::new(),
        });
        id
    }

    /// Add a design to its people's deck.
    ///
    /// Designs are validated by `build`, so this never fails.
    pub fn add(&mut self, design: Design) -> &mut Self {
        if let Some(people) = self.peoples.get_mut(design.people.index()) {
            people.deck.push(design);
        } else {
            // Unknown people: kept aside so `build` can report it.
            self.peoples.push(People {
                id: design.people,
                name: String::new(),
                deck: vec![design],
            });
        }
        self
    }

    /// Validate and freeze the catalog.
    pub fn build(self) -> Result<Catalog> {
        let mut by_name = FxHashMap::default();

        for (position, people) in self.peoples.iter().enumerate() {
            if people.id.index() != position || people.name.is_empty() {
                return Err(EngineError::InvalidCatalog(format!(
                    "design registered for unknown people {}",
                    people.id.0
                )));
            }
            if people.deck.is_empty() || people.deck.len() > MAX_DECK {
                return Err(EngineError::InvalidCatalog(format!(
                    "{} has {} cards (1..={MAX_DECK} allowed)",
                    people.name,
                    people.deck.len()
                )));
            }
            for (index, design) in people.deck.iter().enumerate() {
                if usize::from(design.index) != index {
                    return Err(EngineError::InvalidCatalog(format!(
                        "{}: `{}` has index {} at position {index}",
                        people.name, design.name, design.index
                    )));
                }
            }
            if by_name.insert(people.name.to_lowercase(), people.id).is_some() {
                return Err(EngineError::InvalidCatalog(format!(
                    "people `{}` registered twice",
                    people.name
                )));
            }
        }

        if self.peoples.len() < 2 {
            return Err(EngineError::InvalidCatalog("a match needs two peoples".into()));
        }

        Ok(Catalog {
            peoples: self.peoples,
            by_name,
        })
    }
}
