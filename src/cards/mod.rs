//! Card system: designs, per-match cards, and the catalog.
//!
//! ## Key Types
//!
//! - `Design`: printed card data (type, values, icons, special power)
//! - `Card`: per-match state of one design (location, flags, cargo)
//! - `Catalog`: every people's deck, shared read-only between game states
//!
//! `Catalog::standard()` provides the ten reference peoples.

pub mod definition;
pub mod instance;
pub mod registry;
pub mod standard;

pub use definition::{
    CardType, Design, Element, Icons, PeopleId, Restriction, Special, SpecialCategory, Timing,
    TypeMask,
};
pub use instance::{Card, Location};
pub use registry::{Catalog, CatalogBuilder, People, MAX_DECK};
pub use standard::PEOPLES;
