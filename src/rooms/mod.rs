//! Room prefabs and placed rooms
//!
//! Authored prefabs (`schema`) are validated once into immutable templates
//! (`template`), collected in a `RoomCatalog`, and instantiated as `RoomInstance`s
//! by the level generator.

pub mod catalog;
pub mod instance;
pub mod schema;
pub mod template;

pub use catalog::RoomCatalog;
pub use instance::*;
pub use schema::*;
pub use template::{validate, PassageSpec, RoomTemplate};
