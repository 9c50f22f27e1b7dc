//! Room Weaver - procedural levels from prefab rooms
//!
//! Room prefabs are authored in TOML, validated into templates and collected in a
//! [`rooms::RoomCatalog`]. The generator then grows a level out of them: a start
//! room, a main path, an end room and branches, each room attached passage to
//! passage with no two footprints overlapping.
//!
//! ```no_run
//! use room_weaver::core::GenerationConfig;
//! use room_weaver::generation::generate;
//! use room_weaver::rooms::RoomCatalog;
//!
//! let mut catalog = RoomCatalog::new();
//! catalog.load_directory(std::path::Path::new("data/rooms")).unwrap();
//! let level = generate(&catalog, &GenerationConfig::default().with_seed(42)).unwrap();
//! println!("{} rooms", level.len());
//! ```

pub mod core;
pub mod generation;
pub mod rooms;
pub mod spatial;

pub use crate::core::error::{GenerationError, Result};
pub use crate::core::GenerationConfig;
pub use generation::{generate, LevelGenerator, LevelState};
pub use rooms::RoomCatalog;
