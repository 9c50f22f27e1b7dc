//! Level generation: placement search, level state and the phase builder

pub mod builder;
pub mod placement;
pub mod state;

pub use builder::{generate, LevelGenerator, PlacementStep};
pub use placement::{try_attach, Attachment, Rejection};
pub use state::{BoxOwner, LevelState, OverlapReport};
