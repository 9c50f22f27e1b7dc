pub mod config;
pub mod error;
pub mod types;

pub use config::GenerationConfig;
pub use types::{Cell, RoomId, TemplateId, DEFAULT_ROOM_HEIGHT, MIN_ROOM_WIDTH};
