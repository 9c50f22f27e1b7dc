//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Integer cell coordinate on the level floor plan (x = east, y = north)
pub type Cell = glam::IVec2;

/// Smallest room edge length; also the side of a passage's footprint
pub const MIN_ROOM_WIDTH: i32 = 2;

/// Every room shares this height
pub const DEFAULT_ROOM_HEIGHT: i32 = 5;

/// Identifier of a validated template inside a `RoomCatalog`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

/// Identifier of a placed room, unique within one generation run
///
/// Ids are handed out in placement order, so `RoomId(0)` is always the start room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "template#{}", self.0)
    }
}
