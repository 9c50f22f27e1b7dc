//! Room prefab authoring schema for TOML deserialization.
//!
//! A prefab is authored as a set of tiles in the room's local frame (x = east,
//! z = north). Floor and wall tiles describe the footprint; passage tiles sit on
//! the footprint's boundary and carry the yaw they were authored with.
//!
//! ```toml
//! name = "two_door_room"
//! floor = { width = 3, depth = 5 }
//!
//! [[tiles]]
//! kind = "passage"
//! x = 1
//! z = 0
//! yaw = 180.0
//! ```

use serde::{Deserialize, Serialize};

use crate::spatial::CardinalDirection;

/// What a single authored tile is
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TileKind {
    Floor,
    Wall,
    /// Opening on the room boundary; `yaw` in degrees, clockwise from North
    Passage { yaw: f32 },
}

impl TileKind {
    pub fn label(&self) -> &'static str {
        match self {
            TileKind::Floor => "floor tile",
            TileKind::Wall => "wall tile",
            TileKind::Passage { .. } => "passage",
        }
    }
}

/// A tile at a local cell position
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TileDef {
    pub x: i32,
    pub z: i32,
    #[serde(flatten)]
    pub kind: TileKind,
}

/// Shorthand for a rectangle of floor tiles starting at the local origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FloorFill {
    pub width: u32,
    pub depth: u32,
}

/// Raw prefab as authored, before validation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomDefinition {
    /// Unique name within a catalog
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub floor: Option<FloorFill>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

impl RoomDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            floor: None,
            tiles: Vec::new(),
        }
    }

    pub fn with_floor(mut self, width: u32, depth: u32) -> Self {
        self.floor = Some(FloorFill { width, depth });
        self
    }

    pub fn with_tile(mut self, x: i32, z: i32, kind: TileKind) -> Self {
        self.tiles.push(TileDef { x, z, kind });
        self
    }

    pub fn with_passage(self, x: i32, z: i32, facing: CardinalDirection) -> Self {
        self.with_tile(x, z, TileKind::Passage { yaw: facing.yaw() })
    }

    /// Every tile, with the floor shorthand expanded
    pub fn expanded_tiles(&self) -> Vec<TileDef> {
        let mut tiles = Vec::with_capacity(self.tiles.len());
        if let Some(fill) = self.floor {
            for x in 0..fill.width as i32 {
                for z in 0..fill.depth as i32 {
                    tiles.push(TileDef {
                        x,
                        z,
                        kind: TileKind::Floor,
                    });
                }
            }
        }
        tiles.extend(self.tiles.iter().copied());
        tiles
    }
}
