//! Validated, immutable room templates.
//!
//! `validate` is the only way to obtain a `RoomTemplate`. It runs once per prefab
//! at catalog load time and stops at the first broken invariant:
//!
//! 1. no tile or passage below the local origin
//! 2. every passage on exactly one boundary edge, never a corner
//! 3. a passage faces outward from the edge it sits on
//! 4. no two passage footprints overlap
//!
//! The placement search and the collision checks rely on all four.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::schema::{RoomDefinition, TileKind};
use crate::core::error::TemplateError;
use crate::core::types::{Cell, DEFAULT_ROOM_HEIGHT};
use crate::spatial::{BoundingBox, CardinalDirection};

/// An opening on the room boundary, in the room's local frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageSpec {
    pub local_position: Cell,
    pub facing: CardinalDirection,
}

impl PassageSpec {
    /// Footprint with the room at the origin, facing North
    pub fn local_box(&self) -> BoundingBox {
        BoundingBox::for_passage(self.local_position, self.facing)
    }
}

/// A room prefab that passed validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub name: String,
    /// Footprint (width along x, depth along z) in cells
    pub dimensions: IVec2,
    pub height: i32,
    pub passages: Vec<PassageSpec>,
}

impl RoomTemplate {
    pub fn passage_count(&self) -> usize {
        self.passages.len()
    }

    pub fn is_dead_end(&self) -> bool {
        self.passages.len() == 1
    }
}

/// Validate an authored prefab and derive its template.
pub fn validate(definition: &RoomDefinition) -> Result<RoomTemplate, TemplateError> {
    let room = definition.name.as_str();
    let tiles = definition.expanded_tiles();

    for tile in &tiles {
        if tile.x < 0 || tile.z < 0 {
            return Err(TemplateError::NegativeCoordinate {
                room: room.to_string(),
                kind: tile.kind.label(),
                x: tile.x,
                z: tile.z,
            });
        }
    }

    let dimensions = tiles
        .iter()
        .filter(|t| !matches!(t.kind, TileKind::Passage { .. }))
        .fold(None, |acc: Option<IVec2>, t| {
            let far = IVec2::new(t.x + 1, t.z + 1);
            Some(acc.map_or(far, |d| d.max(far)))
        })
        .ok_or_else(|| TemplateError::Empty {
            room: room.to_string(),
        })?;

    let mut passages = Vec::new();
    for tile in &tiles {
        if let TileKind::Passage { yaw } = tile.kind {
            let spec = PassageSpec {
                local_position: IVec2::new(tile.x, tile.z),
                facing: CardinalDirection::from_yaw(yaw),
            };
            check_passage(room, dimensions, &spec)?;
            passages.push(spec);
        }
    }

    for (i, a) in passages.iter().enumerate() {
        for (j, b) in passages.iter().enumerate().skip(i + 1) {
            if a.local_box().overlaps(&b.local_box()) {
                return Err(TemplateError::OverlappingPassages {
                    room: room.to_string(),
                    first: i,
                    second: j,
                });
            }
        }
    }

    Ok(RoomTemplate {
        name: definition.name.clone(),
        dimensions,
        height: DEFAULT_ROOM_HEIGHT,
        passages,
    })
}

/// Rules 2 and 3 for a single passage
fn check_passage(room: &str, dimensions: IVec2, spec: &PassageSpec) -> Result<(), TemplateError> {
    let (x, z) = (spec.local_position.x, spec.local_position.y);
    let (w, d) = (dimensions.x, dimensions.y);

    let on_west = x == 0;
    let on_east = x == w;
    let on_south = z == 0;
    let on_north = z == d;

    if (on_west || on_east) && (on_south || on_north) {
        return Err(TemplateError::PassageOnCorner {
            room: room.to_string(),
            x,
            z,
        });
    }

    let expected = if (on_west || on_east) && z > 0 && z < d {
        if on_west {
            CardinalDirection::West
        } else {
            CardinalDirection::East
        }
    } else if (on_south || on_north) && x > 0 && x < w {
        if on_south {
            CardinalDirection::South
        } else {
            CardinalDirection::North
        }
    } else {
        return Err(TemplateError::PassageOffBoundary {
            room: room.to_string(),
            x,
            z,
        });
    };

    if !spec.facing.is_cardinal() {
        return Err(TemplateError::IntercardinalPassage {
            room: room.to_string(),
            x,
            z,
            facing: spec.facing,
        });
    }

    if spec.facing != expected {
        return Err(TemplateError::FacingMismatch {
            room: room.to_string(),
            x,
            z,
            expected,
            found: spec.facing,
        });
    }

    Ok(())
}
