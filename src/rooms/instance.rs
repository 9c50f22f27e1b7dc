//! Placed rooms.
//!
//! A `RoomInstance` copies the footprint and passage layout of its template at
//! spawn time, then carries the mutable part: a cell position, a cardinal facing
//! and one `connected` flag per passage (index-aligned with the template).
//!
//! The transform is a rotation about the room's local origin followed by a
//! translation. All world-space queries are derived from it on demand.

use glam::{IVec2, Vec3};
use serde::{Deserialize, Serialize};

use super::template::RoomTemplate;
use crate::core::types::{Cell, RoomId, TemplateId, DEFAULT_ROOM_HEIGHT};
use crate::spatial::{BoundingBox, CardinalDirection};

/// Why a room exists in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomRole {
    Start,
    Path { index: u32 },
    End,
    Branch { depth: u32 },
}

impl std::fmt::Display for RoomRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomRole::Start => write!(f, "Start"),
            RoomRole::Path { index } => write!(f, "Path #{}", index),
            RoomRole::End => write!(f, "End"),
            RoomRole::Branch { depth } => write!(f, "Branch (depth {})", depth),
        }
    }
}

/// Edge to the parent room in the level tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub parent: RoomId,
    /// Passage index on the parent
    pub parent_passage: usize,
    /// Passage index on this room
    pub passage: usize,
}

/// A passage of a placed room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPassage {
    pub local_position: Cell,
    pub local_facing: CardinalDirection,
    pub connected: bool,
}

/// A spawned instance of a room template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInstance {
    pub id: RoomId,
    pub template_id: TemplateId,
    pub template_name: String,
    pub role: RoomRole,

    /// Cached unrotated footprint
    pub dimensions: IVec2,

    /// World position of the local origin and rotation
    pub position: Cell,
    pub facing: CardinalDirection,

    pub passages: Vec<PlacedPassage>,

    /// `None` only for the start room
    pub connection: Option<Connection>,
}

impl RoomInstance {
    /// Instantiate a template at the origin with the default facing
    pub fn spawn(id: RoomId, template_id: TemplateId, template: &RoomTemplate, role: RoomRole) -> Self {
        Self {
            id,
            template_id,
            template_name: template.name.clone(),
            role,
            dimensions: template.dimensions,
            position: IVec2::ZERO,
            facing: CardinalDirection::North,
            passages: template
                .passages
                .iter()
                .map(|p| PlacedPassage {
                    local_position: p.local_position,
                    local_facing: p.facing,
                    connected: false,
                })
                .collect(),
            connection: None,
        }
    }

    /// Turn about the vertical axis through the local origin.
    ///
    /// The result is snapped to a cardinal facing.
    pub fn rotate_by(&mut self, degrees: i32) {
        let turned = self.facing.rotated_by(degrees);
        self.facing = CardinalDirection::CARDINALS[turned.quarter_turns() as usize];
    }

    /// Move the room so that passage `index` lands exactly on `target`
    pub fn align_passage_to(&mut self, index: usize, target: Cell) {
        let offset = self.facing.rotate_offset(self.passages[index].local_position);
        self.position = target - offset;
    }

    pub fn passage_position(&self, index: usize) -> Cell {
        self.position + self.facing.rotate_offset(self.passages[index].local_position)
    }

    pub fn passage_facing(&self, index: usize) -> CardinalDirection {
        self.passages[index]
            .local_facing
            .rotated_by(self.facing.quarter_turns() * 90)
    }

    pub fn room_box(&self) -> BoundingBox {
        BoundingBox::for_room(self.position, self.facing, self.dimensions)
    }

    pub fn passage_box(&self, index: usize) -> BoundingBox {
        BoundingBox::for_passage(self.passage_position(index), self.passage_facing(index))
    }

    pub fn passage_count(&self) -> usize {
        self.passages.len()
    }

    pub fn has_unconnected_passages(&self) -> bool {
        self.passages.iter().any(|p| !p.connected)
    }

    /// Indices of passages still open
    pub fn unconnected_passages(&self) -> impl Iterator<Item = usize> + '_ {
        self.passages
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.connected)
            .map(|(i, _)| i)
    }

    /// World-space centre of the footprint (x east, y up, z north), raised by
    /// the room height. Used as the player spawn point for the start room.
    pub fn spawn_point(&self) -> Vec3 {
        let b = self.room_box();
        let center = b.min.as_vec2() + b.size.as_vec2() / 2.0;
        Vec3::new(center.x, DEFAULT_ROOM_HEIGHT as f32, center.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::schema::RoomDefinition;
    use crate::rooms::template::validate;
    use CardinalDirection::*;

    fn corner_room() -> RoomTemplate {
        validate(
            &RoomDefinition::new("corner_room")
                .with_floor(4, 4)
                .with_passage(2, 0, South)
                .with_passage(4, 2, East),
        )
        .unwrap()
    }

    fn spawn(template: &RoomTemplate) -> RoomInstance {
        RoomInstance::spawn(RoomId(0), TemplateId(0), template, RoomRole::Start)
    }

    #[test]
    fn test_spawn_at_origin_facing_north() {
        let room = spawn(&corner_room());
        assert_eq!(room.position, IVec2::ZERO);
        assert_eq!(room.facing, North);
        assert_eq!(room.passage_count(), 2);
        assert!(room.has_unconnected_passages());
        assert_eq!(room.unconnected_passages().collect::<Vec<_>>(), vec![0, 1]);
        assert!(room.connection.is_none());
    }

    #[test]
    fn test_rotation_turns_passages() {
        let mut room = spawn(&corner_room());
        room.rotate_by(90);
        assert_eq!(room.facing, East);
        assert_eq!(room.passage_facing(0), West);
        assert_eq!(room.passage_facing(1), South);

        room.rotate_by(-180);
        assert_eq!(room.facing, West);
        assert_eq!(room.passage_facing(0), East);
        assert_eq!(room.passage_facing(1), North);
    }

    #[test]
    fn test_passage_world_position_follows_transform() {
        let mut room = spawn(&corner_room());
        room.position = IVec2::new(10, 20);
        assert_eq!(room.passage_position(1), IVec2::new(14, 22));

        room.rotate_by(90);
        // local (4, 2) turned clockwise is (2, -4)
        assert_eq!(room.passage_position(1), IVec2::new(12, 16));
    }

    #[test]
    fn test_align_passage_to_target() {
        let mut room = spawn(&corner_room());
        room.rotate_by(180);
        let target = IVec2::new(-3, 7);
        room.align_passage_to(0, target);
        assert_eq!(room.passage_position(0), target);
        assert_eq!(room.passage_facing(0), North);
    }

    #[test]
    fn test_passage_boxes_never_overlap_own_room() {
        let mut room = spawn(&corner_room());
        room.position = IVec2::new(5, -2);
        for facing in CardinalDirection::CARDINALS {
            room.facing = facing;
            for i in 0..room.passage_count() {
                assert!(!room.passage_box(i).overlaps(&room.room_box()), "facing {facing}, passage {i}");
            }
        }
    }

    #[test]
    fn test_unconnected_passages_skip_connected() {
        let mut room = spawn(&corner_room());
        room.passages[0].connected = true;
        assert_eq!(room.unconnected_passages().collect::<Vec<_>>(), vec![1]);
        room.passages[1].connected = true;
        assert!(!room.has_unconnected_passages());
    }

    #[test]
    fn test_spawn_point_is_room_centre() {
        let room = spawn(&corner_room());
        let p = room.spawn_point();
        assert_eq!(p, Vec3::new(2.0, DEFAULT_ROOM_HEIGHT as f32, 2.0));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(RoomRole::Path { index: 2 }.to_string(), "Path #2");
        assert_eq!(RoomRole::Branch { depth: 1 }.to_string(), "Branch (depth 1)");
    }
}
