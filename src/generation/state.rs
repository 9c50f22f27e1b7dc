//! Level state: every room placed so far
//!
//! Rooms are stored in placement order and a room's `RoomId` is its index, so the
//! start room is always first. Placement search reads this to test collisions and
//! writes it when it commits a room.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::RoomId;
use crate::rooms::RoomInstance;
use crate::spatial::BoundingBox;

/// Which box took part in an overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxOwner {
    Room(RoomId),
    Passage { room: RoomId, index: usize },
}

impl std::fmt::Display for BoxOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoxOwner::Room(id) => write!(f, "{}", id),
            BoxOwner::Passage { room, index } => write!(f, "passage #{} of {}", index, room),
        }
    }
}

/// Two boxes that should be disjoint but are not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapReport {
    pub first: BoxOwner,
    pub second: BoxOwner,
}

/// Output of a generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    /// Seed the run used, whether configured or drawn
    pub seed: u64,
    rooms: Vec<RoomInstance>,
}

impl LevelState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rooms: Vec::new(),
        }
    }

    /// Id the next pushed room will get
    pub fn next_id(&self) -> RoomId {
        RoomId(self.rooms.len() as u32)
    }

    /// Append a room. Its id must be `next_id()`.
    pub fn push(&mut self, room: RoomInstance) -> RoomId {
        debug_assert_eq!(room.id, self.next_id());
        let id = room.id;
        self.rooms.push(room);
        id
    }

    pub fn get(&self, id: RoomId) -> Option<&RoomInstance> {
        self.rooms.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut RoomInstance> {
        self.rooms.get_mut(id.0 as usize)
    }

    pub fn rooms(&self) -> &[RoomInstance] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn start_room(&self) -> Option<&RoomInstance> {
        self.rooms.first()
    }

    /// Where the player enters the level: centre of the start room, lifted by the
    /// room height
    pub fn spawn_point(&self) -> Option<Vec3> {
        self.start_room().map(RoomInstance::spawn_point)
    }

    /// Rooms attached directly to `id`
    pub fn children_of(&self, id: RoomId) -> impl Iterator<Item = &RoomInstance> + '_ {
        self.rooms
            .iter()
            .filter(move |r| r.connection.map_or(false, |c| c.parent == id))
    }

    pub fn unconnected_passage_count(&self) -> usize {
        self.rooms.iter().map(|r| r.unconnected_passages().count()).sum()
    }

    /// Smallest box holding every room and every open passage footprint
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.rooms
            .iter()
            .flat_map(|room| {
                std::iter::once(room.room_box())
                    .chain(room.unconnected_passages().map(move |i| room.passage_box(i)))
            })
            .reduce(|acc, b| acc.union(&b))
    }

    /// Every pair of boxes that breaks the layout guarantee of a finished level:
    /// no two rooms overlap, and no open passage footprint overlaps another room
    /// or another room's open passage footprint.
    ///
    /// Always empty for a level built by the generator.
    pub fn find_overlaps(&self) -> Vec<OverlapReport> {
        let mut reports = Vec::new();

        for (i, a) in self.rooms.iter().enumerate() {
            let a_box = a.room_box();

            for b in &self.rooms[i + 1..] {
                if a_box.overlaps(&b.room_box()) {
                    reports.push(OverlapReport {
                        first: BoxOwner::Room(a.id),
                        second: BoxOwner::Room(b.id),
                    });
                }
            }

            for b in self.rooms.iter().filter(|b| b.id != a.id) {
                for index in b.unconnected_passages() {
                    if a_box.overlaps(&b.passage_box(index)) {
                        reports.push(OverlapReport {
                            first: BoxOwner::Room(a.id),
                            second: BoxOwner::Passage { room: b.id, index },
                        });
                    }
                }
            }

            for a_index in a.unconnected_passages() {
                let a_passage = a.passage_box(a_index);
                for b in &self.rooms[i + 1..] {
                    for b_index in b.unconnected_passages() {
                        if a_passage.overlaps(&b.passage_box(b_index)) {
                            reports.push(OverlapReport {
                                first: BoxOwner::Passage { room: a.id, index: a_index },
                                second: BoxOwner::Passage { room: b.id, index: b_index },
                            });
                        }
                    }
                }
            }
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TemplateId;
    use crate::rooms::{validate, RoomDefinition, RoomRole, RoomTemplate};
    use crate::spatial::CardinalDirection;
    use glam::IVec2;

    fn one_door() -> RoomTemplate {
        validate(
            &RoomDefinition::new("one_door_room")
                .with_floor(3, 3)
                .with_passage(1, 3, CardinalDirection::North),
        )
        .unwrap()
    }

    fn place(state: &mut LevelState, position: IVec2, facing: CardinalDirection) -> RoomId {
        let mut room = RoomInstance::spawn(state.next_id(), TemplateId(0), &one_door(), RoomRole::Start);
        room.position = position;
        room.facing = facing;
        state.push(room)
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut state = LevelState::new(7);
        assert!(state.is_empty());
        assert_eq!(place(&mut state, IVec2::ZERO, CardinalDirection::North), RoomId(0));
        assert_eq!(place(&mut state, IVec2::new(10, 0), CardinalDirection::North), RoomId(1));
        assert_eq!(state.len(), 2);
        assert_eq!(state.get(RoomId(1)).unwrap().position, IVec2::new(10, 0));
        assert!(state.get(RoomId(2)).is_none());
    }

    #[test]
    fn test_spawn_point_uses_start_room() {
        let mut state = LevelState::new(0);
        assert_eq!(state.spawn_point(), None);
        place(&mut state, IVec2::new(4, 4), CardinalDirection::North);
        assert_eq!(state.spawn_point(), Some(Vec3::new(5.5, 5.0, 5.5)));
    }

    #[test]
    fn test_far_apart_rooms_are_clean() {
        let mut state = LevelState::new(0);
        place(&mut state, IVec2::ZERO, CardinalDirection::North);
        place(&mut state, IVec2::new(20, 0), CardinalDirection::South);
        assert!(state.find_overlaps().is_empty());
        assert_eq!(state.unconnected_passage_count(), 2);
    }

    #[test]
    fn test_overlapping_rooms_reported() {
        let mut state = LevelState::new(0);
        place(&mut state, IVec2::ZERO, CardinalDirection::North);
        place(&mut state, IVec2::new(2, 2), CardinalDirection::East);
        let reports = state.find_overlaps();
        assert!(reports.contains(&OverlapReport {
            first: BoxOwner::Room(RoomId(0)),
            second: BoxOwner::Room(RoomId(1)),
        }));
    }

    #[test]
    fn test_open_passage_into_room_reported() {
        let mut state = LevelState::new(0);
        // room 0 passage box covers (0..=1, 3..=4)
        place(&mut state, IVec2::ZERO, CardinalDirection::North);
        place(&mut state, IVec2::new(1, 4), CardinalDirection::North);
        let reports = state.find_overlaps();
        assert!(reports.contains(&OverlapReport {
            first: BoxOwner::Room(RoomId(1)),
            second: BoxOwner::Passage {
                room: RoomId(0),
                index: 0
            },
        }));

        // once connected it no longer counts
        state.get_mut(RoomId(0)).unwrap().passages[0].connected = true;
        assert!(state
            .find_overlaps()
            .iter()
            .all(|r| r.second != BoxOwner::Passage { room: RoomId(0), index: 0 }));
    }

    #[test]
    fn test_bounds_cover_rooms_and_open_passages() {
        let mut state = LevelState::new(0);
        assert_eq!(state.bounds(), None);
        place(&mut state, IVec2::ZERO, CardinalDirection::North);
        let b = state.bounds().unwrap();
        assert_eq!(b.min, IVec2::ZERO);
        assert_eq!(b.max(), IVec2::new(2, 4));
    }

    #[test]
    fn test_json_round_trip_preserves_level() {
        let mut state = LevelState::new(99);
        place(&mut state, IVec2::new(-3, 8), CardinalDirection::West);
        let json = serde_json::to_string(&state).unwrap();
        let back: LevelState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
