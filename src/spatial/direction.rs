//! Eight-way compass algebra
//!
//! Directions are indexed clockwise from North in 45° steps, so every operation
//! here is modular arithmetic on that index. Positive rotations are clockwise
//! seen from above (bearing increases: North -> East).
//!
//! The "no direction" sentinel is `Option::<CardinalDirection>::None`, which keeps
//! `opposite` and friends total over the values they can actually receive.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One of the 8 compass points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CardinalDirection {
    /// All directions, clockwise from North
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::North,
        CardinalDirection::NorthEast,
        CardinalDirection::East,
        CardinalDirection::SouthEast,
        CardinalDirection::South,
        CardinalDirection::SouthWest,
        CardinalDirection::West,
        CardinalDirection::NorthWest,
    ];

    /// The four directions a room or passage may face
    pub const CARDINALS: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    #[inline]
    fn index(self) -> i32 {
        self as i32
    }

    #[inline]
    fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(8) as usize]
    }

    /// Classify a yaw angle (degrees, clockwise from North).
    ///
    /// Each direction owns a 45° sector centred on it; boundaries sit at odd
    /// multiples of 22.5°, and a boundary belongs to the sector clockwise of it.
    pub fn from_yaw(degrees: f32) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let sector = ((normalized + 22.5) / 45.0).floor() as i32;
        Self::from_index(sector)
    }

    /// Yaw of this direction in degrees, in `[0, 360)`
    pub fn yaw(self) -> f32 {
        self.index() as f32 * 45.0
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// Smallest signed rotation that maps `from` onto `to`, in `(-180, 180]`.
    ///
    /// Always a multiple of 45°; exactly opposite directions give `+180`.
    pub fn rotation_degrees(from: Self, to: Self) -> i32 {
        let steps = (to.index() - from.index()).rem_euclid(8);
        let steps = if steps > 4 { steps - 8 } else { steps };
        steps * 45
    }

    /// This direction turned by `degrees` (clockwise positive), bucketed to the
    /// nearest compass point.
    pub fn rotated_by(self, degrees: i32) -> Self {
        Self::from_yaw(self.yaw() + degrees as f32)
    }

    pub fn is_cardinal(self) -> bool {
        self.index() % 2 == 0
    }

    /// Number of clockwise quarter turns from North; intercardinals round down
    pub fn quarter_turns(self) -> i32 {
        self.index() / 2
    }

    /// Integer offset one step in this direction (x = east, y = north)
    pub fn unit_vector(self) -> IVec2 {
        match self {
            CardinalDirection::North => IVec2::new(0, 1),
            CardinalDirection::NorthEast => IVec2::new(1, 1),
            CardinalDirection::East => IVec2::new(1, 0),
            CardinalDirection::SouthEast => IVec2::new(1, -1),
            CardinalDirection::South => IVec2::new(0, -1),
            CardinalDirection::SouthWest => IVec2::new(-1, -1),
            CardinalDirection::West => IVec2::new(-1, 0),
            CardinalDirection::NorthWest => IVec2::new(-1, 1),
        }
    }

    /// Rotate a local offset into the frame of something facing this way.
    ///
    /// Only quarter turns exist on the cell grid, so intercardinal facings act
    /// like the cardinal counter-clockwise of them.
    pub fn rotate_offset(self, offset: IVec2) -> IVec2 {
        match self.quarter_turns() {
            0 => offset,
            1 => IVec2::new(offset.y, -offset.x),
            2 => -offset,
            _ => IVec2::new(-offset.y, offset.x),
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardinalDirection::North => "North",
            CardinalDirection::NorthEast => "NorthEast",
            CardinalDirection::East => "East",
            CardinalDirection::SouthEast => "SouthEast",
            CardinalDirection::South => "South",
            CardinalDirection::SouthWest => "SouthWest",
            CardinalDirection::West => "West",
            CardinalDirection::NorthWest => "NorthWest",
        };
        f.write_str(name)
    }
}

/// Unit offset for an optional direction; no direction means no movement
pub fn unit_vector(direction: Option<CardinalDirection>) -> IVec2 {
    direction.map_or(IVec2::ZERO, CardinalDirection::unit_vector)
}
