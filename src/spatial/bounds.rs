//! Integer-cell bounding boxes for rooms and passage footprints
//!
//! Boxes are recomputed from a transform whenever they are needed; nothing here
//! caches across a move or rotation.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::direction::CardinalDirection;
use crate::core::types::{Cell, MIN_ROOM_WIDTH};

/// Axis-aligned box of whole cells. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Bottom-left (south-west) cell
    pub min: Cell,
    /// Width (x) and depth (y) in cells
    pub size: IVec2,
}

impl BoundingBox {
    pub fn new(min: Cell, size: IVec2) -> Self {
        Self { min, size }
    }

    /// Top-right (north-east) cell
    pub fn max(&self) -> Cell {
        self.min + self.size - IVec2::ONE
    }

    /// Footprint of a room whose local origin sits at `position`, rotated to `facing`.
    ///
    /// `dimensions` is the unrotated (width, depth). Quarter turns swap the axes and
    /// move the bottom-left corner to wherever the rotated footprint now starts.
    pub fn for_room(position: Cell, facing: CardinalDirection, dimensions: IVec2) -> Self {
        let (w, d) = (dimensions.x, dimensions.y);
        match facing.quarter_turns() {
            0 => Self::new(position, dimensions),
            1 => Self::new(position - IVec2::new(0, w), IVec2::new(d, w)),
            2 => Self::new(position - IVec2::new(w, d), dimensions),
            _ => Self::new(position - IVec2::new(d, 0), IVec2::new(d, w)),
        }
    }

    /// Minimal footprint in front of a passage: a `MIN_ROOM_WIDTH` square centred on
    /// the passage, just outside the edge it faces. It abuts its own room.
    pub fn for_passage(position: Cell, facing: CardinalDirection) -> Self {
        let half = MIN_ROOM_WIDTH / 2;
        let offset = match facing.quarter_turns() {
            0 => IVec2::new(-half, 0),
            1 => IVec2::new(0, -half),
            2 => IVec2::new(-half, -MIN_ROOM_WIDTH),
            _ => IVec2::new(-MIN_ROOM_WIDTH, -half),
        };
        Self::new(position + offset, IVec2::splat(MIN_ROOM_WIDTH))
    }

    /// Closed-interval test on both axes. Boxes that merely touch do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x <= b_max.x
            && other.min.x <= a_max.x
            && self.min.y <= b_max.y
            && other.min.y <= a_max.y
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let max = self.max();
        cell.x >= self.min.x && cell.x <= max.x && cell.y >= self.min.y && cell.y <= max.y
    }

    /// Smallest box covering both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let min = self.min.min(other.min);
        let max = self.max().max(other.max());
        Self::new(min, max - min + IVec2::ONE)
    }

    pub fn area(&self) -> i32 {
        self.size.x * self.size.y
    }
}

/// Free-function form of [`BoundingBox::overlaps`]
pub fn overlaps(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.overlaps(b)
}
