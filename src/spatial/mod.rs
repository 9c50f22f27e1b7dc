//! Grid geometry: compass directions and cell bounding boxes

pub mod bounds;
pub mod direction;

pub use bounds::{overlaps, BoundingBox};
pub use direction::{unit_vector, CardinalDirection};
