use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::RoomId;
use crate::rooms::RoomRole;
use crate::spatial::CardinalDirection;

/// A room prefab breaks one of the authoring invariants. Fatal at load time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("{room} has no floor or wall tiles")]
    Empty { room: String },

    #[error("{room} has a {kind} at ({x}, {z}), below the local origin")]
    NegativeCoordinate {
        room: String,
        kind: &'static str,
        x: i32,
        z: i32,
    },

    #[error("{room} has a passage on a corner at ({x}, {z})")]
    PassageOnCorner { room: String, x: i32, z: i32 },

    #[error("{room} has a passage at ({x}, {z}) that is not on the room boundary")]
    PassageOffBoundary { room: String, x: i32, z: i32 },

    #[error("{room} has a passage at ({x}, {z}) facing {facing}, which is not a cardinal direction")]
    IntercardinalPassage {
        room: String,
        x: i32,
        z: i32,
        facing: CardinalDirection,
    },

    #[error("{room} has a passage at ({x}, {z}) on the {expected} edge, but it faces {found}")]
    FacingMismatch {
        room: String,
        x: i32,
        z: i32,
        expected: CardinalDirection,
        found: CardinalDirection,
    },

    #[error("{room} has passages #{first} and #{second} whose footprints overlap")]
    OverlappingPassages {
        room: String,
        first: usize,
        second: usize,
    },
}

/// Errors that can occur when building a room catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid room prefab: {0}")]
    Template(#[from] TemplateError),

    #[error("A room named {0} is already registered")]
    DuplicateName(String),
}

/// Generation parameters that cannot produce a level
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("main_path_length must be at least 2, got {length}")]
    PathTooShort { length: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A generation run could not complete. No partial level is returned.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid generation config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("No room prefab with exactly one passage is available for the start room")]
    NoStartCandidate,

    #[error("{role}: no candidate room could attach anywhere on {room} ({template})")]
    AttachExhausted {
        role: RoomRole,
        room: RoomId,
        template: String,
    },
}

pub type Result<T> = std::result::Result<T, GenerationError>;
