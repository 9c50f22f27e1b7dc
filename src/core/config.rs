//! Generation parameters
//!
//! A plain structure handed to the generator. It can be built in code or read from
//! a TOML file; nothing is taken from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Shape of the level to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // === MAIN PATH ===
    /// Number of rooms between the start room and the end room
    ///
    /// Every one of them needs a prefab with at least 2 passages, so the catalog
    /// must provide some. Must be at least 2.
    pub main_path_length: u32,

    // === BRANCHES ===
    /// How many generations of branch rooms may grow off the main path
    ///
    /// Rooms of the last generation are always dead ends (1-passage prefabs), so
    /// every passage ends up connected. 0 skips branching and leaves open
    /// passages on the main path as they are.
    pub max_branch_depth: u32,

    // === RANDOMNESS ===
    /// Seed for the run's random source
    ///
    /// `None` draws a fresh seed; the drawn value is logged and stored on the
    /// resulting level so the run can be replayed.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            main_path_length: 5,
            max_branch_depth: 3,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main_path_length < 2 {
            return Err(ConfigError::PathTooShort {
                length: self.main_path_length,
            });
        }
        Ok(())
    }
}
