//! Room catalog for loading and filtering validated prefabs.
//!
//! This module provides the `RoomCatalog` which owns every `RoomTemplate` used by a
//! generation run, handles TOML file loading, and answers the per-phase candidate
//! queries of the level builder.

use std::collections::HashMap;
use std::path::Path;

use super::schema::RoomDefinition;
use super::template::{validate, RoomTemplate};
use crate::core::error::CatalogError;
use crate::core::types::TemplateId;

/// Read-only (once built) collection of room templates
#[derive(Debug, Clone, Default)]
pub struct RoomCatalog {
    /// Templates in registration order; `TemplateId` indexes this
    templates: Vec<RoomTemplate>,
    /// Map from name to ID for fast lookup
    by_name: HashMap<String, TemplateId>,
}

impl RoomCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validated template and return its assigned ID
    pub fn register(&mut self, template: RoomTemplate) -> Result<TemplateId, CatalogError> {
        if self.by_name.contains_key(&template.name) {
            return Err(CatalogError::DuplicateName(template.name));
        }
        let id = TemplateId(self.templates.len() as u32);
        self.by_name.insert(template.name.clone(), id);
        self.templates.push(template);
        Ok(id)
    }

    /// Validate an authored prefab and register it
    pub fn register_definition(&mut self, definition: &RoomDefinition) -> Result<TemplateId, CatalogError> {
        let template = validate(definition)?;
        self.register(template)
    }

    /// Build a catalog from authored prefabs, failing on the first invalid one
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a RoomDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register_definition(definition)?;
        }
        Ok(catalog)
    }

    /// Load a prefab from a TOML string; `path` is only used in error messages
    pub fn load_str(&mut self, content: &str, path: &Path) -> Result<TemplateId, CatalogError> {
        let definition: RoomDefinition = toml::from_str(content).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.register_definition(&definition)
    }

    /// Load a prefab from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<TemplateId, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let id = self.load_str(&content, path)?;
        tracing::debug!("Loaded room prefab {} from {}", self.templates[id.0 as usize].name, path.display());
        Ok(id)
    }

    /// Load all .toml files from a directory recursively.
    ///
    /// Entries are visited in path order so the catalog, and therefore every seeded
    /// run, does not depend on the filesystem's listing order.
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<TemplateId>, CatalogError> {
        let mut ids = Vec::new();
        self.load_directory_recursive(path, &mut ids)?;
        tracing::info!("Loaded {} room prefabs from {}", ids.len(), path.display());
        Ok(ids)
    }

    fn load_directory_recursive(&mut self, path: &Path, ids: &mut Vec<TemplateId>) -> Result<(), CatalogError> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        for entry_path in entries {
            if entry_path.is_dir() {
                self.load_directory_recursive(&entry_path, ids)?;
            } else if entry_path.extension().map_or(false, |ext| ext == "toml") {
                ids.push(self.load_file(&entry_path)?);
            } else {
                tracing::warn!("Skipping non-TOML file {}", entry_path.display());
            }
        }
        Ok(())
    }

    pub fn get(&self, id: TemplateId) -> Option<&RoomTemplate> {
        self.templates.get(id.0 as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<TemplateId> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&RoomTemplate> {
        self.id_by_name(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates with their IDs, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &RoomTemplate)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, t)| (TemplateId(i as u32), t))
    }

    fn filter(&self, predicate: impl Fn(&RoomTemplate) -> bool) -> Vec<TemplateId> {
        self.iter().filter(|(_, t)| predicate(t)).map(|(id, _)| id).collect()
    }

    /// Prefabs the level may start in: exactly one passage
    pub fn start_candidates(&self) -> Vec<TemplateId> {
        self.filter(|t| t.passage_count() == 1)
    }

    /// Prefabs for the main path: an entrance plus at least one way on
    pub fn path_candidates(&self) -> Vec<TemplateId> {
        self.filter(|t| t.passage_count() >= 2)
    }

    /// Prefabs that can cap the main path: exactly one passage
    pub fn end_candidates(&self) -> Vec<TemplateId> {
        self.filter(|t| t.passage_count() == 1)
    }

    /// Prefabs for branch rooms at `depth` (0-based). The last allowed depth only
    /// gets dead ends so branching stops there.
    pub fn branch_candidates(&self, depth: u32, max_depth: u32) -> Vec<TemplateId> {
        if depth + 1 >= max_depth {
            self.filter(RoomTemplate::is_dead_end)
        } else {
            self.filter(|t| !t.passages.is_empty())
        }
    }
}
