//! Territory -> root folder lookup.
//!
//! Each business territory (e.g. "Austin") owns one folder in the site drive.
//! The table is loaded from configuration once at startup and never mutated
//! afterwards; lookups are case-insensitive.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::ItemId;

/// Separator between entries in the textual form (`Austin=01AB;Dallas=01CD`).
const ENTRY_SEPARATOR: char = ';';

/// Immutable mapping from territory name to drive-item id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryMap {
    /// Keyed by the normalized (trimmed, upper-cased) name.
    entries: BTreeMap<String, Territory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Territory {
    display_name: String,
    folder_id: ItemId,
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

impl TerritoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a territory. Later entries win over earlier ones.
    pub fn insert(&mut self, name: &str, folder_id: impl Into<ItemId>) -> Result<(), CoreError> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(CoreError::Validation("Territory name must not be empty".into()));
        }
        let folder_id = folder_id.into();
        if folder_id.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Territory '{}' has an empty folder id",
                name.trim()
            )));
        }

        self.entries.insert(
            key,
            Territory {
                display_name: name.trim().to_string(),
                folder_id: folder_id.trim().to_string(),
            },
        );
        Ok(())
    }

    /// Parse the `Name=folderId;Name=folderId` form used in configuration.
    ///
    /// Blank entries (e.g. a trailing `;`) are skipped.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut map = Self::new();
        for entry in raw.split(ENTRY_SEPARATOR).map(str::trim) {
            if entry.is_empty() {
                continue;
            }
            let (name, folder_id) = entry.split_once('=').ok_or_else(|| {
                CoreError::Validation(format!(
                    "Territory entry '{entry}' must have the form Name=folderId"
                ))
            })?;
            map.insert(name, folder_id)?;
        }
        Ok(map)
    }

    /// Merge `other` into this map; entries of `other` win on conflicts.
    pub fn merge(&mut self, other: TerritoryMap) {
        self.entries.extend(other.entries);
    }

    /// Resolve a territory name to its folder id.
    pub fn folder_id(&self, name: &str) -> Result<&str, CoreError> {
        self.entries
            .get(&normalize(name))
            .map(|t| t.folder_id.as_str())
            .ok_or_else(|| CoreError::UnknownTerritory(name.trim().to_string()))
    }

    /// Configured territory names, as written in configuration.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|t| t.display_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
