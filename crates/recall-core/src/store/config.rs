use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Store configuration loaded from `config.toml`.
/// Every field has a sensible default; a missing file means defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the markdown notes, relative to the store root
    pub notes_dir: String,
    /// Contact directory JSON file, relative to the store root
    pub contacts_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            notes_dir: "notes".to_string(),
            contacts_file: "contacts.json".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
