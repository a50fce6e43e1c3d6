//! Contact directory records
//!
//! The dashboard's contact store exposes a flat JSON list; field names are
//! camelCase on the wire. The core only ever reads id/firstName/lastName.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A contact directory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Contact {
    /// Display name used for mention resolution
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match against a mention name
    pub fn matches(&self, name: &str) -> bool {
        self.full_name().eq_ignore_ascii_case(name)
    }
}

/// Load the contact directory from a JSON file.
/// A missing file is an empty directory, not an error.
pub fn load_contacts(path: &Path) -> Result<Vec<Contact>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)?;
    let contacts: Vec<Contact> = serde_json::from_str(&raw)?;
    Ok(contacts)
}
