//! Markdown note store
//!
//! The store is a directory of markdown files: a `notes/` folder holding the
//! long-term note and daily notes, an optional `config.toml`, and an
//! optional contact directory JSON. The annotation engine itself never
//! touches the store; callers load note collections here and pass them in.

mod config;

pub use config::StoreConfig;

use crate::contacts::{self, Contact};
use crate::error::{RecallError, Result};
use crate::note::{Note, LONG_TERM_STEM};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CONFIG_FILE: &str = "config.toml";

/// The recall store
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    config: StoreConfig,
}

/// Default store root: `~/.recall`, falling back to the current directory
pub fn default_store_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".recall"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Store {
    /// Open an existing store at the given path
    #[tracing::instrument(skip(root), fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(RecallError::StoreNotFound {
                search_root: root.to_path_buf(),
            });
        }

        let config_path = root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            StoreConfig::default()
        };

        Ok(Store {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Initialize a new store, creating the notes directory and the
    /// long-term singleton when missing. Idempotent.
    pub fn init(root: &Path) -> Result<Self> {
        let store = Store {
            root: root.to_path_buf(),
            config: StoreConfig::default(),
        };
        fs::create_dir_all(store.notes_dir())?;
        let long_term = store.notes_dir().join(format!("{}.md", LONG_TERM_STEM));
        if !long_term.exists() {
            fs::write(&long_term, "")?;
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn notes_dir(&self) -> PathBuf {
        self.root.join(&self.config.notes_dir)
    }

    fn note_path(&self, name: &str) -> PathBuf {
        let file = if name.ends_with(".md") {
            name.to_string()
        } else {
            format!("{}.md", name)
        };
        self.notes_dir().join(file)
    }

    /// Load every note in the store, sorted by path for determinism
    #[tracing::instrument(skip(self))]
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let dir = self.notes_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut notes = Vec::new();
        for entry in WalkDir::new(&dir) {
            let entry =
                entry.map_err(|e| RecallError::Other(format!("walk notes dir: {}", e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            notes.push(self.load_note_file(entry.path())?);
        }
        notes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(notes)
    }

    /// Read a single note by name ("2024-06-01") or file name
    pub fn read_note(&self, name: &str) -> Result<Note> {
        let path = self.note_path(name);
        if !path.is_file() {
            return Err(RecallError::NoteNotFound {
                name: name.to_string(),
            });
        }
        self.load_note_file(&path)
    }

    /// Write a note body under a slugged file name, returning the path.
    /// An existing file with the same name is overwritten.
    pub fn save_note(&self, name: &str, body: &str) -> Result<PathBuf> {
        fs::create_dir_all(self.notes_dir())?;
        let mut stem = slug::slugify(name);
        if stem.is_empty() {
            stem = "note".to_string();
        }
        let path = self.notes_dir().join(format!("{}.md", stem));
        fs::write(&path, body)?;
        Ok(path)
    }

    /// Delete a note by name. The long-term singleton is protected.
    pub fn delete_note(&self, name: &str) -> Result<()> {
        let stem = name.trim_end_matches(".md");
        if stem == LONG_TERM_STEM {
            return Err(RecallError::ProtectedNote {
                name: name.to_string(),
            });
        }
        let path = self.note_path(name);
        if !path.is_file() {
            return Err(RecallError::NoteNotFound {
                name: name.to_string(),
            });
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Load the contact directory configured for this store.
    /// A missing file is an empty directory.
    pub fn contacts(&self) -> Result<Vec<Contact>> {
        contacts::load_contacts(&self.root.join(&self.config.contacts_file))
    }

    fn load_note_file(&self, path: &Path) -> Result<Note> {
        let content = fs::read_to_string(path)?;
        let modified: DateTime<Utc> = fs::metadata(path)?.modified()?.into();
        let rel = path
            .strip_prefix(self.notes_dir())
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        Note::from_markdown(&rel, &content, modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteKind;

    fn store_with_notes(files: &[(&str, &str)]) -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::init(dir.path()).expect("init");
        for (name, body) in files {
            fs::write(dir.path().join("notes").join(name), body).expect("write note");
        }
        (dir, store)
    }

    #[test]
    fn test_init_creates_long_term_singleton() {
        let (_dir, store) = store_with_notes(&[]);
        let notes = store.list_notes().expect("list");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NoteKind::LongTerm);
        assert_eq!(notes[0].name, "long-term");
    }

    #[test]
    fn test_list_notes_sorted_by_path() {
        let (_dir, store) = store_with_notes(&[
            ("2024-06-02.md", "two"),
            ("2024-06-01.md", "one"),
        ]);
        let notes = store.list_notes().expect("list");
        let paths: Vec<&str> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["2024-06-01.md", "2024-06-02.md", "long-term.md"]);
    }

    #[test]
    fn test_read_note_by_stem_or_file_name() {
        let (_dir, store) = store_with_notes(&[("2024-06-01.md", "daily body")]);
        assert_eq!(store.read_note("2024-06-01").expect("note").body, "daily body");
        assert_eq!(store.read_note("2024-06-01.md").expect("note").body, "daily body");
        assert!(matches!(
            store.read_note("2024-01-01"),
            Err(RecallError::NoteNotFound { .. })
        ));
    }

    #[test]
    fn test_save_note_slugs_file_name() {
        let (_dir, store) = store_with_notes(&[]);
        let path = store
            .save_note("Meeting with Jane Doe", "# body")
            .expect("save");
        assert!(path.ends_with("meeting-with-jane-doe.md"));
        assert!(path.is_file());
    }

    #[test]
    fn test_delete_note_protects_long_term() {
        let (_dir, store) = store_with_notes(&[("2024-06-01.md", "x")]);
        assert!(matches!(
            store.delete_note("long-term"),
            Err(RecallError::ProtectedNote { .. })
        ));
        store.delete_note("2024-06-01").expect("delete");
        assert!(store.read_note("2024-06-01").is_err());
    }

    #[test]
    fn test_open_missing_store_fails() {
        assert!(matches!(
            Store::open(Path::new("/nonexistent/recall-store")),
            Err(RecallError::StoreNotFound { .. })
        ));
    }

    #[test]
    fn test_contacts_default_empty() {
        let (_dir, store) = store_with_notes(&[]);
        assert!(store.contacts().expect("contacts").is_empty());
    }

    #[test]
    fn test_contacts_loaded_from_configured_file() {
        let (dir, store) = store_with_notes(&[]);
        fs::write(
            dir.path().join("contacts.json"),
            r#"[{"id":"c-1","firstName":"Jane","lastName":"Doe"}]"#,
        )
        .expect("write contacts");
        let contacts = store.contacts().expect("contacts");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].full_name(), "Jane Doe");
    }
}
