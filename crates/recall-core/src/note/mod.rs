//! Note model for the Recall store
//!
//! A note is a markdown file: the single long-term note (`long-term.md`)
//! or one daily note per calendar date (`YYYY-MM-DD.md`). An optional YAML
//! frontmatter block can override the display name and category.

mod frontmatter;

pub use frontmatter::{split_frontmatter, NoteFrontmatter};

use crate::error::{RecallError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Reserved file stem of the long-term singleton note
pub const LONG_TERM_STEM: &str = "long-term";

/// Note category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteKind {
    /// The single long-lived note holding durable knowledge
    LongTerm,
    /// One note per calendar date
    #[default]
    Daily,
}

impl FromStr for NoteKind {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "long-term" => Ok(NoteKind::LongTerm),
            "daily" => Ok(NoteKind::Daily),
            other => Err(RecallError::Other(format!(
                "unknown note category: {} (expected: long-term, daily)",
                other
            ))),
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::LongTerm => write!(f, "long-term"),
            NoteKind::Daily => write!(f, "daily"),
        }
    }
}

/// A note loaded from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Store-relative path, used as the note's identity
    pub path: String,
    /// Display name (frontmatter `name`, falling back to the file stem)
    pub name: String,
    /// Body text with frontmatter stripped
    pub body: String,
    /// Last-modified timestamp
    pub modified: DateTime<Utc>,
    /// Category
    pub kind: NoteKind,
}

impl Note {
    /// Build a note from raw markdown file content.
    ///
    /// Frontmatter is optional; a malformed block is reported as
    /// `InvalidFrontmatter` rather than silently treated as body text.
    pub fn from_markdown(path: &str, content: &str, modified: DateTime<Utc>) -> Result<Note> {
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path)
            .to_string();

        let (raw_frontmatter, body) = split_frontmatter(content);
        let fm: NoteFrontmatter = match raw_frontmatter {
            Some(raw) => {
                serde_yaml::from_str(raw).map_err(|e| RecallError::InvalidFrontmatter {
                    path: Path::new(path).to_path_buf(),
                    reason: e.to_string(),
                })?
            }
            None => NoteFrontmatter::default(),
        };

        let kind = fm.category.unwrap_or_else(|| default_kind(&stem));
        let name = fm.name.unwrap_or(stem);

        Ok(Note {
            path: path.to_string(),
            name,
            body: body.to_string(),
            modified,
            kind,
        })
    }

    /// The calendar date of a daily note, derived from its name
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.name, "%Y-%m-%d").ok()
    }

    /// Whether this is the protected long-term singleton
    pub fn is_long_term(&self) -> bool {
        self.kind == NoteKind::LongTerm
    }
}

fn default_kind(stem: &str) -> NoteKind {
    if stem == LONG_TERM_STEM {
        NoteKind::LongTerm
    } else {
        NoteKind::Daily
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2024-06-01T10:00:00Z".parse().expect("valid timestamp")
    }

    #[test]
    fn test_from_markdown_without_frontmatter() {
        let note = Note::from_markdown("2024-06-01.md", "Met @Jane today", ts()).expect("note");
        assert_eq!(note.name, "2024-06-01");
        assert_eq!(note.kind, NoteKind::Daily);
        assert_eq!(note.body, "Met @Jane today");
        assert_eq!(note.date(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_from_markdown_with_frontmatter() {
        let content = "---\nname: Project Alpha\ncategory: long-term\n---\n\nNotes here";
        let note = Note::from_markdown("alpha.md", content, ts()).expect("note");
        assert_eq!(note.name, "Project Alpha");
        assert_eq!(note.kind, NoteKind::LongTerm);
        assert_eq!(note.body, "Notes here");
    }

    #[test]
    fn test_long_term_stem_detection() {
        let note = Note::from_markdown("long-term.md", "durable facts", ts()).expect("note");
        assert!(note.is_long_term());
        assert_eq!(note.date(), None);
    }

    #[test]
    fn test_malformed_frontmatter_is_an_error() {
        let content = "---\nname: [unclosed\n---\nbody";
        let err = Note::from_markdown("bad.md", content, ts());
        assert!(matches!(
            err,
            Err(RecallError::InvalidFrontmatter { .. })
        ));
    }

    #[test]
    fn test_note_kind_round_trip() {
        assert_eq!(
            "long-term".parse::<NoteKind>().expect("parses"),
            NoteKind::LongTerm
        );
        assert_eq!(NoteKind::Daily.to_string(), "daily");
        assert!("weekly".parse::<NoteKind>().is_err());
    }
}
