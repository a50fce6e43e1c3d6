//! Tag and contact aggregation across a note collection
//!
//! Batch/on-demand computation: everything here is recomputed from raw text
//! on every call by re-running the annotation parser per note. The core
//! holds no index state between calls; callers that want persistence own
//! their cache.

use crate::annotate;
use crate::note::Note;
use crate::text;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Radius of context snippets, matching backlink windows
const CONTEXT_RADIUS: usize = 100;

/// An entity name with its aggregate mention count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub name: String,
    pub count: usize,
}

/// A context snippet around a contact mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionContext {
    pub note_path: String,
    pub note_name: String,
    pub context: String,
}

fn sorted_counts(counts: HashMap<String, usize>) -> Vec<EntityCount> {
    let mut out: Vec<EntityCount> = counts
        .into_iter()
        .map(|(name, count)| EntityCount { name, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

/// Count every tag mention across the collection, keyed by lowercase tag
#[tracing::instrument(skip(notes), fields(note_count = notes.len()))]
pub fn tag_counts(notes: &[Note]) -> Vec<EntityCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for note in notes {
        for mention in annotate::parse(&note.body).mentions {
            if mention.kind == annotate::MentionKind::Tag {
                *counts.entry(mention.value).or_insert(0) += 1;
            }
        }
    }
    sorted_counts(counts)
}

/// Count every contact mention across the collection, case preserved
#[tracing::instrument(skip(notes), fields(note_count = notes.len()))]
pub fn contact_counts(notes: &[Note]) -> Vec<EntityCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for note in notes {
        for mention in annotate::parse(&note.body).mentions {
            if mention.kind == annotate::MentionKind::Contact {
                *counts.entry(mention.value).or_insert(0) += 1;
            }
        }
    }
    sorted_counts(counts)
}

/// Filter the collection down to notes containing the given tag
/// (compared after lowercase normalization)
pub fn notes_with_tag<'a>(notes: &'a [Note], tag: &str) -> Vec<&'a Note> {
    let wanted = tag.trim_start_matches('#').to_lowercase();
    notes
        .iter()
        .filter(|n| annotate::parse(&n.body).tags.iter().any(|t| *t == wanted))
        .collect()
}

/// Enumerate every context snippet where the given contact name is
/// mentioned, across all notes
pub fn contact_contexts(notes: &[Note], name: &str) -> Vec<MentionContext> {
    let pattern = format!(r"(?i)@{}", regex::escape(name.trim_start_matches('@')));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(error = %e, name, "failed to compile contact context pattern");
            return Vec::new();
        }
    };

    let mut contexts = Vec::new();
    for note in notes {
        for m in re.find_iter(&note.body) {
            contexts.push(MentionContext {
                note_path: note.path.clone(),
                note_name: note.name.clone(),
                context: text::context_window(&note.body, m.start(), m.end(), CONTEXT_RADIUS)
                    .to_string(),
            });
        }
    }
    contexts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteKind;
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        "2024-06-01T10:00:00Z".parse().expect("valid timestamp")
    }

    fn note(path: &str, body: &str) -> Note {
        Note {
            path: path.to_string(),
            name: path.trim_end_matches(".md").to_string(),
            body: body.to_string(),
            modified: ts(),
            kind: NoteKind::Daily,
        }
    }

    #[test]
    fn test_tag_counts_across_notes() {
        let notes = vec![
            note("a.md", "#iot work and #iot again"),
            note("b.md", "#IoT and #energy"),
        ];
        let counts = tag_counts(&notes);
        assert_eq!(counts[0].name, "iot");
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[1].name, "energy");
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_contact_counts_preserve_case() {
        let notes = vec![note("a.md", "met @Jane Doe, pinged @Jane Doe")];
        let counts = contact_counts(&notes);
        assert_eq!(counts[0].name, "Jane Doe");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_counts_tie_broken_by_name() {
        let notes = vec![note("a.md", "#beta #alpha")];
        let counts = tag_counts(&notes);
        assert_eq!(counts[0].name, "alpha");
        assert_eq!(counts[1].name, "beta");
    }

    #[test]
    fn test_notes_with_tag_accepts_hash_prefix() {
        let notes = vec![note("a.md", "#iot stuff"), note("b.md", "no tags")];
        assert_eq!(notes_with_tag(&notes, "#iot").len(), 1);
        assert_eq!(notes_with_tag(&notes, "IOT").len(), 1);
        assert!(notes_with_tag(&notes, "missing").is_empty());
    }

    #[test]
    fn test_contact_contexts_enumerates_all_occurrences() {
        let notes = vec![
            note("a.md", "morning sync with @Jane about the rollout"),
            note("b.md", "@jane again, and later @Jane once more"),
        ];
        let contexts = contact_contexts(&notes, "Jane");
        assert_eq!(contexts.len(), 3);
        assert!(contexts[0].context.contains("morning sync"));
        assert_eq!(contexts[1].note_path, "b.md");
    }

    #[test]
    fn test_empty_collection_yields_empty_results() {
        assert!(tag_counts(&[]).is_empty());
        assert!(contact_counts(&[]).is_empty());
        assert!(contact_contexts(&[], "Jane").is_empty());
    }
}
