//! Annotation parser: extracts semantic structure from free-form note text
//!
//! The note convention is the interchange format of the whole dashboard:
//! `@Name` for contacts, `#tag` for tags, `[[Title]]` for wiki links,
//! `- [ ] text` for action items. Extraction is pure and total: any string
//! yields a (possibly empty) result, never an error.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// `@Name` where Name is a capitalized word optionally followed by one more
/// capitalized-or-lowercase word ("First Last", "First dough").
const CONTACT_PATTERN: &str = r"@([A-Z][a-z]+(?:[ \t][A-Z]?[a-z]+)?)";

/// `#tag` with alphanumerics plus `-`/`_`
const TAG_PATTERN: &str = r"#([A-Za-z0-9_-]+)";

/// `[[Title]]` where Title is any text not containing `]`
const WIKI_LINK_PATTERN: &str = r"\[\[([^\]]+)\]\]";

/// Checkbox-style action line: optional `-`/`*` bullet, then `[ ]`
const CHECKBOX_PATTERN: &str = r"(?m)^\s*[-*]?\s*\[ \]\s*(.+)$";

/// Free-text "follow up (with X) (by Y)" phrase
const FOLLOW_UP_PATTERN: &str = r"(?i:follow\s+up)(?:\s+(?i:with)\s+([A-Z][A-Za-z]+(?:[ \t][A-Z][A-Za-z]+)?))?(?:\s+(?i:by)\s+([^.\n]+))?";

/// Strict ISO date token
const ISO_DATE_PATTERN: &str = r"\b(\d{4}-\d{2}-\d{2})\b";

/// Relative-date phrases are detected but intentionally not resolved to
/// concrete dates; no calendar arithmetic is attempted.
const RELATIVE_DATE_PATTERN: &str = r"(?i)\b(?:today|tomorrow|yesterday|next week|next month|this week)\b";

/// Priority/urgency markers stripped from action item text
const URGENCY_WORD_PATTERN: &str = r"(?i)\b(?:urgent|important)\b";

/// Trailing `by <phrase>` due clause
const DUE_CLAUSE_PATTERN: &str = r"(?i)\s+by\s+(.+)$";

/// Keyword -> tag suggestion table. A closed vocabulary: new rules are added
/// here, not learned.
const TAG_SUGGESTIONS: &[(&str, &str)] = &[
    ("sensor", "iot"),
    ("gateway", "iot"),
    ("device", "iot"),
    ("firmware", "iot"),
    ("telemetry", "iot"),
    ("solar", "energy"),
    ("battery", "energy"),
    ("invoice", "finance"),
    ("payment", "finance"),
    ("budget", "finance"),
    ("deal", "sales"),
    ("contract", "sales"),
    ("proposal", "sales"),
    ("tender", "sales"),
    ("quote", "sales"),
    ("pricing", "sales"),
    ("meeting", "meeting"),
    ("demo", "demo"),
    ("interview", "hiring"),
    ("candidate", "hiring"),
    ("deploy", "engineering"),
    ("outage", "engineering"),
];

/// Kind of recognized mention token.
///
/// `Project` and `Deal` exist for dashboard filtering; text extraction only
/// ever produces the first three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    Contact,
    Tag,
    Link,
    Project,
    Deal,
}

/// A recognized token with its byte offsets in the source text.
///
/// `start..end` spans the full token including its `@`/`#`/`[[...]]`
/// delimiters; `value` is the inner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub kind: MentionKind,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// Result of parsing a note body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Annotations {
    /// Every recognized token in positional order
    pub mentions: Vec<Mention>,
    /// Deduplicated tags, normalized to lowercase
    pub tags: Vec<String>,
    /// Deduplicated contact names, case preserved
    pub contacts: Vec<String>,
    /// Deduplicated wiki-link titles, verbatim
    pub links: Vec<String>,
}

/// Action item priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// A task-like line extracted from note text. Completion state is not
/// tracked; items are recomputed on every parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: Priority,
}

/// A date-like token found in note text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMention {
    /// The matched substring
    pub value: String,
    /// Resolved date for ISO tokens; `None` for relative phrases
    pub date: Option<NaiveDate>,
    pub start: usize,
    pub end: usize,
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, pattern, "failed to compile extraction regex");
            None
        }
    }
}

/// Extract contact mentions, tags, and wiki links from a text blob.
///
/// Contact names are not validated against a directory here; resolution
/// happens downstream in the renderer.
pub fn parse(text: &str) -> Annotations {
    let mut out = Annotations::default();
    let mut seen_contacts: HashSet<String> = HashSet::new();
    let mut seen_tags: HashSet<String> = HashSet::new();
    let mut seen_links: HashSet<String> = HashSet::new();

    if let Some(re) = compile(CONTACT_PATTERN) {
        for cap in re.captures_iter(text) {
            let Some(m) = cap.get(0) else { continue };
            let value = cap[1].to_string();
            out.mentions.push(Mention {
                kind: MentionKind::Contact,
                value: value.clone(),
                start: m.start(),
                end: m.end(),
            });
            if seen_contacts.insert(value.clone()) {
                out.contacts.push(value);
            }
        }
    }

    if let Some(re) = compile(TAG_PATTERN) {
        for cap in re.captures_iter(text) {
            let Some(m) = cap.get(0) else { continue };
            let value = cap[1].to_lowercase();
            out.mentions.push(Mention {
                kind: MentionKind::Tag,
                value: value.clone(),
                start: m.start(),
                end: m.end(),
            });
            if seen_tags.insert(value.clone()) {
                out.tags.push(value);
            }
        }
    }

    if let Some(re) = compile(WIKI_LINK_PATTERN) {
        for cap in re.captures_iter(text) {
            let Some(m) = cap.get(0) else { continue };
            let value = cap[1].to_string();
            out.mentions.push(Mention {
                kind: MentionKind::Link,
                value: value.clone(),
                start: m.start(),
                end: m.end(),
            });
            if seen_links.insert(value.clone()) {
                out.links.push(value);
            }
        }
    }

    out.mentions.sort_by_key(|m| m.start);
    out
}

/// Extract action items from note text.
///
/// Two pattern families are scanned in sequence: checkbox lines first, then
/// free-text follow-up phrases. Within a family, items appear in source
/// order; the families themselves are not interleaved by position.
pub fn extract_action_items(text: &str) -> Vec<ActionItem> {
    let mut items = extract_checkbox_items(text);
    items.extend(extract_follow_ups(text));
    items
}

/// Extract only checkbox-style action lines (`- [ ] text`)
pub fn extract_checkbox_items(text: &str) -> Vec<ActionItem> {
    let mut items = Vec::new();
    if let Some(re) = compile(CHECKBOX_PATTERN) {
        for cap in re.captures_iter(text) {
            items.push(checkbox_item(cap[1].trim()));
        }
    }
    items
}

/// Extract only free-text "follow up" phrases
pub fn extract_follow_ups(text: &str) -> Vec<ActionItem> {
    let mut items = Vec::new();
    if let Some(re) = compile(FOLLOW_UP_PATTERN) {
        for cap in re.captures_iter(text) {
            let item_text = match cap.get(1) {
                Some(target) => format!("Follow up with {}", target.as_str()),
                None => "Follow up".to_string(),
            };
            items.push(ActionItem {
                text: item_text,
                due_date: cap.get(2).map(|m| m.as_str().trim().to_string()),
                priority: Priority::Medium,
            });
        }
    }
    items
}

fn checkbox_item(raw: &str) -> ActionItem {
    let lower = raw.to_lowercase();
    let priority = if raw.contains("!!!") || lower.contains("urgent") {
        Priority::High
    } else {
        Priority::Medium
    };

    // Strip urgency markers, then normalize whitespace before looking for a
    // trailing due clause.
    let mut text = raw.replace('!', "");
    if let Some(re) = compile(URGENCY_WORD_PATTERN) {
        text = re.replace_all(&text, "").into_owned();
    }
    let mut text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut due_date = None;
    let mut clause_start = None;
    if let Some(re) = compile(DUE_CLAUSE_PATTERN) {
        if let Some(cap) = re.captures(&text) {
            due_date = cap.get(1).map(|m| m.as_str().trim().to_string());
            clause_start = cap.get(0).map(|m| m.start());
        }
    }
    if let Some(at) = clause_start {
        text.truncate(at);
    }

    ActionItem {
        text: text.trim().to_string(),
        due_date,
        priority,
    }
}

/// Extract date-like tokens: strict ISO `YYYY-MM-DD` tokens (resolved) and
/// relative phrases (detected only, never resolved).
pub fn extract_dates(text: &str) -> Vec<DateMention> {
    let mut dates = Vec::new();

    if let Some(re) = compile(ISO_DATE_PATTERN) {
        for cap in re.captures_iter(text) {
            let Some(m) = cap.get(0) else { continue };
            let Ok(date) = NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d") else {
                continue;
            };
            dates.push(DateMention {
                value: m.as_str().to_string(),
                date: Some(date),
                start: m.start(),
                end: m.end(),
            });
        }
    }

    if let Some(re) = compile(RELATIVE_DATE_PATTERN) {
        for m in re.find_iter(text) {
            dates.push(DateMention {
                value: m.as_str().to_string(),
                date: None,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    dates
}

/// Suggest tags from a fixed keyword table, scanned case-insensitively
/// against the whole text.
pub fn suggest_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut suggested = Vec::new();
    for (keyword, tag) in TAG_SUGGESTIONS {
        if lower.contains(keyword) && !suggested.iter().any(|t| t == tag) {
            suggested.push((*tag).to_string());
        }
    }
    suggested
}
