//! Voice transcript structuring
//!
//! Turns a raw transcript string into a titled, typed record convertible to
//! markdown. Heuristics here are deliberately similar to the annotation
//! parser but operate on spoken-language phrasing rather than note syntax.

use crate::annotate;
use crate::text;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

const MAX_KEY_POINTS: usize = 5;
const MAX_SUMMARY_CHARS: usize = 200;
const FALLBACK_SENTENCE_MIN_CHARS: usize = 10;
const SUMMARY_SENTENCE_MIN_CHARS: usize = 5;
const NOTE_TITLE_MAX_CHARS: usize = 60;

/// "(with|met|spoke to|called|talked to) <Name>"
const CONTACT_AFTER_VERB_PATTERN: &str =
    r"\b(?i:with|met|spoke to|called|talked to)\b[ \t]+([A-Z][a-z]+(?:[ \t][A-Z][a-z]+)?)";

/// "<Name> (said|mentioned|told|asked)"
const CONTACT_BEFORE_VERB_PATTERN: &str =
    r"\b([A-Z][a-z]+(?:[ \t][A-Z][a-z]+)?)[ \t]+(?i:said|mentioned|told|asked)\b";

/// Common false positives for spoken names
const NAME_STOPLIST: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "Today",
    "Tomorrow", "The", "This", "That",
];

/// Modal obligation phrases ("need to X")
const MODAL_ACTION_PATTERN: &str = r"(?i)\b(?:need to|have to|should|must|will)\s+([^.!?\n]+)";

/// Follow-up phrases
const FOLLOW_UP_ACTION_PATTERN: &str = r"(?i)\bfollow\s*up(?:\s+with)?\s+([^.!?\n]+)";

/// Communication-action phrases ("email X")
const COMM_ACTION_PATTERN: &str = r"(?i)\b(?:send|email|call|message|write)\s+[^.!?\n]+";

/// Imperative-reminder phrases ("remember to X")
const IMPERATIVE_ACTION_PATTERN: &str =
    r"(?i)\b(?:remember to|don't forget to|make sure to)\s+([^.!?\n]+)";

/// "<assignee> to <task>" split inside an extracted item
const ASSIGNEE_PATTERN: &str = r"^([A-Z][a-z]+)\s+to\s+(.+)$";

/// Fixed relative-date keyword set; the first hit anywhere in the transcript
/// becomes the due date of every extracted item (see DESIGN.md).
const DUE_KEYWORD_PATTERN: &str = r"(?i)\b(?:today|tonight|tomorrow|next week|next month|this week|end of day|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b";

/// Sentences containing one of these words are kept as key points
const IMPORTANCE_KEYWORDS: &[&str] = &[
    "important", "key", "main", "critical", "must", "need", "decided", "agreed", "deadline",
    "budget", "action",
];

/// "about/regarding/discussing/on <topic>" for meeting titles
const TOPIC_PATTERN: &str = r"(?i)\b(?:about|regarding|discussing|on)\s+([^.!?\n]+)";

/// Clause after a reminder trigger
const REMINDER_CLAUSE_PATTERN: &str =
    r"(?i)\b(?:remember|remind me|don't forget)(?:\s+(?:to|that))?\s+([^.!?\n]+)";

/// Clause after an idea trigger
const IDEA_CLAUSE_PATTERN: &str = r"(?i)\b(?:idea[:\s]|what if|maybe we could)\s*([^.!?\n]+)";

/// Memory type classified from the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Meeting,
    Call,
    Note,
    Idea,
    Reminder,
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryType::Meeting => write!(f, "meeting"),
            MemoryType::Call => write!(f, "call"),
            MemoryType::Note => write!(f, "note"),
            MemoryType::Idea => write!(f, "idea"),
            MemoryType::Reminder => write!(f, "reminder"),
        }
    }
}

/// An action item extracted from spoken phrasing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceActionItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// The normalized record produced from a raw transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredMemory {
    pub title: String,
    pub memory_type: MemoryType,
    /// At most 200 characters
    pub summary: String,
    pub attendees: Vec<String>,
    pub key_points: Vec<String>,
    pub action_items: Vec<VoiceActionItem>,
    pub tags: Vec<String>,
    pub contacts: Vec<String>,
    /// Original transcript, retained verbatim
    pub raw_transcript: String,
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, pattern, "failed to compile voice regex");
            None
        }
    }
}

/// Classify the transcript with a priority-ordered keyword ladder.
/// The first matching rule wins; the call family is checked against
/// "call"/"phone"/"spoke to" so "call with Jane" classifies as a call, not a
/// meeting.
pub fn detect_memory_type(transcript: &str) -> MemoryType {
    let lower = transcript.to_lowercase();
    if lower.contains("meeting") || lower.contains("discussed with") {
        MemoryType::Meeting
    } else if lower.contains("call") || lower.contains("phone") || lower.contains("spoke to") {
        MemoryType::Call
    } else if lower.contains("remember") || lower.contains("remind me") || lower.contains("don't forget") {
        MemoryType::Reminder
    } else if lower.contains("idea") || lower.contains("what if") || lower.contains("maybe we could") {
        MemoryType::Idea
    } else {
        MemoryType::Note
    }
}

fn stoplisted_name(name: &str) -> bool {
    let first = name.split_whitespace().next().unwrap_or(name);
    NAME_STOPLIST.iter().any(|s| s.eq_ignore_ascii_case(first))
}

/// Extract contact names from spoken phrasing, filtered against a stoplist
/// of common false positives and deduplicated
pub fn extract_contacts(transcript: &str) -> Vec<String> {
    let mut contacts = Vec::new();
    for pattern in [CONTACT_AFTER_VERB_PATTERN, CONTACT_BEFORE_VERB_PATTERN] {
        let Some(re) = compile(pattern) else { continue };
        for cap in re.captures_iter(transcript) {
            let name = cap[1].trim().to_string();
            if stoplisted_name(&name) {
                continue;
            }
            if !contacts.iter().any(|c| *c == name) {
                contacts.push(name);
            }
        }
    }
    contacts
}

fn global_due_keyword(transcript: &str) -> Option<String> {
    let re = compile(DUE_KEYWORD_PATTERN)?;
    re.find(transcript).map(|m| m.as_str().to_lowercase())
}

/// Extract action items from spoken phrasing.
///
/// Four pattern families are scanned in sequence. The due date, when
/// present, is the first relative-date keyword found anywhere in the whole
/// transcript, assigned to every item.
pub fn extract_action_items(transcript: &str) -> Vec<VoiceActionItem> {
    let due = global_due_keyword(transcript);
    let mut items: Vec<VoiceActionItem> = Vec::new();

    let mut push = |text: String| {
        let trimmed = text.trim().trim_end_matches(',').to_string();
        if trimmed.is_empty() {
            return;
        }
        if items
            .iter()
            .any(|i| i.text.eq_ignore_ascii_case(&trimmed))
        {
            return;
        }
        items.push(VoiceActionItem {
            text: trimmed,
            assignee: None,
            due_date: None,
        });
    };

    for pattern in [MODAL_ACTION_PATTERN, FOLLOW_UP_ACTION_PATTERN, IMPERATIVE_ACTION_PATTERN] {
        let Some(re) = compile(pattern) else { continue };
        for cap in re.captures_iter(transcript) {
            push(cap[1].to_string());
        }
    }
    if let Some(re) = compile(COMM_ACTION_PATTERN) {
        for m in re.find_iter(transcript) {
            push(m.as_str().to_string());
        }
    }

    let assignee_re = compile(ASSIGNEE_PATTERN);
    for item in &mut items {
        if let Some(re) = &assignee_re {
            if let Some(cap) = re.captures(&item.text) {
                let assignee = cap[1].to_string();
                let task = cap[2].to_string();
                item.assignee = Some(assignee);
                item.text = task;
            }
        }
        item.due_date = due.clone();
    }

    items
}

/// Keep sentences containing an importance keyword; fall back to the first
/// three substantial sentences when none match. Capped to five.
pub fn extract_key_points(transcript: &str) -> Vec<String> {
    let sentences = text::split_sentences(transcript);

    let mut points: Vec<String> = sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            IMPORTANCE_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|s| s.to_string())
        .collect();

    if points.is_empty() {
        points = sentences
            .iter()
            .filter(|s| s.len() >= FALLBACK_SENTENCE_MIN_CHARS)
            .take(3)
            .map(|s| s.to_string())
            .collect();
    }

    points.truncate(MAX_KEY_POINTS);
    points
}

fn first_capture(pattern: &str, transcript: &str) -> Option<String> {
    let re = compile(pattern)?;
    re.captures(transcript)
        .and_then(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
}

/// Generate a type-specific title for the structured record
pub fn generate_title(transcript: &str, memory_type: MemoryType, contacts: &[String]) -> String {
    match memory_type {
        MemoryType::Meeting => {
            let mut title = match contacts.first() {
                Some(name) => format!("Meeting with {}", name),
                None => "Meeting".to_string(),
            };
            if let Some(topic) = first_capture(TOPIC_PATTERN, transcript) {
                title.push_str(&format!(" about {}", text::truncate_chars(&topic, 40)));
            }
            title
        }
        MemoryType::Call => match contacts.first() {
            Some(name) => format!("Call with {}", name),
            None => "Call notes".to_string(),
        },
        MemoryType::Reminder => match first_capture(REMINDER_CLAUSE_PATTERN, transcript) {
            Some(clause) => format!("Reminder: {}", text::truncate_chars(&clause, 60)),
            None => "Reminder".to_string(),
        },
        MemoryType::Idea => match first_capture(IDEA_CLAUSE_PATTERN, transcript) {
            Some(clause) => format!("Idea: {}", text::truncate_chars(&clause, 60)),
            None => "Idea".to_string(),
        },
        MemoryType::Note => {
            let first = text::split_sentences(transcript)
                .first()
                .map(|s| s.to_string())
                .unwrap_or_default();
            if !first.is_empty() && first.chars().count() <= NOTE_TITLE_MAX_CHARS {
                first
            } else {
                "Voice note".to_string()
            }
        }
    }
}

fn summarize(transcript: &str) -> String {
    let picked: Vec<&str> = text::split_sentences(transcript)
        .into_iter()
        .filter(|s| s.len() > SUMMARY_SENTENCE_MIN_CHARS)
        .take(2)
        .collect();
    text::truncate_chars(&picked.join(". "), MAX_SUMMARY_CHARS)
}

/// Structure a raw transcript into a titled, typed record
#[tracing::instrument(skip(transcript), fields(chars = transcript.len()))]
pub fn structure(transcript: &str) -> StructuredMemory {
    let memory_type = detect_memory_type(transcript);
    let contacts = extract_contacts(transcript);
    let attendees = match memory_type {
        MemoryType::Meeting | MemoryType::Call => contacts.clone(),
        _ => Vec::new(),
    };

    StructuredMemory {
        title: generate_title(transcript, memory_type, &contacts),
        memory_type,
        summary: summarize(transcript),
        attendees,
        key_points: extract_key_points(transcript),
        action_items: extract_action_items(transcript),
        tags: annotate::suggest_tags(transcript),
        contacts,
        raw_transcript: transcript.to_string(),
    }
}

/// Render a structured memory as markdown with a fixed section layout
pub fn to_markdown(structured: &StructuredMemory, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", structured.title));
    out.push_str(&format!(
        "`{}` captured {}\n\n",
        structured.memory_type,
        date.format("%Y-%m-%d")
    ));

    if !structured.summary.is_empty() {
        out.push_str(&format!("{}\n\n", structured.summary));
    }

    if !structured.contacts.is_empty() {
        out.push_str("## People\n\n");
        for name in &structured.contacts {
            out.push_str(&format!("- @{}\n", name));
        }
        out.push('\n');
    }

    if !structured.key_points.is_empty() {
        out.push_str("## Key Points\n\n");
        for point in &structured.key_points {
            out.push_str(&format!("- {}\n", point));
        }
        out.push('\n');
    }

    if !structured.action_items.is_empty() {
        out.push_str("## Action Items\n\n");
        for item in &structured.action_items {
            out.push_str(&format!("- [ ] {}", item.text));
            if let Some(assignee) = &item.assignee {
                out.push_str(&format!(" (assignee: {})", assignee));
            }
            if let Some(due) = &item.due_date {
                out.push_str(&format!(" (due: {})", due));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !structured.tags.is_empty() {
        let tags: Vec<String> = structured.tags.iter().map(|t| format!("#{}", t)).collect();
        out.push_str(&format!("{}\n\n", tags.join(" ")));
    }

    out.push_str("<details>\n<summary>Raw transcript</summary>\n\n");
    out.push_str(&structured.raw_transcript);
    out.push_str("\n</details>\n");
    out
}
