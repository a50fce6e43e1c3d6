use super::NoteKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note frontmatter (YAML header)
///
/// Every field is optional: the common case is a bare daily note whose
/// identity comes entirely from its filename.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFrontmatter {
    /// Display name override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<NoteKind>,
    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// Split raw file content into an optional frontmatter block and the body.
///
/// Frontmatter is a leading `---` fenced YAML block. Anything else, including
/// an unterminated fence, is treated as plain body text.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    let Some(rest) = rest.strip_prefix('\n') else {
        return (None, content);
    };
    match rest.find("\n---") {
        Some(end) => {
            let yaml = &rest[..end];
            let after = &rest[end + 4..];
            (Some(yaml), after.trim_start_matches('\n'))
        }
        None => (None, content),
    }
}
