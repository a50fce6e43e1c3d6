//! `recall parse` command - annotations of a single note

use crate::cli::{Cli, OutputFormat};
use recall_core::annotate;
use recall_core::error::Result;
use recall_core::store::Store;

pub fn execute(cli: &Cli, store: &Store, note_name: &str) -> Result<()> {
    let note = store.read_note(note_name)?;
    let annotations = annotate::parse(&note.body);
    let action_items = annotate::extract_action_items(&note.body);
    let dates = annotate::extract_dates(&note.body);
    let suggested = annotate::suggest_tags(&note.body);

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "note": note.name,
                "mentions": annotations.mentions,
                "tags": annotations.tags,
                "contacts": annotations.contacts,
                "links": annotations.links,
                "actionItems": action_items,
                "dates": dates,
                "suggestedTags": suggested,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !annotations.contacts.is_empty() {
                println!("Contacts: {}", annotations.contacts.join(", "));
            }
            if !annotations.tags.is_empty() {
                println!("Tags: {}", annotations.tags.join(", "));
            }
            if !annotations.links.is_empty() {
                println!("Links: {}", annotations.links.join(", "));
            }
            if !action_items.is_empty() {
                println!("Action items:");
                for item in &action_items {
                    let due = item
                        .due_date
                        .as_deref()
                        .map(|d| format!(" (by {})", d))
                        .unwrap_or_default();
                    println!("  - [ ] {}{} [{}]", item.text, due, item.priority);
                }
            }
            if !dates.is_empty() {
                let values: Vec<&str> = dates.iter().map(|d| d.value.as_str()).collect();
                println!("Dates: {}", values.join(", "));
            }
            if !suggested.is_empty() {
                println!("Suggested tags: {}", suggested.join(", "));
            }
        }
    }
    Ok(())
}
