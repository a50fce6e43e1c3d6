//! `recall contacts` command - contact mention counts and contexts

use crate::cli::{Cli, OutputFormat};
use recall_core::error::Result;
use recall_core::index;
use recall_core::store::Store;

pub fn execute(cli: &Cli, store: &Store, name: Option<&str>) -> Result<()> {
    let notes = store.list_notes()?;

    match name {
        Some(name) => {
            let contexts = index::contact_contexts(&notes, name);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&contexts)?),
                OutputFormat::Human => {
                    for ctx in &contexts {
                        println!("{}: ...{}...", ctx.note_path, ctx.context.trim());
                    }
                    if !cli.quiet {
                        eprintln!("{} mentions of @{}", contexts.len(), name);
                    }
                }
            }
        }
        None => {
            let counts = index::contact_counts(&notes);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
                OutputFormat::Human => {
                    for c in &counts {
                        println!("@{}\t{}", c.name, c.count);
                    }
                }
            }
        }
    }
    Ok(())
}
