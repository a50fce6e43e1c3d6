//! `recall tags` command - tag counts and tag filtering

use crate::cli::{Cli, OutputFormat};
use recall_core::error::Result;
use recall_core::index;
use recall_core::store::Store;

pub fn execute(cli: &Cli, store: &Store, filter: Option<&str>) -> Result<()> {
    let notes = store.list_notes()?;

    match filter {
        Some(tag) => {
            let matching = index::notes_with_tag(&notes, tag);
            match cli.format {
                OutputFormat::Json => {
                    let output: Vec<_> = matching
                        .iter()
                        .map(|n| serde_json::json!({"path": n.path, "name": n.name}))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Human => {
                    for n in &matching {
                        println!("{}", n.name);
                    }
                    if !cli.quiet {
                        eprintln!("{} notes with #{}", matching.len(), tag.trim_start_matches('#'));
                    }
                }
            }
        }
        None => {
            let counts = index::tag_counts(&notes);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
                OutputFormat::Human => {
                    for c in &counts {
                        println!("#{}\t{}", c.name, c.count);
                    }
                }
            }
        }
    }
    Ok(())
}
