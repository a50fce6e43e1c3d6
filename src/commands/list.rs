//! `recall list` command - list notes in the store

use crate::cli::{Cli, OutputFormat};
use recall_core::error::Result;
use recall_core::store::Store;

pub fn execute(cli: &Cli, store: &Store) -> Result<()> {
    let notes = store.list_notes()?;

    match cli.format {
        OutputFormat::Json => {
            let output: Vec<_> = notes
                .iter()
                .map(|n| {
                    serde_json::json!({
                        "path": n.path,
                        "name": n.name,
                        "kind": n.kind,
                        "modified": n.modified,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for n in &notes {
                println!(
                    "{}\t{}\t{}",
                    n.name,
                    n.kind,
                    n.modified.format("%Y-%m-%d %H:%M")
                );
            }
            if !cli.quiet {
                eprintln!("{} notes", notes.len());
            }
        }
    }
    Ok(())
}
