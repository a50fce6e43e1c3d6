//! `recall voice` command - structure a voice transcript

use std::fs;
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use recall_core::error::Result;
use recall_core::store::Store;
use recall_core::voice;

pub fn execute(cli: &Cli, root: &Path, transcript_path: &Path, save: bool) -> Result<()> {
    let transcript = fs::read_to_string(transcript_path)?;
    let structured = voice::structure(&transcript);
    let today = chrono::Utc::now().date_naive();
    let markdown = voice::to_markdown(&structured, today);

    if save {
        let store = Store::open(root)?;
        let path = store.save_note(&structured.title, &markdown)?;
        if !cli.quiet {
            eprintln!("Saved {}", path.display());
        }
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&structured)?),
        OutputFormat::Human => println!("{}", markdown),
    }
    Ok(())
}
