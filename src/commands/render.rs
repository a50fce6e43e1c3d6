//! `recall render` command - note body to display markup

use crate::cli::{Cli, OutputFormat};
use recall_core::error::Result;
use recall_core::render;
use recall_core::store::Store;

pub fn execute(cli: &Cli, store: &Store, note_name: &str) -> Result<()> {
    let note = store.read_note(note_name)?;
    let contacts = store.contacts()?;
    let markup = render::render(&note.body, &contacts);

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "note": note.name,
                "html": markup,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => println!("{}", markup),
    }
    Ok(())
}
