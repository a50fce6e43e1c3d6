//! `recall summary` command - weekly/monthly digest

use chrono::{DateTime, Duration, Utc};

use crate::cli::{Cli, OutputFormat, Period};
use recall_core::error::{RecallError, Result};
use recall_core::store::Store;
use recall_core::summary;

pub fn execute(
    cli: &Cli,
    store: &Store,
    period: Period,
    now: Option<&str>,
    digest: bool,
) -> Result<()> {
    let now: DateTime<Utc> = match now {
        Some(raw) => raw
            .parse()
            .map_err(|e| RecallError::UsageError(format!("invalid --now value: {}", e)))?,
        None => Utc::now(),
    };

    let window = match period {
        Period::Weekly => Duration::days(7),
        Period::Monthly => Duration::days(30),
    };
    let start = now - window;

    let notes = store.list_notes()?;
    let summary = summary::generate(&notes, start, now, now)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Human => {
            if digest {
                println!("{}", summary::format_text(&summary));
            } else {
                println!("{}", summary::format_markdown(&summary));
            }
        }
    }
    Ok(())
}
