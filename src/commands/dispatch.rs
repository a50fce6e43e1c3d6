//! Command dispatch logic for recall

use std::path::PathBuf;

use crate::cli::{Cli, Commands};
use crate::commands;
use recall_core::error::Result;
use recall_core::store::{default_store_root, Store};

pub fn run(cli: &Cli) -> Result<()> {
    let root: PathBuf = cli.root.clone().unwrap_or_else(default_store_root);
    tracing::debug!(root = %root.display(), "resolved store root");

    match &cli.command {
        Commands::Init => {
            let store = Store::init(&root)?;
            if !cli.quiet {
                println!("Initialized store at {}", store.root().display());
            }
            Ok(())
        }

        Commands::List => commands::list::execute(cli, &Store::open(&root)?),

        Commands::Parse { note } => commands::parse::execute(cli, &Store::open(&root)?, note),

        Commands::Render { note } => commands::render::execute(cli, &Store::open(&root)?, note),

        Commands::Links { note } => {
            commands::links::forward(cli, &Store::open(&root)?, note)
        }

        Commands::Backlinks { title } => {
            commands::links::backlinks(cli, &Store::open(&root)?, title)
        }

        Commands::Graph => commands::links::graph(cli, &Store::open(&root)?),

        Commands::Stats => commands::links::stats(cli, &Store::open(&root)?),

        Commands::Tags { filter } => {
            commands::tags::execute(cli, &Store::open(&root)?, filter.as_deref())
        }

        Commands::Contacts { name } => {
            commands::contacts::execute(cli, &Store::open(&root)?, name.as_deref())
        }

        Commands::Summary {
            period,
            now,
            digest,
        } => commands::summary::execute(
            cli,
            &Store::open(&root)?,
            *period,
            now.as_deref(),
            *digest,
        ),

        Commands::Voice { transcript, save } => {
            commands::voice::execute(cli, &root, transcript, *save)
        }
    }
}
