//! Link graph commands: `links`, `backlinks`, `graph`, `stats`

use crate::cli::{Cli, OutputFormat};
use recall_core::error::Result;
use recall_core::graph;
use recall_core::store::Store;

pub fn forward(cli: &Cli, store: &Store, note_name: &str) -> Result<()> {
    let note = store.read_note(note_name)?;
    let notes = store.list_notes()?;
    let links = graph::find_forward_links(&note.body, &notes);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
        OutputFormat::Human => {
            for link in &links {
                match &link.path {
                    Some(path) => println!("[[{}]] -> {}", link.title, path),
                    None => println!("[[{}]] -> (missing)", link.title),
                }
            }
            if !cli.quiet {
                eprintln!("{} links", links.len());
            }
        }
    }
    Ok(())
}

pub fn backlinks(cli: &Cli, store: &Store, title: &str) -> Result<()> {
    let notes = store.list_notes()?;
    let backlinks = graph::find_backlinks(title, &notes);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&backlinks)?),
        OutputFormat::Human => {
            for bl in &backlinks {
                println!("{}: ...{}...", bl.source_path, bl.context.trim());
            }
            if !cli.quiet {
                eprintln!("{} backlinks", backlinks.len());
            }
        }
    }
    Ok(())
}

pub fn graph(cli: &Cli, store: &Store) -> Result<()> {
    let notes = store.list_notes()?;
    let link_graph = graph::build_link_graph(&notes);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&link_graph)?),
        OutputFormat::Human => {
            for edge in &link_graph.edges {
                println!("{} -> {}", edge.from, edge.to);
            }
            if !cli.quiet {
                eprintln!(
                    "{} nodes, {} edges",
                    link_graph.nodes.len(),
                    link_graph.edges.len()
                );
            }
        }
    }
    Ok(())
}

pub fn stats(cli: &Cli, store: &Store) -> Result<()> {
    let notes = store.list_notes()?;
    let stats = graph::link_stats(&notes);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Human => {
            println!("Total links: {}", stats.total_links);
            println!("Unique targets: {}", stats.unique_targets);
            println!("Orphan links: {}", stats.orphan_links);
            if !stats.most_linked.is_empty() {
                println!("Most linked:");
                for lc in &stats.most_linked {
                    println!("  [[{}]] ({})", lc.title, lc.count);
                }
            }
        }
    }
    Ok(())
}
