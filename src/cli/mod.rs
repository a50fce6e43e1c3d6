//! CLI argument parsing for recall
//!
//! Global flags: --root, --format, --quiet, --verbose, --log-level,
//! --log-json

pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use output::OutputFormat;

/// Recall - second-brain CLI for notes, links, and summaries
#[derive(Parser, Debug)]
#[command(name = "recall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store root directory (default: ~/.recall)
    #[arg(long, global = true, env = "RECALL_ROOT")]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Summary window length
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    /// Last 7 days
    Weekly,
    /// Last 30 days
    Monthly,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new recall store
    Init,

    /// List notes in the store
    List,

    /// Parse a note: mentions, tags, links, action items, dates
    Parse {
        /// Note name or file name
        note: String,
    },

    /// Render a note to display markup using the contact directory
    Render {
        /// Note name or file name
        note: String,
    },

    /// Show forward links of a note
    Links {
        /// Note name or file name
        note: String,
    },

    /// Show notes linking to a title
    Backlinks {
        /// Wiki-link title to search for
        title: String,
    },

    /// Print the full link graph
    Graph,

    /// Aggregate link statistics
    Stats,

    /// Tag counts across the store, or notes carrying one tag
    Tags {
        /// Show only notes containing this tag
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Contact mention counts, or contexts for one contact
    Contacts {
        /// Contact name to show mention contexts for
        name: Option<String>,
    },

    /// Generate a weekly or monthly digest
    Summary {
        #[arg(long, value_enum, default_value = "weekly")]
        period: Period,

        /// Reference time (ISO 8601), defaults to the current time
        #[arg(long)]
        now: Option<String>,

        /// Condensed plain-text digest instead of markdown
        #[arg(long)]
        digest: bool,
    },

    /// Structure a voice transcript into a titled record
    Voice {
        /// Transcript file path
        transcript: PathBuf,

        /// Save the structured markdown into the store
        #[arg(long)]
        save: bool,
    },
}
