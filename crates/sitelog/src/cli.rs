use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sitelog_core::Fields;

#[derive(Parser)]
#[command(name = "sitelog", about = "Inspect and manage bounded site logs")]
pub struct Cli {
    /// Config file (defaults apply when it does not exist)
    #[arg(long, short, default_value = "sitelog.toml")]
    pub config: PathBuf,

    /// Override the database path from the config file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the effective settings of a log
    Settings {
        /// Log kind (404, mail, search, ...)
        kind: String,
    },
    /// Change the settings of a log
    Configure {
        kind: String,
        /// Accept or drop new entries
        #[arg(long)]
        enabled: Option<bool>,
        /// Entry bound; values below 1 reset to 100
        #[arg(long, allow_negative_numbers = true)]
        max_entries: Option<i64>,
    },
    /// List entries, newest first
    List {
        kind: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Show oldest entries first
        #[arg(long)]
        oldest_first: bool,
    },
    /// Count entries in a log
    Count { kind: String },
    /// Delete every entry in a log
    Clear { kind: String },
    /// Delete one entry
    Delete {
        kind: String,
        /// Entry id
        id: u64,
    },
    /// Append an entry by hand
    Record {
        kind: String,
        /// Field as key=value; repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

/// Parse a `key=value` argument
pub fn parse_field(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got {arg:?}")),
    }
}

/// Collect parsed fields, later duplicates winning
pub fn into_fields(pairs: Vec<(String, String)>) -> Fields {
    pairs.into_iter().collect()
}
