use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lorekeep")]
#[command(
    about = "Distill recent AI coding sessions into a project learnings file",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Project whose sessions are read (default: $LOREKEEP_PROJECT_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub project_root: Option<String>,

    /// Config file (default: $LOREKEEP_CONFIG, then <config dir>/lorekeep/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Diagnostics verbosity on stderr; RUST_LOG takes precedence when set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract learnings from recent sessions and append them to the knowledge file
    Extract {
        /// Run every stage but write and publish nothing; print the entry instead
        #[arg(long)]
        dry_run: bool,
    },

    /// List the sessions a run would read
    Sessions {
        /// Also list indexed sessions outside the time window
        #[arg(long)]
        all: bool,
    },

    /// Print the transcript that would be sent to the generator
    Transcript,

    /// Check a file (or stdin) for secrets with the same rules the extract gate uses
    Scan {
        /// File to scan; reads stdin when omitted
        file: Option<PathBuf>,
    },
}
