// NOTE: lorekeep layering
//
// The CLI only parses arguments, resolves configuration and prints results.
// Every decision about what gets written lives in lorekeep-runtime, so the
// secret gate cannot be bypassed by a front end.
//
// Outcomes like "no session directory" or "nothing new learned" are normal
// results of a run and exit 0; only the secret gate (2) and real failures (1)
// change the exit status.

mod args;
mod commands;
pub mod context;
mod handlers;
pub mod logging;
pub mod types;
mod views;

pub use args::{Cli, Commands};
pub use commands::run;
pub use types::{Exit, LogLevel, OutputFormat};
