//! Testing infrastructure for lorekeep integration tests.
//!
//! - `TestWorld`: isolated home, sessions root and project for CLI runs
//! - `fixtures`: session log and index builders
//! - `assertions`: checks on the CLI's JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{ProjectSessions, SampleFiles, SessionLogBuilder};
pub use world::{CliResult, TestWorld};
