//! Claude Code session storage.
//!
//! Each project directory under `~/.claude/projects/` holds one JSONL log per
//! session plus a `sessions-index.json` manifest.

pub mod extract;
pub mod io;
pub(crate) mod schema;

pub use self::extract::{
    Extraction, INDIVIDUAL_SKIP_REPORTS, SkipReporter, extract_session, extract_sessions,
};
pub use self::io::{RecordParse, SessionLogReader, SkippedRecord, load_session_index, parse_record};
