// Error types
pub mod error;

// Claude Code session index and log reading
pub mod claude;

// Recency/activity selection over the session index
pub mod filter;

pub use claude::{
    Extraction, INDIVIDUAL_SKIP_REPORTS, RecordParse, SessionLogReader, SkipReporter,
    SkippedRecord, extract_session, extract_sessions, load_session_index,
};
pub use filter::{FilterWindow, recent_log_paths, select_recent};

// Error types
pub use error::{Error, Result};
