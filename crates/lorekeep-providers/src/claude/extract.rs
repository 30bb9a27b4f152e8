use crate::Result;
use lorekeep_types::ConversationTurn;
use std::path::{Path, PathBuf};

use super::io::{RecordParse, SessionLogReader, SkippedRecord};

/// Malformed records reported one by one before switching to a single total
pub const INDIVIDUAL_SKIP_REPORTS: usize = 3;

/// Logs skipped records without flooding the output.
///
/// The first `limit` records are logged individually; `finish` emits one
/// aggregate warning when more were seen.
#[derive(Debug)]
pub struct SkipReporter {
    limit: usize,
    seen: usize,
}

impl Default for SkipReporter {
    fn default() -> Self {
        Self::new(INDIVIDUAL_SKIP_REPORTS)
    }
}

impl SkipReporter {
    pub fn new(limit: usize) -> Self {
        Self { limit, seen: 0 }
    }

    pub fn record(&mut self, skipped: &SkippedRecord) {
        self.seen += 1;
        if self.seen <= self.limit {
            tracing::warn!(
                file = %skipped.path.display(),
                line = skipped.line,
                reason = %skipped.reason,
                "skipping malformed session record"
            );
        }
    }

    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn finish(&self) {
        if self.seen > self.limit {
            tracing::warn!(
                skipped = self.seen,
                "skipped {} malformed session records in total",
                self.seen
            );
        }
    }
}

/// Everything pulled out of a batch of session logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Turns from all sessions, in session order then log order
    pub turns: Vec<ConversationTurn>,
    pub skipped: Vec<SkippedRecord>,
    /// Logs listed in the index that no longer exist
    pub missing: Vec<PathBuf>,
    pub sessions_read: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn absorb(mut self, parsed: RecordParse, reporter: &mut SkipReporter) -> Self {
        match parsed {
            RecordParse::Turns(turns) => self.turns.extend(turns),
            RecordParse::Blank => {}
            RecordParse::Malformed(skipped) => {
                reporter.record(&skipped);
                self.skipped.push(skipped);
            }
        }
        self
    }
}

/// Read a single session log.
pub fn extract_session(path: &Path) -> Result<Extraction> {
    let mut reporter = SkipReporter::default();
    let extraction = extract_into(Extraction::default(), path, &mut reporter)?;
    reporter.finish();
    Ok(extraction)
}

/// Read the given logs in order and concatenate their turns.
///
/// Logs that have disappeared since the index was written are reported and
/// skipped; other I/O failures abort.
pub fn extract_sessions(paths: &[PathBuf]) -> Result<Extraction> {
    let mut reporter = SkipReporter::default();
    let mut extraction = Extraction::default();
    for path in paths {
        extraction = extract_into(extraction, path, &mut reporter)?;
    }
    reporter.finish();
    Ok(extraction)
}

fn extract_into(
    mut acc: Extraction,
    path: &Path,
    reporter: &mut SkipReporter,
) -> Result<Extraction> {
    let mut reader = match SessionLogReader::open(path) {
        Ok(reader) => reader,
        Err(crate::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(file = %path.display(), "session log listed in index is missing");
            acc.missing.push(path.to_path_buf());
            return Ok(acc);
        }
        Err(err) => return Err(err),
    };

    acc.sessions_read += 1;
    let before = acc.turns.len();
    let acc = reader.try_fold(acc, |acc, parsed| parsed.map(|p| acc.absorb(p, reporter)))?;
    tracing::debug!(
        file = %path.display(),
        turns = acc.turns.len() - before,
        "extracted session log"
    );
    Ok(acc)
}
