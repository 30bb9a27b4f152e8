use crate::{Error, Result};
use lorekeep_types::{ConversationTurn, SessionIndex, SessionIndexEntry};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::schema::{AssistantContent, ClaudeRecord, IndexDocument, UserContent};

/// Load `sessions-index.json`.
///
/// Individual entries that do not match the expected shape are dropped with a
/// warning; a document that is not JSON, or has no entry list, is an error.
pub fn load_session_index(path: &Path) -> Result<SessionIndex> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let document: IndexDocument = serde_json::from_value(value).map_err(|_| Error::Index {
        path: path.to_path_buf(),
        message: "expected an object with an `entries` array, or an array of entries".to_string(),
    })?;

    let mut entries = Vec::new();
    for (position, raw) in document.into_entries().into_iter().enumerate() {
        match serde_json::from_value::<SessionIndexEntry>(raw) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                tracing::warn!(
                    index = %path.display(),
                    position,
                    error = %err,
                    "ignoring unreadable session index entry"
                );
            }
        }
    }

    Ok(SessionIndex::new(entries))
}

/// A log line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

/// Outcome of reading one line of a session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordParse {
    /// A well-formed record; empty when it carries no conversation text
    Turns(Vec<ConversationTurn>),
    Blank,
    Malformed(SkippedRecord),
}

/// Turn one JSONL record into conversation turns.
///
/// `Err` carries the parser message; the caller attaches the file and line.
pub fn parse_record(line: &[u8]) -> std::result::Result<Vec<ConversationTurn>, String> {
    let value: serde_json::Value = serde_json::from_slice(line).map_err(|e| e.to_string())?;
    // A well-formed object without a type is some record kind lorekeep does not read.
    if value.is_object() && value.get("type").is_none() {
        return Ok(Vec::new());
    }
    let record = ClaudeRecord::deserialize(value).map_err(|e| e.to_string())?;

    let turns = match record {
        ClaudeRecord::User(user) => match user.message.content {
            UserContent::Text(text) => vec![ConversationTurn::user(text)],
            UserContent::Composite(_) => Vec::new(),
        },
        ClaudeRecord::Assistant(assistant) => assistant
            .message
            .content
            .into_iter()
            .filter_map(|block| match block {
                AssistantContent::Text { text } => Some(ConversationTurn::assistant(text)),
                AssistantContent::Other => None,
            })
            .collect(),
        ClaudeRecord::Unknown => Vec::new(),
    };

    Ok(turns)
}

/// Lazy line-by-line reader over a session log.
///
/// Yields one [`RecordParse`] per line. A read failure is yielded once as
/// `Err` and ends the iteration; parse failures never do.
pub struct SessionLogReader<R> {
    reader: R,
    path: PathBuf,
    line: usize,
    buf: Vec<u8>,
    finished: bool,
}

impl SessionLogReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> SessionLogReader<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
            line: 0,
            buf: Vec::new(),
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Conversation turns only, dropping blank and malformed lines.
    pub fn turns(self) -> impl Iterator<Item = Result<ConversationTurn>> {
        self.flat_map(|parsed| {
            let turns: Vec<Result<ConversationTurn>> = match parsed {
                Ok(RecordParse::Turns(turns)) => turns.into_iter().map(Ok).collect(),
                Ok(RecordParse::Blank | RecordParse::Malformed(_)) => Vec::new(),
                Err(err) => vec![Err(err)],
            };
            turns.into_iter()
        })
    }
}

impl<R: BufRead> Iterator for SessionLogReader<R> {
    type Item = Result<RecordParse>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                let content = self.buf.trim_ascii();
                if content.is_empty() {
                    return Some(Ok(RecordParse::Blank));
                }
                let parsed = match parse_record(content) {
                    Ok(turns) => RecordParse::Turns(turns),
                    Err(reason) => RecordParse::Malformed(SkippedRecord {
                        path: self.path.clone(),
                        line: self.line,
                        reason,
                    }),
                };
                Some(Ok(parsed))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err.into()))
            }
        }
    }
}
