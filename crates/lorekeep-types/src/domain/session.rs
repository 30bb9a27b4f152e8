use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One session log known to the assistant's session index.
///
/// The index is owned by the assistant itself; lorekeep only reads it.
/// Unknown fields (first prompt, message counts, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIndexEntry {
    pub session_id: String,
    pub full_path: PathBuf,
    /// Last modification of the log file, milliseconds since the Unix epoch
    pub file_mtime: i64,
    #[serde(default)]
    pub project_path: PathBuf,
}

impl SessionIndexEntry {
    pub fn log_path(&self) -> &Path {
        &self.full_path
    }

    /// Modification time as a timestamp, `None` if out of chrono's range
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.file_mtime)
    }
}

/// Ordered list of session entries, loaded once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIndex {
    entries: Vec<SessionIndexEntry>,
}

impl SessionIndex {
    pub fn new(entries: Vec<SessionIndexEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SessionIndexEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionIndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<SessionIndexEntry>> for SessionIndex {
    fn from(entries: Vec<SessionIndexEntry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a SessionIndex {
    type Item = &'a SessionIndexEntry;
    type IntoIter = std::slice::Iter<'a, SessionIndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_camel_case_and_ignores_extras() {
        let json = r#"{
            "sessionId": "abc",
            "fullPath": "/home/u/.claude/projects/-home-u-p/abc.jsonl",
            "fileMtime": 1760000000000,
            "projectPath": "/home/u/p",
            "firstPrompt": "hello",
            "messageCount": 4
        }"#;

        let entry: SessionIndexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.session_id, "abc");
        assert_eq!(entry.file_mtime, 1_760_000_000_000);
        assert_eq!(entry.project_path, PathBuf::from("/home/u/p"));
        assert_eq!(
            entry.modified_at().unwrap().timestamp_millis(),
            1_760_000_000_000
        );
    }

    #[test]
    fn test_index_preserves_order() {
        let index = SessionIndex::new(vec![
            SessionIndexEntry {
                session_id: "b".into(),
                full_path: "/b.jsonl".into(),
                file_mtime: 2,
                project_path: "/p".into(),
            },
            SessionIndexEntry {
                session_id: "a".into(),
                full_path: "/a.jsonl".into(),
                file_mtime: 1,
                project_path: "/p".into(),
            },
        ]);

        let ids: Vec<_> = index.iter().map(|e| e.session_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
