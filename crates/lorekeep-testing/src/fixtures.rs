//! Fixtures for session logs and session indexes.
//!
//! Logs are generated line by line in the assistant's JSONL shape and placed
//! in the encoded project directory the locator expects, together with a
//! `sessions-index.json` whose mtimes are chosen by the test.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lorekeep_core::{SESSION_INDEX_FILE, SessionLocator};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds a session log one record at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionLogBuilder {
    lines: Vec<String>,
}

impl SessionLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// User record with plain string content
    pub fn user(mut self, text: &str) -> Self {
        self.lines.push(
            json!({
                "type": "user",
                "uuid": uuid::Uuid::new_v4().to_string(),
                "message": {"role": "user", "content": text}
            })
            .to_string(),
        );
        self
    }

    /// Assistant record with a single text block
    pub fn assistant(mut self, text: &str) -> Self {
        self.lines.push(
            json!({
                "type": "assistant",
                "uuid": uuid::Uuid::new_v4().to_string(),
                "message": {
                    "role": "assistant",
                    "model": "claude-test",
                    "content": [{"type": "text", "text": text}]
                }
            })
            .to_string(),
        );
        self
    }

    /// Assistant record that only calls a tool
    pub fn tool_use(mut self, tool: &str) -> Self {
        self.lines.push(
            json!({
                "type": "assistant",
                "message": {
                    "role": "assistant",
                    "content": [{
                        "type": "tool_use",
                        "id": "toolu_01",
                        "name": tool,
                        "input": {"command": "ls"}
                    }]
                }
            })
            .to_string(),
        );
        self
    }

    /// User record carrying a tool result instead of typed text
    pub fn tool_result(mut self, output: &str) -> Self {
        self.lines.push(
            json!({
                "type": "user",
                "message": {
                    "role": "user",
                    "content": [{"type": "tool_result", "tool_use_id": "toolu_01", "content": output}]
                }
            })
            .to_string(),
        );
        self
    }

    /// Bookkeeping record of a type that never yields turns
    pub fn summary(mut self, text: &str) -> Self {
        self.lines
            .push(json!({"type": "summary", "summary": text}).to_string());
        self
    }

    /// Raw line, typically not valid JSON
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn build(&self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.build())
            .with_context(|| format!("Failed to write session log {}", path.display()))
    }
}

/// A project's session directory, populated by the test.
#[derive(Debug)]
pub struct ProjectSessions {
    session_dir: PathBuf,
    project_root: PathBuf,
    entries: Vec<Value>,
}

impl ProjectSessions {
    /// Create the encoded session directory for `project_root` under `sessions_root`.
    pub fn create(sessions_root: &Path, project_root: &Path) -> Result<Self> {
        let session_dir = SessionLocator::new(sessions_root).session_dir(project_root);
        fs::create_dir_all(&session_dir)
            .with_context(|| format!("Failed to create {}", session_dir.display()))?;
        Ok(Self {
            session_dir,
            project_root: project_root.to_path_buf(),
            entries: Vec::new(),
        })
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.session_dir.join(SESSION_INDEX_FILE)
    }

    /// Write `log` as a new session and list it in the index with mtime `modified`.
    pub fn add_session(
        &mut self,
        log: &SessionLogBuilder,
        modified: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let path = self.session_dir.join(format!("{}.jsonl", session_id));
        log.write_to(&path)?;
        self.push_entry(&session_id, &path, modified);
        Ok(path)
    }

    /// List a session in the index whose log file does not exist.
    pub fn add_missing_session(&mut self, modified: DateTime<Utc>) -> PathBuf {
        let session_id = uuid::Uuid::new_v4().to_string();
        let path = self.session_dir.join(format!("{}.jsonl", session_id));
        self.push_entry(&session_id, &path, modified);
        path
    }

    fn push_entry(&mut self, session_id: &str, path: &Path, modified: DateTime<Utc>) {
        self.entries.push(json!({
            "sessionId": session_id,
            "fullPath": path,
            "fileMtime": modified.timestamp_millis(),
            "firstPrompt": "fixture",
            "messageCount": 2,
            "projectPath": self.project_root,
        }));
    }

    /// Write `sessions-index.json` in the assistant's wrapped format.
    pub fn write_index(&self) -> Result<PathBuf> {
        let path = self.index_path();
        let document = json!({"version": 1, "entries": self.entries});
        fs::write(&path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Checked-in sample logs shared with the providers crate.
pub struct SampleFiles {
    samples_dir: PathBuf,
}

impl Default for SampleFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFiles {
    /// Assumes samples are in `crates/lorekeep-providers/tests/samples/`.
    pub fn new() -> Self {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let crates_dir = manifest_dir.parent().unwrap_or(&manifest_dir);
        Self {
            samples_dir: crates_dir.join("lorekeep-providers/tests/samples"),
        }
    }

    pub fn path(&self, sample_name: &str) -> PathBuf {
        self.samples_dir.join(sample_name)
    }

    /// Copy a sample log into a project's session directory as a new session.
    pub fn add_to(
        &self,
        sessions: &mut ProjectSessions,
        sample_name: &str,
        modified: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let dest = sessions.session_dir.join(format!("{}.jsonl", session_id));
        fs::copy(self.path(sample_name), &dest)
            .with_context(|| format!("Failed to copy sample {}", sample_name))?;
        sessions.push_entry(&session_id, &dest, modified);
        Ok(dest)
    }
}
