use crate::Result;
use lorekeep_engine::is_no_learnings;
use lorekeep_types::LearningsEntry;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const FILE_TITLE: &str = "# Learnings\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendResult {
    Appended,
    /// Empty or sentinel body; the file was not touched
    NothingToAppend,
}

/// Append-only Markdown knowledge file.
///
/// Existing content is never rewritten. Each entry is a `## date (machine)`
/// heading plus body, separated from the previous block by one blank line.
#[derive(Debug, Clone)]
pub struct KnowledgeFile {
    path: PathBuf,
}

impl KnowledgeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn would_append(&self, entry: &LearningsEntry) -> bool {
        !is_no_learnings(&entry.body)
    }

    pub fn append(&self, entry: &LearningsEntry) -> Result<AppendResult> {
        if !self.would_append(entry) {
            tracing::debug!(file = %self.path.display(), "no learnings, leaving file untouched");
            return Ok(AppendResult::NothingToAppend);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let block = entry.render_block();
        let len = file.metadata()?.len();
        let pending = if len == 0 {
            format!("{}{}", FILE_TITLE, block)
        } else {
            match trailing_newlines(&mut file, len)? {
                0 => format!("\n{}", block),
                1 => block,
                // Ends in a blank line already
                _ => block.trim_start_matches('\n').to_string(),
            }
        };

        file.write_all(pending.as_bytes())?;
        file.flush()?;

        tracing::info!(
            file = %self.path.display(),
            heading = %entry.heading(),
            "appended learnings"
        );
        Ok(AppendResult::Appended)
    }
}

/// Count of `\n` bytes among the last two bytes of the file, from the end.
fn trailing_newlines(file: &mut fs::File, len: u64) -> Result<usize> {
    let tail_len = len.min(2);
    if tail_len == 0 {
        return Ok(0);
    }
    let mut tail = [0u8; 2];
    let tail = &mut tail[..tail_len as usize];
    file.seek(SeekFrom::Start(len - tail_len))?;
    file.read_exact(tail)?;
    Ok(tail.iter().rev().take_while(|&&b| b == b'\n').count())
}
