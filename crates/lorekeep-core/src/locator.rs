use crate::path::{absolute_path, encode_project_dir};
use std::path::{Path, PathBuf};

/// Name of the index file Claude Code keeps inside each project's session directory
pub const SESSION_INDEX_FILE: &str = "sessions-index.json";

/// Where a project's sessions live once both the directory and index exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLocation {
    pub session_dir: PathBuf,
    pub index_path: PathBuf,
}

/// Result of looking up a project's sessions.
///
/// Missing directory and missing index are ordinary "nothing to extract"
/// outcomes, kept apart so callers can tell the user which one happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Found(SessionLocation),
    MissingDirectory(PathBuf),
    MissingIndex(PathBuf),
}

/// Maps project roots to session directories below a sessions root.
#[derive(Debug, Clone)]
pub struct SessionLocator {
    sessions_root: PathBuf,
}

impl SessionLocator {
    pub fn new(sessions_root: impl Into<PathBuf>) -> Self {
        Self {
            sessions_root: sessions_root.into(),
        }
    }

    pub fn sessions_root(&self) -> &Path {
        &self.sessions_root
    }

    /// `<sessions_root>/<encoded project root>`; does not touch the filesystem
    pub fn session_dir(&self, project_root: &Path) -> PathBuf {
        let absolute = absolute_path(project_root);
        self.sessions_root.join(encode_project_dir(&absolute))
    }

    pub fn locate(&self, project_root: &Path) -> Located {
        let session_dir = self.session_dir(project_root);
        if !session_dir.is_dir() {
            tracing::debug!(dir = %session_dir.display(), "no session directory");
            return Located::MissingDirectory(session_dir);
        }

        let index_path = session_dir.join(SESSION_INDEX_FILE);
        if !index_path.is_file() {
            tracing::debug!(index = %index_path.display(), "no session index");
            return Located::MissingIndex(index_path);
        }

        Located::Found(SessionLocation {
            session_dir,
            index_path,
        })
    }
}
