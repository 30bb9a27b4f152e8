use crate::{Error, Result};
use std::path::{Path, PathBuf, is_separator};

/// Character that stands in for path separators in Claude Code project directories
pub const ENCODED_SEPARATOR: char = '-';

/// Encode a project root into the directory name Claude Code uses under its
/// sessions root.
///
/// Leading separators are dropped, every remaining separator becomes `-`, and
/// the result is prefixed with `-`: `/Users/foo/bar` -> `-Users-foo-bar`.
///
/// The mapping is one-way and can collide (`/a-b` and `/a/b` encode the same);
/// callers accept that.
pub fn encode_project_dir(project_root: &Path) -> String {
    let raw = project_root.to_string_lossy();
    let encoded: String = raw
        .trim_start_matches(|c: char| c == '/' || is_separator(c))
        .chars()
        .map(|c| {
            if c == '/' || is_separator(c) {
                ENCODED_SEPARATOR
            } else {
                c
            }
        })
        .collect();
    format!("{}{}", ENCODED_SEPARATOR, encoded)
}

/// Make a path absolute against the current directory without resolving symlinks.
///
/// The assistant records the working directory as the shell saw it, so
/// canonicalizing here would map symlinked checkouts to the wrong directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Default location of Claude Code's per-project session directories (`~/.claude/projects`)
pub fn default_sessions_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".claude").join("projects"))
        .ok_or_else(|| {
            Error::Config("Could not determine sessions root: no home directory found".to_string())
        })
}

/// Discover project root based on priority:
/// 1. explicit_project_root (--project-root flag)
/// 2. LOREKEEP_PROJECT_ROOT environment variable
/// 3. Current working directory
pub fn discover_project_root(explicit_project_root: Option<&str>) -> Result<PathBuf> {
    if let Some(root) = explicit_project_root {
        return Ok(absolute_path(&expand_tilde(root)));
    }

    if let Ok(env_root) = std::env::var("LOREKEEP_PROJECT_ROOT") {
        return Ok(absolute_path(&expand_tilde(&env_root)));
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_strips_leading_separator() {
        assert_eq!(
            encode_project_dir(Path::new("/Users/foo/bar")),
            "-Users-foo-bar"
        );
        assert_eq!(encode_project_dir(Path::new("//srv/app")), "-srv-app");
    }

    #[test]
    fn test_encode_keeps_dots() {
        assert_eq!(
            encode_project_dir(Path::new("/home/me/site.example")),
            "-home-me-site.example"
        );
    }

    #[test]
    fn test_encode_root() {
        assert_eq!(encode_project_dir(Path::new("/")), "-");
    }

    #[test]
    fn test_absolute_path_keeps_absolute_input() {
        let p = Path::new("/already/absolute");
        assert_eq!(absolute_path(p), PathBuf::from("/already/absolute"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
        assert_eq!(expand_tilde("rel/x"), PathBuf::from("rel/x"));
    }
}
