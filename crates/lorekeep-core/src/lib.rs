//! Filesystem and host plumbing shared by the lorekeep crates.
//!
//! - `path`: project-root discovery and the session directory encoding
//! - `locator`: maps a project root to its session index
//! - `host`: short machine identifier used to attribute learnings

pub mod error;
pub mod host;
pub mod locator;
pub mod path;

pub use error::{Error, Result};
pub use host::{hostname, machine_name, short_host_name};
pub use locator::{Located, SESSION_INDEX_FILE, SessionLocation, SessionLocator};
pub use path::{
    ENCODED_SEPARATOR, absolute_path, default_sessions_root, discover_project_root,
    encode_project_dir, expand_tilde,
};
