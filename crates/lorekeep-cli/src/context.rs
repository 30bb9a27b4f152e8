use crate::types::OutputFormat;
use anyhow::{Context, Result};
use lorekeep_core::{SessionLocator, discover_project_root, machine_name};
use lorekeep_runtime::{Config, resolve_config_path};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Per-invocation state shared by the handlers.
///
/// The config file is read lazily so `scan` works without one.
pub struct ExecutionContext {
    config_path: PathBuf,
    config: OnceCell<Config>,
    explicit_project_root: Option<String>,
    pub format: OutputFormat,
}

impl ExecutionContext {
    pub fn new(
        config_path: Option<String>,
        project_root: Option<String>,
        format: OutputFormat,
    ) -> Result<Self> {
        let config_path = resolve_config_path(config_path.as_deref())?;
        Ok(Self {
            config_path,
            config: OnceCell::new(),
            explicit_project_root: project_root,
            format,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> Result<&Config> {
        self.config.get_or_try_init(|| {
            tracing::debug!(path = %self.config_path.display(), "loading config");
            Config::load_from(&self.config_path)
                .with_context(|| format!("Failed to load config {}", self.config_path.display()))
        })
    }

    pub fn project_root(&self) -> Result<PathBuf> {
        discover_project_root(self.explicit_project_root.as_deref())
            .context("Failed to determine project root")
    }

    pub fn locator(&self) -> Result<SessionLocator> {
        Ok(SessionLocator::new(self.config()?.sessions_root()?))
    }

    pub fn machine(&self) -> Result<String> {
        Ok(machine_name(self.config()?.machine.as_deref()))
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
