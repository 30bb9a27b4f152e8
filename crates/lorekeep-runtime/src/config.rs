use crate::{Error, Result};
use chrono::Duration;
use lorekeep_core::{default_sessions_root, expand_tilde};
use lorekeep_providers::FilterWindow;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "LOREKEEP_CONFIG";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. LOREKEEP_CONFIG environment variable (with tilde expansion)
/// 3. System config directory (`<config_dir>/lorekeep/config.toml`)
/// 4. ~/.lorekeep/config.toml
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("lorekeep").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".lorekeep").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no home or config directory found".to_string(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub recency_secs: u64,
    pub active_grace_secs: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            recency_secs: 4 * 60 * 60,
            active_grace_secs: 60,
        }
    }
}

impl WindowConfig {
    pub fn to_filter_window(&self) -> Result<FilterWindow> {
        let recency = seconds(self.recency_secs, "window.recency_secs")?;
        let active_grace = seconds(self.active_grace_secs, "window.active_grace_secs")?;
        if active_grace >= recency {
            return Err(Error::Config(format!(
                "window.active_grace_secs ({}) must be smaller than window.recency_secs ({})",
                self.active_grace_secs, self.recency_secs
            )));
        }
        Ok(FilterWindow::new(recency, active_grace))
    }
}

fn seconds(value: u64, field: &str) -> Result<Duration> {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| Error::Config(format!("{} is out of range: {}", field, value)))
}

/// External command that turns a prompt (on stdin) into learnings (on stdout)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: vec!["-p".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    pub push: bool,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            push: true,
            max_attempts: 3,
            initial_backoff_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root holding one directory per project; `~/.claude/projects` when unset
    pub sessions_root: Option<String>,
    /// Knowledge file, relative to the project root unless absolute
    pub knowledge_file: PathBuf,
    /// Overrides the host name on learnings headings
    pub machine: Option<String>,
    /// Transcript budget handed to the generator; 0 disables the limit
    pub max_transcript_chars: usize,
    pub window: WindowConfig,
    pub generator: GeneratorConfig,
    pub publish: PublishConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sessions_root: None,
            knowledge_file: PathBuf::from(".claude").join("learnings.md"),
            machine: None,
            max_transcript_chars: 120_000,
            window: WindowConfig::default(),
            generator: GeneratorConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn sessions_root(&self) -> Result<PathBuf> {
        match &self.sessions_root {
            Some(root) => Ok(expand_tilde(root)),
            None => Ok(default_sessions_root()?),
        }
    }

    pub fn knowledge_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.knowledge_file)
    }
}
