//! TestWorld pattern for declarative integration test setup.
//!
//! Every world owns a temp directory with:
//! - `home/`: HOME for the child process, so nothing leaks from the real one
//! - `home/.claude/projects/`: the sessions root
//! - `work/app/`: the project root passed with `--project-root`
//! - `config.toml`: written before each run, pointed to by `LOREKEEP_CONFIG`

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::ProjectSessions;

/// Machine name every run is attributed to
pub const TEST_MACHINE: &str = "test-machine";

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use lorekeep_testing::{SessionLogBuilder, TestWorld};
///
/// let world = TestWorld::new().with_generator_output("- Run the linter first");
/// let mut sessions = world.project_sessions().unwrap();
/// sessions
///     .add_session(&SessionLogBuilder::new().user("hi"), world.minutes_ago(30))
///     .unwrap();
/// sessions.write_index().unwrap();
///
/// let result = world.run(&["extract"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    home: PathBuf,
    sessions_root: PathBuf,
    project_root: PathBuf,
    config_path: PathBuf,
    generator_script: String,
    extra_config: String,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let home = base_path.join("home");
        let sessions_root = home.join(".claude").join("projects");
        let project_root = base_path.join("work").join("app");

        std::fs::create_dir_all(&sessions_root).expect("Failed to create sessions root");
        std::fs::create_dir_all(&project_root).expect("Failed to create project dir");

        Self {
            config_path: base_path.join("config.toml"),
            temp_dir,
            home,
            sessions_root,
            project_root,
            generator_script: "cat >/dev/null; echo NO_NEW_LEARNINGS".to_string(),
            extra_config: String::new(),
            env_vars: HashMap::new(),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn sessions_root(&self) -> &Path {
        &self.sessions_root
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Default knowledge file location inside the project
    pub fn knowledge_file(&self) -> PathBuf {
        self.project_root.join(".claude").join("learnings.md")
    }

    /// Generator that discards the prompt and prints `output`.
    pub fn with_generator_output(self, output: &str) -> Self {
        let quoted = output.replace('\'', r"'\''");
        self.with_generator_script(&format!("cat >/dev/null; printf '%s\\n' '{}'", quoted))
    }

    /// Generator running `script` under `sh -c`, with the prompt on stdin.
    pub fn with_generator_script(mut self, script: &str) -> Self {
        self.generator_script = script.to_string();
        self
    }

    /// Raw TOML added to the generated config file.
    ///
    /// It may set top-level keys or the `[window]` table; `[generator]` and
    /// `[publish]` are always written by the world itself.
    pub fn with_config(mut self, toml: &str) -> Self {
        self.extra_config.push_str(toml);
        self.extra_config.push('\n');
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Session directory for the world's project, created on demand.
    pub fn project_sessions(&self) -> Result<ProjectSessions> {
        ProjectSessions::create(&self.sessions_root, &self.project_root)
    }

    pub fn minutes_ago(&self, minutes: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now() - chrono::Duration::minutes(minutes)
    }

    fn config_toml(&self) -> String {
        // Extra config goes before the fixed tables so bare keys stay top-level.
        format!(
            "sessions_root = {:?}\n{}\n[generator]\ncommand = \"sh\"\nargs = [\"-c\", {:?}]\n\n[publish]\nenabled = false\n",
            self.sessions_root.to_string_lossy(),
            self.extra_config,
            self.generator_script,
        )
    }

    /// Write the config file this world's runs will use.
    pub fn write_config(&self) -> Result<()> {
        std::fs::write(&self.config_path, self.config_toml())?;
        Ok(())
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--project-root").arg(&self.project_root);

        cmd.current_dir(self.temp_dir.path())
            .env("HOME", &self.home)
            .env("LOREKEEP_CONFIG", &self.config_path)
            .env("LOREKEEP_MACHINE", TEST_MACHINE)
            .env_remove("LOREKEEP_PROJECT_ROOT")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Write the config, run the `lorekeep` binary with `args`, and capture the result.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.write_config()?;

        let mut cmd = Command::cargo_bin("lorekeep")
            .map_err(|e| anyhow::anyhow!("Failed to find lorekeep binary: {}", e))?;
        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_layout() {
        let world = TestWorld::new()
            .with_generator_output("- it's quoted")
            .with_config("max_transcript_chars = 500");
        world.write_config().unwrap();

        let content = std::fs::read_to_string(world.config_path()).unwrap();
        assert!(content.contains("enabled = false"));
        assert!(content.contains("max_transcript_chars = 500"));
        assert!(content.contains(&*world.sessions_root().to_string_lossy()));
    }
}
