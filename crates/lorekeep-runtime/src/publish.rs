//! Version-control publishing of the knowledge file.
//!
//! Publishing is best-effort: failures are reported as a [`PublishStatus`]
//! and logged, never returned as errors, since the learnings are already on
//! disk by the time this runs.

use crate::config::PublishConfig;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Bounded exponential backoff: `initial_delay`, then doubled after each failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_backoff_ms),
        )
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(1 << exponent)
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// `operation` receives the 1-based attempt number; `sleep` is called
/// between attempts. Returns the last result with the number of attempts made.
pub fn retry_with_backoff<T, E, F, S>(
    policy: &RetryPolicy,
    operation: F,
    sleep: S,
) -> (Result<T, E>, u32)
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
    S: FnMut(Duration),
{
    retry_with_backoff_if(policy, operation, |_| true, sleep)
}

/// Like [`retry_with_backoff`], but stops at the first error `is_retryable` rejects.
pub fn retry_with_backoff_if<T, E, F, R, S>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: R,
    mut sleep: S,
) -> (Result<T, E>, u32)
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
    R: Fn(&E) -> bool,
    S: FnMut(Duration),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt) {
            Ok(value) => return (Ok(value), attempt),
            Err(err) if attempt < max_attempts && is_retryable(&err) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                sleep(delay);
                attempt += 1;
            }
            Err(err) => return (Err(err), attempt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStage {
    Add,
    Commit,
    Push,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStage::Add => "add",
            PublishStage::Commit => "commit",
            PublishStage::Push => "push",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    /// Committed and pushed
    Published { attempts: u32 },
    /// Committed locally; pushing is turned off
    Committed,
    /// Publishing is turned off
    Disabled,
    /// Nothing was written, so nothing was published
    Skipped,
    Failed {
        stage: PublishStage,
        attempts: u32,
        error: String,
    },
}

impl PublishStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, PublishStatus::Failed { .. })
    }
}

/// Records a knowledge file change in version control.
pub trait Publisher {
    fn publish(&self, repo_dir: &Path, file: &Path, message: &str) -> PublishStatus;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPublisher;

impl Publisher for DisabledPublisher {
    fn publish(&self, _repo_dir: &Path, _file: &Path, _message: &str) -> PublishStatus {
        PublishStatus::Disabled
    }
}

/// Publishes through the `git` command line.
///
/// Stages and commits only the knowledge file, then pushes with retry. The
/// retry covers transport failures only: a push the remote rejects (another
/// machine published first) fails at once and is left for the user to pull
/// and resolve, since concurrent appends to the same file conflict.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    policy: RetryPolicy,
    push: bool,
}

impl GitPublisher {
    pub fn new(policy: RetryPolicy, push: bool) -> Self {
        Self { policy, push }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        Self::new(RetryPolicy::from_config(config), config.push)
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, repo_dir: &Path, file: &Path, message: &str) -> PublishStatus {
        let file_arg = file.to_string_lossy();

        if let Err(error) = run_git(repo_dir, &["add", "--", &file_arg]) {
            return failed(PublishStage::Add, 1, error);
        }
        if let Err(error) = run_git(repo_dir, &["commit", "-m", message, "--", &file_arg]) {
            return failed(PublishStage::Commit, 1, error);
        }
        tracing::info!(file = %file.display(), "committed learnings");

        if !self.push {
            return PublishStatus::Committed;
        }

        let (result, attempts) = retry_with_backoff_if(
            &self.policy,
            |_| run_git(repo_dir, &["push"]),
            |error| !is_push_rejection(error),
            std::thread::sleep,
        );
        match result {
            Ok(_) => {
                tracing::info!(attempts, "pushed learnings");
                PublishStatus::Published { attempts }
            }
            Err(error) => failed(PublishStage::Push, attempts, error),
        }
    }
}

/// The remote refused the update, as opposed to being unreachable.
fn is_push_rejection(stderr: &str) -> bool {
    stderr.contains("[rejected]")
        || stderr.contains("[remote rejected]")
        || stderr.contains("non-fast-forward")
}

fn failed(stage: PublishStage, attempts: u32, error: String) -> PublishStatus {
    tracing::warn!(%stage, attempts, %error, "publishing learnings failed");
    PublishStatus::Failed {
        stage,
        attempts,
        error,
    }
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GCM_INTERACTIVE", "never")
        .output()
        .map_err(|e| format!("failed to execute git: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(format!(
            "git {} failed ({}): {}",
            args.first().copied().unwrap_or_default(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}
