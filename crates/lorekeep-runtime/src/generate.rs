use crate::config::GeneratorConfig;
use crate::{Error, Result};
use lorekeep_types::NO_LEARNINGS_SENTINEL;
use std::io::Write;
use std::process::{Command, Stdio};

/// Turns a prompt into a learnings body.
///
/// The generator is treated as opaque: whatever it returns goes through
/// normalization and the secret gate before anything is written.
pub trait LearningsGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<F> LearningsGenerator for F
where
    F: Fn(&str) -> Result<String>,
{
    fn generate(&self, prompt: &str) -> Result<String> {
        self(prompt)
    }
}

/// Runs an external command with the prompt on stdin and reads learnings from stdout.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl LearningsGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(command = %self.command, args = ?self.args, "running generator");

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Generator(format!("failed to start '{}': {}", self.command, e)))?;

        // stdin is fed while wait_with_output drains stdout and stderr.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Generator("generator stdin unavailable".to_string()))?;
        let input = prompt.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => {}
            // The child may exit without draining stdin; its exit status decides.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(Error::Generator("stdin writer panicked".to_string())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Generator(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| Error::Generator("generator output is not valid UTF-8".to_string()))?;
        Ok(stdout.trim().to_string())
    }
}

/// Build the instruction prompt around a rendered transcript.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "You are maintaining a project's shared knowledge file.\n\
         Read the conversation transcript below and extract durable learnings about this \
         project: build and test commands, conventions, pitfalls, and decisions that a \
         teammate would want to know next time.\n\
         \n\
         Rules:\n\
         - Reply with a Markdown bullet list only, one learning per bullet.\n\
         - Do not include headings, dates, or commentary.\n\
         - Never include credentials, tokens, passwords, keys, or other secrets.\n\
         - Skip anything specific to this single session that will not matter later.\n\
         - If there is nothing worth keeping, reply with exactly {sentinel}\n\
         \n\
         <transcript>\n{transcript}\n</transcript>\n",
        sentinel = NO_LEARNINGS_SENTINEL,
        transcript = transcript,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_wraps_transcript_and_names_sentinel() {
        let prompt = build_prompt("User: hi\n\nAssistant: hello");
        assert!(prompt.contains("<transcript>\nUser: hi\n\nAssistant: hello\n</transcript>"));
        assert!(prompt.contains(NO_LEARNINGS_SENTINEL));
        assert!(prompt.contains("Never include credentials"));
    }

    #[test]
    fn test_closure_generator() {
        let generator = |prompt: &str| -> Result<String> { Ok(format!("- {}", prompt.len())) };
        assert_eq!(generator.generate("abc").unwrap(), "- 3");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_reads_stdout() {
        let generator = CommandGenerator::new(
            "sh",
            vec![
                "-c".to_string(),
                "cat >/dev/null; echo '- learned something'".to_string(),
            ],
        );
        let output = generator.generate(&build_prompt("User: hi")).unwrap();
        assert_eq!(output, "- learned something");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_echoes_stdin() {
        let generator = CommandGenerator::new("cat", Vec::new());
        assert_eq!(generator.generate("  round trip\n").unwrap(), "round trip");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_failure_is_error() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
        );
        let err = generator.generate("x").unwrap_err();
        assert!(matches!(err, Error::Generator(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn test_missing_command_is_error() {
        let generator = CommandGenerator::new("lorekeep-no-such-generator", Vec::new());
        assert!(matches!(generator.generate("x"), Err(Error::Generator(_))));
    }
}
