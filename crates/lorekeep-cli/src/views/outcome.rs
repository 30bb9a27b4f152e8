use super::Painter;
use lorekeep_engine::hint_for;
use lorekeep_runtime::{Outcome, PublishStatus, SuccessReport};
use std::fmt::Write;

const NOTHING_TO_EXTRACT: &str = "Nothing to extract.";

pub fn render_outcome(outcome: &Outcome, p: &Painter) -> String {
    match outcome {
        Outcome::NoSessionDirectory { path } => format!(
            "locate: no session directory for this project at {}\n{}",
            path.display(),
            NOTHING_TO_EXTRACT
        ),
        Outcome::NoIndex { path } => format!(
            "locate: no session index at {}\n{}",
            path.display(),
            NOTHING_TO_EXTRACT
        ),
        Outcome::NoRecentSessions { indexed } => format!(
            "filter: no recent idle sessions among {} indexed\n{}",
            indexed, NOTHING_TO_EXTRACT
        ),
        Outcome::NoConversationContent {
            sessions,
            skipped_records,
            missing,
        } => format!(
            "extract: {} recent {} held no conversation text ({} malformed {} skipped, {} {} missing)\n{}",
            sessions,
            plural(*sessions, "session", "sessions"),
            skipped_records,
            plural(*skipped_records, "record", "records"),
            missing,
            plural(*missing, "log", "logs"),
            NOTHING_TO_EXTRACT
        ),
        Outcome::SecretsDetected { rules } => {
            let mut out = format!(
                "{} the generated learnings look like they contain secrets. Nothing was written.\n",
                p.error("scan:")
            );
            for rule in rules {
                let _ = writeln!(out, "  - {}: {}", rule, hint_for(*rule));
            }
            out.push_str(
                "Remove the sensitive values from your notes and add the learnings to the \
                 knowledge file by hand.",
            );
            out
        }
        Outcome::NoLearningsToCommit => {
            "generate: nothing new worth keeping\nKnowledge file unchanged.".to_string()
        }
        Outcome::Success(report) => render_success(report, p),
    }
}

fn render_success(report: &SuccessReport, p: &Painter) -> String {
    let mut out = String::new();
    if report.written {
        let _ = writeln!(
            out,
            "{} Appended learnings to {}",
            p.ok("✓"),
            report.knowledge_file.display()
        );
    } else {
        let _ = writeln!(
            out,
            "{} would append to {}",
            p.warn("Dry run:"),
            report.knowledge_file.display()
        );
    }
    let _ = writeln!(
        out,
        "{}",
        p.dim(&format!(
            "from {} {}, {} turns ({} malformed {} skipped)",
            report.sessions,
            plural(report.sessions, "session", "sessions"),
            report.turns,
            report.skipped_records,
            plural(report.skipped_records, "record", "records"),
        ))
    );
    out.push('\n');
    out.push_str(&report.entry.heading());
    out.push('\n');
    out.push_str(report.entry.body.trim_end());

    if let Some(line) = render_publish(&report.publish, p) {
        out.push_str("\n\n");
        out.push_str(&line);
    }
    out
}

fn render_publish(status: &PublishStatus, p: &Painter) -> Option<String> {
    let line = match status {
        PublishStatus::Published { attempts: 1 } => "publish: committed and pushed".to_string(),
        PublishStatus::Published { attempts } => {
            format!("publish: committed and pushed after {} attempts", attempts)
        }
        PublishStatus::Committed => "publish: committed locally (push disabled)".to_string(),
        PublishStatus::Disabled => {
            "publish: disabled; commit the knowledge file yourself".to_string()
        }
        PublishStatus::Skipped => return None,
        PublishStatus::Failed {
            stage,
            attempts,
            error,
        } => format!(
            "{} git {} failed after {} {}: {}\nThe learnings are saved locally; commit and push them manually.",
            p.warn("publish:"),
            stage,
            attempts,
            plural(*attempts as usize, "attempt", "attempts"),
            error
        ),
    };
    Some(line)
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}
