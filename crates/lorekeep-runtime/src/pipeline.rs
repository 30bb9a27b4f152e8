use crate::Result;
use crate::config::Config;
use crate::generate::{LearningsGenerator, build_prompt};
use crate::persist::{AppendResult, KnowledgeFile};
use crate::publish::{PublishStatus, Publisher};
use chrono::{DateTime, NaiveDate, Utc};
use lorekeep_core::{Located, SessionLocator};
use lorekeep_engine::{is_no_learnings, normalize_learnings, render_transcript, scan};
use lorekeep_providers::{
    Extraction, FilterWindow, extract_sessions, load_session_index, select_recent,
};
use lorekeep_types::{LearningsEntry, RuleName, ScanVerdict, SessionIndexEntry};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Append to the knowledge file and publish
    Commit,
    /// Run every stage up to the write, then stop
    Preview,
}

/// Inputs of a single run; the clock is passed in so runs are reproducible
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub project_root: PathBuf,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub machine: String,
    pub mode: RunMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessReport {
    pub entry: LearningsEntry,
    pub knowledge_file: PathBuf,
    /// False in preview mode
    pub written: bool,
    pub publish: PublishStatus,
    pub sessions: usize,
    pub turns: usize,
    pub skipped_records: usize,
}

/// How a run ended.
///
/// Everything except `Success` leaves the knowledge file untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    NoSessionDirectory {
        path: PathBuf,
    },
    NoIndex {
        path: PathBuf,
    },
    NoRecentSessions {
        indexed: usize,
    },
    NoConversationContent {
        sessions: usize,
        skipped_records: usize,
        missing: usize,
    },
    SecretsDetected {
        rules: BTreeSet<RuleName>,
    },
    NoLearningsToCommit,
    Success(SuccessReport),
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::NoSessionDirectory { .. } => "no_session_directory",
            Outcome::NoIndex { .. } => "no_index",
            Outcome::NoRecentSessions { .. } => "no_recent_sessions",
            Outcome::NoConversationContent { .. } => "no_conversation_content",
            Outcome::SecretsDetected { .. } => "secrets_detected",
            Outcome::NoLearningsToCommit => "no_learnings_to_commit",
            Outcome::Success(_) => "success",
        }
    }
}

/// Recent sessions and the turns pulled out of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub sessions: Vec<SessionIndexEntry>,
    pub extraction: Extraction,
}

/// Result of the read-only stages: either an early stop or material to work on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gathered {
    Stopped(Outcome),
    Conversation(Conversation),
}

/// The extraction pipeline.
///
/// Stages run strictly in order: locate, filter, extract, generate, scan,
/// append, publish. A flagged scan stops the run before anything is written.
pub struct Pipeline<'a> {
    locator: SessionLocator,
    window: FilterWindow,
    knowledge_file: PathBuf,
    max_transcript_chars: usize,
    generator: &'a dyn LearningsGenerator,
    publisher: &'a dyn Publisher,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        locator: SessionLocator,
        window: FilterWindow,
        knowledge_file: impl Into<PathBuf>,
        generator: &'a dyn LearningsGenerator,
        publisher: &'a dyn Publisher,
    ) -> Self {
        Self {
            locator,
            window,
            knowledge_file: knowledge_file.into(),
            max_transcript_chars: 0,
            generator,
            publisher,
        }
    }

    pub fn from_config(
        config: &Config,
        generator: &'a dyn LearningsGenerator,
        publisher: &'a dyn Publisher,
    ) -> Result<Self> {
        let locator = SessionLocator::new(config.sessions_root()?);
        let window = config.window.to_filter_window()?;
        Ok(
            Self::new(locator, window, config.knowledge_file.clone(), generator, publisher)
                .with_max_transcript_chars(config.max_transcript_chars),
        )
    }

    pub fn with_max_transcript_chars(mut self, max_chars: usize) -> Self {
        self.max_transcript_chars = max_chars;
        self
    }

    pub fn locator(&self) -> &SessionLocator {
        &self.locator
    }

    /// Knowledge file for a project; relative paths resolve against the project root
    pub fn knowledge_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.knowledge_file)
    }

    /// Locate, filter and extract. Nothing is written.
    pub fn gather(&self, project_root: &Path, now: DateTime<Utc>) -> Result<Gathered> {
        let location = match self.locator.locate(project_root) {
            Located::Found(location) => location,
            Located::MissingDirectory(path) => {
                return Ok(Gathered::Stopped(Outcome::NoSessionDirectory { path }));
            }
            Located::MissingIndex(path) => {
                return Ok(Gathered::Stopped(Outcome::NoIndex { path }));
            }
        };

        let index = load_session_index(&location.index_path)?;
        let sessions: Vec<SessionIndexEntry> = select_recent(&index, now, self.window)
            .into_iter()
            .cloned()
            .collect();
        tracing::info!(
            indexed = index.len(),
            recent = sessions.len(),
            "selected recent sessions"
        );
        if sessions.is_empty() {
            return Ok(Gathered::Stopped(Outcome::NoRecentSessions {
                indexed: index.len(),
            }));
        }

        let paths: Vec<PathBuf> = sessions.iter().map(|s| s.full_path.clone()).collect();
        let extraction = extract_sessions(&paths)?;
        if extraction.is_empty() {
            return Ok(Gathered::Stopped(Outcome::NoConversationContent {
                sessions: sessions.len(),
                skipped_records: extraction.skipped_count(),
                missing: extraction.missing.len(),
            }));
        }

        Ok(Gathered::Conversation(Conversation {
            sessions,
            extraction,
        }))
    }

    pub fn run(&self, request: &PipelineRequest) -> Result<Outcome> {
        let conversation = match self.gather(&request.project_root, request.now)? {
            Gathered::Stopped(outcome) => return Ok(outcome),
            Gathered::Conversation(conversation) => conversation,
        };

        let transcript =
            render_transcript(&conversation.extraction.turns, self.max_transcript_chars);
        if transcript.turns_omitted > 0 {
            tracing::info!(
                omitted = transcript.turns_omitted,
                "transcript over budget, dropped oldest turns"
            );
        }

        let raw = self.generator.generate(&build_prompt(&transcript.text))?;
        let body = normalize_learnings(&raw);

        if let ScanVerdict::Flagged(rules) = scan(&body) {
            tracing::warn!(rules = ?rules, "generated learnings contain likely secrets");
            return Ok(Outcome::SecretsDetected { rules });
        }

        if is_no_learnings(&body) {
            return Ok(Outcome::NoLearningsToCommit);
        }

        let entry = LearningsEntry::new(request.today, request.machine.clone(), body);
        let knowledge_path = self.knowledge_path(&request.project_root);
        let mut report = SuccessReport {
            entry,
            knowledge_file: knowledge_path.clone(),
            written: false,
            publish: PublishStatus::Skipped,
            sessions: conversation.sessions.len(),
            turns: conversation.extraction.turns.len(),
            skipped_records: conversation.extraction.skipped_count(),
        };

        if request.mode == RunMode::Preview {
            return Ok(Outcome::Success(report));
        }

        let knowledge = KnowledgeFile::new(knowledge_path);
        if knowledge.append(&report.entry)? == AppendResult::NothingToAppend {
            return Ok(Outcome::NoLearningsToCommit);
        }
        report.written = true;

        let message = commit_message(&report.entry);
        report.publish = self
            .publisher
            .publish(&request.project_root, knowledge.path(), &message);

        Ok(Outcome::Success(report))
    }
}

/// `learnings: YYYY-MM-DD (machine)`
pub fn commit_message(entry: &LearningsEntry) -> String {
    format!(
        "learnings: {} ({})",
        entry.date.format("%Y-%m-%d"),
        entry.machine
    )
}
