//! Orchestration layer for lorekeep.
//!
//! Wires the session locator, filter, extractor and secret scanner into a
//! single synchronous pipeline, and owns the pieces that touch the outside
//! world: configuration, the generator process, the knowledge file, and git.

pub mod config;
pub mod error;
pub mod generate;
pub mod persist;
pub mod pipeline;
pub mod publish;

pub use config::{Config, GeneratorConfig, PublishConfig, WindowConfig, resolve_config_path};
pub use error::{Error, Result};
pub use generate::{CommandGenerator, LearningsGenerator, build_prompt};
pub use persist::{AppendResult, KnowledgeFile};
pub use pipeline::{
    Conversation, Gathered, Outcome, Pipeline, PipelineRequest, RunMode, SuccessReport,
    commit_message,
};
pub use publish::{
    DisabledPublisher, GitPublisher, PublishStage, PublishStatus, Publisher, RetryPolicy,
    retry_with_backoff, retry_with_backoff_if,
};
