use crate::context::ExecutionContext;
use crate::types::Exit;
use crate::views::outcome::render_outcome;
use crate::views::{Painter, print_json};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use lorekeep_runtime::{
    CommandGenerator, DisabledPublisher, GitPublisher, Outcome, Pipeline, PipelineRequest,
    Publisher, RunMode,
};

pub fn handle(ctx: &ExecutionContext, dry_run: bool) -> Result<Exit> {
    let config = ctx.config()?;

    let generator = CommandGenerator::from_config(&config.generator);
    let git_publisher;
    let publisher: &dyn Publisher = if config.publish.enabled {
        git_publisher = GitPublisher::from_config(&config.publish);
        &git_publisher
    } else {
        &DisabledPublisher
    };
    let pipeline = Pipeline::from_config(config, &generator, publisher)?;

    let request = PipelineRequest {
        project_root: ctx.project_root()?,
        now: Utc::now(),
        today: Local::now().date_naive(),
        machine: ctx.machine()?,
        mode: if dry_run {
            RunMode::Preview
        } else {
            RunMode::Commit
        },
    };
    tracing::debug!(
        project_root = %request.project_root.display(),
        machine = %request.machine,
        mode = ?request.mode,
        "starting extraction"
    );

    let outcome = pipeline.run(&request).context("Extraction failed")?;

    if ctx.is_json() {
        print_json(&outcome)?;
    } else {
        println!("{}", render_outcome(&outcome, &Painter::for_stdout()));
    }

    Ok(match outcome {
        Outcome::SecretsDetected { .. } => Exit::SecretsDetected,
        _ => Exit::Ok,
    })
}
