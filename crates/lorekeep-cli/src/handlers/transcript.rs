use crate::context::ExecutionContext;
use crate::types::Exit;
use crate::views::outcome::render_outcome;
use crate::views::{Painter, print_json};
use anyhow::Result;
use chrono::Utc;
use lorekeep_engine::render_transcript;
use lorekeep_runtime::{CommandGenerator, DisabledPublisher, Gathered, Pipeline};
use serde::Serialize;

#[derive(Serialize)]
struct TranscriptView<'a> {
    sessions: usize,
    turns_included: usize,
    turns_omitted: usize,
    skipped_records: usize,
    text: &'a str,
}

pub fn handle(ctx: &ExecutionContext) -> Result<Exit> {
    let config = ctx.config()?;
    // Only the read-only stages run here; the generator is never invoked.
    let generator = CommandGenerator::from_config(&config.generator);
    let pipeline = Pipeline::from_config(config, &generator, &DisabledPublisher)?;

    let conversation = match pipeline.gather(&ctx.project_root()?, Utc::now())? {
        Gathered::Conversation(conversation) => conversation,
        Gathered::Stopped(outcome) => {
            if ctx.is_json() {
                print_json(&outcome)?;
            } else {
                println!("{}", render_outcome(&outcome, &Painter::for_stdout()));
            }
            return Ok(Exit::Ok);
        }
    };

    let rendered = render_transcript(&conversation.extraction.turns, config.max_transcript_chars);

    if ctx.is_json() {
        print_json(&TranscriptView {
            sessions: conversation.sessions.len(),
            turns_included: rendered.turns_included,
            turns_omitted: rendered.turns_omitted,
            skipped_records: conversation.extraction.skipped_count(),
            text: &rendered.text,
        })?;
    } else {
        println!("{}", rendered.text);
    }
    Ok(Exit::Ok)
}
