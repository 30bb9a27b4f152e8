use crate::context::ExecutionContext;
use crate::types::Exit;
use crate::views::scan::render_verdict;
use crate::views::{Painter, print_json};
use anyhow::{Context, Result};
use lorekeep_engine::scan;
use std::io::Read;
use std::path::Path;

pub fn handle(ctx: &ExecutionContext, file: Option<&Path>) -> Result<Exit> {
    let (source, text) = match file {
        Some(path) => (
            path.display().to_string(),
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            ("<stdin>".to_string(), text)
        }
    };

    let verdict = scan(&text);
    if ctx.is_json() {
        print_json(&verdict)?;
    } else {
        println!("{}", render_verdict(&source, &verdict, &Painter::for_stdout()));
    }

    Ok(if verdict.is_clean() {
        Exit::Ok
    } else {
        Exit::SecretsDetected
    })
}
