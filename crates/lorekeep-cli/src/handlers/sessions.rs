use crate::context::ExecutionContext;
use crate::types::Exit;
use crate::views::outcome::render_outcome;
use crate::views::sessions::{SessionListing, SessionRow, SessionStatus, render_listing};
use crate::views::{Painter, print_json};
use anyhow::Result;
use chrono::Utc;
use lorekeep_core::Located;
use lorekeep_providers::load_session_index;
use lorekeep_runtime::Outcome;

pub fn handle(ctx: &ExecutionContext, all: bool) -> Result<Exit> {
    let config = ctx.config()?;
    let window = config.window.to_filter_window()?;
    let project_root = ctx.project_root()?;

    let location = match ctx.locator()?.locate(&project_root) {
        Located::Found(location) => location,
        Located::MissingDirectory(path) => {
            return print_absence(ctx, Outcome::NoSessionDirectory { path });
        }
        Located::MissingIndex(path) => return print_absence(ctx, Outcome::NoIndex { path }),
    };

    let index = load_session_index(&location.index_path)?;
    let now = Utc::now();
    let sessions: Vec<SessionRow> = index
        .iter()
        .map(|entry| SessionRow::new(entry, now, window))
        .filter(|row| all || row.status == SessionStatus::Recent)
        .collect();

    let listing = SessionListing {
        session_dir: location.session_dir,
        indexed: index.len(),
        sessions,
    };

    if ctx.is_json() {
        print_json(&listing)?;
    } else {
        println!("{}", render_listing(&listing, &Painter::for_stdout()));
    }
    Ok(Exit::Ok)
}

fn print_absence(ctx: &ExecutionContext, outcome: Outcome) -> Result<Exit> {
    if ctx.is_json() {
        print_json(&outcome)?;
    } else {
        println!("{}", render_outcome(&outcome, &Painter::for_stdout()));
    }
    Ok(Exit::Ok)
}
