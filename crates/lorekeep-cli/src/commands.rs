use super::args::{Cli, Commands};
use super::handlers;
use crate::context::ExecutionContext;
use crate::logging;
use crate::types::Exit;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<Exit> {
    logging::init(cli.log_level);

    let ctx = ExecutionContext::new(cli.config, cli.project_root, cli.format)?;

    match cli.command {
        Commands::Extract { dry_run } => handlers::extract::handle(&ctx, dry_run),
        Commands::Sessions { all } => handlers::sessions::handle(&ctx, all),
        Commands::Transcript => handlers::transcript::handle(&ctx),
        Commands::Scan { file } => handlers::scan::handle(&ctx, file.as_deref()),
    }
}
