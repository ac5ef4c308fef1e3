use crate::tenantgate::{
    config::Config,
    directory::Directory,
    new,
    pipeline::{endpoint::ENDPOINTS, hooks::HookTable},
    plugins, ServerOptions,
};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Args {
    pub port: u16,
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub logs_dir: PathBuf,
}

/// Load configuration, directory and hooks, then start the server
///
/// # Errors
/// Returns an error if a file can't be loaded or the server fails to start
pub async fn handle(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let directory = match &args.data {
        Some(path) => Directory::from_file(path)?,
        None => Directory::default(),
    };
    info!(
        "Serving {} organizations and {} users",
        directory.orgs().len(),
        directory.users().len()
    );

    let hooks = if config.server.plugins.enabled {
        plugins::tracing_table(ENDPOINTS)
    } else {
        HookTable::new()
    };

    new(
        ServerOptions {
            port: args.port,
            config,
            directory,
            logs_dir: args.logs_dir,
        },
        hooks,
    )
    .await
}
