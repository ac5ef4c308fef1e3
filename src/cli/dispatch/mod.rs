use crate::cli::{
    actions::{server::Args, Action},
    commands::{ARG_CONFIG, ARG_DATA, ARG_LOGS_DIR, ARG_PORT},
};
use anyhow::Result;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server(Args {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        config: matches.get_one::<String>(ARG_CONFIG).map(PathBuf::from),
        data: matches.get_one::<String>(ARG_DATA).map(PathBuf::from),
        logs_dir: matches
            .get_one::<String>(ARG_LOGS_DIR)
            .map_or_else(|| PathBuf::from("logs"), PathBuf::from),
    }))
}
