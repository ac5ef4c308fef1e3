//! Route and response log lines, and the append-only security log.

use super::context::RequestContext;
use anyhow::{Context, Result};
use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

/// `<METHOD> "<path>" requested by <identity>`
#[must_use]
pub fn route_line(ctx: &RequestContext) -> String {
    format!(
        "{} \"{}\" requested by {}",
        ctx.method,
        ctx.path,
        ctx.acting_identity()
    )
}

/// `<METHOD> "<path>" requested from <ip>`
#[must_use]
pub fn origin_line(ctx: &RequestContext) -> String {
    let ip = ctx
        .remote_addr
        .map_or_else(|| "unknown".to_string(), client_ip);
    format!("{} \"{}\" requested from {ip}", ctx.method, ctx.path)
}

/// `<ip> <identity> "<METHOD> <path>" <status> <bytes>`
#[must_use]
pub fn response_line(ctx: &RequestContext, body_len: usize) -> String {
    let ip = ctx.remote_addr.map_or_else(|| "-".to_string(), client_ip);
    let status = ctx
        .response
        .status
        .map_or_else(|| "-".to_string(), |status| status.as_u16().to_string());
    format!(
        "{ip} {} \"{} {}\" {status} {body_len}",
        ctx.acting_identity(),
        ctx.method,
        ctx.path
    )
}

/// Client address as logged: loopback v6 becomes `127.0.0.1` and
/// v4-mapped v6 addresses lose their `::ffff:` prefix.
#[must_use]
pub fn client_ip(addr: IpAddr) -> String {
    match addr {
        IpAddr::V6(v6) if v6.is_loopback() => "127.0.0.1".to_string(),
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map_or_else(|| v6.to_string(), |v4| v4.to_string()),
        IpAddr::V4(v4) => v4.to_string(),
    }
}

/// Append-only audit file shared by all requests.
///
/// Appends go through one lock and one write per line, so lines from
/// concurrent requests never interleave.
#[derive(Debug)]
pub struct SecurityLog {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl SecurityLog {
    /// Open (or create) the security log at `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the directory or file can't be created
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open security log {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` followed by a newline.
    ///
    /// # Errors
    /// Returns the underlying I/O error
    pub async fn append(&self, line: &str) -> std::io::Result<()> {
        let record = format!("{line}\n");
        let mut file = self.file.lock().await;
        file.write_all(record.as_bytes()).await?;
        file.flush().await
    }
}
