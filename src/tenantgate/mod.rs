pub mod access;
pub mod config;
pub mod directory;
pub mod handlers;
pub mod identity;
pub mod model;
pub mod pipeline;
pub mod plugins;
pub mod visibility;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use config::Config;
use directory::Directory;
use identity::HeaderIdentity;
use pipeline::{
    audit::SecurityLog,
    endpoint::ENDPOINTS,
    hooks::{HookRegistry, HookTable},
    RequestPipeline,
};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[derive(Debug)]
pub struct ServerOptions {
    pub port: u16,
    pub config: Config,
    pub directory: Directory,
    pub logs_dir: PathBuf,
}

/// Wire the pipeline: freeze the hook table and open the security log.
///
/// # Errors
/// Returns an error if the hook table doesn't cover the served endpoints or the
/// security log can't be opened
pub async fn build_pipeline(
    config: Config,
    directory: Arc<Directory>,
    hooks: HookTable,
    logs_dir: &Path,
) -> Result<RequestPipeline> {
    let registry = HookRegistry::load(config.server.plugins.enabled, hooks, ENDPOINTS)
        .context("Failed to load plugin hooks")?;

    let security_log = SecurityLog::open(&logs_dir.join(&config.log.security_file)).await?;
    info!("Security log: {}", security_log.path().display());

    Ok(RequestPipeline::new(
        Arc::new(config),
        Arc::new(registry),
        Arc::new(HeaderIdentity::new(directory)),
        Some(Arc::new(security_log)),
    ))
}

/// API routes with their shared state.
pub fn router(pipeline: RequestPipeline, directory: Arc<Directory>) -> Router {
    Router::new()
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/api/orgs", get(handlers::orgs::get_orgs))
        .route("/api/orgs/:org_id", get(handlers::orgs::get_org))
        .route("/api/orgs/:org_id/projects", get(handlers::orgs::get_projects))
        .route(
            "/api/orgs/:org_id/projects/:project_id",
            get(handlers::orgs::get_project),
        )
        .route("/api/users", get(handlers::users::get_users))
        .route("/api/users/whoami", get(handlers::users::whoami))
        .route("/api/users/:username", get(handlers::users::get_user))
        .layer(Extension(pipeline))
        .layer(Extension(directory))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(options: ServerOptions, hooks: HookTable) -> Result<()> {
    let directory = Arc::new(options.directory);
    let pipeline = build_pipeline(
        options.config,
        Arc::clone(&directory),
        hooks,
        &options.logs_dir,
    )
    .await?;

    let app = router(pipeline, directory).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{}", options.port)).await?;

    info!("Listening on [::]:{}", options.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Gracefully shutdown");
        }
    })
    .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
