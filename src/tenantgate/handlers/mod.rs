pub mod health;
pub use self::health::health;

pub mod orgs;
pub mod root;
pub mod users;

// common functions for the handlers
use crate::tenantgate::pipeline::{
    context::RequestContext,
    endpoint::Endpoint,
    respond::CapturedResponse,
    Operation, RequestPipeline,
};
use axum::{
    extract::{ConnectInfo, OriginalUri, Request},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

/// Pipeline context for an incoming request: method, original URL, headers and peer address.
#[must_use]
pub fn request_context(request: &Request) -> RequestContext {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().to_string(), |uri| uri.0.to_string());
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    RequestContext::new(request.method().clone(), &path)
        .with_headers(request.headers().clone())
        .with_remote_addr(remote_addr)
}

/// Run `operation` through the pipeline and turn the transmitted response into an axum one.
pub async fn dispatch(
    pipeline: &RequestPipeline,
    endpoint: &Endpoint,
    ctx: RequestContext,
    operation: &dyn Operation,
) -> Response {
    let mut transport = CapturedResponse::new();
    pipeline
        .handle(endpoint, ctx, operation, &mut transport)
        .await;
    transport.into_response()
}
