//! Request pipeline wrapped around every API operation.
//!
//! Stages, in order, stopping at the first failure:
//! 1. resolve the acting identity (anonymous when absent)
//! 2. log the route, and append it to the security log for sensitive endpoints
//! 3. disable checks from `server.api.userAPI`, answering `403` when switched off
//! 4. pre-hooks, one at a time in registration order
//! 5. the core operation
//! 6. post-hooks, skipped when the response status is already set
//! 7. finalize and transmit, then log the response
//!
//! Hook and operation failures land in a single error boundary that transmits
//! one response carrying the error's status and message.

pub mod audit;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod hooks;
pub mod respond;

use crate::tenantgate::{config::Config, identity::IdentitySource};
use audit::SecurityLog;
use axum::http::StatusCode;
use context::RequestContext;
use endpoint::{Endpoint, Guard};
use error::ApiError;
use hooks::{Hook, HookRegistry, StageFuture};
use respond::Transport;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// The endpoint-specific handler invoked between pre- and post-hooks.
///
/// It fills `locals` (message, optionally status code, content type and the
/// `formatted` flag) and may set the response status directly.
pub trait Operation: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> StageFuture<'a>;
}

impl<F> Operation for F
where
    F: Fn(&mut RequestContext) -> Result<(), ApiError> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> StageFuture<'a> {
        Box::pin(std::future::ready(self(ctx)))
    }
}

#[derive(Clone)]
pub struct RequestPipeline {
    config: Arc<Config>,
    hooks: Arc<HookRegistry>,
    identity: Arc<dyn IdentitySource>,
    security_log: Option<Arc<SecurityLog>>,
}

impl RequestPipeline {
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        hooks: Arc<HookRegistry>,
        identity: Arc<dyn IdentitySource>,
        security_log: Option<Arc<SecurityLog>>,
    ) -> Self {
        Self {
            config,
            hooks,
            identity,
            security_log,
        }
    }

    /// Run `operation` for `endpoint` and transmit exactly one response.
    #[instrument(skip_all, fields(endpoint = endpoint.name, method = %ctx.method))]
    pub async fn handle(
        &self,
        endpoint: &Endpoint,
        mut ctx: RequestContext,
        operation: &dyn Operation,
        transport: &mut dyn Transport,
    ) -> RequestContext {
        ctx.user = self.identity.resolve(&ctx.headers);

        let route = audit::route_line(&ctx);
        info!("{route}");
        debug!("{}", audit::origin_line(&ctx));
        if endpoint.security_sensitive {
            self.audit(&route).await;
        }

        if let Some(message) = self.disabled_message(endpoint, &ctx) {
            respond::transmit(
                &mut ctx,
                transport,
                StatusCode::FORBIDDEN,
                "text/plain; charset=utf-8",
                message,
            );
            return ctx;
        }

        let body_len = match self.run_stages(endpoint, &mut ctx, operation).await {
            Ok(()) => {
                let body_len = ctx.locals.message.len();
                respond::finalize(&mut ctx, transport);
                body_len
            }
            Err(e) => {
                error!("{} \"{}\" failed: {e}", ctx.method, ctx.path);
                let body_len = e.message.len();
                respond::transmit(
                    &mut ctx,
                    transport,
                    e.status,
                    "text/plain; charset=utf-8",
                    e.message,
                );
                body_len
            }
        };

        let response = audit::response_line(&ctx, body_len);
        info!("{response}");
        if endpoint.security_sensitive {
            self.audit(&response).await;
        }

        ctx
    }

    /// Pre-hooks, the operation, then post-hooks unless a status is already set.
    async fn run_stages(
        &self,
        endpoint: &Endpoint,
        ctx: &mut RequestContext,
        operation: &dyn Operation,
    ) -> Result<(), ApiError> {
        let hooks = self.hooks.hooks_for(endpoint.name);

        run_hooks(hooks.pre, ctx).await?;

        operation.call(ctx).await?;

        // A set status means an earlier stage already answered; this also
        // skips post-hooks when the operation itself picked a status.
        if ctx.response.status.is_some() {
            debug!("Response status already set, skipping post-hooks");
            return Ok(());
        }

        run_hooks(hooks.post, ctx).await
    }

    fn disabled_message(&self, endpoint: &Endpoint, ctx: &RequestContext) -> Option<String> {
        let user_api = &self.config.server.api.user_api;
        match endpoint.guard {
            Guard::None => None,
            Guard::UserApi => (!user_api.allows(ctx.method.as_str()))
                .then(|| format!("{} {} is disabled.", ctx.method, ctx.path)),
            Guard::UserPatchPassword => {
                (!user_api.patch_password).then(|| format!("PATCH {} is disabled.", ctx.path))
            }
        }
    }

    async fn audit(&self, line: &str) {
        if let Some(log) = &self.security_log {
            if let Err(e) = log.append(line).await {
                error!(
                    "Failed to write security log {}: {e}",
                    log.path().display()
                );
            }
        }
    }
}

/// Await each hook in order, stopping at the first failure.
async fn run_hooks(hooks: &[Arc<dyn Hook>], ctx: &mut RequestContext) -> Result<(), ApiError> {
    for hook in hooks {
        hook.call(ctx).await?;
    }
    Ok(())
}
