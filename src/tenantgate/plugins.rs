//! Built-in plugins installed when `server.plugins.enabled` is set.

use super::pipeline::{
    context::RequestContext,
    endpoint::Endpoint,
    error::ApiError,
    hooks::{HookTable, Phase},
};
use tracing::debug;

/// Emits a debug event before and after every endpoint's core operation.
#[must_use]
pub fn tracing_table(endpoints: &[Endpoint]) -> HookTable {
    endpoints.iter().fold(HookTable::new(), |table, endpoint| {
        let name = endpoint.name;
        table
            .register(
                name,
                Phase::Pre,
                move |ctx: &mut RequestContext| -> Result<(), ApiError> {
                    debug!(endpoint = name, "pre {} {}", ctx.method, ctx.path);
                    Ok(())
                },
            )
            .register(
                name,
                Phase::Post,
                move |ctx: &mut RequestContext| -> Result<(), ApiError> {
                    debug!(
                        endpoint = name,
                        "post {} {} formatted={}",
                        ctx.method,
                        ctx.path,
                        ctx.locals.formatted
                    );
                    Ok(())
                },
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenantgate::pipeline::{endpoint::ENDPOINTS, hooks::HookRegistry};

    #[test]
    fn covers_every_endpoint() {
        let registry = HookRegistry::load(true, tracing_table(ENDPOINTS), ENDPOINTS).unwrap();
        for endpoint in ENDPOINTS {
            let hooks = registry.hooks_for(endpoint.name);
            assert_eq!(hooks.pre.len(), 1, "{}", endpoint.name);
            assert_eq!(hooks.post.len(), 1, "{}", endpoint.name);
        }
    }
}
