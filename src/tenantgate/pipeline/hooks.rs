//! Extension hooks run before and after an endpoint's core operation.
//!
//! A [`HookTable`] is filled while the process starts and is then frozen into a
//! read-only [`HookRegistry`] that the pipeline borrows for every request.

use super::{context::RequestContext, endpoint::Endpoint, error::ApiError, error::HookLoadError};
use std::{collections::HashMap, fmt, future::Future, pin::Pin, sync::Arc};
use tracing::{debug, info};

pub type StageFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ApiError>> + Send + 'a>>;

/// A pre or post extension callback.
///
/// Synchronous closures taking `&mut RequestContext` are hooks as they are;
/// asynchronous hooks implement the trait and box their future.
pub trait Hook: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> StageFuture<'a>;
}

impl<F> Hook for F
where
    F: Fn(&mut RequestContext) -> Result<(), ApiError> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> StageFuture<'a> {
        Box::pin(std::future::ready(self(ctx)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pre,
    Post,
}

#[derive(Clone, Default)]
struct EndpointHooks {
    pre: Vec<Arc<dyn Hook>>,
    post: Vec<Arc<dyn Hook>>,
}

impl fmt::Debug for EndpointHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointHooks")
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .finish()
    }
}

/// Hooks of one endpoint, in registration order.
#[derive(Clone, Copy)]
pub struct Hooks<'a> {
    pub pre: &'a [Arc<dyn Hook>],
    pub post: &'a [Arc<dyn Hook>],
}

/// Startup-time builder of the endpoint hook table.
#[derive(Debug, Default)]
pub struct HookTable {
    entries: HashMap<String, EndpointHooks>,
}

impl HookTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for `endpoint` with no hooks.
    #[must_use]
    pub fn declare(mut self, endpoint: &str) -> Self {
        self.entries.entry(endpoint.to_string()).or_default();
        self
    }

    /// Declare every endpoint of `endpoints`.
    #[must_use]
    pub fn declare_all(self, endpoints: &[Endpoint]) -> Self {
        endpoints
            .iter()
            .fold(self, |table, endpoint| table.declare(endpoint.name))
    }

    /// Append `hook` to the `phase` list of `endpoint`.
    #[must_use]
    pub fn register<H>(mut self, endpoint: &str, phase: Phase, hook: H) -> Self
    where
        H: Hook + 'static,
    {
        let entry = self.entries.entry(endpoint.to_string()).or_default();
        let hook: Arc<dyn Hook> = Arc::new(hook);
        match phase {
            Phase::Pre => entry.pre.push(hook),
            Phase::Post => entry.post.push(hook),
        }
        self
    }
}

/// Frozen hook table. Empty for every endpoint when plugins are disabled.
#[derive(Debug, Default)]
pub struct HookRegistry {
    entries: HashMap<String, EndpointHooks>,
}

impl HookRegistry {
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Freeze `table` for the served `endpoints`.
    ///
    /// # Errors
    /// With plugins enabled, fails when an endpoint has no entry or when the
    /// table names an endpoint that is not served
    pub fn load(
        enabled: bool,
        table: HookTable,
        endpoints: &[Endpoint],
    ) -> Result<Self, HookLoadError> {
        if !enabled {
            info!("Plugins disabled, no hooks will run");
            return Ok(Self::disabled());
        }

        if let Some(missing) = endpoints
            .iter()
            .find(|endpoint| !table.entries.contains_key(endpoint.name))
        {
            return Err(HookLoadError::MissingHooks(missing.name.to_string()));
        }

        let mut unknown: Vec<&String> = table
            .entries
            .keys()
            .filter(|name| !endpoints.iter().any(|endpoint| endpoint.name == name.as_str()))
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            return Err(HookLoadError::UnknownEndpoint((*name).to_string()));
        }

        for (name, hooks) in &table.entries {
            debug!(
                "Loaded hooks for {name}: {} pre, {} post",
                hooks.pre.len(),
                hooks.post.len()
            );
        }

        Ok(Self {
            entries: table.entries,
        })
    }

    #[must_use]
    pub fn hooks_for(&self, endpoint: &str) -> Hooks<'_> {
        self.entries.get(endpoint).map_or(
            Hooks {
                pre: &[],
                post: &[],
            },
            |hooks| Hooks {
                pre: &hooks.pre,
                post: &hooks.post,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenantgate::pipeline::endpoint::{GET_PROJECTS, GET_USERS};

    fn noop(_ctx: &mut RequestContext) -> Result<(), ApiError> {
        Ok(())
    }

    #[test]
    fn disabled_registry_is_empty_for_every_endpoint() {
        let table = HookTable::new().register("getProjects", Phase::Pre, noop);
        let registry = HookRegistry::load(false, table, &[GET_PROJECTS]).unwrap();
        let hooks = registry.hooks_for("getProjects");
        assert!(hooks.pre.is_empty());
        assert!(hooks.post.is_empty());
        assert!(registry.hooks_for("anything").pre.is_empty());
    }

    #[test]
    fn enabled_registry_requires_every_endpoint() {
        let table = HookTable::new().declare("getProjects");
        let err = HookRegistry::load(true, table, &[GET_PROJECTS, GET_USERS]).unwrap_err();
        assert_eq!(err, HookLoadError::MissingHooks("getUsers".to_string()));
    }

    #[test]
    fn enabled_registry_rejects_unknown_endpoints() {
        let table = HookTable::new()
            .declare("getProjects")
            .register("postProject", Phase::Post, noop);
        let err = HookRegistry::load(true, table, &[GET_PROJECTS]).unwrap_err();
        assert_eq!(err, HookLoadError::UnknownEndpoint("postProject".to_string()));
    }

    #[test]
    fn hooks_keep_registration_phase() {
        let table = HookTable::new()
            .declare_all(&[GET_PROJECTS, GET_USERS])
            .register("getProjects", Phase::Pre, noop)
            .register("getProjects", Phase::Pre, noop)
            .register("getProjects", Phase::Post, noop);
        let registry = HookRegistry::load(true, table, &[GET_PROJECTS, GET_USERS]).unwrap();

        let hooks = registry.hooks_for("getProjects");
        assert_eq!(hooks.pre.len(), 2);
        assert_eq!(hooks.post.len(), 1);
        assert!(registry.hooks_for("getUsers").pre.is_empty());
    }
}
