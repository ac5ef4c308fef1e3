//! # Tenantgate
//!
//! `tenantgate` serves a multi-tenant API where organizations own projects and
//! users hold a per-project permission level (`admin`, `write`, `read`).
//!
//! ## Request Pipeline
//!
//! Every API call runs through [`tenantgate::pipeline::RequestPipeline`]:
//! identity resolution, route logging, disable checks, pre-hooks, the core
//! operation, post-hooks, response finalization and response logging.
//! Extension hooks are registered once at startup and frozen into a read-only
//! [`tenantgate::pipeline::hooks::HookRegistry`].
//!
//! ## Project Visibility
//!
//! Site admins see every project. Everyone else sees a project when they hold
//! an `admin` grant, a `write`/`read` grant on an unarchived project, or when the
//! project is `internal` and unarchived. Listings and single-project lookups share
//! [`tenantgate::access::is_visible`] so the two never disagree.

pub mod cli;
pub mod tenantgate;
