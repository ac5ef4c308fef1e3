//! Organization and project read endpoints.
//!
//! Unauthorized lookups answer `404 Not Found` like missing resources.

use super::{dispatch, request_context};
use crate::tenantgate::{
    access,
    directory::Directory,
    model::{Organization, User},
    pipeline::{
        context::RequestContext,
        endpoint::{GET_ORG, GET_ORGS, GET_PROJECT, GET_PROJECTS},
        error::ApiError,
        RequestPipeline,
    },
    visibility::{self, filter_projects},
};
use axum::{
    extract::{Extension, Path, Request},
    response::Response,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct OrgSummary<'a> {
    id: &'a str,
    name: &'a str,
}

/// An organization is listed when the user sees at least one of its projects.
fn org_visible(user: &User, org: &Organization) -> bool {
    user.admin
        || org
            .projects
            .iter()
            .any(|project| access::is_visible(user, project))
}

fn find_org<'a>(
    directory: &'a Directory,
    user: &User,
    org_id: &str,
) -> Result<&'a Organization, ApiError> {
    directory
        .org(org_id)
        .filter(|org| org_visible(user, org))
        .ok_or_else(|| ApiError::not_found("Organization not found."))
}

fn list_orgs(directory: &Directory, ctx: &mut RequestContext) -> Result<(), ApiError> {
    let user = ctx.require_user()?;
    let orgs: Vec<OrgSummary<'_>> = directory
        .orgs()
        .iter()
        .filter(|org| org_visible(user, org))
        .map(|org| OrgSummary {
            id: &org.id,
            name: &org.name,
        })
        .collect();
    ctx.set_json(&orgs)
}

fn show_org(directory: &Directory, org_id: &str, ctx: &mut RequestContext) -> Result<(), ApiError> {
    let user = ctx.require_user()?;
    let org = find_org(directory, user, org_id)?;
    let summary = OrgSummary {
        id: &org.id,
        name: &org.name,
    };
    ctx.set_json(&summary)
}

fn list_projects(
    directory: &Directory,
    org_id: &str,
    ctx: &mut RequestContext,
) -> Result<(), ApiError> {
    let user = ctx.require_user()?;
    let org = find_org(directory, user, org_id)?;
    let entries = filter_projects(user, org);
    ctx.set_json(&entries)
}

fn show_project(
    directory: &Directory,
    org_id: &str,
    project_id: &str,
    ctx: &mut RequestContext,
) -> Result<(), ApiError> {
    let user = ctx.require_user()?;
    let org = find_org(directory, user, org_id)?;
    let project = org
        .project(project_id)
        .filter(|project| access::is_visible(user, project))
        .ok_or_else(|| ApiError::not_found("Project not found."))?;

    let payload = json!({
        "project": project,
        "permission": access::effective_level(user, project),
        "link": visibility::project_link(&org.id, &project.id),
    });
    ctx.set_json(&payload)
}

pub async fn get_orgs(
    Extension(pipeline): Extension<RequestPipeline>,
    Extension(directory): Extension<Arc<Directory>>,
    request: Request,
) -> Response {
    let operation = move |ctx: &mut RequestContext| list_orgs(&directory, ctx);
    let ctx = request_context(&request);
    dispatch(&pipeline, &GET_ORGS, ctx, &operation).await
}

pub async fn get_org(
    Extension(pipeline): Extension<RequestPipeline>,
    Extension(directory): Extension<Arc<Directory>>,
    Path(org_id): Path<String>,
    request: Request,
) -> Response {
    let operation = move |ctx: &mut RequestContext| show_org(&directory, &org_id, ctx);
    let ctx = request_context(&request);
    dispatch(&pipeline, &GET_ORG, ctx, &operation).await
}

pub async fn get_projects(
    Extension(pipeline): Extension<RequestPipeline>,
    Extension(directory): Extension<Arc<Directory>>,
    Path(org_id): Path<String>,
    request: Request,
) -> Response {
    let operation = move |ctx: &mut RequestContext| list_projects(&directory, &org_id, ctx);
    let ctx = request_context(&request);
    dispatch(&pipeline, &GET_PROJECTS, ctx, &operation).await
}

pub async fn get_project(
    Extension(pipeline): Extension<RequestPipeline>,
    Extension(directory): Extension<Arc<Directory>>,
    Path((org_id, project_id)): Path<(String, String)>,
    request: Request,
) -> Response {
    let operation =
        move |ctx: &mut RequestContext| show_project(&directory, &org_id, &project_id, ctx);
    let ctx = request_context(&request);
    dispatch(&pipeline, &GET_PROJECT, ctx, &operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenantgate::model::{PermissionLevel, Project, Visibility};
    use axum::http::{Method, StatusCode};
    use serde_json::Value;

    fn directory() -> Directory {
        Directory::new(
            vec![User::new("u1", "alice", false)],
            vec![
                Organization::new(
                    "acme",
                    "Acme",
                    vec![
                        Project::new("alpha", "Alpha", Visibility::Private)
                            .grant("alice", PermissionLevel::Write),
                        Project::new("bravo", "Bravo", Visibility::Private),
                    ],
                ),
                Organization::new(
                    "globex",
                    "Globex",
                    vec![Project::new("zulu", "Zulu", Visibility::Private)],
                ),
            ],
        )
    }

    fn context(user: Option<User>) -> RequestContext {
        RequestContext::new(Method::GET, "/api/orgs").with_user(user)
    }

    fn alice() -> Option<User> {
        Some(User::new("u1", "alice", false))
    }

    #[test]
    fn anonymous_is_unauthorized() {
        let mut ctx = context(None);
        let err = list_orgs(&directory(), &mut ctx).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn orgs_without_visible_projects_are_hidden() {
        let mut ctx = context(alice());
        list_orgs(&directory(), &mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        assert_eq!(value, json!([{ "id": "acme", "name": "Acme" }]));

        let mut ctx = context(alice());
        let err = show_org(&directory(), "globex", &mut ctx).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn project_listing_uses_filter() {
        let mut ctx = context(alice());
        list_projects(&directory(), "acme", &mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["project"]["id"], "alpha");
        assert_eq!(entries[0]["css_state"], "normal");
        assert_eq!(entries[0]["admin_view"], false);
    }

    #[test]
    fn project_lookup_agrees_with_listing() {
        let directory = directory();

        let mut ctx = context(alice());
        show_project(&directory, "acme", "alpha", &mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        assert_eq!(value["permission"], "write");
        assert_eq!(value["link"], "/orgs/acme/projects/alpha/branches/master/elements");

        let mut ctx = context(alice());
        let err = show_project(&directory, "acme", "bravo", &mut ctx).unwrap_err();
        assert_eq!(err, ApiError::not_found("Project not found."));
    }

    #[test]
    fn admin_sees_every_org() {
        let mut ctx = context(Some(User::new("root", "root", true)));
        list_orgs(&directory(), &mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
