//! User endpoints. All of them sit behind `server.api.userAPI` and are audited.

use super::{dispatch, request_context};
use crate::tenantgate::{
    directory::Directory,
    pipeline::{
        context::RequestContext,
        endpoint::{GET_USER, GET_USERS, WHOAMI},
        error::ApiError,
        RequestPipeline,
    },
};
use axum::{
    extract::{Extension, Path, Request},
    response::Response,
};
use std::sync::Arc;

fn current_user(ctx: &mut RequestContext) -> Result<(), ApiError> {
    let user = ctx.require_user()?.clone();
    ctx.set_json(&user)
}

fn list_users(directory: &Directory, ctx: &mut RequestContext) -> Result<(), ApiError> {
    ctx.require_user()?;
    ctx.set_json(&directory.users())
}

fn find_user(
    directory: &Directory,
    username: &str,
    ctx: &mut RequestContext,
) -> Result<(), ApiError> {
    ctx.require_user()?;
    let user = directory
        .user(username)
        .ok_or_else(|| ApiError::not_found("User not found."))?;
    ctx.set_json(user)
}

pub async fn whoami(Extension(pipeline): Extension<RequestPipeline>, request: Request) -> Response {
    let ctx = request_context(&request);
    dispatch(&pipeline, &WHOAMI, ctx, &current_user).await
}

pub async fn get_users(
    Extension(pipeline): Extension<RequestPipeline>,
    Extension(directory): Extension<Arc<Directory>>,
    request: Request,
) -> Response {
    let operation = move |ctx: &mut RequestContext| list_users(&directory, ctx);
    let ctx = request_context(&request);
    dispatch(&pipeline, &GET_USERS, ctx, &operation).await
}

pub async fn get_user(
    Extension(pipeline): Extension<RequestPipeline>,
    Extension(directory): Extension<Arc<Directory>>,
    Path(username): Path<String>,
    request: Request,
) -> Response {
    let operation = move |ctx: &mut RequestContext| find_user(&directory, &username, ctx);
    let ctx = request_context(&request);
    dispatch(&pipeline, &GET_USER, ctx, &operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenantgate::model::User;
    use axum::http::{Method, StatusCode};
    use serde_json::Value;

    fn directory() -> Directory {
        Directory::new(
            vec![
                User::new("u1", "alice", false),
                User::new("u2", "root", true),
            ],
            Vec::new(),
        )
    }

    fn context() -> RequestContext {
        RequestContext::new(Method::GET, "/api/users")
            .with_user(Some(User::new("u1", "alice", false)))
    }

    #[test]
    fn whoami_returns_acting_user() {
        let mut ctx = context();
        current_user(&mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        assert_eq!(value["username"], "alice");
        assert_eq!(value["admin"], false);
    }

    #[test]
    fn lists_and_finds_users() {
        let directory = directory();

        let mut ctx = context();
        list_users(&directory, &mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));

        let mut ctx = context();
        find_user(&directory, "root", &mut ctx).unwrap();
        let value: Value = serde_json::from_str(&ctx.locals.message).unwrap();
        assert_eq!(value["id"], "u2");

        let mut ctx = context();
        let err = find_user(&directory, "carol", &mut ctx).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn anonymous_is_unauthorized() {
        let mut ctx = RequestContext::new(Method::GET, "/api/users/whoami");
        assert_eq!(
            current_user(&mut ctx).unwrap_err().status,
            StatusCode::UNAUTHORIZED
        );
    }
}
