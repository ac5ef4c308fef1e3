//! Response finalization and transmission.

use super::context::RequestContext;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A response handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: String,
}

/// Where finished responses go. The pipeline transmits at most once per request.
pub trait Transport: Send {
    fn send(&mut self, response: SentResponse);
}

/// Apply defaults once, then transmit `locals.message`.
///
/// The `formatted` flag keeps a pre-formatted response untouched; the `sent`
/// flag keeps a second call from transmitting again.
pub fn finalize(ctx: &mut RequestContext, transport: &mut dyn Transport) {
    if ctx.response.sent {
        return;
    }

    if !ctx.locals.formatted {
        let status = ctx.locals.status_code.unwrap_or(StatusCode::OK);
        let content_type = ctx
            .locals
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        format_response(ctx, status, &content_type);
    }

    let status = ctx.response.status.unwrap_or(StatusCode::OK);
    let content_type = ctx
        .response
        .content_type
        .clone()
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    let body = ctx.locals.message.clone();
    transmit(ctx, transport, status, &content_type, body);
}

/// Set status and content type on the outgoing response and mark it formatted.
pub fn format_response(ctx: &mut RequestContext, status: StatusCode, content_type: &str) {
    ctx.response.status = Some(status);
    ctx.response.content_type = Some(content_type.to_string());
    ctx.locals.formatted = true;
}

/// Send `body` unless a response already went out. Returns whether it was sent.
pub fn transmit(
    ctx: &mut RequestContext,
    transport: &mut dyn Transport,
    status: StatusCode,
    content_type: &str,
    body: String,
) -> bool {
    if ctx.response.sent {
        return false;
    }

    ctx.response.status = Some(status);
    ctx.response.content_type = Some(content_type.to_string());
    ctx.response.sent = true;
    transport.send(SentResponse {
        status,
        content_type: content_type.to_string(),
        body,
    });
    true
}

/// Transport that keeps the response for the axum handler to return.
#[derive(Debug, Default)]
pub struct CapturedResponse {
    response: Option<SentResponse>,
}

impl CapturedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn response(&self) -> Option<&SentResponse> {
        self.response.as_ref()
    }
}

impl Transport for CapturedResponse {
    fn send(&mut self, response: SentResponse) {
        self.response = Some(response);
    }
}

impl IntoResponse for SentResponse {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        (self.status, [(CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

impl IntoResponse for CapturedResponse {
    fn into_response(self) -> Response {
        match self.response {
            Some(response) => response.into_response(),
            None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::Method;

    /// Records every transmission.
    #[derive(Debug, Default)]
    pub(crate) struct SpyTransport {
        pub(crate) sent: Vec<SentResponse>,
    }

    impl Transport for SpyTransport {
        fn send(&mut self, response: SentResponse) {
            self.sent.push(response);
        }
    }

    #[test]
    fn defaults_status_and_content_type() {
        let mut ctx = RequestContext::new(Method::GET, "/api/orgs");
        ctx.locals.message = "[]".to_string();
        let mut spy = SpyTransport::default();

        finalize(&mut ctx, &mut spy);

        assert!(ctx.locals.formatted);
        assert_eq!(
            spy.sent,
            vec![SentResponse {
                status: StatusCode::OK,
                content_type: DEFAULT_CONTENT_TYPE.to_string(),
                body: "[]".to_string(),
            }]
        );
    }

    #[test]
    fn uses_locals_when_set() {
        let mut ctx = RequestContext::new(Method::GET, "/api/orgs");
        ctx.locals.message = "created".to_string();
        ctx.locals.status_code = Some(StatusCode::CREATED);
        ctx.locals.content_type = Some("text/plain".to_string());
        let mut spy = SpyTransport::default();

        finalize(&mut ctx, &mut spy);

        assert_eq!(spy.sent[0].status, StatusCode::CREATED);
        assert_eq!(spy.sent[0].content_type, "text/plain");
    }

    #[test]
    fn preformatted_locals_are_left_alone() {
        let mut ctx = RequestContext::new(Method::GET, "/api/orgs");
        ctx.locals.message = "{}".to_string();
        ctx.locals.status_code = Some(StatusCode::ACCEPTED);
        ctx.locals.content_type = Some("text/csv".to_string());
        ctx.locals.formatted = true;
        let mut spy = SpyTransport::default();

        finalize(&mut ctx, &mut spy);

        assert_eq!(ctx.locals.status_code, Some(StatusCode::ACCEPTED));
        assert_eq!(ctx.locals.content_type.as_deref(), Some("text/csv"));
        assert_eq!(spy.sent.len(), 1);
        assert_eq!(spy.sent[0].status, StatusCode::OK);
    }

    #[test]
    fn second_finalize_sends_nothing() {
        let mut ctx = RequestContext::new(Method::GET, "/api/orgs");
        let mut spy = SpyTransport::default();

        finalize(&mut ctx, &mut spy);
        ctx.locals.formatted = false;
        ctx.locals.status_code = Some(StatusCode::IM_A_TEAPOT);
        finalize(&mut ctx, &mut spy);

        assert_eq!(spy.sent.len(), 1);
        assert_eq!(spy.sent[0].status, StatusCode::OK);
    }

    #[test]
    fn captured_response_converts() {
        let mut captured = CapturedResponse::new();
        captured.send(SentResponse {
            status: StatusCode::FORBIDDEN,
            content_type: "text/plain".to_string(),
            body: "nope".to_string(),
        });
        let response = captured.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");

        assert_eq!(
            CapturedResponse::new().into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
