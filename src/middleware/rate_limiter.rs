// Rate limiting middleware: runs the governor before every handler

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::AppState;
use crate::rate_limit::{ClientKey, Decision, RequestContext};

#[derive(Debug, Serialize)]
struct RateLimitedBody {
    error: &'static str,
    message: String,
    retry_after: u64,
}

/// Builds the governor's view of a request from metadata only.
pub fn request_context(state: &AppState, req: &Request) -> RequestContext {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let client = ClientKey::from_request_parts(
        req.headers(),
        peer,
        state.config.rate_limit.trust_proxy,
    );

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    RequestContext::new(client, route, state.governor.now())
}

pub async fn rate_limiter_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let ctx = request_context(&state, &req);

    match state.governor.check_and_record(&ctx) {
        Decision::Allow => next.run(req).await,
        Decision::Deny { retry_after } => too_many_requests(retry_after),
    }
}

/// 429 with a `Retry-After` header and the same hint in the body.
pub fn too_many_requests(retry_after: u64) -> Response {
    let body = RateLimitedBody {
        error: "rate_limit_exceeded",
        message: format!("Too many requests. Retry in {} seconds.", retry_after),
        retry_after,
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_too_many_requests_response() {
        let response = too_many_requests(57);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "57");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "rate_limit_exceeded");
        assert_eq!(json["retry_after"], 57);
    }
}
