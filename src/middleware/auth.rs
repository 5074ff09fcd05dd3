// Admin token guard for the /api/admin routes
// User authentication is not wired up yet; admin access is a shared token.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::models::AppState;
use crate::types::AppError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub async fn admin_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(expected) = state.config.admin.token.as_deref() else {
        return AppError::Forbidden("admin API is disabled".to_string()).into_response();
    };

    let verified = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|token| verify_token(token, expected));

    match verified {
        Some(true) => next.run(req).await,
        Some(false) => {
            warn!(path = %req.uri().path(), "Rejected admin request with wrong token");
            AppError::Unauthorized("invalid admin token".to_string()).into_response()
        }
        None => AppError::Unauthorized("missing admin token".to_string()).into_response(),
    }
}

/// Comparison time depends only on the length of `provided`.
pub fn verify_token(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_token() {
        assert!(verify_token("s3cret", "s3cret"));
        assert!(!verify_token("s3creT", "s3cret"));
        assert!(!verify_token("s3cret-longer", "s3cret"));
        assert!(!verify_token("", "s3cret"));
    }
}
