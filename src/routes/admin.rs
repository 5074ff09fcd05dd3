//! Admin API
//!
//! All routes sit behind [`admin_guard`]:
//! - `GET /api/admin/users` - user overview
//! - `GET /api/admin/rate-limit` - governor status
//! - `POST /api/admin/rate-limit/reset` - clear one client's counters
//! - `POST /api/admin/rate-limit/reload` - re-read `RATE_LIMIT_*` and apply

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::config::RateLimitConfig;
use crate::middleware::admin_guard;
use crate::models::AppState;
use crate::rate_limit::{ClientKey, GovernorStatus};
use crate::schemas::{AdminUserSummary, ResetRateLimitRequest, ResetRateLimitResponse, ValidatedJson};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/rate-limit", get(rate_limit_status))
        .route("/api/admin/rate-limit/reset", post(reset_rate_limit))
        .route("/api/admin/rate-limit/reload", post(reload_rate_limit))
        .route_layer(from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}

async fn list_users(State(_state): State<AppState>) -> AppResult<Json<Vec<AdminUserSummary>>> {
    Err(AppError::NotImplemented("admin user listing"))
}

async fn rate_limit_status(State(state): State<AppState>) -> Json<GovernorStatus> {
    Json(state.governor.snapshot())
}

async fn reset_rate_limit(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetRateLimitRequest>,
) -> Json<ResetRateLimitResponse> {
    let client = ClientKey::new(request.client.trim());
    state.governor.reset(&client);

    Json(ResetRateLimitResponse {
        client: client.to_string(),
        reset: true,
    })
}

async fn reload_rate_limit(State(state): State<AppState>) -> AppResult<Json<GovernorStatus>> {
    let config = RateLimitConfig::from_env()
        .map_err(|e| AppError::InvalidRequest(format!("{:#}", e)))?;

    state
        .governor
        .reload(config.governor)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    info!("Rate limit configuration reloaded by admin");
    Ok(Json(state.governor.snapshot()))
}
