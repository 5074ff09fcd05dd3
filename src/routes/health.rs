use axum::{extract::State, routing::get, Json, Router};
use tracing::warn;

use crate::db;
use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.pool {
        None => "disabled".to_string(),
        Some(pool) => match db::health_check(pool).await {
            Ok(_) => "connected".to_string(),
            Err(e) => {
                warn!("Database health check failed: {:#}", e);
                "unreachable".to_string()
            }
        },
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
        rate_limit_enabled: state.governor.is_enabled(),
    })
}
