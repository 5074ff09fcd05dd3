use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::models::AppState;
use crate::schemas::{LoginRequest, SignupRequest, TokenResponse, UserResponse, ValidatedJson};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .with_state(state)
}

async fn signup(
    State(_state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> AppResult<Json<UserResponse>> {
    info!("Signup request for {}", request.username);
    Err(AppError::NotImplemented("signup"))
}

async fn login(
    State(_state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    info!("Login attempt for {}", request.email);
    Err(AppError::NotImplemented("login"))
}

async fn logout(State(_state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    Err(AppError::NotImplemented("logout"))
}
