//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/` and `/api` - Greetings
//! - `/api/health` - Health checks
//! - `/api/auth` - Signup, login, logout
//! - `/api/users` - User accounts
//! - `/api/profiles` - Public profiles
//! - `/api/listings` - Marketplace listings and their images
//! - `/api/admin` - Admin tools, including rate limit management
//!
//! Every route runs behind the rate governor.

pub mod admin;
pub mod auth;
pub mod greeting;
pub mod health;
pub mod listing_images;
pub mod listings;
pub mod profiles;
pub mod users;

use axum::{http::Uri, middleware::from_fn_with_state, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::{apply_cors, rate_limiter_middleware};
use crate::models::AppState;
use crate::types::AppError;

/// Create the main application router
///
/// Layers, outermost first: CORS, request tracing, rate limiting.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let router = Router::new()
        .merge(greeting::router())
        .merge(health::router(state.clone()))
        .merge(auth::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(profiles::router(state.clone()))
        .merge(listings::router(state.clone()))
        .merge(listing_images::router(state.clone()))
        .merge(admin::router(state.clone()))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), rate_limiter_middleware))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &state.config.server.cors_allowed_origins)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
