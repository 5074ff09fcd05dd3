// Marketplace API - listings, profiles and accounts behind a rate governor

pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod rate_limit; // Fixed-window request admission control
pub mod routes;
pub mod schemas;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use rate_limit::RateGovernor;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
