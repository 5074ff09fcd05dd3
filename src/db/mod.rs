use sqlx::postgres::{PgPool, PgPoolOptions};
use crate::config::DatabaseConfig;
use anyhow::Result;
use std::time::Duration;

/// Builds a pool without connecting. Returns `None` when no URL is set.
///
/// Connections are opened on first use, so the API starts even while the
/// database is down; `/api/health` reports the state.
pub fn create_pool(config: &DatabaseConfig) -> Result<Option<PgPool>> {
    let Some(url) = config.url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_lazy(url)?;

    Ok(Some(pool))
}

pub async fn health_check(pool: &PgPool) -> Result<bool> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(true)
}
