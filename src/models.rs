use sqlx::PgPool;
use crate::config::Config;
use crate::rate_limit::RateGovernor;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub governor: RateGovernor,
    /// `None` when no `DATABASE_URL` is configured.
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(config: Config, governor: RateGovernor, pool: Option<PgPool>) -> Self {
        Self {
            config,
            governor,
            pool,
        }
    }
}

// Persisted rows. Only the shape is fixed here; the queries live with the
// features that need them.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: uuid::Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
    pub rate_limit_enabled: bool,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct GreetingResponse {
    pub message: String,
}
