use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserSummary {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub listing_count: i64,
}

/// Body of `POST /api/admin/rate-limit/reset`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetRateLimitRequest {
    /// Client key as the governor derives it (usually an IP address).
    #[validate(length(min = 1, max = 128))]
    pub client: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRateLimitResponse {
    pub client: String,
    pub reset: bool,
}
