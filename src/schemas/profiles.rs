use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Profile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            display_name: profile.display_name,
            bio: profile.bio,
            location: profile.location,
            avatar_url: profile.avatar_url,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 64))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(length(max = 128))]
    pub location: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}
