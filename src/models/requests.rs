use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::UserProfile;

/// Request to create or refresh a matching profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateProfileRequest {
    /// Build a profile from the request. Timestamps are provisional;
    /// the engine stamps them on write.
    pub fn into_profile(self) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            user_id: self.user_id,
            tags: self.tags,
            industries: self.industries,
            interests: self.interests,
            skills: self.skills,
            experience: self.experience,
            location: self.location,
            bio: self.bio,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update a match's lifecycle status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMatchStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

/// Query parameters for listing a user's matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_list_limit() -> usize {
    10
}
