use serde::{Deserialize, Serialize};

use crate::models::domain::{Match, ScoredCandidate, UserProfile};

/// Response for profile creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileResponse {
    pub message: String,
    pub matches_found: usize,
}

/// Response wrapping a single profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
}

/// Response for listing a user's matches
///
/// `total` counts the status-filtered set before pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    pub total: usize,
}

/// Response wrapping a single match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetailResponse {
    #[serde(rename = "match")]
    pub record: Match,
}

/// Response for a status update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMatchStatusResponse {
    pub message: String,
    #[serde(rename = "match")]
    pub record: Match,
}

/// Response for the search endpoint
///
/// `total` counts all hits above the threshold before pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<ScoredCandidate>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
