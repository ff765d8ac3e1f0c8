// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Match, MatchStatus, MatchmakingCriteria, ProfileUpdatedEvent, ScoredCandidate,
    ScoringWeights, UserProfile,
};
pub use requests::{CreateProfileRequest, MatchListQuery, UpdateMatchStatusRequest};
pub use responses::{
    CreateProfileResponse, ErrorResponse, HealthResponse, MatchDetailResponse,
    MatchListResponse, ProfileResponse, SearchResponse, UpdateMatchStatusResponse,
};
