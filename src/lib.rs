//! connect-match - profile matchmaking engine
//!
//! This library maintains per-user matching profiles, computes weighted
//! pairwise compatibility scores, and manages the resulting match records.
//! Profile updates re-trigger match generation either synchronously or
//! through an event-driven pipeline.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, Matcher};
pub use crate::models::{
    Match, MatchStatus, MatchmakingCriteria, ProfileUpdatedEvent, ScoredCandidate,
    ScoringWeights, UserProfile,
};
pub use crate::services::{
    ChannelEventLog, EventLog, MatchEngine, MatchStore, MemoryStore, Pipeline, ProfileStore,
};
