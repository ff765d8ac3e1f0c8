// Core algorithm exports
pub mod matcher;
pub mod scoring;
pub mod search;

pub use matcher::{Matcher, RankedCandidate};
pub use scoring::{
    calculate_match_score, common_attributes, common_skills, common_tags,
    experience_compatibility, jaccard_similarity, location_compatibility,
};
pub use search::{match_reason, matches_criteria};
