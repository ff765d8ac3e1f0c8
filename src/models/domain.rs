use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A user's matching-relevant attributes.
///
/// One live profile per `user_id`; a write fully replaces the prior
/// attribute set. `bio` is carried for display but never scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Years of experience.
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    // Stamped by the engine on write; defaulted so inbound event payloads
    // may omit them
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "accepted" => Ok(MatchStatus::Accepted),
            "rejected" => Ok(MatchStatus::Rejected),
            other => Err(format!(
                "invalid status '{}', must be one of: pending, accepted, rejected",
                other
            )),
        }
    }
}

/// A persisted, scored pairing between two profiles.
///
/// `common_tags` and `common_skills` are snapshots taken at creation time
/// and are not re-derived when either profile later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub user_id_1: String,
    pub user_id_2: String,
    pub score: f64,
    #[serde(default)]
    pub common_tags: Vec<String>,
    #[serde(default)]
    pub common_skills: Vec<String>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Whether the given user is either member of the pair.
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_id_1 == user_id || self.user_id_2 == user_id
    }

    /// Order-insensitive pair equality, the natural key for dedup.
    pub fn is_pair(&self, a: &str, b: &str) -> bool {
        (self.user_id_1 == a && self.user_id_2 == b)
            || (self.user_id_1 == b && self.user_id_2 == a)
    }
}

/// Request-scoped search filter. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, validator::Validate)]
pub struct MatchmakingCriteria {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub min_exp: Option<u32>,
    #[serde(default)]
    pub max_exp: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_search_limit() -> usize {
    10
}

/// A search hit: candidate id, compatibility score, human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub user_id: String,
    pub score: f64,
    pub reason: String,
}

/// Inbound event: a profile was created or updated upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdatedEvent {
    pub user_id: String,
    pub profile: UserProfile,
    pub timestamp: DateTime<Utc>,
}

/// Weights of the five compatibility sub-scores. Expected to sum to 1.0;
/// the scorer divides by the actual sum so partial tuning stays normalized.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub tags: f64,
    pub industries: f64,
    pub experience: f64,
    pub skills: f64,
    pub location: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tags: 0.30,
            industries: 0.25,
            experience: 0.20,
            skills: 0.15,
            location: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_round_trip() {
        for s in ["pending", "accepted", "rejected"] {
            let status: MatchStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("cancelled".parse::<MatchStatus>().is_err());
    }

    #[test]
    fn test_pair_equality_is_order_insensitive() {
        let record = Match {
            id: "m1".to_string(),
            user_id_1: "alice".to_string(),
            user_id_2: "bob".to_string(),
            score: 0.8,
            common_tags: vec![],
            common_skills: vec![],
            status: MatchStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(record.is_pair("alice", "bob"));
        assert!(record.is_pair("bob", "alice"));
        assert!(!record.is_pair("alice", "carol"));
        assert!(record.involves("bob"));
        assert!(!record.involves("carol"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MatchStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
    }
}
