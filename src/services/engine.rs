use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{match_reason, matches_criteria, Matcher};
use crate::models::{Match, MatchStatus, MatchmakingCriteria, ScoredCandidate, UserProfile};
use crate::services::matches::MatchStore;
use crate::services::profiles::ProfileStore;
use crate::services::store::StoreError;

/// Errors surfaced by the match engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => EngineError::NotFound(what),
            other => EngineError::Store(other),
        }
    }
}

/// Search results before the response layer shapes them
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub hits: Vec<ScoredCandidate>,
    /// Count of all hits above the threshold, before pagination
    pub total: usize,
}

/// Orchestrates profile writes, match generation, lifecycle and search
///
/// The only producer of `Match` records. Owns both stores and the pure
/// ranking stage; HTTP handlers and the event pipeline both drive it.
pub struct MatchEngine {
    profiles: ProfileStore,
    matches: MatchStore,
    matcher: Matcher,
    dedup_pairs: bool,
}

impl MatchEngine {
    pub fn new(
        profiles: ProfileStore,
        matches: MatchStore,
        matcher: Matcher,
        dedup_pairs: bool,
    ) -> Self {
        Self {
            profiles,
            matches,
            matcher,
            dedup_pairs,
        }
    }

    /// Create or refresh a profile
    ///
    /// The attribute set fully replaces any prior profile; `created_at` is
    /// carried forward from a live prior profile, `updated_at` always
    /// advances. Returns the profile as stored.
    pub async fn upsert_profile(
        &self,
        mut profile: UserProfile,
    ) -> Result<UserProfile, EngineError> {
        let now = Utc::now();
        profile.created_at = match self.profiles.find(&profile.user_id).await? {
            Some(existing) => existing.created_at,
            None => now,
        };
        profile.updated_at = now;

        self.profiles.put(&profile).await?;
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, EngineError> {
        Ok(self.profiles.get(user_id).await?)
    }

    /// Generate and persist matches for a user
    ///
    /// Loads the subject (NotFound if absent), ranks every other live
    /// profile, and persists each retained pair as a pending match. An
    /// individual failed persist is logged and skipped without aborting
    /// the batch; callers see only what was actually stored.
    pub async fn generate_for(&self, user_id: &str) -> Result<Vec<Match>, EngineError> {
        let subject = self.profiles.get(user_id).await?;
        let candidates = self.profiles.list_all().await?;

        let ranked = self.matcher.rank(&subject, candidates);
        tracing::debug!(
            "ranked {} candidates above threshold for user {}",
            ranked.len(),
            user_id
        );

        let now = Utc::now();
        let mut persisted = Vec::with_capacity(ranked.len());

        for candidate in ranked {
            let existing = if self.dedup_pairs {
                match self
                    .matches
                    .find_by_pair(user_id, &candidate.profile.user_id)
                    .await
                {
                    Ok(found) => found,
                    Err(err) => {
                        tracing::warn!("pair lookup failed, creating fresh match: {}", err);
                        None
                    }
                }
            } else {
                None
            };

            let record = match existing {
                // Refresh the live match for this pair: the score and the
                // common-attribute snapshots move, identity and status don't.
                Some(current) => Match {
                    score: candidate.score,
                    common_tags: candidate.common_tags,
                    common_skills: candidate.common_skills,
                    updated_at: now,
                    ..current
                },
                None => Match {
                    id: Uuid::new_v4().to_string(),
                    user_id_1: subject.user_id.clone(),
                    user_id_2: candidate.profile.user_id.clone(),
                    score: candidate.score,
                    common_tags: candidate.common_tags,
                    common_skills: candidate.common_skills,
                    status: MatchStatus::Pending,
                    created_at: now,
                    updated_at: now,
                },
            };

            if let Err(err) = self.matches.put(&record).await {
                tracing::warn!("failed to store match {}: {}", record.id, err);
                continue;
            }
            persisted.push(record);
        }

        tracing::info!("persisted {} matches for user {}", persisted.len(), user_id);
        Ok(persisted)
    }

    /// All matches involving the user, best score first
    pub async fn list_matches(&self, user_id: &str) -> Result<Vec<Match>, EngineError> {
        Ok(self.matches.list_for_user(user_id).await?)
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Match, EngineError> {
        Ok(self.matches.get(match_id).await?)
    }

    /// Update a match's lifecycle status; all other fields are untouched
    pub async fn update_status(
        &self,
        match_id: &str,
        status: MatchStatus,
    ) -> Result<Match, EngineError> {
        let mut record = self.matches.get(match_id).await?;
        record.status = status;
        record.updated_at = Utc::now();

        self.matches.put(&record).await?;
        Ok(record)
    }

    /// Ad hoc search: hard filters first, then score the survivors
    ///
    /// Independent of the persisted match set. The same score threshold
    /// applies; results are ranked descending and paginated, with `total`
    /// counting the pre-pagination set. An offset past the end yields an
    /// empty page.
    pub async fn search(
        &self,
        criteria: &MatchmakingCriteria,
    ) -> Result<SearchResults, EngineError> {
        let subject = self.profiles.get(&criteria.user_id).await?;
        let profiles = self.profiles.list_all().await?;

        let mut hits: Vec<ScoredCandidate> = profiles
            .iter()
            .filter(|profile| profile.user_id != criteria.user_id)
            .filter(|profile| matches_criteria(profile, criteria))
            .filter_map(|profile| {
                let score = self.matcher.score(&subject, profile);
                if score > self.matcher.min_score() {
                    Some(ScoredCandidate {
                        user_id: profile.user_id.clone(),
                        score,
                        reason: match_reason(&subject, profile),
                    })
                } else {
                    None
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total = hits.len();
        let hits = paginate(hits, criteria.limit, criteria.offset);

        Ok(SearchResults { hits, total })
    }
}

/// Apply limit/offset pagination; limit 0 means no limit
pub fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    let limit = if limit == 0 { usize::MAX } else { limit };
    items.into_iter().skip(offset).take(limit).collect()
}
