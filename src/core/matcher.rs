use crate::core::scoring::{calculate_match_score, common_skills, common_tags};
use crate::models::{ScoringWeights, UserProfile};

/// A candidate that survived scoring, with its creation-time snapshots
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub profile: UserProfile,
    pub score: f64,
    pub common_tags: Vec<String>,
    pub common_skills: Vec<String>,
}

/// Pure ranking stage of match generation
///
/// Scores every candidate against the subject, drops the subject itself and
/// anything at or below the minimum score, sorts descending and truncates
/// to the configured cap. Persistence is the engine's job.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    min_score: f64,
    max_matches: usize,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, min_score: f64, max_matches: usize) -> Self {
        Self {
            weights,
            min_score,
            max_matches,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default(), 0.3, 10)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Score a single pair with the configured weights
    pub fn score(&self, a: &UserProfile, b: &UserProfile) -> f64 {
        calculate_match_score(a, b, &self.weights)
    }

    /// Rank candidates for a subject profile
    ///
    /// The sort is stable, so equal scores keep their enumeration order.
    pub fn rank(&self, subject: &UserProfile, candidates: Vec<UserProfile>) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.user_id != subject.user_id)
            .filter_map(|candidate| {
                let score = calculate_match_score(subject, &candidate, &self.weights);
                if score > self.min_score {
                    Some(RankedCandidate {
                        score,
                        common_tags: common_tags(subject, &candidate),
                        common_skills: common_skills(subject, &candidate),
                        profile: candidate,
                    })
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked.truncate(self.max_matches);

        ranked
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
