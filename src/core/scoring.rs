use std::collections::HashSet;

use crate::models::{ScoringWeights, UserProfile};

/// Calculate a compatibility score (0-1) between two profiles
///
/// Scoring formula:
/// score = (
///     tag_similarity * 0.30 +          # Jaccard over tags
///     industry_similarity * 0.25 +     # Jaccard over industries
///     experience_compat * 0.20 +       # step function of |exp diff|
///     skill_similarity * 0.15 +        # Jaccard over skills
///     location_compat * 0.10           # exact / segment / mismatch
/// ) / sum(weights)
///
/// Deterministic, commutative, and side-effect free.
pub fn calculate_match_score(a: &UserProfile, b: &UserProfile, weights: &ScoringWeights) -> f64 {
    let tag_score = jaccard_similarity(&a.tags, &b.tags);
    let industry_score = jaccard_similarity(&a.industries, &b.industries);
    let experience_score = experience_compatibility(a.experience, b.experience);
    let skill_score = jaccard_similarity(&a.skills, &b.skills);
    let location_score = location_compatibility(&a.location, &b.location);

    let total_weight =
        weights.tags + weights.industries + weights.experience + weights.skills + weights.location;
    if total_weight <= 0.0 {
        return 0.0;
    }

    (tag_score * weights.tags
        + industry_score * weights.industries
        + experience_score * weights.experience
        + skill_score * weights.skills
        + location_score * weights.location)
        / total_weight
}

/// Jaccard similarity over two case-insensitive string sets
///
/// Both sets empty counts as a perfect 1.0; exactly one empty is 0.0.
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<String> = a.iter().map(|item| item.to_lowercase()).collect();
    let set_b: HashSet<String> = b.iter().map(|item| item.to_lowercase()).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Experience compatibility (0-1), a step function of the year gap
///
/// Boundaries at exactly 2, 5 and 10 take the higher bucket.
#[inline]
pub fn experience_compatibility(a: u32, b: u32) -> f64 {
    match a.abs_diff(b) {
        0..=2 => 1.0,
        3..=5 => 0.7,
        6..=10 => 0.4,
        _ => 0.1,
    }
}

/// Location compatibility (0-1)
///
/// A missing location on either side is neutral (0.5), not a mismatch.
/// Full case/whitespace-insensitive equality scores 1.0; a shared
/// comma-delimited segment (city or state) scores 0.8; anything else 0.2.
pub fn location_compatibility(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.5;
    }

    let a_norm = a.trim().to_lowercase();
    let b_norm = b.trim().to_lowercase();

    if a_norm == b_norm {
        return 1.0;
    }

    for segment_a in a_norm.split(',') {
        for segment_b in b_norm.split(',') {
            if segment_a.trim() == segment_b.trim() {
                return 0.8;
            }
        }
    }

    0.2
}

/// Case-insensitive intersection of two attribute lists
///
/// Elements are returned in the casing of the second argument: the
/// candidate's original spelling wins over the querying user's.
pub fn common_attributes(a: &[String], b: &[String]) -> Vec<String> {
    let set_a: HashSet<String> = a.iter().map(|item| item.to_lowercase()).collect();

    b.iter()
        .filter(|item| set_a.contains(&item.to_lowercase()))
        .cloned()
        .collect()
}

/// Tags shared by both profiles, in the candidate's casing
pub fn common_tags(a: &UserProfile, b: &UserProfile) -> Vec<String> {
    common_attributes(&a.tags, &b.tags)
}

/// Skills shared by both profiles, in the candidate's casing
pub fn common_skills(a: &UserProfile, b: &UserProfile) -> Vec<String> {
    common_attributes(&a.skills, &b.skills)
}
