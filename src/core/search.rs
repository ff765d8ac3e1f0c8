use crate::core::scoring::{common_skills, common_tags};
use crate::models::{MatchmakingCriteria, UserProfile};

/// Check if a profile passes the hard search filters
///
/// Filters run before scoring: industries and skills require any-overlap,
/// the experience range is inclusive when a bound is set, and location is a
/// case-insensitive substring match. An unset criterion never filters.
#[inline]
pub fn matches_criteria(profile: &UserProfile, criteria: &MatchmakingCriteria) -> bool {
    if !criteria.industries.is_empty() {
        let found = criteria.industries.iter().any(|wanted| {
            profile
                .industries
                .iter()
                .any(|have| have.to_lowercase() == wanted.to_lowercase())
        });
        if !found {
            return false;
        }
    }

    if let Some(min_exp) = criteria.min_exp {
        if profile.experience < min_exp {
            return false;
        }
    }
    if let Some(max_exp) = criteria.max_exp {
        if profile.experience > max_exp {
            return false;
        }
    }

    if !criteria.skills.is_empty() {
        let found = criteria.skills.iter().any(|wanted| {
            profile
                .skills
                .iter()
                .any(|have| have.to_lowercase() == wanted.to_lowercase())
        });
        if !found {
            return false;
        }
    }

    if let Some(location) = &criteria.location {
        if !location.is_empty()
            && !profile
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
        {
            return false;
        }
    }

    true
}

/// Build the human-readable reason string for a search hit
///
/// Concatenates whichever factors matched; independent of the score's
/// weighting, so it can disagree with the number next to it (location, for
/// example, only appears here on exact equality).
pub fn match_reason(subject: &UserProfile, candidate: &UserProfile) -> String {
    let mut reasons: Vec<String> = Vec::new();

    let tags = common_tags(subject, candidate);
    if !tags.is_empty() {
        reasons.push(format!("Common interests: {}", tags.join(", ")));
    }

    let skills = common_skills(subject, candidate);
    if !skills.is_empty() {
        reasons.push(format!("Common skills: {}", skills.join(", ")));
    }

    if subject.experience.abs_diff(candidate.experience) <= 2 {
        reasons.push("Similar experience level".to_string());
    }

    if !subject.location.is_empty()
        && !candidate.location.is_empty()
        && subject.location.to_lowercase() == candidate.location.to_lowercase()
    {
        reasons.push("Same location".to_string());
    }

    if reasons.is_empty() {
        return "Good overall compatibility".to_string();
    }

    reasons.join("; ")
}
