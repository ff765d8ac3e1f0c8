// Integration tests for connect-match

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use connect_match::core::Matcher;
use connect_match::services::{MatchEngine, MatchStore, MemoryStore, ProfileStore};
use connect_match::{MatchStatus, MatchmakingCriteria, ScoringWeights, UserProfile};

fn create_engine() -> Arc<MatchEngine> {
    Arc::new(MatchEngine::new(
        ProfileStore::new(Arc::new(MemoryStore::new(10_000, Duration::from_secs(300)))),
        MatchStore::new(Arc::new(MemoryStore::new(10_000, Duration::from_secs(300)))),
        Matcher::with_defaults(),
        true,
    ))
}

fn create_profile(
    id: &str,
    tags: &[&str],
    industries: &[&str],
    experience: u32,
    skills: &[&str],
    location: &str,
) -> UserProfile {
    let now = Utc::now();
    UserProfile {
        user_id: id.to_string(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        industries: industries.iter().map(|s| s.to_string()).collect(),
        interests: vec![],
        skills: skills.iter().map(|s| s.to_string()).collect(),
        experience,
        location: location.to_string(),
        bio: String::new(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_identical_profiles_produce_perfect_match() {
    let engine = create_engine();

    engine
        .upsert_profile(create_profile(
            "a",
            &["go", "backend"],
            &["tech"],
            5,
            &["go", "pg"],
            "SF",
        ))
        .await
        .unwrap();
    engine
        .upsert_profile(create_profile(
            "b",
            &["go", "backend"],
            &["tech"],
            5,
            &["go", "pg"],
            "SF",
        ))
        .await
        .unwrap();

    let matches = engine.generate_for("a").await.unwrap();
    assert_eq!(matches.len(), 1);

    let record = &matches[0];
    assert!((record.score - 1.0).abs() < 1e-9);
    assert_eq!(record.common_tags, vec!["go", "backend"]);
    assert_eq!(record.common_skills, vec!["go", "pg"]);
    assert_eq!(record.status, MatchStatus::Pending);
}

#[tokio::test]
async fn test_generation_respects_cap_and_threshold() {
    let engine = create_engine();

    engine
        .upsert_profile(create_profile(
            "subject",
            &["go"],
            &["tech"],
            5,
            &["go"],
            "SF",
        ))
        .await
        .unwrap();

    // 20 strong candidates plus a handful of weak ones
    for i in 0..20 {
        engine
            .upsert_profile(create_profile(
                &format!("strong{}", i),
                &["go"],
                &["tech"],
                5,
                &["go"],
                "SF",
            ))
            .await
            .unwrap();
    }
    for i in 0..5 {
        engine
            .upsert_profile(create_profile(
                &format!("weak{}", i),
                &["knitting"],
                &["crafts"],
                30,
                &["crochet"],
                "Reykjavik",
            ))
            .await
            .unwrap();
    }

    let matches = engine.generate_for("subject").await.unwrap();

    assert_eq!(matches.len(), 10);
    for record in &matches {
        assert!(record.score > 0.3);
        assert_ne!(record.user_id_1, record.user_id_2);
        assert!(record.involves("subject"));
        assert!(!record.user_id_2.starts_with("weak"));
    }
}

#[tokio::test]
async fn test_status_update_preserves_other_fields() {
    let engine = create_engine();

    engine
        .upsert_profile(create_profile("a", &["go"], &["tech"], 5, &["go"], "SF"))
        .await
        .unwrap();
    engine
        .upsert_profile(create_profile("b", &["go"], &["tech"], 5, &["go"], "SF"))
        .await
        .unwrap();

    let created = engine.generate_for("a").await.unwrap();
    let original = created[0].clone();

    let updated = engine
        .update_status(&original.id, MatchStatus::Accepted)
        .await
        .unwrap();
    let fetched = engine.get_match(&original.id).await.unwrap();

    assert_eq!(fetched.status, MatchStatus::Accepted);
    assert!(fetched.updated_at >= original.updated_at);
    assert_eq!(fetched.id, original.id);
    assert_eq!(fetched.user_id_1, original.user_id_1);
    assert_eq!(fetched.user_id_2, original.user_id_2);
    assert_eq!(fetched.score, original.score);
    assert_eq!(fetched.common_tags, original.common_tags);
    assert_eq!(fetched.created_at, original.created_at);
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_profile_round_trip_preserves_attributes() {
    let engine = create_engine();
    let original = create_profile(
        "alice",
        &["Go", "Backend"],
        &["FinTech"],
        7,
        &["Rust", "Postgres"],
        "New York, NY",
    );

    let stored = engine.upsert_profile(original.clone()).await.unwrap();
    let loaded = engine.get_profile("alice").await.unwrap();

    // Attribute values survive byte-for-byte; timestamps are re-stamped
    assert_eq!(loaded.tags, original.tags);
    assert_eq!(loaded.industries, original.industries);
    assert_eq!(loaded.skills, original.skills);
    assert_eq!(loaded.experience, original.experience);
    assert_eq!(loaded.location, original.location);
    assert_eq!(loaded.bio, original.bio);
    assert_eq!(loaded, stored);
}

#[tokio::test]
async fn test_search_filters_before_scoring() {
    let engine = create_engine();

    engine
        .upsert_profile(create_profile(
            "subject",
            &["go"],
            &["tech"],
            5,
            &["go"],
            "SF",
        ))
        .await
        .unwrap();
    engine
        .upsert_profile(create_profile(
            "match",
            &["go"],
            &["tech"],
            6,
            &["go"],
            "SF",
        ))
        .await
        .unwrap();
    engine
        .upsert_profile(create_profile(
            "wrong_industry",
            &["go"],
            &["healthcare"],
            6,
            &["go"],
            "SF",
        ))
        .await
        .unwrap();

    let criteria = MatchmakingCriteria {
        user_id: "subject".to_string(),
        industries: vec!["tech".to_string()],
        ..Default::default()
    };

    let results = engine.search(&criteria).await.unwrap();
    assert_eq!(results.total, 1);
    assert_eq!(results.hits[0].user_id, "match");
    assert!(results.hits[0].score > 0.3);
    assert!(results.hits[0].reason.contains("Common interests: go"));
    assert!(results.hits[0].reason.contains("Same location"));
}

#[tokio::test]
async fn test_search_is_independent_of_match_store() {
    let engine = create_engine();

    engine
        .upsert_profile(create_profile("a", &["go"], &["tech"], 5, &["go"], "SF"))
        .await
        .unwrap();
    engine
        .upsert_profile(create_profile("b", &["go"], &["tech"], 5, &["go"], "SF"))
        .await
        .unwrap();

    // No generation has run; search still finds the candidate
    let criteria = MatchmakingCriteria {
        user_id: "a".to_string(),
        ..Default::default()
    };
    let results = engine.search(&criteria).await.unwrap();
    assert_eq!(results.total, 1);

    // And no Match records were persisted by the search
    assert!(engine.list_matches("a").await.unwrap().is_empty());
}

#[test]
fn test_default_weights_sum_to_one() {
    let w = ScoringWeights::default();
    assert!((w.tags + w.industries + w.experience + w.skills + w.location - 1.0).abs() < 1e-9);
}
