// End-to-end tests of the event-driven recomputation pipeline

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use connect_match::core::Matcher;
use connect_match::services::{
    ChannelEventLog, MatchEngine, MatchStore, MemoryStore, Pipeline, ProfileStore,
};
use connect_match::{ProfileUpdatedEvent, UserProfile};

fn create_engine(dedup_pairs: bool) -> Arc<MatchEngine> {
    Arc::new(MatchEngine::new(
        ProfileStore::new(Arc::new(MemoryStore::new(10_000, Duration::from_secs(300)))),
        MatchStore::new(Arc::new(MemoryStore::new(10_000, Duration::from_secs(300)))),
        Matcher::with_defaults(),
        dedup_pairs,
    ))
}

fn update_event(id: &str, tags: &[&str]) -> ProfileUpdatedEvent {
    let now = Utc::now();
    ProfileUpdatedEvent {
        user_id: id.to_string(),
        profile: UserProfile {
            user_id: id.to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            industries: vec!["tech".to_string()],
            interests: vec![],
            skills: vec!["go".to_string()],
            experience: 5,
            location: "SF".to_string(),
            bio: String::new(),
            created_at: now,
            updated_at: now,
        },
        timestamp: now,
    }
}

#[tokio::test]
async fn test_pipeline_regenerates_matches_on_profile_update() {
    let engine = create_engine(true);
    let (log, update_tx, mut match_rx) = ChannelEventLog::new(32);
    let pipeline = Pipeline::new(engine.clone(), Arc::new(log));

    let consumer = tokio::spawn(async move { pipeline.run().await });

    update_tx.send(update_event("alice", &["go"])).await.unwrap();
    update_tx.send(update_event("bob", &["go"])).await.unwrap();
    update_tx.send(update_event("carol", &["go"])).await.unwrap();
    drop(update_tx);
    consumer.await.unwrap();

    // bob pairs with alice; carol pairs with both
    let mut published = Vec::new();
    while let Some(record) = match_rx.recv().await {
        published.push(record);
    }
    assert_eq!(published.len(), 3);

    assert_eq!(engine.list_matches("alice").await.unwrap().len(), 2);
    assert_eq!(engine.list_matches("carol").await.unwrap().len(), 2);
    assert!(engine.get_profile("carol").await.is_ok());
}

#[tokio::test]
async fn test_pipeline_publishes_one_event_per_match() {
    let engine = create_engine(true);
    let (log, update_tx, mut match_rx) = ChannelEventLog::new(32);
    let pipeline = Pipeline::new(engine, Arc::new(log));

    let consumer = tokio::spawn(async move { pipeline.run().await });

    update_tx.send(update_event("alice", &["go"])).await.unwrap();
    update_tx.send(update_event("bob", &["go"])).await.unwrap();
    drop(update_tx);
    consumer.await.unwrap();

    let record = match_rx.recv().await.unwrap();
    assert!(record.is_pair("alice", "bob"));
    // Exactly one event: alice's update produced no pairs yet
    assert!(match_rx.recv().await.is_none());
}

#[tokio::test]
async fn test_at_least_once_delivery_with_dedup_is_stable() {
    let engine = create_engine(true);
    let (log, update_tx, mut match_rx) = ChannelEventLog::new(32);
    let pipeline = Pipeline::new(engine.clone(), Arc::new(log));

    let consumer = tokio::spawn(async move { pipeline.run().await });

    let event = update_event("bob", &["go"]);
    update_tx.send(update_event("alice", &["go"])).await.unwrap();
    update_tx.send(event.clone()).await.unwrap();
    // Duplicate delivery of the same event
    update_tx.send(event).await.unwrap();
    drop(update_tx);
    consumer.await.unwrap();

    // Two published events (one per generation run), but a single record
    let first = match_rx.recv().await.unwrap();
    let second = match_rx.recv().await.unwrap();
    assert_eq!(first.id, second.id);
    assert!(match_rx.recv().await.is_none());

    assert_eq!(engine.list_matches("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_append_mode_duplicates_on_redelivery() {
    let engine = create_engine(false);
    let (log, update_tx, _match_rx) = ChannelEventLog::new(32);
    let pipeline = Pipeline::new(engine.clone(), Arc::new(log));

    let consumer = tokio::spawn(async move { pipeline.run().await });

    update_tx.send(update_event("alice", &["go"])).await.unwrap();
    update_tx.send(update_event("bob", &["go"])).await.unwrap();
    update_tx.send(update_event("bob", &["go"])).await.unwrap();
    drop(update_tx);
    consumer.await.unwrap();

    // The original append-as-new behavior: one record per run
    assert_eq!(engine.list_matches("alice").await.unwrap().len(), 2);
}
