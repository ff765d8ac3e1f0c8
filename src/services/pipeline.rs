use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::{Match, ProfileUpdatedEvent};
use crate::services::engine::{EngineError, MatchEngine};

/// Errors that can occur on the event log
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("event stream closed")]
    Closed,

    #[error("publish failed: {0}")]
    Publish(String),
}

/// Capability over the durable event log
///
/// One inbound stream of profile-update events and one outbound topic for
/// match-created events. Delivery on the inbound side is at-least-once
/// with no idempotency key; consumers must tolerate duplicates.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Await the next profile-update event
    async fn next_profile_update(&self) -> Result<ProfileUpdatedEvent, PipelineError>;

    /// Publish one match-created event downstream
    async fn publish_match_created(&self, record: &Match) -> Result<(), PipelineError>;
}

/// In-process event log over bounded tokio channels
///
/// Stands in for an external broker: the profile-API collaborator holds
/// the update sender, a downstream consumer holds the match receiver.
pub struct ChannelEventLog {
    // Receiver needs &mut; a Mutex keeps the trait object shareable
    updates: tokio::sync::Mutex<mpsc::Receiver<ProfileUpdatedEvent>>,
    matches_out: mpsc::Sender<Match>,
}

impl ChannelEventLog {
    /// Build the log plus its two external endpoints
    pub fn new(
        capacity: usize,
    ) -> (
        Self,
        mpsc::Sender<ProfileUpdatedEvent>,
        mpsc::Receiver<Match>,
    ) {
        let (update_tx, update_rx) = mpsc::channel(capacity);
        let (match_tx, match_rx) = mpsc::channel(capacity);

        let log = Self {
            updates: tokio::sync::Mutex::new(update_rx),
            matches_out: match_tx,
        };

        (log, update_tx, match_rx)
    }
}

#[async_trait]
impl EventLog for ChannelEventLog {
    async fn next_profile_update(&self) -> Result<ProfileUpdatedEvent, PipelineError> {
        self.updates
            .lock()
            .await
            .recv()
            .await
            .ok_or(PipelineError::Closed)
    }

    async fn publish_match_created(&self, record: &Match) -> Result<(), PipelineError> {
        self.matches_out
            .send(record.clone())
            .await
            .map_err(|err| PipelineError::Publish(err.to_string()))
    }
}

/// The event-driven recomputation pipeline
///
/// A single logical consumer: events are processed one at a time, in
/// order, on one dedicated task. No other operation in the engine
/// suspends anywhere but at the `next_profile_update` await point.
pub struct Pipeline {
    engine: Arc<MatchEngine>,
    log: Arc<dyn EventLog>,
}

impl Pipeline {
    pub fn new(engine: Arc<MatchEngine>, log: Arc<dyn EventLog>) -> Self {
        Self { engine, log }
    }

    /// Consume profile updates until the inbound stream closes
    ///
    /// Read and processing failures are logged and the loop continues;
    /// there is no backoff or dead-lettering.
    pub async fn run(&self) {
        tracing::info!("starting profile-update consumer");

        loop {
            let event = match self.log.next_profile_update().await {
                Ok(event) => event,
                Err(PipelineError::Closed) => {
                    tracing::info!("profile-update stream closed, stopping consumer");
                    break;
                }
                Err(err) => {
                    tracing::warn!("error reading profile update: {}", err);
                    continue;
                }
            };

            tracing::info!("processing profile update for user {}", event.user_id);
            if let Err(err) = self.process(event).await {
                tracing::error!("failed to process profile update: {}", err);
            }
        }
    }

    /// Handle one event: store the profile, regenerate, publish
    ///
    /// A failed publish of an individual match-created event is logged and
    /// skipped, best-effort. Returns the number of matches persisted.
    pub async fn process(&self, event: ProfileUpdatedEvent) -> Result<usize, EngineError> {
        self.engine.upsert_profile(event.profile).await?;

        let matches = self.engine.generate_for(&event.user_id).await?;

        for record in &matches {
            if let Err(err) = self.log.publish_match_created(record).await {
                tracing::warn!("failed to publish match-created event {}: {}", record.id, err);
            }
        }

        Ok(matches.len())
    }
}
