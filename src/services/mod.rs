// Service exports
pub mod engine;
pub mod matches;
pub mod pipeline;
pub mod profiles;
pub mod store;

pub use engine::{EngineError, MatchEngine, SearchResults};
pub use matches::MatchStore;
pub use pipeline::{ChannelEventLog, EventLog, Pipeline, PipelineError};
pub use profiles::ProfileStore;
pub use store::{KeyValueStore, MemoryStore, RedisStore, StoreError, StoreKey};
