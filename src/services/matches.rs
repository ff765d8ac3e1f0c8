use std::sync::Arc;

use crate::models::Match;
use crate::services::store::{KeyValueStore, StoreError, StoreKey};

/// Typed match store over the key-value backend
///
/// Sole writer of `Match` entities. The backend carries the 7-day
/// retention window, independent of status.
pub struct MatchStore {
    store: Arc<dyn KeyValueStore>,
}

impl MatchStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Upsert keyed by match id
    pub async fn put(&self, record: &Match) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        self.store.put(&StoreKey::match_record(&record.id), json).await
    }

    /// Fetch a match, failing with `NotFound` if absent or expired
    pub async fn get(&self, match_id: &str) -> Result<Match, StoreError> {
        match self.store.get(&StoreKey::match_record(match_id)).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StoreError::NotFound(format!("match {}", match_id))),
        }
    }

    /// All live matches involving the user, sorted descending by score
    ///
    /// Scans every match key; O(all matches), fine at target scale.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Match>, StoreError> {
        let values = self.store.enumerate(StoreKey::MATCH_PREFIX).await?;

        let mut matches: Vec<Match> = values
            .iter()
            .filter_map(|json| serde_json::from_str::<Match>(json).ok())
            .filter(|record| record.involves(user_id))
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(matches)
    }

    /// Find the live match for an unordered user pair, if any
    pub async fn find_by_pair(&self, a: &str, b: &str) -> Result<Option<Match>, StoreError> {
        let values = self.store.enumerate(StoreKey::MATCH_PREFIX).await?;

        Ok(values
            .iter()
            .filter_map(|json| serde_json::from_str::<Match>(json).ok())
            .find(|record| record.is_pair(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;
    use crate::services::store::MemoryStore;
    use chrono::Utc;
    use std::time::Duration;

    fn record(id: &str, a: &str, b: &str, score: f64) -> Match {
        Match {
            id: id.to_string(),
            user_id_1: a.to_string(),
            user_id_2: b.to_string(),
            score,
            common_tags: vec![],
            common_skills: vec![],
            status: MatchStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn store() -> MatchStore {
        MatchStore::new(Arc::new(MemoryStore::new(100, Duration::from_secs(60))))
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let matches = store();
        let m = record("m1", "alice", "bob", 0.8);

        matches.put(&m).await.unwrap();
        assert_eq!(matches.get("m1").await.unwrap(), m);
    }

    #[tokio::test]
    async fn test_get_absent_is_not_found() {
        let matches = store();
        assert!(matches!(
            matches.get("nope").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_for_user_filters_and_sorts() {
        let matches = store();
        matches.put(&record("m1", "alice", "bob", 0.5)).await.unwrap();
        matches.put(&record("m2", "carol", "alice", 0.9)).await.unwrap();
        matches.put(&record("m3", "bob", "carol", 0.7)).await.unwrap();

        let for_alice = matches.list_for_user("alice").await.unwrap();
        assert_eq!(for_alice.len(), 2);
        assert_eq!(for_alice[0].id, "m2");
        assert_eq!(for_alice[1].id, "m1");

        assert!(matches.list_for_user("dave").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_pair_ignores_order() {
        let matches = store();
        matches.put(&record("m1", "alice", "bob", 0.5)).await.unwrap();

        assert!(matches.find_by_pair("bob", "alice").await.unwrap().is_some());
        assert!(matches.find_by_pair("alice", "carol").await.unwrap().is_none());
    }
}
