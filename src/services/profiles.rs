use std::sync::Arc;

use crate::models::UserProfile;
use crate::services::store::{KeyValueStore, StoreError, StoreKey};

/// Typed profile store over the key-value backend
///
/// Sole writer of `UserProfile` entities. The backend carries the 24h
/// retention window; every put refreshes it.
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Idempotent upsert keyed by `user_id`; fully replaces any prior profile
    pub async fn put(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        self.store.put(&StoreKey::profile(&profile.user_id), json).await
    }

    /// Fetch a profile if it is live, without treating absence as an error
    pub async fn find(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        match self.store.get(&StoreKey::profile(user_id)).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Fetch a profile, failing with `NotFound` if absent or expired
    pub async fn get(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        self.find(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("profile for user {}", user_id)))
    }

    /// Enumerate every live profile
    ///
    /// Best-effort snapshot: not consistent with concurrent writes, and
    /// entries that fail to decode are skipped rather than failing the scan.
    pub async fn list_all(&self) -> Result<Vec<UserProfile>, StoreError> {
        let values = self.store.enumerate(StoreKey::PROFILE_PREFIX).await?;

        Ok(values
            .iter()
            .filter_map(|json| serde_json::from_str(json).ok())
            .collect())
    }
}
