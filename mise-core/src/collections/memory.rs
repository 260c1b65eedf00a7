//! In-memory collection store for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use super::{CollectionError, CollectionItem, Stored, UserCollection};

/// Collection held in a concurrent map. Contents are lost on drop.
pub struct InMemoryCollection<T> {
    /// id -> (insertion sequence, item)
    items: DashMap<Uuid, (u64, Stored<T>)>,
    next_seq: AtomicU64,
}

impl<T> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self {
            items: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl<T> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of items across all users.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn require_user(user_id: &str) -> Result<(), CollectionError> {
    if user_id.trim().is_empty() {
        return Err(CollectionError::MissingUser);
    }
    Ok(())
}

#[async_trait]
impl<T: CollectionItem> UserCollection<T> for InMemoryCollection<T> {
    async fn create(&self, user_id: &str, payload: T) -> Result<Stored<T>, CollectionError> {
        require_user(user_id)?;
        let payload = payload.prepare()?;

        let stored = Stored {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            payload,
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.items.insert(stored.id, (seq, stored.clone()));

        tracing::debug!(collection = T::COLLECTION, id = %stored.id, "Created item");
        Ok(stored)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Stored<T>>, CollectionError> {
        require_user(user_id)?;

        let mut rows: Vec<(u64, Stored<T>)> = self
            .items
            .iter()
            .filter(|entry| entry.value().1.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);

        Ok(rows.into_iter().map(|(_, stored)| stored).collect())
    }

    async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        patch: T::Patch,
    ) -> Result<Stored<T>, CollectionError> {
        require_user(user_id)?;

        let mut entry = self
            .items
            .get_mut(&id)
            .filter(|entry| entry.value().1.user_id == user_id)
            .ok_or(CollectionError::NotFound(id))?;

        // Apply to a copy so a rejected patch leaves the stored item untouched
        let mut payload = entry.value().1.payload.clone();
        payload.apply(patch)?;
        entry.value_mut().1.payload = payload;

        Ok(entry.value().1.clone())
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), CollectionError> {
        require_user(user_id)?;

        self.items
            .remove_if(&id, |_, (_, stored)| stored.user_id == user_id)
            .map(|_| {
                tracing::debug!(collection = T::COLLECTION, id = %id, "Deleted item");
            })
            .ok_or(CollectionError::NotFound(id))
    }
}
