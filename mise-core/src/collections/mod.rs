//! Per-user collections: bookmarks, goals and shopping-list items.
//!
//! The recipe pipeline never touches these. They are the narrow interface a
//! UI layer uses to keep user data, always scoped to one authenticated user id.

mod items;
mod memory;

pub use items::{Bookmark, BookmarkPatch, Goal, GoalPatch, ShoppingItem, ShoppingItemPatch};
pub use memory::InMemoryCollection;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid item: {0}")]
    Invalid(String),

    #[error("Missing user id")]
    MissingUser,
}

/// A payload type that can live in a user collection.
pub trait CollectionItem: Clone + Send + Sync + 'static {
    /// Partial update accepted by `update`.
    type Patch: Send + 'static;

    /// Collection name (e.g. "bookmarks").
    const COLLECTION: &'static str;

    /// Normalize a new payload before it is stored.
    fn prepare(self) -> Result<Self, CollectionError>;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), CollectionError>;
}

/// A stored item together with its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<T> {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: T,
}

/// CRUD access to one collection, scoped by user id.
///
/// Items owned by another user are indistinguishable from missing items.
#[async_trait]
pub trait UserCollection<T: CollectionItem>: Send + Sync {
    async fn create(&self, user_id: &str, payload: T) -> Result<Stored<T>, CollectionError>;

    /// All of the user's items, oldest first.
    async fn list(&self, user_id: &str) -> Result<Vec<Stored<T>>, CollectionError>;

    async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        patch: T::Patch,
    ) -> Result<Stored<T>, CollectionError>;

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), CollectionError>;
}
