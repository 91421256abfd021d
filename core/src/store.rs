//! Persistence gateway.
//!
//! # Design
//! `TodoStore` exposes exactly the four operations the service needs. Each
//! call is one atomic unit against the backend and is never retried here.
//! Implementations report a missing item as `StoreError::NotFound` so the
//! façade can tell it apart from a backend failure. Business rules (title
//! bounds) are checked before a store is called and are not re-checked.
//!
//! Cancellation is by drop: when the caller stops polling, the in-flight
//! operation is abandoned.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::id::ItemId;
use crate::types::TodoItem;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All items in ascending id order. An empty store yields an empty vec.
    async fn list_items(&self) -> Result<Vec<TodoItem>, StoreError>;

    async fn find_item(&self, id: ItemId) -> Result<TodoItem, StoreError>;

    /// Store a new item with `done = false`.
    async fn insert_item(&self, id: ItemId, title: &str) -> Result<(), StoreError>;

    /// Mark an item done. Already-done items stay done and succeed.
    async fn set_done(&self, id: ItemId) -> Result<(), StoreError>;
}

/// In-process store keyed by id.
///
/// Ordered map, so listing is already in creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<ItemId, TodoItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_items(&self) -> Result<Vec<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn find_item(&self, id: ItemId) -> Result<TodoItem, StoreError> {
        let items = self.items.read().await;
        items.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn insert_item(&self, id: ItemId, title: &str) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        items.insert(id, TodoItem::new(id, title));
        Ok(())
    }

    async fn set_done(&self, id: ItemId) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.done = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdGenerator;

    #[tokio::test]
    async fn list_empty_store() {
        let store = MemoryStore::new();
        assert!(store.list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_in_insertion_order() {
        let store = MemoryStore::new();
        let ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        // Insert out of order; listing still follows id order.
        store.insert_item(b, "Second item").await.unwrap();
        store.insert_item(a, "First item").await.unwrap();

        let items = store.list_items().await.unwrap();
        let listed: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(listed, vec![a, b]);
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = MemoryStore::new();
        let id = IdGenerator::new().next_id();
        store.insert_item(id, "Buy milk").await.unwrap();

        let item = store.find_item(id).await.unwrap();
        assert_eq!(item, TodoItem::new(id, "Buy milk"));
        assert!(!item.done);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let id = IdGenerator::new().next_id();
        store.insert_item(id, "Buy milk").await.unwrap();

        let err = store.insert_item(id, "Buy bread").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(d) if d == id));
        assert_eq!(store.find_item(id).await.unwrap().title, "Buy milk");
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let store = MemoryStore::new();
        let id = IdGenerator::new().next_id();
        assert!(matches!(store.find_item(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.set_done(id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn set_done_is_idempotent() {
        let store = MemoryStore::new();
        let id = IdGenerator::new().next_id();
        store.insert_item(id, "Walk dog").await.unwrap();

        store.set_done(id).await.unwrap();
        store.set_done(id).await.unwrap();
        assert!(store.find_item(id).await.unwrap().done);
    }
}
