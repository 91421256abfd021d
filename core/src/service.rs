//! The item service façade.
//!
//! # Design
//! `ItemService` runs validation, id generation and the store call for each
//! operation and returns plain domain values. It does no transport work and
//! keeps no per-request state: clones share the store and the id generator,
//! so one instance serves any number of concurrent callers.
//!
//! Every store call is bounded by the operation timeout. Running past it
//! yields `ServiceError::Cancelled`, which is distinct from `Internal`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ServiceError, StoreError};
use crate::id::{IdGenerator, ItemId};
use crate::store::TodoStore;
use crate::types::TodoItem;
use crate::validate::validate_title;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(2500);

#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn TodoStore>,
    ids: Arc<IdGenerator>,
    operation_timeout: Duration,
}

impl ItemService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub async fn list(&self) -> Result<Vec<TodoItem>, ServiceError> {
        self.bounded("list", self.store.list_items()).await
    }

    /// Validate `title`, store a new item and return its id.
    ///
    /// An invalid title is rejected before the store is touched.
    pub async fn create(&self, title: &str) -> Result<ItemId, ServiceError> {
        validate_title(title)?;
        let id = self.ids.next_id();
        self.bounded("create", self.store.insert_item(id, title)).await?;
        tracing::debug!(%id, "todo item created");
        Ok(id)
    }

    pub async fn get(&self, token: &str) -> Result<TodoItem, ServiceError> {
        let id = ItemId::parse(token)?;
        self.bounded("get", self.store.find_item(id)).await
    }

    /// Mark the item done. Marking a done item again succeeds.
    pub async fn mark_done(&self, token: &str) -> Result<(), ServiceError> {
        let id = ItemId::parse(token)?;
        self.bounded("mark_done", self.store.set_done(id)).await?;
        tracing::debug!(%id, "todo item marked done");
        Ok(())
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result.map_err(|err| ServiceError::from_store(op, err)),
            Err(_) => Err(ServiceError::Cancelled {
                op,
                timeout: self.operation_timeout,
            }),
        }
    }
}

impl std::fmt::Debug for ItemService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemService")
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}
