//! PostgreSQL-backed `TodoStore`.
//!
//! # Design
//! Connections come from a `deadpool-postgres` pool sized from `DbConfig`.
//! Each trait method is one statement on one pooled connection, so the
//! database provides the atomicity. Ids are stored as their 26-character
//! token, which sorts in creation order.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{error::SqlState, NoTls, Row};
use todo_core::{ItemId, StoreError, TodoItem, TodoStore};

use crate::config::{ConfigError, DbConfig};

const MIGRATION: &str = include_str!("../migrations/001_todo_items.sql");

#[derive(Debug, thiserror::Error)]
pub enum PgSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build connection pool")]
    Pool(#[from] deadpool_postgres::BuildError),
}

#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Build the pool. No connection is opened until first use.
    pub fn connect(config: &DbConfig) -> Result<Self, PgSetupError> {
        let pg_config = config.pg_config()?;
        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .build()?;
        Ok(Self { pool })
    }

    /// Create the items table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.client().await?;
        client
            .batch_execute(MIGRATION)
            .await
            .map_err(StoreError::backend)?;
        tracing::info!("todo_items schema ready");
        Ok(())
    }

    async fn client(&self) -> Result<Object, StoreError> {
        self.pool.get().await.map_err(StoreError::backend)
    }
}

fn item_from_row(row: &Row) -> Result<TodoItem, StoreError> {
    let token: String = row.try_get("id").map_err(StoreError::backend)?;
    let id = ItemId::parse(&token).map_err(StoreError::backend)?;
    Ok(TodoItem {
        id,
        title: row.try_get("title").map_err(StoreError::backend)?,
        done: row.try_get("done").map_err(StoreError::backend)?,
    })
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list_items(&self) -> Result<Vec<TodoItem>, StoreError> {
        let client = self.client().await?;
        let rows = client
            .query("SELECT id, title, done FROM todo_items ORDER BY id ASC", &[])
            .await
            .map_err(StoreError::backend)?;
        rows.iter().map(item_from_row).collect()
    }

    async fn find_item(&self, id: ItemId) -> Result<TodoItem, StoreError> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                "SELECT id, title, done FROM todo_items WHERE id = $1",
                &[&id.to_string()],
            )
            .await
            .map_err(StoreError::backend)?;
        match row {
            Some(row) => item_from_row(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn insert_item(&self, id: ItemId, title: &str) -> Result<(), StoreError> {
        let client = self.client().await?;
        let result = client
            .execute(
                "INSERT INTO todo_items (id, title, done) VALUES ($1, $2, FALSE)",
                &[&id.to_string(), &title],
            )
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(StoreError::Duplicate(id))
            }
            Err(err) => Err(StoreError::backend(err)),
        }
    }

    async fn set_done(&self, id: ItemId) -> Result<(), StoreError> {
        let client = self.client().await?;
        // Matched rows are counted even when `done` was already true.
        let updated = client
            .execute(
                "UPDATE todo_items SET done = TRUE WHERE id = $1",
                &[&id.to_string()],
            )
            .await
            .map_err(StoreError::backend)?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
