use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::debug;

use shared::domain::{Item, ItemId};

/// Every failure an item store can report.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item {0} does not exist")]
    NotFound(ItemId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create/read/update/delete access to persisted items.
///
/// Updating or deleting an id that is not stored fails with
/// [`StoreError::NotFound`].
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<Item>, StoreError>;
    async fn insert_item(&self, name: &str, quantity: i64) -> Result<ItemId, StoreError>;
    async fn update_item(&self, id: ItemId, name: &str, quantity: i64) -> Result<(), StoreError>;
    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite database url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;

        let storage = Self { pool };
        storage.ensure_items_table().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_items_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                quantity   INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure items table exists")?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for Storage {
    async fn fetch_items(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query("SELECT id, name, quantity FROM items ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|r| -> Result<Item, sqlx::Error> {
                Ok(Item {
                    id: ItemId(r.try_get::<i64, _>("id")?),
                    name: r.try_get::<String, _>("name")?,
                    quantity: r.try_get::<i64, _>("quantity")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = items.len(), "fetched items");
        Ok(items)
    }

    async fn insert_item(&self, name: &str, quantity: i64) -> Result<ItemId, StoreError> {
        let rec = sqlx::query("INSERT INTO items (name, quantity) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(quantity)
            .fetch_one(&self.pool)
            .await?;
        let id = ItemId(rec.try_get::<i64, _>(0)?);
        debug!(item_id = id.0, "inserted item");
        Ok(id)
    }

    async fn update_item(&self, id: ItemId, name: &str, quantity: i64) -> Result<(), StoreError> {
        let updated = sqlx::query(
            "UPDATE items SET name = ?, quantity = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(name)
        .bind(quantity)
        .bind(id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(item_id = id.0, "updated item");
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(item_id = id.0, "deleted item");
        Ok(())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
