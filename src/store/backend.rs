use std::{collections::HashMap, sync::Arc};

use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::ChatResult;

/// Where the shared collections physically live.
#[derive(Clone)]
pub enum Backend {
    Memory(Arc<RwLock<HashMap<String, String>>>),
    Sqlite(SqlitePool),
}

impl Backend {
    pub fn memory() -> Self {
        Backend::Memory(Default::default())
    }

    pub async fn sqlite(pool: SqlitePool) -> ChatResult<Self> {
        sqlx::query("CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)")
            .execute(&pool)
            .await?;

        Ok(Backend::Sqlite(pool))
    }

    pub async fn get(&self, key: &str) -> ChatResult<Option<String>> {
        match self {
            Backend::Memory(map) => Ok(map.read().await.get(key).cloned()),
            Backend::Sqlite(pool) => {
                let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key=?")
                    .bind(key)
                    .fetch_optional(pool)
                    .await?;
                Ok(row.map(|(value,)| value))
            }
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> ChatResult<()> {
        match self {
            Backend::Memory(map) => {
                map.write().await.insert(key.to_owned(), value.to_owned());
            }
            Backend::Sqlite(pool) => {
                sqlx::query("INSERT INTO kv (key,value) VALUES (?,?) ON CONFLICT(key) DO UPDATE SET value=excluded.value")
                    .bind(key)
                    .bind(value)
                    .execute(pool)
                    .await?;
            }
        }
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> ChatResult<()> {
        match self {
            Backend::Memory(map) => {
                map.write().await.remove(key);
            }
            Backend::Sqlite(pool) => {
                sqlx::query("DELETE FROM kv WHERE key=?")
                    .bind(key)
                    .execute(pool)
                    .await?;
            }
        }
        Ok(())
    }
}
