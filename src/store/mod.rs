mod backend;
mod events;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::{ChatError, ChatResult};

pub use backend::Backend;
pub use events::StoreEvent;

pub const USERS: &str = "users";
pub const GROUPS: &str = "groups";
pub const MESSAGES: &str = "messages";

pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Shared collections of JSON records, one array per key.
///
/// Writers go through [`Store::update`], which holds a single write lock for the whole
/// read-modify-write so concurrent callers can't drop each other's changes.
#[derive(Clone)]
pub struct Store {
    backend: Backend,
    write_lock: Arc<Mutex<()>>,
    tx: broadcast::Sender<StoreEvent>,
}

impl Store {
    pub fn new(backend: Backend, event_capacity: usize) -> Self {
        Self {
            backend,
            write_lock: Default::default(),
            tx: broadcast::channel(event_capacity.max(1)).0,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Backend::memory(), DEFAULT_EVENT_CAPACITY)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Missing keys read as an empty collection.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> ChatResult<Vec<T>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|source| ChatError::Corrupt {
            key: key.to_owned(),
            source,
        })
    }

    /// Nothing is written and no event fires when `f` fails.
    pub async fn update<T, R, F>(&self, key: &str, f: F) -> ChatResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> ChatResult<R>,
    {
        let _guard = self.write_lock.lock().await;

        let mut items = self.read::<T>(key).await?;
        let out = f(&mut items)?;

        self.backend.set(key, &serde_json::to_string(&items)?).await?;
        debug!(key, len = items.len(), "collection written");

        // no subscribers is fine
        let _ = self.tx.send(StoreEvent::new(key));

        Ok(out)
    }

    /// Drops a whole collection. It reads as empty afterwards.
    pub async fn clear(&self, key: &str) -> ChatResult<()> {
        let _guard = self.write_lock.lock().await;

        self.backend.remove(key).await?;
        debug!(key, "collection cleared");

        let _ = self.tx.send(StoreEvent::new(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_empty() {
        let store = Store::in_memory();
        let users: Vec<String> = store.read(USERS).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn corrupt_key_is_reported_not_panicked() {
        let store = Store::in_memory();
        store.backend.set(MESSAGES, "{not json").await.unwrap();

        let err = store.read::<String>(MESSAGES).await.unwrap_err();
        assert!(matches!(err, ChatError::Corrupt { ref key, .. } if key == MESSAGES));
    }

    #[tokio::test]
    async fn update_appends_and_notifies() {
        let store = Store::in_memory();
        let mut rx = store.subscribe();

        store.update(GROUPS, |items: &mut Vec<u32>| {
            items.push(7);
            Ok(())
        }).await.unwrap();

        assert_eq!(store.read::<u32>(GROUPS).await.unwrap(), vec![7]);
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::new(GROUPS));
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() {
        let store = Store::in_memory();
        let mut rx = store.subscribe();

        let result = store.update(USERS, |items: &mut Vec<u32>| -> ChatResult<()> {
            items.push(1);
            Err(ChatError::Invalid("nope".into()))
        }).await;

        assert!(result.is_err());
        assert!(store.read::<u32>(USERS).await.unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cleared_collection_reads_empty_and_notifies() {
        let store = Store::in_memory();
        store.update(MESSAGES, |items: &mut Vec<u32>| {
            items.push(1);
            Ok(())
        }).await.unwrap();
        let mut rx = store.subscribe();

        store.clear(MESSAGES).await.unwrap();

        assert!(store.read::<u32>(MESSAGES).await.unwrap().is_empty());
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::new(MESSAGES));
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() {
        let store = Store::in_memory();

        let tasks: Vec<_> = (0..32u32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.update(MESSAGES, |items: &mut Vec<u32>| {
                        items.push(n);
                        Ok(())
                    }).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut items = store.read::<u32>(MESSAGES).await.unwrap();
        items.sort();
        assert_eq!(items, (0..32).collect::<Vec<_>>());
    }
}
