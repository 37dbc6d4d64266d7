use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LocalStorage;
use crate::error::StorageError;

/// Хранилище в памяти процесса. Используется без `REDIS_URL` и в тестах.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("authToken").await.unwrap(), None);

        storage.set("authToken", "abc").await.unwrap();
        assert_eq!(storage.get("authToken").await.unwrap().as_deref(), Some("abc"));

        storage.remove("authToken").await.unwrap();
        assert!(storage.is_empty().await);

        storage.set("a:1", "x").await.unwrap();
        storage.set("a:2", "y").await.unwrap();
        storage.set("b:1", "z").await.unwrap();
        assert_eq!(storage.remove_prefix("a:").await.unwrap(), 2);
        assert_eq!(storage.len().await, 1);
    }
}
