use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::LocalStorage;
use crate::error::StorageError;

/// Хранилище одного клиента поверх общего.
///
/// Каждая сессия бронирования видит только свои ключи (`authToken`,
/// `booking_{seatId}`): они живут под префиксом `session:{id}:`.
#[derive(Clone)]
pub struct ScopedStorage {
    inner: Arc<dyn LocalStorage>,
    prefix: String,
}

impl ScopedStorage {
    pub fn for_session(inner: Arc<dyn LocalStorage>, session: Uuid) -> Self {
        Self { inner, prefix: format!("session:{}:", session) }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Удаляет все ключи клиента. Возвращает число удалённых.
    pub async fn purge(&self) -> Result<usize, StorageError> {
        self.inner.remove_prefix(&self.prefix).await
    }
}

#[async_trait]
impl LocalStorage for ScopedStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(&self.key(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(&self.key(key), value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(&self.key(key)).await
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        self.inner.remove_prefix(&self.key(prefix)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, AUTH_TOKEN_KEY};

    #[tokio::test]
    async fn sessions_do_not_see_each_other() {
        let shared = Arc::new(MemoryStorage::new());
        let alice = ScopedStorage::for_session(shared.clone(), Uuid::new_v4());
        let bob = ScopedStorage::for_session(shared.clone(), Uuid::new_v4());

        alice.set(AUTH_TOKEN_KEY, "alice-secret").await.unwrap();
        alice.set("booking_3-10", "111").await.unwrap();

        assert_eq!(bob.get(AUTH_TOKEN_KEY).await.unwrap(), None);
        assert_eq!(bob.get("booking_3-10").await.unwrap(), None);
        assert_eq!(alice.get("booking_3-10").await.unwrap().as_deref(), Some("111"));
        assert_eq!(shared.len().await, 2);

        bob.set("booking_3-10", "222").await.unwrap();
        assert_eq!(alice.purge().await.unwrap(), 2);
        assert_eq!(bob.get("booking_3-10").await.unwrap().as_deref(), Some("222"));
        assert_eq!(shared.len().await, 1);
    }
}
