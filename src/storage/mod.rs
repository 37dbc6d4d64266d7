//! Локальное key/value хранилище клиента.
//!
//! Аналог браузерного localStorage: здесь лежат токен авторизации
//! (`authToken`) и записи о предварительных бронях (`booking_{seatId}`).
//! У каждой сессии бронирования своё пространство ключей, см. [`ScopedStorage`].

mod memory;
mod redis_store;
pub mod reservations;
mod scoped;

use async_trait::async_trait;

use crate::error::StorageError;

pub use self::memory::MemoryStorage;
pub use self::redis_store::RedisStorage;
pub use reservations::{ReservationStore, StorageReservations};
pub use self::scoped::ScopedStorage;

/// Ключ, под которым хранится bearer-токен.
pub const AUTH_TOKEN_KEY: &str = "authToken";

#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// Удаляет все ключи, начинающиеся с `prefix`. Возвращает их число.
    async fn remove_prefix(&self, prefix: &str) -> Result<usize, StorageError>;
}
