use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{LocalStorage, ScopedStorage};
use crate::error::StorageError;
use crate::models::SeatId;

/// Записи о предварительных бронях: место -> идентификатор брони на бэкенде.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn get(&self, seat: &SeatId) -> Result<Option<String>, StorageError>;
    async fn put(&self, seat: &SeatId, booking_id: &str) -> Result<(), StorageError>;
    async fn remove(&self, seat: &SeatId) -> Result<(), StorageError>;
}

/// Брони в локальном хранилище под ключами `booking_{seatId}`.
#[derive(Clone)]
pub struct StorageReservations {
    storage: Arc<dyn LocalStorage>,
}

impl StorageReservations {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Брони одной сессии в общем хранилище.
    pub fn for_session(storage: Arc<dyn LocalStorage>, session: Uuid) -> Self {
        Self::new(Arc::new(ScopedStorage::for_session(storage, session)))
    }
}

#[async_trait]
impl ReservationStore for StorageReservations {
    async fn get(&self, seat: &SeatId) -> Result<Option<String>, StorageError> {
        self.storage.get(&seat.storage_key()).await
    }

    async fn put(&self, seat: &SeatId, booking_id: &str) -> Result<(), StorageError> {
        self.storage.set(&seat.storage_key(), booking_id).await
    }

    async fn remove(&self, seat: &SeatId) -> Result<(), StorageError> {
        self.storage.remove(&seat.storage_key()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn records_live_under_booking_prefix() {
        let storage = Arc::new(MemoryStorage::new());
        let reservations = StorageReservations::new(storage.clone());
        let seat: SeatId = "3-10".parse().unwrap();

        reservations.put(&seat, "bk-42").await.unwrap();
        assert_eq!(storage.get("booking_3-10").await.unwrap().as_deref(), Some("bk-42"));
        assert_eq!(reservations.get(&seat).await.unwrap().as_deref(), Some("bk-42"));

        reservations.remove(&seat).await.unwrap();
        assert_eq!(reservations.get(&seat).await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_records_are_isolated() {
        let storage = Arc::new(MemoryStorage::new());
        let alice = StorageReservations::for_session(storage.clone(), Uuid::new_v4());
        let bob = StorageReservations::for_session(storage.clone(), Uuid::new_v4());
        let seat: SeatId = "3-10".parse().unwrap();

        alice.put(&seat, "111").await.unwrap();
        assert_eq!(bob.get(&seat).await.unwrap(), None);
        assert_eq!(storage.get("booking_3-10").await.unwrap(), None);
    }
}
