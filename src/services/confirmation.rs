//! confirmation.rs
//!
//! Двухфазное бронирование: место сначала резервируется на бэкенде
//! (идентификатор брони сохраняется локально под `booking_{seatId}`),
//! затем на шаге сводки каждая бронь подтверждается.
//!
//! Ключевые компоненты:
//! 1.  **BookingApi**: порт к REST API (`PUT /api/bookings/confirm/{bookingId}`,
//!     `POST /api/bookings/reserve`).
//! 2.  **BookingConfirmer**: подтверждает выбранные места одно за другим
//!     (или с ограниченным параллелизмом) и удаляет локальные записи.
//! 3.  **Reserver**: резервирует места, для которых ещё нет локальной записи.
//!
//! Первая ошибка прерывает подтверждение. Уже подтверждённые места остаются
//! подтверждёнными, компенсирующего отката нет. При параллельном режиме
//! запросы, отправленные до ошибки, доводятся до конца: их успехи попадают
//! в отчёт, а локальные записи удаляются. Неотправленные места не трогаем.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, BookingError};
use crate::models::SeatId;
use crate::storage::ReservationStore;

#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Подтверждает ранее зарезервированное место.
    async fn confirm_booking(&self, booking_id: &str) -> Result<(), ApiError>;

    /// Резервирует место и возвращает идентификатор брони.
    async fn reserve_seat(&self, schedule_id: i64, seat: &SeatId) -> Result<String, ApiError>;
}

/// Как отправлять подтверждения на бэкенд.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmStrategy {
    /// По одному месту, строго по порядку выбора.
    #[default]
    Sequential,
    /// Не более `limit` запросов одновременно.
    Concurrent { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationReport {
    /// Подтверждённые места в порядке завершения запросов.
    pub confirmed: Vec<SeatId>,
}

pub struct BookingConfirmer {
    api: Arc<dyn BookingApi>,
    reservations: Arc<dyn ReservationStore>,
    strategy: ConfirmStrategy,
}

impl BookingConfirmer {
    pub fn new(api: Arc<dyn BookingApi>, reservations: Arc<dyn ReservationStore>) -> Self {
        Self { api, reservations, strategy: ConfirmStrategy::Sequential }
    }

    pub fn with_strategy(mut self, strategy: ConfirmStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Подтверждает все места выбора. Останавливается на первой ошибке.
    pub async fn confirm_all(&self, seats: &[SeatId]) -> Result<ConfirmationReport, BookingError> {
        info!("Confirming {} seats ({:?})", seats.len(), self.strategy);

        let mut confirmed = Vec::with_capacity(seats.len());
        let outcome = match self.strategy {
            ConfirmStrategy::Sequential => self.confirm_sequential(seats, &mut confirmed).await,
            ConfirmStrategy::Concurrent { limit } => self.confirm_concurrent(seats, limit, &mut confirmed).await,
        };

        match outcome {
            Ok(()) => {
                info!("Booking confirmed: {} seats", confirmed.len());
                Ok(ConfirmationReport { confirmed })
            }
            Err(e) => {
                warn!(
                    "Booking confirmation aborted at seat {}: {} ({} seats already confirmed)",
                    e.seat(),
                    e,
                    confirmed.len()
                );
                Err(e)
            }
        }
    }

    async fn confirm_sequential(&self, seats: &[SeatId], confirmed: &mut Vec<SeatId>) -> Result<(), BookingError> {
        for &seat in seats {
            confirmed.push(self.confirm_one(seat).await?);
        }
        Ok(())
    }

    async fn confirm_concurrent(
        &self,
        seats: &[SeatId],
        limit: usize,
        confirmed: &mut Vec<SeatId>,
    ) -> Result<(), BookingError> {
        // После первой ошибки новые места не запускаются,
        // а уже отправленные запросы дожидаемся до конца.
        let aborted = AtomicBool::new(false);
        let mut pending = stream::iter(seats.iter().copied())
            .map(|seat| {
                let aborted = &aborted;
                async move {
                    if aborted.load(Ordering::Acquire) {
                        return None;
                    }
                    Some(self.confirm_one(seat).await)
                }
            })
            .buffer_unordered(limit.max(1));

        let mut first_error = None;
        while let Some(result) = pending.next().await {
            match result {
                Some(Ok(seat)) => confirmed.push(seat),
                Some(Err(e)) => {
                    aborted.store(true, Ordering::Release);
                    if first_error.is_none() {
                        first_error = Some(e);
                    } else {
                        debug!("Further confirmation failure after abort: {}", e);
                    }
                }
                None => {}
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn confirm_one(&self, seat: SeatId) -> Result<SeatId, BookingError> {
        let booking_id = self
            .reservations
            .get(&seat)
            .await
            .map_err(|source| BookingError::Storage { seat, source })?
            .ok_or(BookingError::MissingReservation { seat })?;

        debug!("Confirming seat {} (booking {})", seat, booking_id);
        self.api
            .confirm_booking(&booking_id)
            .await
            .map_err(|e| BookingError::from_api(seat, e))?;

        // бронь уже подтверждена, поэтому сбой очистки только логируем
        if let Err(e) = self.reservations.remove(&seat).await {
            warn!("Seat {} confirmed but its local record was not removed: {}", seat, e);
        }
        Ok(seat)
    }
}

pub struct Reserver {
    api: Arc<dyn BookingApi>,
    reservations: Arc<dyn ReservationStore>,
}

impl Reserver {
    pub fn new(api: Arc<dyn BookingApi>, reservations: Arc<dyn ReservationStore>) -> Self {
        Self { api, reservations }
    }

    /// Резервирует места без локальной записи. Возвращает только новые брони.
    pub async fn reserve_missing(&self, schedule_id: i64, seats: &[SeatId]) -> Result<Vec<SeatId>, BookingError> {
        let mut reserved = Vec::new();
        for &seat in seats {
            let existing = self
                .reservations
                .get(&seat)
                .await
                .map_err(|source| BookingError::Storage { seat, source })?;
            if existing.is_some() {
                continue;
            }

            let booking_id = self
                .api
                .reserve_seat(schedule_id, &seat)
                .await
                .map_err(|e| BookingError::from_api(seat, e))?;
            self.reservations
                .put(&seat, &booking_id)
                .await
                .map_err(|source| BookingError::Storage { seat, source })?;

            debug!("Seat {} reserved as booking {}", seat, booking_id);
            reserved.push(seat);
        }
        info!("Reserved {} new seats for schedule {}", reserved.len(), schedule_id);
        Ok(reserved)
    }
}
