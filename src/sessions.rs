use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{Seat, SeatId};
use crate::seats::{AvailabilityOracle, BookingSummary, LabelStyle, SeatGrid, SeatSelection, SelectionPhase};

/// Открытый экран выбора мест для одного сеанса.
#[derive(Debug, Clone)]
pub struct BookingSession {
    pub id: Uuid,
    pub schedule_id: i64,
    pub grid: SeatGrid,
    pub selection: SeatSelection,
    /// Идёт подтверждение: повторный запуск запрещён до его завершения.
    pub confirming: bool,
    /// Последнее обращение клиента к сессии.
    pub touched: Instant,
}

impl BookingSession {
    pub fn view(&self, unit_price: u64, label_style: LabelStyle) -> SessionView {
        SessionView {
            id: self.id,
            schedule_id: self.schedule_id,
            phase: self.selection.phase(),
            selected: self.selection.seats().to_vec(),
            total: self.selection.total_price(unit_price),
            available: self.grid.available_count(),
            summary: (self.selection.phase() == SelectionPhase::Confirming)
                .then(|| self.selection.summary(unit_price, label_style)),
            rows: self.grid.rows().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub schedule_id: i64,
    pub phase: SelectionPhase,
    pub selected: Vec<SeatId>,
    pub total: u64,
    pub available: usize,
    pub summary: Option<BookingSummary>,
    pub rows: Vec<Vec<Seat>>,
}

/// Все открытые экраны выбора мест. Схема зала строится один раз при открытии.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, BookingSession>>,
    oracle: Arc<dyn AvailabilityOracle>,
}

impl SessionRegistry {
    pub fn new(oracle: Arc<dyn AvailabilityOracle>) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), oracle }
    }

    pub async fn open(&self, schedule_id: i64) -> BookingSession {
        let session = BookingSession {
            id: Uuid::new_v4(),
            schedule_id,
            grid: SeatGrid::new(self.oracle.as_ref()),
            selection: SeatSelection::new(),
            confirming: false,
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(session.id, session.clone());
        info!("Opened booking session {} for schedule {}", session.id, schedule_id);
        session
    }

    /// Выполняет `f` над сессией под блокировкой записи.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut BookingSession) -> R) -> Option<R> {
        self.sessions.write().await.get_mut(&id).map(|session| {
            session.touched = Instant::now();
            f(session)
        })
    }

    pub async fn get(&self, id: Uuid) -> Option<BookingSession> {
        self.update(id, |session| session.clone()).await
    }

    /// Удаляет сессии, к которым не обращались дольше `ttl`.
    pub async fn evict_idle(&self, ttl: Duration) -> Vec<Uuid> {
        self.evict_idle_at(Instant::now(), ttl).await
    }

    /// То же, что [`evict_idle`](Self::evict_idle), относительно момента `now`.
    /// Сессии с незавершённым подтверждением не трогаются.
    pub async fn evict_idle_at(&self, now: Instant, ttl: Duration) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<Uuid> = sessions
            .values()
            .filter(|s| !s.confirming && now.saturating_duration_since(s.touched) > ttl)
            .map(|s| s.id)
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            info!("Evicted {} idle booking sessions", expired.len());
        }
        expired
    }

    /// Уход со страницы: выбор сбрасывается, сессия удаляется.
    pub async fn close(&self, id: Uuid) -> bool {
        match self.sessions.write().await.remove(&id) {
            Some(mut session) => {
                let dropped = session.selection.len();
                session.selection.clear();
                info!("Closed booking session {} ({} selected seats dropped)", id, dropped);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seats::StaticExclusions;

    #[tokio::test]
    async fn idle_sessions_are_evicted_but_active_ones_stay() {
        let registry = SessionRegistry::new(Arc::new(StaticExclusions::defaults()));
        let idle = registry.open(1).await;
        let busy = registry.open(2).await;
        registry.update(busy.id, |s| s.confirming = true).await.unwrap();

        let ttl = Duration::from_secs(1800);
        assert!(registry.evict_idle(ttl).await.is_empty());

        let later = Instant::now() + Duration::from_secs(3600);
        let evicted = registry.evict_idle_at(later, ttl).await;
        assert_eq!(evicted, vec![idle.id]);
        assert!(registry.get(idle.id).await.is_none());
        assert!(registry.get(busy.id).await.is_some());
    }

    #[tokio::test]
    async fn grid_is_built_once_per_session() {
        let registry = SessionRegistry::new(Arc::new(StaticExclusions::defaults()));
        let session = registry.open(7).await;
        assert_eq!(session.grid.total_seats(), 435);

        let seat: SeatId = "1-1".parse().unwrap();
        registry
            .update(session.id, |s| s.selection.toggle_seat(&s.grid, seat))
            .await
            .unwrap();

        let reloaded = registry.get(session.id).await.unwrap();
        assert_eq!(reloaded.selection.seats(), &[seat]);
        assert_eq!(registry.len().await, 1);
        assert_eq!(reloaded.view(12, LabelStyle::Legacy).available, 435 - StaticExclusions::defaults().len());
        assert!(registry.close(session.id).await);
        assert!(!registry.close(session.id).await);
        assert!(registry.is_empty().await);
    }
}
