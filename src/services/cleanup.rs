use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::AppState;

/// Фоновая очистка брошенных сессий бронирования.
pub struct CleanupService {
    state: Arc<AppState>,
}

impl CleanupService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Один проход: удаляет простаивающие сессии и их ключи в хранилище.
    pub async fn run_idle_sweep(&self) -> usize {
        let evicted = self.state.evict_idle_sessions().await;
        if evicted > 0 {
            info!("Idle sweep removed {} booking sessions", evicted);
        } else {
            debug!("Idle sweep: nothing to remove");
        }
        evicted
    }

    /// Бесконечный цикл с интервалом `SESSION_SWEEP_INTERVAL_SECONDS`.
    pub async fn run(self) {
        let period = Duration::from_secs(self.state.config.booking.session_sweep_interval_seconds);
        let mut ticker = tokio::time::interval(period);
        // первый тик срабатывает сразу
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.run_idle_sweep().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{LocalStorage, MemoryStorage, AUTH_TOKEN_KEY};

    #[tokio::test]
    async fn sweep_drops_idle_sessions_with_their_keys() {
        let config = Config::from_lookup(|name| match name {
            "SESSION_IDLE_TTL_SECONDS" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let state = AppState::with_storage(config, storage.clone()).unwrap();

        let session = state.sessions.open(4).await;
        state.client_storage(session.id).set(AUTH_TOKEN_KEY, "t").await.unwrap();
        state.client_storage(session.id).set("booking_3-3", "bk-9").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let cleanup = CleanupService::new(state.clone());
        assert_eq!(cleanup.run_idle_sweep().await, 1);
        assert!(state.sessions.is_empty().await);
        assert!(storage.is_empty().await);
        assert_eq!(cleanup.run_idle_sweep().await, 0);
    }

    #[tokio::test]
    async fn closing_a_session_leaves_other_sessions_alone() {
        let storage = Arc::new(MemoryStorage::new());
        let state = AppState::with_storage(Config::from_lookup(|_| None).unwrap(), storage.clone()).unwrap();

        let leaving = state.sessions.open(4).await;
        let staying = state.sessions.open(4).await;
        state.client_storage(leaving.id).set(AUTH_TOKEN_KEY, "a").await.unwrap();
        state.client_storage(staying.id).set(AUTH_TOKEN_KEY, "b").await.unwrap();

        assert!(state.close_session(leaving.id).await);
        assert_eq!(storage.len().await, 1);
        assert_eq!(state.client_storage(staying.id).get(AUTH_TOKEN_KEY).await.unwrap().as_deref(), Some("b"));

        // при TTL по умолчанию свежая сессия не удаляется
        assert_eq!(CleanupService::new(state.clone()).run_idle_sweep().await, 0);
        assert_eq!(state.sessions.len().await, 1);
    }
}
