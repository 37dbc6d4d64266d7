#[cfg(feature = "admin")]
pub mod admin;
pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod seats;
pub mod services;
pub mod sessions;
pub mod sorting;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, StorageError};
use crate::services::{ApiClient, BookingConfirmer, Reserver};
use crate::sessions::SessionRegistry;
use crate::storage::{LocalStorage, MemoryStorage, RedisStorage, ScopedStorage, StorageReservations};

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub api: ApiClient,
    /// Общее хранилище; сессии работают с ним через [`AppState::client_storage`].
    pub storage: Arc<dyn LocalStorage>,
    pub sessions: SessionRegistry,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppState {
    /// Подключает хранилище по конфигурации: Redis, если задан `REDIS_URL`.
    pub async fn new(config: config::Config) -> Result<Arc<Self>, StartupError> {
        let storage: Arc<dyn LocalStorage> = match &config.storage.redis_url {
            Some(url) => Arc::new(RedisStorage::connect(url, &config.storage.namespace).await?),
            None => {
                warn!("REDIS_URL is not set, reservations are kept in memory");
                Arc::new(MemoryStorage::new())
            }
        };
        Ok(Self::with_storage(config, storage)?)
    }

    pub fn with_storage(config: config::Config, storage: Arc<dyn LocalStorage>) -> Result<Arc<Self>, ApiError> {
        let api = ApiClient::from_config(&config.api)?;
        let sessions = SessionRegistry::new(Arc::new(config.booking.exclusions.clone()));
        info!("Cinema API at {}", api.base_url());

        Ok(Arc::new(Self { config, api, storage, sessions }))
    }

    /// Локальное хранилище клиента, открывшего сессию `session`.
    pub fn client_storage(&self, session: Uuid) -> ScopedStorage {
        ScopedStorage::for_session(self.storage.clone(), session)
    }

    /// Подтверждение брони сессии от имени пользователя с токеном `token`.
    pub fn confirmer(&self, session: Uuid, token: impl Into<String>) -> BookingConfirmer {
        let reservations = StorageReservations::for_session(self.storage.clone(), session);
        BookingConfirmer::new(Arc::new(self.api.authorized(token)), Arc::new(reservations))
            .with_strategy(self.config.booking.confirm_strategy)
    }

    pub fn reserver(&self, session: Uuid, token: impl Into<String>) -> Reserver {
        let reservations = StorageReservations::for_session(self.storage.clone(), session);
        Reserver::new(Arc::new(self.api.authorized(token)), Arc::new(reservations))
    }

    /// Закрывает сессию и удаляет её ключи из хранилища.
    pub async fn close_session(&self, session: Uuid) -> bool {
        if !self.sessions.close(session).await {
            return false;
        }
        self.purge_client(session).await;
        true
    }

    /// Удаляет сессии, простаивающие дольше `SESSION_IDLE_TTL_SECONDS`.
    pub async fn evict_idle_sessions(&self) -> usize {
        let ttl = Duration::from_secs(self.config.booking.session_idle_ttl_seconds);
        let evicted = self.sessions.evict_idle(ttl).await;
        for session in &evicted {
            self.purge_client(*session).await;
        }
        evicted.len()
    }

    async fn purge_client(&self, session: Uuid) {
        match self.client_storage(session).purge().await {
            Ok(removed) => debug!("Removed {} stored keys of session {}", removed, session),
            Err(e) => warn!("Failed to clear storage of session {}: {}", session, e),
        }
    }
}

/// Роутер BFF со всеми маршрутами под `/api`.
pub fn app(state: Arc<AppState>) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/", get(|| async { "Cinema booking BFF v0.1" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
