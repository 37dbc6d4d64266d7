//! Клиент REST API кинотеатра.
//!
//! Все запросы идут с заголовком `Authorization: Bearer <token>`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::SeatId;
use crate::services::confirmation::BookingApi;

// --- Модели данных для API ---

/// Запрос на предварительный резерв места.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest<'a> {
    schedule_id: i64,
    seat_id: &'a SeatId,
}

/// Бэкенд отдаёт id брони то строкой, то числом.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookingIdRepr {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReserveResponse {
    booking_id: BookingIdRepr,
}

/// Клиент без токена. Дешёво клонируется.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Клиент от имени пользователя с данным bearer-токеном.
    pub fn authorized(&self, token: impl Into<String>) -> AuthorizedClient {
        AuthorizedClient { client: self.clone(), token: token.into() }
    }
}

#[derive(Clone)]
pub struct AuthorizedClient {
    client: ApiClient,
    token: String,
}

impl AuthorizedClient {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.client.base_url, path.trim_start_matches('/'))
    }

    /// Не-2xx ответы превращаются в `ApiError::Status` с телом ответа.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("API request failed with {}: {}", status, body);
        Err(ApiError::Status { status, body })
    }

    /// GET коллекции для админских таблиц (`/api/movies` и т.п.).
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        debug!("Fetching collection {}", path);
        let response = self
            .client
            .http_client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json::<Vec<T>>().await?)
    }
}

#[async_trait]
impl BookingApi for AuthorizedClient {
    async fn confirm_booking(&self, booking_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .http_client
            .put(self.url(&format!("api/bookings/confirm/{}", booking_id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn reserve_seat(&self, schedule_id: i64, seat: &SeatId) -> Result<String, ApiError> {
        let response = self
            .client
            .http_client
            .post(self.url("api/bookings/reserve"))
            .bearer_auth(&self.token)
            .json(&ReserveRequest { schedule_id, seat_id: seat })
            .send()
            .await?;
        let body: ReserveResponse = Self::check(response).await?.json().await?;
        Ok(match body.booking_id {
            BookingIdRepr::Text(id) => id,
            BookingIdRepr::Number(id) => id.to_string(),
        })
    }
}
