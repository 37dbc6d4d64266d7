use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cinema_booking::config::ApiConfig;
use cinema_booking::error::{ApiError, BookingError};
use cinema_booking::models::{Movie, SeatId};
use cinema_booking::services::{ApiClient, BookingApi, BookingConfirmer};
use cinema_booking::storage::{LocalStorage, MemoryStorage, StorageReservations};

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::from_config(&ApiConfig { base_url: base_url.to_string(), timeout_seconds: 5 }).unwrap()
}

#[tokio::test]
async fn confirm_sends_put_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/bookings/confirm/bk-17"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server.uri()).authorized("secret-token");
    api.confirm_booking("bk-17").await.expect("confirm succeeds");
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/bookings/confirm/bk-18"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already confirmed"))
        .mount(&server)
        .await;

    let api = client_for(&server.uri()).authorized("t");
    let err = api.confirm_booking("bk-18").await.unwrap_err();
    assert!(
        matches!(&err, ApiError::Status { status, body } if *status == StatusCode::CONFLICT && body == "already confirmed"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn reserve_accepts_numeric_booking_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings/reserve"))
        .and(body_json(json!({"scheduleId": 5, "seatId": "2-7"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"bookingId": 991})))
        .mount(&server)
        .await;

    let api = client_for(&server.uri()).authorized("t");
    let seat: SeatId = "2-7".parse().unwrap();
    assert_eq!(api.reserve_seat(5, &seat).await.unwrap(), "991");
}

#[tokio::test]
async fn list_deserializes_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Dune", "genre": "Sci-Fi", "releaseDate": "2021-10-22"},
            {"id": 2, "title": "Up"}
        ])))
        .mount(&server)
        .await;

    let movies: Vec<Movie> = client_for(&server.uri()).authorized("t").list("/api/movies").await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].genre.as_deref(), Some("Sci-Fi"));
    assert_eq!(movies[1].release_date, None);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    // свободный порт, на котором никто не слушает
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let storage = Arc::new(MemoryStorage::new());
    storage.set("booking_8-8", "bk-1").await.unwrap();
    let api = client_for(&format!("http://{}", addr)).authorized("t");
    let confirmer = BookingConfirmer::new(Arc::new(api), Arc::new(StorageReservations::new(storage.clone())));

    let err = confirmer.confirm_all(&["8-8".parse().unwrap()]).await.unwrap_err();
    assert!(matches!(err, BookingError::NetworkFailure { .. }), "unexpected error: {err:?}");
    assert_eq!(storage.get("booking_8-8").await.unwrap().as_deref(), Some("bk-1"));
}
