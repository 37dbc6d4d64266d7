use axum::http::StatusCode;
use thiserror::Error;

use crate::models::SeatId;

/// Ошибки хранилища на стороне клиента (Redis или память).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("redis storage error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Ошибки обращения к REST API кинотеатра.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
        }
    }
}

/// Ошибки последовательности подтверждения брони.
///
/// Любая из них прерывает последовательность целиком. Уже подтверждённые
/// места остаются подтверждёнными.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("no reservation found for seat {seat}")]
    MissingReservation { seat: SeatId },

    #[error("booking for seat {seat} was rejected: {reason}")]
    ConfirmationRejected { seat: SeatId, reason: String },

    #[error("could not confirm seat {seat}: {reason}")]
    NetworkFailure { seat: SeatId, reason: String },

    #[error("reservation storage failed for seat {seat}: {source}")]
    Storage {
        seat: SeatId,
        #[source]
        source: StorageError,
    },
}

impl BookingError {
    /// Место, на котором оборвалась последовательность.
    pub fn seat(&self) -> &SeatId {
        match self {
            BookingError::MissingReservation { seat }
            | BookingError::ConfirmationRejected { seat, .. }
            | BookingError::NetworkFailure { seat, .. }
            | BookingError::Storage { seat, .. } => seat,
        }
    }

    pub(crate) fn from_api(seat: SeatId, err: ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => BookingError::ConfirmationRejected {
                seat,
                reason: if body.is_empty() { status.to_string() } else { format!("{status}: {body}") },
            },
            ApiError::Transport(e) => BookingError::NetworkFailure {
                seat,
                reason: e.to_string(),
            },
        }
    }

    /// HTTP статус для ответа BFF.
    pub fn http_status(&self) -> StatusCode {
        match self {
            BookingError::MissingReservation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::ConfirmationRejected { .. } | BookingError::NetworkFailure { .. } => {
                StatusCode::BAD_GATEWAY
            }
            BookingError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeatIdError {
    #[error("seat id must look like \"row-number\", got {0:?}")]
    Malformed(String),

    #[error("seat {row}-{number} is outside the hall")]
    OutOfRange { row: u32, number: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("select at least one seat to continue")]
    EmptySelection,

    #[error("selection is not awaiting confirmation")]
    NotConfirming,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}
