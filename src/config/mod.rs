use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::SeatId;
use crate::seats::{LabelStyle, StaticExclusions};
use crate::services::confirmation::ConfirmStrategy;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub booking: BookingConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// Удалённый REST API кинотеатра
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Локальное хранилище: Redis, если задан URL, иначе память процесса
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub redis_url: Option<String>,
    pub namespace: String,
}

// Параметры сценария бронирования
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub unit_price: u64,
    pub exclusions: StaticExclusions,
    pub label_style: LabelStyle,
    pub confirm_strategy: ConfirmStrategy,
    /// Сессия без обращений дольше этого срока удаляется фоновой очисткой.
    pub session_idle_ttl_seconds: u64,
    pub session_sweep_interval_seconds: u64,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_admin: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Собирает конфигурацию из произвольного источника переменных.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let confirm_concurrency: usize = parse(&lookup, "CONFIRM_CONCURRENCY", "4")?;
        let confirm_strategy = match var("CONFIRM_STRATEGY", "sequential").to_lowercase().as_str() {
            "sequential" => ConfirmStrategy::Sequential,
            "concurrent" if confirm_concurrency > 0 => ConfirmStrategy::Concurrent { limit: confirm_concurrency },
            "concurrent" => {
                return Err(invalid("CONFIRM_CONCURRENCY", "0", "must be at least 1"));
            }
            other => return Err(invalid("CONFIRM_STRATEGY", other, "expected sequential or concurrent")),
        };

        let label_style = match var("SEAT_LABEL_STYLE", "legacy").to_lowercase().as_str() {
            "legacy" => LabelStyle::Legacy,
            "grid" => LabelStyle::Grid,
            other => return Err(invalid("SEAT_LABEL_STYLE", other, "expected legacy or grid")),
        };

        let log_format = match var("LOG_FORMAT", "pretty").to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => return Err(invalid("LOG_FORMAT", other, "expected pretty or json")),
        };

        let session_idle_ttl_seconds: u64 = parse(&lookup, "SESSION_IDLE_TTL_SECONDS", "1800")?;
        let session_sweep_interval_seconds: u64 = parse(&lookup, "SESSION_SWEEP_INTERVAL_SECONDS", "60")?;
        if session_sweep_interval_seconds == 0 {
            return Err(invalid("SESSION_SWEEP_INTERVAL_SECONDS", "0", "must be at least 1"));
        }

        let exclusions = match lookup("SEAT_EXCLUSIONS") {
            Some(raw) => parse_exclusions(&raw)?,
            None => StaticExclusions::defaults(),
        };

        Ok(Config {
            app: AppConfig {
                host: var("HOST", "0.0.0.0"),
                port: parse(&lookup, "PORT", "8000")?,
                environment: var("ENVIRONMENT", "development"),
                rust_log: var("RUST_LOG", "cinema_booking=debug,tower_http=debug"),
                log_format,
            },
            api: ApiConfig {
                base_url: var("API_BASE_URL", "http://localhost:8080").trim_end_matches('/').to_string(),
                timeout_seconds: parse(&lookup, "API_TIMEOUT_SECONDS", "30")?,
            },
            storage: StorageConfig {
                redis_url: lookup("REDIS_URL").filter(|url| !url.is_empty()),
                namespace: var("STORAGE_NAMESPACE", "cinema"),
            },
            booking: BookingConfig {
                unit_price: parse(&lookup, "SEAT_UNIT_PRICE", "12")?,
                exclusions,
                label_style,
                confirm_strategy,
                session_idle_ttl_seconds,
                session_sweep_interval_seconds,
            },
            features: FeatureFlags {
                enable_admin: parse(&lookup, "ENABLE_ADMIN", "true")?,
            },
        })
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { name, value: value.to_string(), reason: reason.to_string() }
}

fn parse<T, F>(lookup: &F, name: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    raw.trim().parse().map_err(|e: T::Err| invalid(name, &raw, &e.to_string()))
}

/// `SEAT_EXCLUSIONS=2-5,2-6,7-20`
fn parse_exclusions(raw: &str) -> Result<StaticExclusions, ConfigError> {
    let seats = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<SeatId>().map_err(|e| invalid("SEAT_EXCLUSIONS", s, &e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StaticExclusions::new(seats))
}
