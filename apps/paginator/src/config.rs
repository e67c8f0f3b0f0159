use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::layout::geometry::PageStandard;
use crate::models::mock::MockDataSize;
use crate::render::font_metrics::FontFamily;

/// Engine-facing knobs of a pagination run.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationSettings {
    /// Ceiling on measure-and-assign attempts per run, retries included.
    pub max_iterations: u32,
    /// How long to wait for a paint to complete before treating the surface as
    /// not measurable.
    pub settle_timeout: Duration,
    /// Extra measurement attempts within one iteration.
    pub measure_retries: u32,
    /// Base delay between measurement attempts; doubles on each retry.
    pub retry_backoff: Duration,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            settle_timeout: Duration::from_millis(500),
            measure_retries: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones take their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub page_standard: PageStandard,
    pub pagination: PaginationSettings,
    pub preview_mock_size: MockDataSize,
    pub preview_font: FontFamily,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PaginationSettings::default();
        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            page_standard: parse_env("PAGE_STANDARD", PageStandard::A4)?,
            pagination: PaginationSettings {
                max_iterations: parse_env("PAGINATION_MAX_ITERATIONS", defaults.max_iterations)?,
                settle_timeout: millis_env("PAGINATION_SETTLE_TIMEOUT_MS", defaults.settle_timeout)?,
                measure_retries: parse_env("PAGINATION_MEASURE_RETRIES", defaults.measure_retries)?,
                retry_backoff: millis_env("PAGINATION_RETRY_BACKOFF_MS", defaults.retry_backoff)?,
            },
            preview_mock_size: parse_env("PREVIEW_MOCK_SIZE", MockDataSize::Medium)?,
            preview_font: parse_env("PREVIEW_FONT", FontFamily::Inter)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn millis_env(key: &str, default: Duration) -> Result<Duration> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_env(key, default_ms).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PaginationSettings::default();
        assert_eq!(settings.max_iterations, 10);
        assert_eq!(settings.settle_timeout, Duration::from_millis(500));
        assert_eq!(settings.measure_retries, 3);
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u32 = parse_env("PAGINATOR_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PAGINATOR_TEST_BAD_STANDARD", "tabloid");
        let parsed = parse_env("PAGINATOR_TEST_BAD_STANDARD", PageStandard::A4);
        std::env::remove_var("PAGINATOR_TEST_BAD_STANDARD");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_millis_env_reads_milliseconds() {
        std::env::set_var("PAGINATOR_TEST_TIMEOUT_MS", "250");
        let parsed = millis_env("PAGINATOR_TEST_TIMEOUT_MS", Duration::from_secs(1)).unwrap();
        std::env::remove_var("PAGINATOR_TEST_TIMEOUT_MS");
        assert_eq!(parsed, Duration::from_millis(250));
    }
}
