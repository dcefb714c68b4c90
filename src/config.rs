//! Environment-driven settings for the binaries.

use chrono::NaiveDate;
use std::net::SocketAddr;
use thiserror::Error;

pub const HTTP_ADDR_VAR: &str = "CPM_HTTP_ADDR";
pub const LOG_FILTER_VAR: &str = "CPM_LOG";
pub const PROJECT_START_VAR: &str = "CPM_PROJECT_START";

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a socket address like 127.0.0.1:3000 (got '{value}')")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} must be a date in YYYY-MM-DD form (got '{value}')")]
    InvalidDate { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub http_addr: SocketAddr,
    pub log_filter: String,
    /// Fixed day zero for dated plans; otherwise the earliest task creation day.
    pub project_start: Option<NaiveDate>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            project_start: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let addr_value = read(HTTP_ADDR_VAR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                var: HTTP_ADDR_VAR,
                value: addr_value.clone(),
            })?;

        let log_filter = read(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let project_start = read(PROJECT_START_VAR)
            .map(|value| {
                NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                    ConfigError::InvalidDate {
                        var: PROJECT_START_VAR,
                        value,
                    }
                })
            })
            .transpose()?;

        Ok(Self {
            http_addr,
            log_filter,
            project_start,
        })
    }
}
