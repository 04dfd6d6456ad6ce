//! Runtime configuration

use crate::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the per-handler timeout in milliseconds
pub const ENV_DISPATCH_TIMEOUT_MS: &str = "COMPANY_DISPATCH_TIMEOUT_MS";
/// Environment variable toggling duplicate company name rejection
pub const ENV_REJECT_DUPLICATE_NAMES: &str = "COMPANY_REJECT_DUPLICATE_NAMES";
/// Environment variable naming the user recorded in audit fields
pub const ENV_AUDIT_USER: &str = "COMPANY_AUDIT_USER";

/// Configuration for [`DomainEventDispatcher`](crate::DomainEventDispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound for a single handler invocation in milliseconds (0 = no limit)
    pub handler_timeout_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            handler_timeout_ms: 5_000,
        }
    }
}

impl DispatcherConfig {
    /// Read overrides from the environment, falling back to defaults
    pub fn from_env() -> DomainResult<Self> {
        let mut config = Self::default();
        if let Some(ms) = read_env(ENV_DISPATCH_TIMEOUT_MS)? {
            config.handler_timeout_ms = ms;
        }
        Ok(config)
    }

    /// Timeout as a duration, `None` when unlimited
    pub fn handler_timeout(&self) -> Option<Duration> {
        (self.handler_timeout_ms > 0).then(|| Duration::from_millis(self.handler_timeout_ms))
    }
}

/// Configuration for [`CompanyService`](crate::CompanyService)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyServiceConfig {
    /// Refuse to create or rename a company onto a name already in use
    pub reject_duplicate_names: bool,
    /// User stamped into audit fields when the caller does not supply one
    pub audit_user: String,
}

impl Default for CompanyServiceConfig {
    fn default() -> Self {
        Self {
            reject_duplicate_names: true,
            audit_user: "system".to_string(),
        }
    }
}

impl CompanyServiceConfig {
    /// Read overrides from the environment, falling back to defaults
    pub fn from_env() -> DomainResult<Self> {
        let mut config = Self::default();
        if let Some(reject) = read_env(ENV_REJECT_DUPLICATE_NAMES)? {
            config.reject_duplicate_names = reject;
        }
        if let Ok(user) = std::env::var(ENV_AUDIT_USER) {
            if !user.trim().is_empty() {
                config.audit_user = user;
            }
        }
        Ok(config)
    }
}

fn read_env<T>(key: &str) -> DomainResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| DomainError::ConfigurationError(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}
