//! Rate-limit policies for named action sites, loadable from JSON.
//!
//! ```json
//! {
//!   "limits": {
//!     "chat_message": { "max_actions": 5, "window_ms": 10000 },
//!     "search": { "max_actions": 10, "window_ms": 1000 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::clock::Clock;
use super::rate_limiter::{RateLimitError, RateLimiter};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read limits file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid limit for action '{action}': {source}")]
    Invalid {
        action: String,
        #[source]
        source: RateLimitError,
    },
    #[error("No rate limit configured for action '{0}'")]
    UnknownAction(String),
}

/// At most `max_actions` per `window_ms` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub max_actions: usize,
    pub window_ms: u64,
}

impl RateLimitPolicy {
    pub const fn new(max_actions: usize, window_ms: u64) -> Self {
        Self {
            max_actions,
            window_ms,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.max_actions == 0 {
            return Err(RateLimitError::ZeroMaxActions);
        }
        if self.window_ms == 0 {
            return Err(RateLimitError::ZeroWindow);
        }
        Ok(())
    }

    pub fn build(&self) -> Result<RateLimiter, RateLimitError> {
        RateLimiter::new(self.max_actions, self.window())
    }

    pub fn build_with_clock<C: Clock>(&self, clock: C) -> Result<RateLimiter<C>, RateLimitError> {
        RateLimiter::with_clock(self.max_actions, self.window(), clock)
    }
}

/// Policies keyed by action-site name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub limits: BTreeMap<String, RateLimitPolicy>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = [
            ("chat_message", RateLimitPolicy::new(5, 10_000)),
            ("campaign_create", RateLimitPolicy::new(3, 60_000)),
            ("search", RateLimitPolicy::new(10, 1_000)),
            ("login", RateLimitPolicy::new(5, 60_000)),
        ]
        .into_iter()
        .map(|(name, policy)| (name.to_string(), policy))
        .collect();
        Self { limits }
    }
}

impl LimitsConfig {
    /// Read and validate a limits file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            actions = config.limits.len(),
            "Loaded rate limits"
        );
        Ok(config)
    }

    /// Parse and validate limits from a JSON document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject any policy with a zero limit, naming the offending action.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (action, policy) in &self.limits {
            policy.validate().map_err(|source| ConfigError::Invalid {
                action: action.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn policy(&self, action: &str) -> Option<&RateLimitPolicy> {
        self.limits.get(action)
    }

    /// A fresh limiter for `action`, on the system clock.
    pub fn limiter(&self, action: &str) -> Result<RateLimiter, ConfigError> {
        let policy = self
            .policy(action)
            .ok_or_else(|| ConfigError::UnknownAction(action.to_string()))?;
        policy.build().map_err(|source| ConfigError::Invalid {
            action: action.to_string(),
            source,
        })
    }
}
