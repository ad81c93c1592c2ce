//! Client configuration.
//!
//! Defaults mirror the behaviour the service expects from well-behaved
//! clients: six retries on throttling with exponential backoff, and a ten
//! second poll interval while a workspace is provisioning.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Retry behaviour for throttled requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further retry.
    pub backoff_base: Duration,
    /// Upper bound for a single computed backoff delay.
    pub backoff_max: Duration,
    /// Status codes that trigger a retry.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 6,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(120),
            retry_statuses: vec![429],
        }
    }
}

impl RetryConfig {
    /// Returns the delay before retry number `attempt` (1-based).
    ///
    /// A server-provided `Retry-After` wins over the computed backoff.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(retry_after) = retry_after {
            return retry_after;
        }
        let exponent = attempt.saturating_sub(1).min(31);
        self.backoff_base
            .saturating_mul(2_u32.saturating_pow(exponent))
            .min(self.backoff_max)
    }

    /// Returns true when `status` should be retried.
    #[must_use]
    pub fn should_retry(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

/// Polling behaviour for long-running provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Time between two polls.
    pub interval: Duration,
    /// Give up after this long; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Some(Duration::from_secs(30 * 60)),
        }
    }
}

/// Configuration shared by every client built from a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// Retry behaviour on throttling.
    pub retry: RetryConfig,
    /// Workspace provisioning poll behaviour.
    pub provisioning: PollConfig,
    /// Explicit netrc location; defaults to `$NETRC` or `~/.netrc`.
    pub netrc_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
            provisioning: PollConfig::default(),
            netrc_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables on top of the defaults.
    ///
    /// Reads:
    /// - `DBX_CONNECT_TIMEOUT_SECS`
    /// - `DBX_REQUEST_TIMEOUT_SECS`
    /// - `DBX_MAX_RETRIES`
    /// - `DBX_BACKOFF_BASE_MS`
    /// - `DBX_POLL_INTERVAL_SECS`
    /// - `DBX_PROVISIONING_TIMEOUT_SECS` (0 disables the timeout)
    /// - `NETRC`
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).and_then(non_empty);

        if let Some(secs) = parse_u64(&get, "DBX_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&get, "DBX_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_u64(&get, "DBX_MAX_RETRIES")? {
            config.retry.max_retries = u32::try_from(retries)
                .map_err(|_| Error::configuration("DBX_MAX_RETRIES is out of range"))?;
        }
        if let Some(ms) = parse_u64(&get, "DBX_BACKOFF_BASE_MS")? {
            config.retry.backoff_base = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&get, "DBX_POLL_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(Error::configuration(
                    "DBX_POLL_INTERVAL_SECS must be greater than 0",
                ));
            }
            config.provisioning.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&get, "DBX_PROVISIONING_TIMEOUT_SECS")? {
            config.provisioning.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(path) = get("NETRC") {
            config.netrc_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_u64(get: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>> {
    let Some(value) = get(name) else {
        return Ok(None);
    };
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|e| Error::configuration(format!("{name} must be a u64: {e}")))
}
