//! Runtime settings: defaults, environment overrides and CLI values.

use std::fmt;
use std::time::Duration;

use crate::nav::Role;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

pub const ENV_REFRESH_SECS: &str = "RACKWATCH_REFRESH_SECS";
pub const ENV_TIMEOUT_MS: &str = "RACKWATCH_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub role: Role,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub notification_ttl: Duration,
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            role: Role::Admin,
            refresh_interval: DEFAULT_REFRESH,
            request_timeout: DEFAULT_TIMEOUT,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            offline: false,
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied. Unparsable or zero values are ignored.
    pub fn from_env() -> Self {
        Self::default().with_env(|k| std::env::var(k).ok())
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(secs) = positive(lookup(ENV_REFRESH_SECS)) {
            self.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = positive(lookup(ENV_TIMEOUT_MS)) {
            self.request_timeout = Duration::from_millis(ms);
        }
        self
    }
}

fn positive(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok()).filter(|n| *n > 0)
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "base_url: {}", self.base_url)?;
        writeln!(f, "role: {}", self.role)?;
        writeln!(f, "refresh_interval_secs: {}", self.refresh_interval.as_secs())?;
        writeln!(f, "request_timeout_ms: {}", self.request_timeout.as_millis())?;
        writeln!(f, "notification_ttl_secs: {}", self.notification_ttl.as_secs())?;
        write!(f, "offline: {}", self.offline)
    }
}
