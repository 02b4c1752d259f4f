//! Failed-login throttle
//!
//! Disabled unless configured. Counts failed logins per username within a
//! window and bans the username for a while once the limit is reached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Failed attempts allowed within the window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,       // 5 minutes
            ban_duration_seconds: 900, // 15 minutes
        }
    }
}

/// Rate limiter entry
#[derive(Debug)]
struct RateLimiterEntry {
    /// Number of failed attempts in the current window
    failures: u32,
    /// Last failed attempt time
    last_failure: Instant,
    /// Ban expiration time
    ban_expires: Option<Instant>,
}

/// Login throttle keyed by username
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether `key` may attempt a login
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let Some(entry) = entries.get(key) else {
            return true;
        };

        if let Some(ban_expires) = entry.ban_expires {
            if now >= ban_expires {
                entries.remove(key);
                return true;
            }
            return false;
        }

        true
    }

    /// Record a failed login for `key`
    pub async fn record_failure(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            failures: 0,
            last_failure: now,
            ban_expires: None,
        });

        // Window expired, start counting again
        if now.duration_since(entry.last_failure) >= Duration::from_secs(self.config.window_seconds)
        {
            entry.failures = 0;
        }

        entry.failures += 1;
        entry.last_failure = now;

        if entry.failures >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                "Banned login for {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
        }
    }

    /// Drop entries with no active ban whose failure window has passed
    ///
    /// Returns the number of entries removed.
    pub async fn purge_stale(&self, now: Instant) -> usize {
        let window = Duration::from_secs(self.config.window_seconds);
        let mut entries = self.entries.lock().await;
        let before = entries.len();

        entries.retain(|_, entry| match entry.ban_expires {
            Some(ban_expires) => now < ban_expires,
            None => now.saturating_duration_since(entry.last_failure) < window,
        });

        before - entries.len()
    }

    /// Forget failures for `key` after a successful login
    pub async fn record_success(&self, key: &str) {
        if self.entries.lock().await.remove(key).is_some() {
            info!("Cleared failed login attempts for {}", key);
        }
    }
}
