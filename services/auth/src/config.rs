//! Authentication configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use chrono::Duration;
use common::store::StoreConfig;

use crate::models::CredentialRecord;
use crate::rate_limiter::RateLimiterConfig;
use crate::session::DEFAULT_IDLE_TIMEOUT_SECONDS;

/// Longest accepted idle timeout (one day)
const MAX_IDLE_TIMEOUT_SECONDS: i64 = 86_400;

/// Longest accepted throttle window or ban (30 days)
const MAX_THROTTLE_SECONDS: u64 = 30 * 86_400;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path of the credential table
    pub credentials_file: PathBuf,
    /// Idle timeout in seconds (default: 15 minutes)
    pub idle_timeout_seconds: i64,
    /// Failed-login throttle, disabled when `None`
    pub login_throttle: Option<RateLimiterConfig>,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTH_CREDENTIALS_FILE`: credential table (default: `<data dir>/users.csv`)
    /// - `AUTH_IDLE_TIMEOUT_SECONDS`: idle timeout in seconds (default: 900)
    /// - `AUTH_LOGIN_MAX_ATTEMPTS`: failed logins before a ban; unset disables the throttle
    /// - `AUTH_LOGIN_WINDOW_SECONDS`: window for counting failures (default: 300)
    /// - `AUTH_LOGIN_BAN_SECONDS`: ban duration (default: 900)
    pub fn from_env(store: &StoreConfig) -> Result<Self> {
        let credentials_file = env::var("AUTH_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| store.table_path::<CredentialRecord>());

        let idle_timeout_seconds = parse_var(
            "AUTH_IDLE_TIMEOUT_SECONDS",
            DEFAULT_IDLE_TIMEOUT_SECONDS,
        )?;
        if !(1..=MAX_IDLE_TIMEOUT_SECONDS).contains(&idle_timeout_seconds) {
            anyhow::bail!(
                "AUTH_IDLE_TIMEOUT_SECONDS must be between 1 and {}",
                MAX_IDLE_TIMEOUT_SECONDS
            );
        }

        let login_throttle = match env::var("AUTH_LOGIN_MAX_ATTEMPTS") {
            Ok(_) => {
                let max_attempts: u32 = parse_var("AUTH_LOGIN_MAX_ATTEMPTS", 0)?;
                if max_attempts == 0 {
                    anyhow::bail!("AUTH_LOGIN_MAX_ATTEMPTS must be at least 1");
                }

                let defaults = RateLimiterConfig::default();
                let window_seconds =
                    parse_var("AUTH_LOGIN_WINDOW_SECONDS", defaults.window_seconds)?;
                let ban_duration_seconds =
                    parse_var("AUTH_LOGIN_BAN_SECONDS", defaults.ban_duration_seconds)?;
                if window_seconds > MAX_THROTTLE_SECONDS || ban_duration_seconds > MAX_THROTTLE_SECONDS
                {
                    anyhow::bail!(
                        "AUTH_LOGIN_WINDOW_SECONDS and AUTH_LOGIN_BAN_SECONDS must not exceed {}",
                        MAX_THROTTLE_SECONDS
                    );
                }

                Some(RateLimiterConfig {
                    max_attempts,
                    window_seconds,
                    ban_duration_seconds,
                })
            }
            Err(_) => None,
        };

        Ok(AuthConfig {
            credentials_file,
            idle_timeout_seconds,
            login_throttle,
        })
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::seconds(self.idle_timeout_seconds)
    }
}

/// Read a numeric variable, falling back to `default` only when it is unset
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a number, got {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "AUTH_CREDENTIALS_FILE",
        "AUTH_IDLE_TIMEOUT_SECONDS",
        "AUTH_LOGIN_MAX_ATTEMPTS",
        "AUTH_LOGIN_WINDOW_SECONDS",
        "AUTH_LOGIN_BAN_SECONDS",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    fn store() -> StoreConfig {
        StoreConfig {
            data_dir: PathBuf::from("/srv/studio"),
        }
    }

    #[test]
    #[serial]
    fn test_auth_config_defaults() {
        clear_env();

        let config = AuthConfig::from_env(&store()).unwrap();
        assert_eq!(
            config.credentials_file,
            PathBuf::from("/srv/studio/users.csv")
        );
        assert_eq!(config.idle_timeout(), Duration::minutes(15));
        assert!(config.login_throttle.is_none());
    }

    #[test]
    #[serial]
    fn test_auth_config_with_custom_values() {
        clear_env();
        unsafe {
            env::set_var("AUTH_CREDENTIALS_FILE", "/etc/studio/users.csv");
            env::set_var("AUTH_IDLE_TIMEOUT_SECONDS", "60");
            env::set_var("AUTH_LOGIN_MAX_ATTEMPTS", "3");
            env::set_var("AUTH_LOGIN_BAN_SECONDS", "120");
        }

        let config = AuthConfig::from_env(&store()).unwrap();
        assert_eq!(
            config.credentials_file,
            PathBuf::from("/etc/studio/users.csv")
        );
        assert_eq!(config.idle_timeout_seconds, 60);
        assert_eq!(
            config.login_throttle,
            Some(RateLimiterConfig {
                max_attempts: 3,
                window_seconds: 300,
                ban_duration_seconds: 120,
            })
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_rejects_bad_values() {
        clear_env();
        unsafe {
            env::set_var("AUTH_IDLE_TIMEOUT_SECONDS", "0");
        }
        assert!(AuthConfig::from_env(&store()).is_err());

        clear_env();
        unsafe {
            env::set_var("AUTH_LOGIN_MAX_ATTEMPTS", "many");
        }
        assert!(AuthConfig::from_env(&store()).is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_rejects_unparseable_and_huge_values() {
        for (var, value) in [
            ("AUTH_IDLE_TIMEOUT_SECONDS", "fifteen"),
            ("AUTH_IDLE_TIMEOUT_SECONDS", "9223372036854775807"),
        ] {
            clear_env();
            unsafe {
                env::set_var(var, value);
            }
            assert!(AuthConfig::from_env(&store()).is_err(), "{}={}", var, value);
        }

        for (var, value) in [
            ("AUTH_LOGIN_WINDOW_SECONDS", "soon"),
            ("AUTH_LOGIN_BAN_SECONDS", "18446744073709551615"),
        ] {
            clear_env();
            unsafe {
                env::set_var("AUTH_LOGIN_MAX_ATTEMPTS", "3");
                env::set_var(var, value);
            }
            assert!(AuthConfig::from_env(&store()).is_err(), "{}={}", var, value);
        }

        clear_env();
    }
}
