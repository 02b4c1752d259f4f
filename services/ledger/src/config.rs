//! Ledger service configuration

use std::env;
use std::net::SocketAddr;

use anyhow::Result;

use crate::reminders::ReminderWindows;

/// Ledger service configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Reminder tier windows
    pub reminder_windows: ReminderWindows,
}

impl LedgerConfig {
    /// Create a new LedgerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `LEDGER_BIND_ADDR`: listen address (default: "0.0.0.0:3001")
    /// - `REMINDER_URGENT_DAYS`: urgent window in days (default: 3)
    /// - `REMINDER_SOON_DAYS`: soon window in days (default: 14)
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("LEDGER_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid LEDGER_BIND_ADDR: {}", e))?;

        let defaults = ReminderWindows::default();
        let urgent_days = parse_days("REMINDER_URGENT_DAYS", defaults.urgent_days)?;
        let soon_days = parse_days("REMINDER_SOON_DAYS", defaults.soon_days)?;

        if urgent_days > soon_days {
            anyhow::bail!(
                "REMINDER_URGENT_DAYS ({}) must not exceed REMINDER_SOON_DAYS ({})",
                urgent_days,
                soon_days
            );
        }

        Ok(LedgerConfig {
            bind_addr,
            reminder_windows: ReminderWindows {
                urgent_days,
                soon_days,
            },
        })
    }
}

fn parse_days(name: &str, default: u32) -> Result<u32> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of days, got {:?}", name, value)),
        Err(_) => Ok(default),
    }
}
