//! Application state shared across handlers

use auth::AuthState;

use crate::{reminders::ReminderWindows, repositories::LedgerRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub ledger: LedgerRepository,
    pub reminder_windows: ReminderWindows,
}
