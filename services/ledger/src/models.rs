//! Ledger tables and API payloads
//!
//! Each table is a typed record whose serde names are the CSV header cells,
//! so the same names appear in the JSON API.

use serde::Serialize;

pub mod clients;
pub mod expenses;
pub mod projects;
pub mod salaries;
pub mod schedule;

pub use clients::Client;
pub use expenses::Expense;
pub use projects::{NewProject, Project, ProjectStatus};
pub use salaries::{PaidStatus, Salary};
pub use schedule::ScheduledPost;

/// Response for table listings
#[derive(Debug, Serialize)]
pub struct TableResponse<T> {
    pub table: &'static str,
    pub rows: Vec<T>,
}

/// Money columns are read leniently: blank or malformed cells count as zero.
pub(crate) mod amount {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Cell {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Cell>::deserialize(deserializer)? {
            Some(Cell::Number(n)) if n.is_finite() => n,
            Some(Cell::Text(s)) => s
                .trim()
                .trim_start_matches('$')
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        })
    }
}

/// Date columns accept ISO dates as well as day-first dates. Blank or
/// unreadable cells become `None`.
pub(crate) mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};
    use tracing::warn;

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        Ok(parse(&raw))
    }

    fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        // Timestamps such as "2024-01-10 00:00:00" keep only the date part
        let day = raw.split([' ', 'T']).next().unwrap_or(raw);

        let parsed = FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(day, format).ok());
        if parsed.is_none() {
            warn!("Ignoring unreadable date cell: {}", raw);
        }
        parsed
    }

}

/// Time columns accept 24-hour and 12-hour clock times. Blank or unreadable
/// cells become `None`.
pub(crate) mod time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};
    use tracing::warn;

    const FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let parsed = FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(raw, format).ok());
        if parsed.is_none() {
            warn!("Ignoring unreadable time cell: {}", raw);
        }
        Ok(parsed)
    }
}
