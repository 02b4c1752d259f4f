//! Salaries table

use chrono::NaiveDate;
use common::store::Table;
use serde::{Deserialize, Serialize};

/// Whether a salary has been paid out
///
/// Cells other than yes/no are kept as written and count as neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaidStatus {
    Yes,
    No,
    Other(String),
}

impl From<String> for PaidStatus {
    fn from(value: String) -> Self {
        let cell = value.trim();
        if cell.eq_ignore_ascii_case("yes") {
            PaidStatus::Yes
        } else if cell.eq_ignore_ascii_case("no") {
            PaidStatus::No
        } else {
            PaidStatus::Other(value)
        }
    }
}

impl From<PaidStatus> for String {
    fn from(status: PaidStatus) -> Self {
        match status {
            PaidStatus::Yes => "Yes".to_string(),
            PaidStatus::No => "No".to_string(),
            PaidStatus::Other(value) => value,
        }
    }
}

/// A salary payment owed to an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Role", default)]
    pub role: String,
    #[serde(rename = "Salary", deserialize_with = "super::amount::deserialize", default)]
    pub amount: f64,
    #[serde(rename = "Paid")]
    pub paid: PaidStatus,
    #[serde(rename = "Date", deserialize_with = "super::date::deserialize", default)]
    pub date: Option<NaiveDate>,
}

impl Salary {
    pub fn is_paid(&self) -> bool {
        self.paid == PaidStatus::Yes
    }

    pub fn is_unpaid(&self) -> bool {
        self.paid == PaidStatus::No
    }
}

impl Table for Salary {
    const NAME: &'static str = "salaries";
    const COLUMNS: &'static [&'static str] = &["Employee", "Role", "Salary", "Paid", "Date"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_cells_are_lenient() {
        assert_eq!(PaidStatus::from(" yes ".to_string()), PaidStatus::Yes);
        assert_eq!(PaidStatus::from("NO".to_string()), PaidStatus::No);
        assert_eq!(
            PaidStatus::from("partly".to_string()),
            PaidStatus::Other("partly".to_string())
        );

        let salary = Salary {
            employee: "New".to_string(),
            role: String::new(),
            amount: 0.0,
            paid: PaidStatus::from(String::new()),
            date: None,
        };
        assert!(!salary.is_paid());
        assert!(!salary.is_unpaid());
    }
}
