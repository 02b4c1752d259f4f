//! Payment reminder classification
//!
//! Pure functions: no I/O, no clock. Callers pass `today` explicitly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scheduled payment to remind about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReminder {
    pub description: String,
    pub due_date: NaiveDate,
    pub amount: f64,
}

/// How close a payment is to its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    /// Overdue or due within the urgent window
    Urgent,
    /// Due after the urgent window but within the soon window
    Soon,
    /// Not upcoming yet
    Normal,
}

/// Day windows for the urgency tiers, both counted from today inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderWindows {
    pub urgent_days: u32,
    pub soon_days: u32,
}

impl Default for ReminderWindows {
    fn default() -> Self {
        Self {
            urgent_days: 3,
            soon_days: 14,
        }
    }
}

impl ReminderWindows {
    /// Tier for a payment due `days_until` days from today
    ///
    /// Anything past the soon window is `Normal`, even when the urgent window
    /// is configured wider.
    pub fn classify(&self, days_until: i64) -> UrgencyTier {
        if days_until > i64::from(self.soon_days) {
            UrgencyTier::Normal
        } else if days_until <= i64::from(self.urgent_days) {
            UrgencyTier::Urgent
        } else {
            UrgencyTier::Soon
        }
    }
}

/// A reminder with its computed tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReminder {
    #[serde(flatten)]
    pub reminder: PaymentReminder,
    pub tier: UrgencyTier,
    /// Negative when overdue
    pub days_until: i64,
}

/// Classify upcoming payments
///
/// Payments beyond the soon window are left out. The result is ordered by due
/// date; payments due on the same day keep their input order.
pub fn compute_reminders(
    records: &[PaymentReminder],
    today: NaiveDate,
    windows: ReminderWindows,
) -> Vec<ClassifiedReminder> {
    let mut upcoming: Vec<ClassifiedReminder> = records
        .iter()
        .filter_map(|record| {
            let days_until = (record.due_date - today).num_days();
            match windows.classify(days_until) {
                UrgencyTier::Normal => None,
                tier => Some(ClassifiedReminder {
                    reminder: record.clone(),
                    tier,
                    days_until,
                }),
            }
        })
        .collect();

    // sort_by_key is stable
    upcoming.sort_by_key(|r| r.reminder.due_date);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(description: &str, due_date: NaiveDate) -> PaymentReminder {
        PaymentReminder {
            description: description.to_string(),
            due_date,
            amount: 100.0,
        }
    }

    fn descriptions(reminders: &[ClassifiedReminder]) -> Vec<&str> {
        reminders
            .iter()
            .map(|r| r.reminder.description.as_str())
            .collect()
    }

    #[test]
    fn test_january_scenario() {
        let records = vec![
            reminder("D", date(2024, 2, 15)),
            reminder("C", date(2024, 1, 20)),
            reminder("A", date(2024, 1, 5)),
            reminder("B", date(2024, 1, 12)),
        ];
        let windows = ReminderWindows {
            urgent_days: 3,
            soon_days: 14,
        };

        let result = compute_reminders(&records, date(2024, 1, 10), windows);

        assert_eq!(descriptions(&result), vec!["A", "B", "C"]);
        assert_eq!(result[0].tier, UrgencyTier::Urgent);
        assert_eq!(result[0].days_until, -5);
        assert_eq!(result[1].tier, UrgencyTier::Urgent);
        assert_eq!(result[1].days_until, 2);
        assert_eq!(result[2].tier, UrgencyTier::Soon);
        assert_eq!(result[2].days_until, 10);
    }

    #[test]
    fn test_window_boundaries() {
        let windows = ReminderWindows::default();

        assert_eq!(windows.classify(-30), UrgencyTier::Urgent);
        assert_eq!(windows.classify(0), UrgencyTier::Urgent);
        assert_eq!(windows.classify(3), UrgencyTier::Urgent);
        assert_eq!(windows.classify(4), UrgencyTier::Soon);
        assert_eq!(windows.classify(14), UrgencyTier::Soon);
        assert_eq!(windows.classify(15), UrgencyTier::Normal);
    }

    #[test]
    fn test_overdue_is_always_urgent() {
        let windows = ReminderWindows {
            urgent_days: 0,
            soon_days: 0,
        };
        let today = date(2024, 3, 1);
        let records = vec![
            reminder("last year", date(2023, 3, 1)),
            reminder("yesterday", date(2024, 2, 29)),
        ];

        let result = compute_reminders(&records, today, windows);
        assert!(result.iter().all(|r| r.tier == UrgencyTier::Urgent));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_equal_due_dates_keep_input_order() {
        let due = date(2024, 1, 12);
        let records = vec![
            reminder("first", due),
            reminder("earlier", date(2024, 1, 11)),
            reminder("second", due),
            reminder("third", due),
        ];

        let result =
            compute_reminders(&records, date(2024, 1, 10), ReminderWindows::default());
        assert_eq!(
            descriptions(&result),
            vec!["earlier", "first", "second", "third"]
        );
    }

    #[test]
    fn test_output_is_the_upcoming_subset() {
        let today = date(2024, 1, 10);
        let windows = ReminderWindows::default();
        let records: Vec<PaymentReminder> = (-20..40)
            .rev()
            .map(|offset| {
                reminder(&offset.to_string(), today + chrono::Duration::days(offset))
            })
            .collect();

        let result = compute_reminders(&records, today, windows);

        let expected = records
            .iter()
            .filter(|r| (r.due_date - today).num_days() <= 14)
            .count();
        assert_eq!(result.len(), expected);
        assert!(
            result
                .windows(2)
                .all(|w| w[0].reminder.due_date <= w[1].reminder.due_date)
        );
    }

    #[test]
    fn test_empty_input() {
        let result = compute_reminders(&[], date(2024, 1, 10), ReminderWindows::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_soon_window_narrower_than_urgent() {
        let windows = ReminderWindows {
            urgent_days: 7,
            soon_days: 2,
        };
        assert_eq!(windows.classify(-1), UrgencyTier::Urgent);
        assert_eq!(windows.classify(2), UrgencyTier::Urgent);
        assert_eq!(windows.classify(5), UrgencyTier::Normal);
    }
}
