//! Dashboard aggregates over the ledger tables

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Client, Expense, Project, ProjectStatus, Salary};
use crate::reminders::PaymentReminder;
use crate::repositories::LedgerSnapshot;

/// Overview metrics shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub income: f64,
    pub outstanding: f64,
    /// Recorded expenses plus paid salaries
    pub expenses: f64,
    pub paid_salaries: f64,
    pub unpaid_salaries: f64,
    pub money_left: f64,
}

impl OverviewMetrics {
    pub fn compute(clients: &[Client], salaries: &[Salary], expenses: &[Expense]) -> Self {
        let income: f64 = clients.iter().map(|c| c.total_paid).sum();
        let outstanding: f64 = clients.iter().map(|c| c.total_due).sum();

        // Rows marked neither Yes nor No count in neither total
        let paid_salaries: f64 = salaries.iter().filter(|s| s.is_paid()).map(|s| s.amount).sum();
        let unpaid_salaries: f64 = salaries
            .iter()
            .filter(|s| s.is_unpaid())
            .map(|s| s.amount)
            .sum();

        let total_expenses = expenses.iter().map(|e| e.amount).sum::<f64>() + paid_salaries;

        Self {
            income,
            outstanding,
            expenses: total_expenses,
            paid_salaries,
            unpaid_salaries,
            money_left: income - total_expenses,
        }
    }
}

/// Aggregates behind the analytics charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub income: f64,
    pub expenses: f64,
    pub expense_breakdown: BTreeMap<String, f64>,
    pub project_status: BTreeMap<String, usize>,
}

impl Analytics {
    pub fn compute(snapshot: &LedgerSnapshot) -> Self {
        let metrics =
            OverviewMetrics::compute(&snapshot.clients, &snapshot.salaries, &snapshot.expenses);

        let mut expense_breakdown = BTreeMap::new();
        for expense in &snapshot.expenses {
            *expense_breakdown
                .entry(expense.category.clone())
                .or_insert(0.0) += expense.amount;
        }

        let mut project_status = BTreeMap::new();
        for project in &snapshot.projects {
            let label = project.status.label().trim();
            if !label.is_empty() {
                *project_status.entry(label.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            income: metrics.income,
            expenses: metrics.expenses,
            expense_breakdown,
            project_status,
        }
    }
}

/// Payments the studio still has to make or collect
///
/// Salaries marked unpaid are due on their date; open projects are due on
/// their deadline for their total. Rows without a date are skipped.
pub fn payment_reminders(salaries: &[Salary], projects: &[Project]) -> Vec<PaymentReminder> {
    let salary_reminders = salaries
        .iter()
        .filter(|s| s.is_unpaid())
        .filter_map(|s| {
            s.date.map(|due_date| PaymentReminder {
                description: if s.role.is_empty() {
                    format!("Salary: {}", s.employee)
                } else {
                    format!("Salary: {} ({})", s.employee, s.role)
                },
                due_date,
                amount: s.amount,
            })
        });

    let project_reminders = projects
        .iter()
        .filter(|p| p.status != ProjectStatus::Completed)
        .filter_map(|p| {
            p.deadline.map(|due_date| PaymentReminder {
                description: format!("Project: {} / {}", p.client, p.name),
                due_date,
                amount: p.total,
            })
        });

    salary_reminders.chain(project_reminders).collect()
}
