//! Common library for the studio ledger
//!
//! This crate provides shared functionality used across the services of the
//! studio ledger, mainly the CSV-backed table store and its error type.

pub mod error;
pub mod store;

/// Example usage of the store module
///
/// ```rust,no_run
/// use common::store::{StoreConfig, Table, load_table, health_check};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Expense {
///     #[serde(rename = "Category")]
///     category: String,
///     #[serde(rename = "Amount")]
///     amount: f64,
/// }
///
/// impl Table for Expense {
///     const NAME: &'static str = "expenses";
///     const COLUMNS: &'static [&'static str] = &["Category", "Amount"];
/// }
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StoreConfig::from_env()?;
///     health_check(&config)?;
///     let expenses: Vec<Expense> = load_table(&config.table_path::<Expense>())?;
///     println!("{} expenses", expenses.len());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
