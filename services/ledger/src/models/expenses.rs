//! Expenses table

use chrono::NaiveDate;
use common::store::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount", deserialize_with = "super::amount::deserialize", default)]
    pub amount: f64,
    #[serde(rename = "Date", deserialize_with = "super::date::deserialize", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Notes", default)]
    pub notes: String,
}

impl Table for Expense {
    const NAME: &'static str = "expenses";
    const COLUMNS: &'static [&'static str] = &["Category", "Amount", "Date", "Notes"];
}
