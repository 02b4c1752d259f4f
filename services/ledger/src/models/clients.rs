//! Clients table

use common::store::Table;
use serde::{Deserialize, Serialize};

/// A studio client and its running balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "Client")]
    pub name: String,
    #[serde(rename = "Contact", default)]
    pub contact: String,
    #[serde(rename = "Total Paid", deserialize_with = "super::amount::deserialize", default)]
    pub total_paid: f64,
    #[serde(rename = "Total Due", deserialize_with = "super::amount::deserialize", default)]
    pub total_due: f64,
}

impl Table for Client {
    const NAME: &'static str = "clients";
    const COLUMNS: &'static [&'static str] = &["Client", "Contact", "Total Paid", "Total Due"];
}
