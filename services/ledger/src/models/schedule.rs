//! Social-media schedule table

use chrono::{NaiveDate, NaiveTime};
use common::store::Table;
use serde::{Deserialize, Serialize};

/// A planned social-media post for a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "Post Type", default)]
    pub post_type: String,
    #[serde(rename = "Date", deserialize_with = "super::date::deserialize", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Time", deserialize_with = "super::time::deserialize", default)]
    pub time: Option<NaiveTime>,
    #[serde(rename = "Caption", default)]
    pub caption: String,
    #[serde(rename = "Asset Link", default)]
    pub asset_link: String,
}

impl Table for ScheduledPost {
    const NAME: &'static str = "schedule";
    const COLUMNS: &'static [&'static str] = &[
        "Client",
        "Platform",
        "Post Type",
        "Date",
        "Time",
        "Caption",
        "Asset Link",
    ];
}
