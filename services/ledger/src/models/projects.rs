//! Projects table

use chrono::NaiveDate;
use common::store::Table;
use serde::{Deserialize, Serialize};

/// Delivery status of a project
///
/// Cells outside the known labels are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    Completed,
    Other(String),
}

impl ProjectStatus {
    pub fn label(&self) -> &str {
        match self {
            ProjectStatus::NotStarted => "Not started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Other(value) => value,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "not started" => ProjectStatus::NotStarted,
            "in progress" => ProjectStatus::InProgress,
            "completed" => ProjectStatus::Completed,
            _ => ProjectStatus::Other(value),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Other(value) => value,
            known => known.label().to_string(),
        }
    }
}

/// A client project with its fee breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Project")]
    pub name: String,
    #[serde(rename = "Employee", default)]
    pub employee: String,
    #[serde(rename = "Base Fee", deserialize_with = "super::amount::deserialize", default)]
    pub base_fee: f64,
    #[serde(rename = "Social Boost", deserialize_with = "super::amount::deserialize", default)]
    pub social_boost: f64,
    #[serde(rename = "TVC", deserialize_with = "super::amount::deserialize", default)]
    pub tvc: f64,
    #[serde(rename = "Other", deserialize_with = "super::amount::deserialize", default)]
    pub other: f64,
    #[serde(rename = "Total", deserialize_with = "super::amount::deserialize", default)]
    pub total: f64,
    #[serde(rename = "Status")]
    pub status: ProjectStatus,
    #[serde(rename = "Deadline", deserialize_with = "super::date::deserialize", default)]
    pub deadline: Option<NaiveDate>,
}

impl Table for Project {
    const NAME: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "Client",
        "Project",
        "Employee",
        "Base Fee",
        "Social Boost",
        "TVC",
        "Other",
        "Total",
        "Status",
        "Deadline",
    ];
}

/// New project payload; the total is derived from the fee components
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub client: String,
    pub project: String,
    #[serde(default)]
    pub employee: String,
    #[serde(default)]
    pub base_fee: f64,
    #[serde(default)]
    pub social_boost: f64,
    #[serde(default)]
    pub tvc: f64,
    #[serde(default)]
    pub other: f64,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
}

impl NewProject {
    /// Validate the fees and build the table row
    pub fn into_project(self) -> Result<Project, String> {
        let fees = [self.base_fee, self.social_boost, self.tvc, self.other];
        if fees.iter().any(|fee| !fee.is_finite() || *fee < 0.0) {
            return Err("Fees must be non-negative amounts".to_string());
        }
        if self.project.trim().is_empty() {
            return Err("Project name is required".to_string());
        }
        if let ProjectStatus::Other(status) = &self.status {
            return Err(format!("Unknown project status: {}", status));
        }

        Ok(Project {
            client: self.client,
            name: self.project,
            employee: self.employee,
            base_fee: self.base_fee,
            social_boost: self.social_boost,
            tvc: self.tvc,
            other: self.other,
            total: fees.iter().sum(),
            status: self.status,
            deadline: self.deadline,
        })
    }
}
