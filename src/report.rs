//! The emission report: a sample [`Resource`] edited concurrently
//! by multiple users.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{Patch, Resource};

/// Publication status of an [`EmissionReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Published,
}

/// A corporate carbon-footprint report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionReport {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Total emissions, in tons of CO₂.
    pub co2_total: f64,
    pub status: ReportStatus,
    pub created_at: NaiveDate,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Resource for EmissionReport {
    type Id = u64;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_last_modified(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Partial update of an [`EmissionReport`].
///
/// Identity and timestamps are not part of the patch: they are owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionReportPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Patch<EmissionReport> for EmissionReportPatch {
    fn apply_to(self, report: &mut EmissionReport) {
        if let Some(title) = self.title {
            report.title = title;
        }
        if let Some(description) = self.description {
            report.description = description;
        }
        if let Some(co2_total) = self.co2_total {
            report.co2_total = co2_total;
        }
        if let Some(status) = self.status {
            report.status = status;
        }
        if let Some(updated_by) = self.updated_by {
            report.updated_by = Some(updated_by);
        }
    }
}
