//! Reporting period models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An administrative time window (nominally six months) over which
/// adjustments are aggregated for regulatory submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub id: Uuid,
    pub start_date: DateTime<Utc>,
    /// None while the period is open
    pub end_date: Option<DateTime<Utc>>,
    pub status: PeriodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_by: Option<String>,
}

/// Status of a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    Open,
    Closed,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Open => "OPEN",
            PeriodStatus::Closed => "CLOSED",
        }
    }

    pub fn from_code(code: &str) -> Option<PeriodStatus> {
        match code {
            "OPEN" => Some(PeriodStatus::Open),
            "CLOSED" => Some(PeriodStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
