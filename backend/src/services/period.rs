//! Reporting period lifecycle service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use shared::{PeriodStatus, ReportingPeriod};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Service for opening and closing reporting periods
#[derive(Clone)]
pub struct PeriodService<S> {
    store: S,
}

/// Input for opening a reporting period
#[derive(Debug, Default, Deserialize)]
pub struct OpenPeriodInput {
    /// Defaults to now when absent
    pub start_date: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

/// Input for closing a reporting period
#[derive(Debug, Default, Deserialize)]
pub struct ClosePeriodInput {
    /// Defaults to now when absent
    pub end_date: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl<S: InventoryStore> PeriodService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open a new reporting period. At most one period may be open at a
    /// time; this guard is the write-time enforcement of that invariant.
    pub async fn open(&self, input: OpenPeriodInput) -> AppResult<ReportingPeriod> {
        let already_open = self.store.open_reporting_periods().await?;
        if !already_open.is_empty() {
            return Err(AppError::Conflict {
                resource: "reporting_period".to_string(),
                message: "A reporting period is already open; close it first".to_string(),
            });
        }

        let now = Utc::now();
        let period = ReportingPeriod {
            id: Uuid::new_v4(),
            start_date: input.start_date.unwrap_or(now),
            end_date: None,
            status: PeriodStatus::Open,
            created_at: now,
            updated_at: now,
            modified_by: input.modified_by,
        };

        self.store.insert_reporting_period(&period).await?;

        tracing::info!(period_id = %period.id, start_date = %period.start_date, "opened reporting period");

        Ok(period)
    }

    /// Close a reporting period by stamping its end date
    pub async fn close(&self, id: Uuid, input: ClosePeriodInput) -> AppResult<ReportingPeriod> {
        let period = self
            .store
            .reporting_period(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reporting period".to_string()))?;

        if period.status == PeriodStatus::Closed {
            return Err(AppError::InvalidStateTransition(format!(
                "Reporting period {} is already closed",
                id
            )));
        }

        let end_date = input.end_date.unwrap_or_else(Utc::now);
        if end_date < period.start_date {
            return Err(AppError::Validation {
                field: "end_date".to_string(),
                message: "End date must not precede the period's start date".to_string(),
            });
        }

        self.store
            .close_reporting_period(id, end_date, input.modified_by.as_deref())
            .await?;

        tracing::info!(period_id = %id, end_date = %end_date, "closed reporting period");

        self.store
            .reporting_period(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reporting period".to_string()))
    }

    /// The period new adjustments and reports attach to
    pub async fn current_open(&self) -> AppResult<ReportingPeriod> {
        super::current_open_period(&self.store).await
    }

    /// All periods, ascending by start date
    pub async fn list(&self) -> AppResult<Vec<ReportingPeriod>> {
        self.store.list_reporting_periods().await
    }
}
