//! Business services for the Controlled Substance Tracking backend

pub mod adjustment;
pub mod medication;
pub mod period;
pub mod report;

pub use adjustment::AdjustmentService;
pub use medication::MedicationService;
pub use period::PeriodService;
pub use report::ReportService;

use shared::ReportingPeriod;

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Locate the reporting period adjustments and reports run against.
///
/// Exactly one OPEN period is expected; the write path enforces that, but
/// the invariant is convention in the storage layer, so tolerate violations
/// here by taking the most recent OPEN period and flagging the rest.
pub(crate) async fn current_open_period<S: InventoryStore>(
    store: &S,
) -> AppResult<ReportingPeriod> {
    let mut open = store.open_reporting_periods().await?;
    if open.len() > 1 {
        tracing::warn!(
            count = open.len(),
            "multiple reporting periods are open; using the most recent"
        );
    }
    open.pop().ok_or(AppError::NoOpenReportingPeriod)
}
