//! Persistence gateway for the controlled-substance ledger
//!
//! The core services and reports depend on this trait rather than on a
//! concrete database, so the report engine can be driven by a fake store in
//! tests. `PgStore` is the production implementation; `MemStore` backs tests
//! and local experimentation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{Adjustment, Event, EventKind, Medication, MedicationStatus, ReportingPeriod};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Storage operations the core depends on.
///
/// Finder methods are exact-match queries; listing methods document their
/// ordering because the report semantics rely on it.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // Medications
    async fn insert_medication(&self, medication: &Medication) -> AppResult<()>;
    async fn medication_by_code(&self, code: &str) -> AppResult<Option<Medication>>;
    /// All medications, ordered by medication_code
    async fn list_medications(&self) -> AppResult<Vec<Medication>>;
    /// Medications with status ACTIVE, ordered by medication_code
    async fn active_medications(&self) -> AppResult<Vec<Medication>>;
    async fn update_medication_status(
        &self,
        code: &str,
        status: MedicationStatus,
        modified_by: Option<&str>,
    ) -> AppResult<()>;

    // Event catalog
    async fn list_events(&self) -> AppResult<Vec<Event>>;

    // Reporting periods
    async fn insert_reporting_period(&self, period: &ReportingPeriod) -> AppResult<()>;
    async fn reporting_period(&self, id: Uuid) -> AppResult<Option<ReportingPeriod>>;
    /// Periods with status OPEN, ordered ascending by start_date
    async fn open_reporting_periods(&self) -> AppResult<Vec<ReportingPeriod>>;
    /// All periods, ordered ascending by start_date
    async fn list_reporting_periods(&self) -> AppResult<Vec<ReportingPeriod>>;
    async fn close_reporting_period(
        &self,
        id: Uuid,
        end_date: DateTime<Utc>,
        modified_by: Option<&str>,
    ) -> AppResult<()>;

    // Adjustment ledger
    async fn insert_adjustment(&self, adjustment: &Adjustment) -> AppResult<()>;
    /// Ledger entries for one medication, ordered by adjustment_date
    async fn adjustments_for_medication(&self, code: &str) -> AppResult<Vec<Adjustment>>;
    /// Sum of signed ledger amounts for one medication, event, and period.
    /// Returns `None` when no matching rows exist, so callers can tell
    /// "no data" apart from a zero balance.
    async fn sum_for_event(
        &self,
        code: &str,
        event: EventKind,
        period_id: Uuid,
    ) -> AppResult<Option<Decimal>>;
    /// Sum of all signed ledger amounts for one medication across every
    /// event and period. `None` when the medication has no ledger entries.
    async fn sum_all(&self, code: &str) -> AppResult<Option<Decimal>>;
}
