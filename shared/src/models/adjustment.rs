//! Inventory adjustment (ledger) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventKind;

/// One append-only ledger entry changing a medication's recorded stock.
///
/// `amount` is always in standard units with the event's modifier already
/// applied: subtractive events are stored negative. Report code must never
/// re-apply the modifier to ledger data; the report-display convention of
/// showing subtractive totals as positive quantities is handled when
/// aggregating, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: Uuid,
    pub adjustment_date: DateTime<Utc>,
    pub event_code: EventKind,
    pub medication_code: String,
    /// Signed amount in standard units
    pub amount: Decimal,
    /// Free-text pointer to supporting documentation (run number, invoice,
    /// destruction witness form)
    pub reference_id: Option<String>,
    pub reporting_period_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
}
