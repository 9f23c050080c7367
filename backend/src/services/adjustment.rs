//! Adjustment ledger service
//!
//! The write path owns the two conversions the rest of the system relies
//! on: the entered preferred-unit quantity becomes standard units, and the
//! event's modifier is applied exactly once, here. Ledger rows are therefore
//! always signed standard-unit amounts; readers must never re-apply the
//! modifier.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::{conversion, validate_positive_amount, Adjustment, EventKind, MedicationStatus};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Service for recording and reading ledger adjustments
#[derive(Clone)]
pub struct AdjustmentService<S> {
    store: S,
}

/// Input for recording an adjustment
#[derive(Debug, Deserialize, Validate)]
pub struct RecordAdjustmentInput {
    #[validate(length(min = 3, max = 32))]
    pub medication_code: String,
    pub event_code: EventKind,
    /// Quantity in the medication's preferred unit; always entered positive,
    /// the event modifier supplies the sign
    pub amount: Decimal,
    /// Pointer to supporting documentation (run number, invoice, witness form)
    #[validate(length(max = 128))]
    pub reference_id: Option<String>,
    /// Defaults to now when absent
    pub adjustment_date: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl<S: InventoryStore> AdjustmentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record one inventory-changing event against the open reporting period
    pub async fn record(&self, input: RecordAdjustmentInput) -> AppResult<Adjustment> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_positive_amount(input.amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let medication = self
            .store
            .medication_by_code(&input.medication_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))?;

        if medication.status != MedicationStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Medication {} is {} and cannot receive adjustments",
                medication.medication_code, medication.status
            )));
        }

        let period = super::current_open_period(&self.store).await?;

        let standard_amount =
            conversion::to_standard(input.amount, medication.preferred_unit);
        let signed_amount = standard_amount * Decimal::from(input.event_code.modifier());

        let adjustment = Adjustment {
            id: Uuid::new_v4(),
            adjustment_date: input.adjustment_date.unwrap_or_else(Utc::now),
            event_code: input.event_code,
            medication_code: medication.medication_code.clone(),
            amount: signed_amount,
            reference_id: input.reference_id,
            reporting_period_id: period.id,
            created_at: Utc::now(),
            modified_by: input.modified_by,
        };

        self.store.insert_adjustment(&adjustment).await?;

        tracing::info!(
            medication_code = %adjustment.medication_code,
            event = %adjustment.event_code,
            amount = %adjustment.amount,
            period_id = %adjustment.reporting_period_id,
            "recorded adjustment"
        );

        Ok(adjustment)
    }

    /// Ledger entries for one medication, oldest first
    pub async fn list_for_medication(&self, code: &str) -> AppResult<Vec<Adjustment>> {
        self.require_medication(code).await?;
        self.store.adjustments_for_medication(code).await
    }

    /// Current stock for one medication as the raw signed standard-unit
    /// total of its ledger. Zero when the ledger holds no entries.
    pub async fn current_stock(&self, code: &str) -> AppResult<Decimal> {
        self.require_medication(code).await?;
        Ok(self
            .store
            .sum_all(code)
            .await?
            .unwrap_or(Decimal::ZERO))
    }

    async fn require_medication(&self, code: &str) -> AppResult<()> {
        self.store
            .medication_by_code(code)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))
    }
}
