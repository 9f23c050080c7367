//! Medication catalog service
//!
//! Creation converts the entered medication amount from the preferred unit
//! to standard units before storage; everything downstream of this service
//! reads mass quantities in standard units only.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::{
    conversion, validate_concentration, validate_fill_amount, validate_medication_code,
    validate_positive_amount, Medication, MedicationStatus, Unit,
};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Service for managing tracked medications
#[derive(Clone)]
pub struct MedicationService<S> {
    store: S,
}

/// Input for creating a medication
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMedicationInput {
    #[validate(length(min = 3, max = 32))]
    pub medication_code: String,
    #[validate(length(min = 1, max = 128))]
    pub medication_name: String,
    /// Mass of active substance per container, in the preferred unit
    pub medication_amount: Decimal,
    pub preferred_unit: Unit,
    /// Volume of solvent per container, in milliliters
    pub fill_amount: Decimal,
    /// Mass per milliliter in the preferred unit; derived from
    /// medication_amount / fill_amount when absent
    pub concentration: Option<Decimal>,
    pub modified_by: Option<String>,
}

/// Input for changing a medication's status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: MedicationStatus,
    pub modified_by: Option<String>,
}

impl<S: InventoryStore> MedicationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a medication record
    pub async fn create(&self, input: CreateMedicationInput) -> AppResult<Medication> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_medication_code(&input.medication_code).map_err(|msg| AppError::Validation {
            field: "medication_code".to_string(),
            message: msg.to_string(),
        })?;
        validate_positive_amount(input.medication_amount).map_err(|msg| AppError::Validation {
            field: "medication_amount".to_string(),
            message: msg.to_string(),
        })?;
        validate_fill_amount(input.fill_amount).map_err(|msg| AppError::Validation {
            field: "fill_amount".to_string(),
            message: msg.to_string(),
        })?;
        if input.preferred_unit == Unit::Std {
            return Err(AppError::Validation {
                field: "preferred_unit".to_string(),
                message: "Preferred unit must be one of mcg, mg, g".to_string(),
            });
        }

        let concentration = input
            .concentration
            .unwrap_or_else(|| input.medication_amount / input.fill_amount);
        validate_concentration(concentration).map_err(|msg| AppError::Validation {
            field: "concentration".to_string(),
            message: msg.to_string(),
        })?;

        let now = Utc::now();
        let medication = Medication {
            id: Uuid::new_v4(),
            medication_code: input.medication_code,
            medication_name: input.medication_name,
            medication_amount: conversion::to_standard(
                input.medication_amount,
                input.preferred_unit,
            ),
            preferred_unit: input.preferred_unit,
            fill_amount: input.fill_amount,
            concentration,
            status: MedicationStatus::Active,
            created_at: now,
            updated_at: now,
            modified_by: input.modified_by,
        };

        self.store.insert_medication(&medication).await?;

        tracing::info!(
            medication_code = %medication.medication_code,
            unit = %medication.preferred_unit,
            "created medication"
        );

        Ok(medication)
    }

    /// Get a medication by its business key
    pub async fn get(&self, code: &str) -> AppResult<Medication> {
        self.store
            .medication_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))
    }

    /// List all medications, ordered by code
    pub async fn list(&self) -> AppResult<Vec<Medication>> {
        self.store.list_medications().await
    }

    /// List ACTIVE medications, ordered by code
    pub async fn list_active(&self) -> AppResult<Vec<Medication>> {
        self.store.active_medications().await
    }

    /// Change a medication's status.
    ///
    /// Discontinued is terminal: adjustments referencing the medication keep
    /// it from ever being deleted, and it must not quietly come back either.
    pub async fn set_status(&self, code: &str, input: UpdateStatusInput) -> AppResult<Medication> {
        let medication = self.get(code).await?;

        if medication.status == MedicationStatus::Discontinued {
            return Err(AppError::InvalidStateTransition(format!(
                "Medication {} is discontinued and cannot change status",
                code
            )));
        }

        self.store
            .update_medication_status(code, input.status, input.modified_by.as_deref())
            .await?;

        self.get(code).await
    }
}
