//! Medication models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Unit;

/// A tracked controlled substance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    /// Unique, stable business key (e.g., "FENTANYL-100")
    pub medication_code: String,
    pub medication_name: String,
    /// Mass of active substance per container at creation time, already
    /// converted to standard units.
    pub medication_amount: Decimal,
    pub preferred_unit: Unit,
    /// Volume of solvent per container, in milliliters
    pub fill_amount: Decimal,
    /// Mass of active substance per milliliter, in the preferred unit.
    /// Always positive; it is a divisor in volume conversion.
    pub concentration: Decimal,
    pub status: MedicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_by: Option<String>,
}

/// Lifecycle status of a medication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicationStatus {
    Active,
    Inactive,
    Discontinued,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Active => "ACTIVE",
            MedicationStatus::Inactive => "INACTIVE",
            MedicationStatus::Discontinued => "DISCONTINUED",
        }
    }

    pub fn from_code(code: &str) -> Option<MedicationStatus> {
        match code {
            "ACTIVE" => Some(MedicationStatus::Active),
            "INACTIVE" => Some(MedicationStatus::Inactive),
            "DISCONTINUED" => Some(MedicationStatus::Discontinued),
            _ => None,
        }
    }
}

impl std::fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
