//! HTTP handlers for medication catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::Medication;

use crate::error::AppResult;
use crate::services::medication::{CreateMedicationInput, MedicationService, UpdateStatusInput};
use crate::store::PgStore;
use crate::AppState;

/// Create a medication
pub async fn create_medication(
    State(state): State<AppState>,
    Json(input): Json<CreateMedicationInput>,
) -> AppResult<Json<Medication>> {
    let service = MedicationService::new(PgStore::new(state.db.clone()));
    let medication = service.create(input).await?;
    Ok(Json(medication))
}

/// List all medications
pub async fn list_medications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Medication>>> {
    let service = MedicationService::new(PgStore::new(state.db.clone()));
    let medications = service.list().await?;
    Ok(Json(medications))
}

/// Get one medication by code
pub async fn get_medication(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Medication>> {
    let service = MedicationService::new(PgStore::new(state.db.clone()));
    let medication = service.get(&code).await?;
    Ok(Json(medication))
}

/// Change a medication's status
pub async fn update_medication_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<Medication>> {
    let service = MedicationService::new(PgStore::new(state.db.clone()));
    let medication = service.set_status(&code, input).await?;
    Ok(Json(medication))
}
