//! HTTP handlers for adjustment ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;

use shared::Adjustment;

use crate::error::AppResult;
use crate::services::adjustment::{AdjustmentService, RecordAdjustmentInput};
use crate::store::PgStore;
use crate::AppState;

/// Record an inventory adjustment
pub async fn record_adjustment(
    State(state): State<AppState>,
    Json(input): Json<RecordAdjustmentInput>,
) -> AppResult<Json<Adjustment>> {
    let service = AdjustmentService::new(PgStore::new(state.db.clone()));
    let adjustment = service.record(input).await?;
    Ok(Json(adjustment))
}

/// List adjustments for a medication
pub async fn get_medication_adjustments(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Vec<Adjustment>>> {
    let service = AdjustmentService::new(PgStore::new(state.db.clone()));
    let adjustments = service.list_for_medication(&code).await?;
    Ok(Json(adjustments))
}

/// Current stock for a medication in standard units
pub async fn get_medication_stock(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<StockResponse>> {
    let service = AdjustmentService::new(PgStore::new(state.db.clone()));
    let amount = service.current_stock(&code).await?;
    Ok(Json(StockResponse {
        medication_code: code,
        standard_amount: amount,
    }))
}

/// Response for the current stock endpoint
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub medication_code: String,
    pub standard_amount: Decimal,
}
