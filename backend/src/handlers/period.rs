//! HTTP handlers for reporting period endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::ReportingPeriod;

use crate::error::AppResult;
use crate::services::period::{ClosePeriodInput, OpenPeriodInput, PeriodService};
use crate::store::PgStore;
use crate::AppState;

/// Open a reporting period
pub async fn open_period(
    State(state): State<AppState>,
    Json(input): Json<OpenPeriodInput>,
) -> AppResult<Json<ReportingPeriod>> {
    let service = PeriodService::new(PgStore::new(state.db.clone()));
    let period = service.open(input).await?;
    Ok(Json(period))
}

/// Close a reporting period
pub async fn close_period(
    State(state): State<AppState>,
    Path(period_id): Path<Uuid>,
    Json(input): Json<ClosePeriodInput>,
) -> AppResult<Json<ReportingPeriod>> {
    let service = PeriodService::new(PgStore::new(state.db.clone()));
    let period = service.close(period_id, input).await?;
    Ok(Json(period))
}

/// Get the currently open reporting period
pub async fn get_current_period(
    State(state): State<AppState>,
) -> AppResult<Json<ReportingPeriod>> {
    let service = PeriodService::new(PgStore::new(state.db.clone()));
    let period = service.current_open().await?;
    Ok(Json(period))
}

/// List all reporting periods
pub async fn list_periods(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReportingPeriod>>> {
    let service = PeriodService::new(PgStore::new(state.db.clone()));
    let periods = service.list().await?;
    Ok(Json(periods))
}
