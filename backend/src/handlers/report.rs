//! HTTP handlers for reporting endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::services::report::{BiAnnualReport, CurrentStockLine, ReportService};
use crate::store::PgStore;
use crate::AppState;

/// Bi-annual controlled substance report for the open period
pub async fn get_bi_annual_report(
    State(state): State<AppState>,
) -> AppResult<Json<BiAnnualReport>> {
    let service = ReportService::new(PgStore::new(state.db.clone()));
    let report = service.bi_annual().await?;
    Ok(Json(report))
}

/// Bi-annual report as a CSV download
pub async fn export_bi_annual_csv(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(PgStore::new(state.db.clone()));
    let csv = service.bi_annual_csv().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bi_annual_report.csv\"",
            ),
        ],
        csv,
    ))
}

/// Current on-hand inventory per active medication
pub async fn get_current_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CurrentStockLine>>> {
    let service = ReportService::new(PgStore::new(state.db.clone()));
    let lines = service.current_inventory().await?;
    Ok(Json(lines))
}
