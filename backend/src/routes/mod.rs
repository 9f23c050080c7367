//! Route definitions for the Controlled Substance Tracking API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/medications", medication_routes())
        .route("/events", get(handlers::list_events))
        .nest("/reporting-periods", period_routes())
        .route("/adjustments", post(handlers::record_adjustment))
        .nest("/reports", report_routes())
}

/// Medication catalog routes
fn medication_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_medications).post(handlers::create_medication),
        )
        .route("/:code", get(handlers::get_medication))
        .route("/:code/status", put(handlers::update_medication_status))
        .route("/:code/adjustments", get(handlers::get_medication_adjustments))
        .route("/:code/stock", get(handlers::get_medication_stock))
}

/// Reporting period lifecycle routes
fn period_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_periods).post(handlers::open_period))
        .route("/current", get(handlers::get_current_period))
        .route("/:period_id/close", post(handlers::close_period))
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/bi-annual", get(handlers::get_bi_annual_report))
        .route("/bi-annual/csv", get(handlers::export_bi_annual_csv))
        .route("/current-inventory", get(handlers::get_current_inventory))
}
