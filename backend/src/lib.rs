//! Controlled Substance Tracking - Backend
//!
//! Inventory tracking for EMS controlled substances: a medication catalog,
//! an append-only adjustment ledger in standard units, reporting periods,
//! and the bi-annual inventory report in milliliters.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

/// Default log filter when `RUST_LOG` is unset. Library code logs under the
/// `cst_backend` target, not the binary's name.
pub const DEFAULT_LOG_FILTER: &str = "cst_backend=debug,tower_http=debug,sqlx=warn";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Controlled Substance Tracking API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    /// Service and store logs are emitted from this library crate, so the
    /// default filter must enable the `cst_backend` target or warnings such
    /// as the multiple-open-periods one get dropped.
    #[test]
    fn test_default_log_filter_covers_library_target() {
        assert!(DEFAULT_LOG_FILTER.contains(&format!("{}=", env!("CARGO_CRATE_NAME"))));
        // The directive string itself must parse
        EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
    }
}
