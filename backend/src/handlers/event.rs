//! HTTP handlers for the inventory event catalog

use axum::{extract::State, Json};

use shared::Event;

use crate::error::AppResult;
use crate::store::{InventoryStore, PgStore};
use crate::AppState;

/// List the inventory event catalog
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    let store = PgStore::new(state.db.clone());
    let events = store.list_events().await?;
    Ok(Json(events))
}
