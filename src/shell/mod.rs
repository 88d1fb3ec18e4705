// Composition root for the RSVP page.
//
// Responsibilities
// - Choose the record store implementation from settings.
// - Share one form controller and one feed viewer between the HTTP and GraphQL surfaces.
// - Assemble the routers served by the binary.

pub mod graphql;
pub mod http;
pub mod state;

use crate::config::Settings;
use crate::shared::infrastructure::record_store::RecordStore;
use crate::shared::infrastructure::record_store::firebase::FirebaseRecordStore;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use crate::shell::state::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn record_store(settings: &Settings) -> Arc<dyn RecordStore> {
    match &settings.database_url {
        Some(url) => {
            tracing::info!(database_url = %url, "using realtime database record store");
            Arc::new(FirebaseRecordStore::new(url.as_str()))
        }
        None => {
            tracing::warn!("RSVP_DATABASE_URL not set, records are kept in memory");
            Arc::new(InMemoryRecordStore::new())
        }
    }
}

pub fn app(settings: &Settings) -> Router {
    let state = AppState::new(record_store(settings), settings.database_path.clone());
    Router::new()
        .merge(http::router(state.clone()))
        .merge(graphql::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
