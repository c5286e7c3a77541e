//! bookdex-api library - catalog management service
//!
//! CRUD over book records, metadata ingestion from an external lookup
//! service, aggregate reporting, and chart rendering.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod services;
pub mod validation;

use services::lookup::MetadataLookupProvider;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Metadata lookup provider for the ingestion path
    pub lookup: Arc<dyn MetadataLookupProvider>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, lookup: Arc<dyn MetadataLookupProvider>) -> Self {
        Self { db, lookup }
    }
}

/// Build application router
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route(
            "/api/books/",
            get(api::list_books).post(api::create_book),
        )
        .route(
            "/api/books/:id/",
            get(api::get_book)
                .put(api::put_book)
                .patch(api::patch_book)
                .delete(api::delete_book),
        )
        .route("/api/fetch-book-info/:title/", get(api::fetch_book_info))
        .route("/api/report/", get(api::books_report))
        .route("/api/chart/", get(api::books_chart))
        .route("/", get(api::serve_dashboard))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// CORS policy from configuration: an explicit origin list, or permissive
/// when none is configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
