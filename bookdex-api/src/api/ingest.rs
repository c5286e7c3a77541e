//! Ingestion endpoint: fetch book metadata by title, optionally saving it.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::services::ingest::{self, IngestOutcome};
use crate::AppState;

use super::ApiError;

/// Query parameters for the ingestion endpoint
#[derive(Debug, Default, Deserialize)]
pub struct FetchQuery {
    /// "true" (any casing) enables the optional save step
    #[serde(default)]
    pub save: Option<String>,
}

impl FetchQuery {
    fn save_requested(&self) -> bool {
        self.save
            .as_deref()
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// GET /api/fetch-book-info/:title/?save=true|false
///
/// 404 when the upstream has no match, 503 when it is unreachable. Save
/// failures never fail the request; they appear as a `save_error` note in
/// the outcome body.
pub async fn fetch_book_info(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<IngestOutcome>, ApiError> {
    let outcome = ingest::fetch_and_store(
        &state.db,
        state.lookup.as_ref(),
        &title,
        query.save_requested(),
    )
    .await?;
    Ok(Json(outcome))
}
