//! Reporting endpoints: statistics JSON and the rating chart image.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::db::books;
use crate::services::{chart, report};
use crate::AppState;

use super::ApiError;

/// GET /api/report/
pub async fn books_report(
    State(state): State<AppState>,
) -> Result<Json<report::ReportData>, ApiError> {
    let data = report::build_report(&state.db).await?;
    Ok(Json(data))
}

/// GET /api/chart/
///
/// Renders the rating distribution as a PNG on every call. 404 when the
/// catalog holds no books.
pub async fn books_chart(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let distribution = books::rating_distribution(&state.db).await?;
    let png = chart::render_rating_chart(&distribution)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
