//! HTTP API handlers for bookdex-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookdex_common::Error;
use serde_json::json;

pub mod books;
pub mod health;
pub mod ingest;
pub mod report;
pub mod ui;

pub use books::{create_book, delete_book, get_book, list_books, patch_book, put_book};
pub use health::health_routes;
pub use ingest::fetch_book_info;
pub use report::{books_chart, books_report};
pub use ui::serve_dashboard;

/// Boundary error: maps the shared taxonomy onto HTTP statuses with a
/// JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) | Error::NoData => StatusCode::NOT_FOUND,
            Error::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateIsbn(_) => StatusCode::CONFLICT,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
