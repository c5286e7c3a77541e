//! Dashboard page
//!
//! Serves the embedded HTML dashboard showing recent books, summary
//! statistics, and the rating chart.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// GET /
pub async fn serve_dashboard() -> Html<&'static str> {
    Html(INDEX_HTML)
}
