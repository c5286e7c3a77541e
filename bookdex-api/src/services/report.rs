//! Aggregation reporter: read-only summary statistics over the catalog.

use bookdex_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::books::{self, AuthorCount, RatingCount};

/// How many authors the ranking includes
pub const TOP_AUTHOR_LIMIT: i64 = 5;

/// Summary statistics over the whole catalog
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub total_books: i64,
    /// Mean rating rounded to 2 decimal places; 0 when the catalog is empty
    pub average_rating: f64,
    /// (rating, count) pairs ascending by rating
    pub rating_distribution: Vec<RatingCount>,
    /// Top authors by descending book count
    pub top_authors: Vec<AuthorCount>,
}

/// Build the full report in one pass of cheap aggregate queries.
pub async fn build_report(pool: &SqlitePool) -> Result<ReportData> {
    let total_books = books::count_books(pool).await?;
    let average_rating = books::average_rating(pool).await?.unwrap_or(0.0);
    let rating_distribution = books::rating_distribution(pool).await?;
    let top_authors = books::top_authors(pool, TOP_AUTHOR_LIMIT).await?;

    Ok(ReportData {
        total_books,
        average_rating: (average_rating * 100.0).round() / 100.0,
        rating_distribution,
        top_authors,
    })
}
