//! CRUD handlers for book records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::books::{self, Book, BookFilter, BookPatch, NewBook};
use crate::AppState;

use super::ApiError;

/// Full book representation, with the derived is_recent field
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub rating: i64,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub is_recent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let is_recent = book.is_recent();
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            published_date: book.published_date,
            rating: book.rating,
            isbn: book.isbn,
            description: book.description,
            page_count: book.page_count,
            thumbnail_url: book.thumbnail_url,
            is_recent,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// Lightweight representation for listings
#[derive(Debug, Serialize)]
pub struct BookListItem {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub rating: i64,
    pub published_date: NaiveDate,
    pub is_recent: bool,
}

impl From<Book> for BookListItem {
    fn from(book: Book) -> Self {
        let is_recent = book.is_recent();
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            rating: book.rating,
            published_date: book.published_date,
            is_recent,
        }
    }
}

/// GET /api/books/
///
/// Optional filters: `author` (case-insensitive substring) and `rating`
/// (exact match). Newest first.
pub async fn list_books(
    State(state): State<AppState>,
    Query(filter): Query<BookFilter>,
) -> Result<Json<Vec<BookListItem>>, ApiError> {
    let items = books::list_books(&state.db, &filter)
        .await?
        .into_iter()
        .map(BookListItem::from)
        .collect();
    Ok(Json(items))
}

/// POST /api/books/
pub async fn create_book(
    State(state): State<AppState>,
    Json(new): Json<NewBook>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = books::insert_book(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// GET /api/books/:id/
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = books::get_book(&state.db, id).await?;
    Ok(Json(book.into()))
}

/// PUT /api/books/:id/ — full update, every required field present
pub async fn put_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new): Json<NewBook>,
) -> Result<Json<BookResponse>, ApiError> {
    let patch = BookPatch {
        title: Some(new.title),
        author: Some(new.author),
        published_date: Some(new.published_date),
        rating: Some(new.rating),
        isbn: Some(new.isbn),
        description: Some(new.description),
        page_count: Some(new.page_count),
        thumbnail_url: Some(new.thumbnail_url),
    };
    let book = books::update_book(&state.db, id, &patch).await?;
    Ok(Json(book.into()))
}

/// PATCH /api/books/:id/ — partial update
pub async fn patch_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = books::update_book(&state.db, id, &patch).await?;
    Ok(Json(book.into()))
}

/// DELETE /api/books/:id/
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    books::delete_book(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
