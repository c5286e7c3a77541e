//! Book row operations: CRUD, filtered listing, and aggregation queries.

use bookdex_common::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Pool, Sqlite};
use tracing::debug;

use crate::validation;

/// Earliest publication date considered "recent"
const RECENT_CUTOFF: (i32, u32, u32) = (2020, 1, 1);

/// A persisted book record
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub rating: i64,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Derived on read, never stored
    pub fn is_recent(&self) -> bool {
        let (y, m, d) = RECENT_CUTOFF;
        NaiveDate::from_ymd_opt(y, m, d)
            .map(|cutoff| self.published_date >= cutoff)
            .unwrap_or(false)
    }
}

/// Fields for creating a book
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub rating: i64,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Partial update. Absent fields are left unchanged; an explicit JSON null
/// clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub rating: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub page_count: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail_url: Option<Option<String>>,
}

/// Distinguishes "field absent" (outer None) from "field set to null"
/// (Some(None)) when deserializing a patch body.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    /// Case-insensitive substring match on author
    pub author: Option<String>,
    /// Exact rating match
    pub rating: Option<i64>,
}

/// One (rating, count) pair of the rating distribution
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RatingCount {
    pub rating: i64,
    pub count: i64,
}

/// One entry of the top-authors ranking
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub book_count: i64,
}

/// Insert a new book after field validation.
///
/// A UNIQUE violation on isbn maps to `Error::DuplicateIsbn`.
pub async fn insert_book(pool: &Pool<Sqlite>, new: &NewBook) -> Result<Book> {
    validation::validate_fields(
        new.rating,
        new.published_date,
        new.page_count,
    )?;

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO books
            (title, author, published_date, rating, isbn, description,
             page_count, thumbnail_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.title)
    .bind(&new.author)
    .bind(new.published_date)
    .bind(new.rating)
    .bind(&new.isbn)
    .bind(&new.description)
    .bind(new.page_count)
    .bind(&new.thumbnail_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, new.isbn.as_deref()))?;

    let id = result.last_insert_rowid();
    debug!(id, title = %new.title, "Inserted book");

    get_book(pool, id).await
}

fn map_unique_violation(e: sqlx::Error, isbn: Option<&str>) -> Error {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::DuplicateIsbn(isbn.unwrap_or_default().to_string())
        }
        _ => Error::Database(e),
    }
}

/// Fetch one book by id
pub async fn get_book(pool: &Pool<Sqlite>, id: i64) -> Result<Book> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Book {} not found", id)))
}

/// Apply a partial update and refresh updated_at.
///
/// The merged record is re-validated before the write, so a patch can
/// never leave a row violating the field invariants.
pub async fn update_book(pool: &Pool<Sqlite>, id: i64, patch: &BookPatch) -> Result<Book> {
    let mut book = get_book(pool, id).await?;

    if let Some(title) = &patch.title {
        book.title = title.clone();
    }
    if let Some(author) = &patch.author {
        book.author = author.clone();
    }
    if let Some(date) = patch.published_date {
        book.published_date = date;
    }
    if let Some(rating) = patch.rating {
        book.rating = rating;
    }
    if let Some(isbn) = &patch.isbn {
        book.isbn = isbn.clone();
    }
    if let Some(description) = &patch.description {
        book.description = description.clone();
    }
    if let Some(page_count) = patch.page_count {
        book.page_count = page_count;
    }
    if let Some(thumbnail_url) = &patch.thumbnail_url {
        book.thumbnail_url = thumbnail_url.clone();
    }

    validation::validate_fields(book.rating, book.published_date, book.page_count)?;

    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE books
        SET title = ?, author = ?, published_date = ?, rating = ?, isbn = ?,
            description = ?, page_count = ?, thumbnail_url = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.published_date)
    .bind(book.rating)
    .bind(&book.isbn)
    .bind(&book.description)
    .bind(book.page_count)
    .bind(&book.thumbnail_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, book.isbn.as_deref()))?;

    get_book(pool, id).await
}

/// Delete one book by id
pub async fn delete_book(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Book {} not found", id)));
    }

    debug!(id, "Deleted book");
    Ok(())
}

/// List books newest-first, with optional author/rating filters
pub async fn list_books(pool: &Pool<Sqlite>, filter: &BookFilter) -> Result<Vec<Book>> {
    let mut sql = String::from("SELECT * FROM books");
    let mut clauses: Vec<&str> = Vec::new();

    if filter.author.is_some() {
        clauses.push("LOWER(author) LIKE ?");
    }
    if filter.rating.is_some() {
        clauses.push("rating = ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut query = sqlx::query_as::<_, Book>(&sql);
    if let Some(author) = &filter.author {
        query = query.bind(format!("%{}%", author.to_lowercase()));
    }
    if let Some(rating) = filter.rating {
        query = query.bind(rating);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Total number of books
pub async fn count_books(pool: &Pool<Sqlite>) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?)
}

/// Mean rating, or None when the table is empty
pub async fn average_rating(pool: &Pool<Sqlite>) -> Result<Option<f64>> {
    Ok(sqlx::query_scalar("SELECT AVG(rating) FROM books")
        .fetch_one(pool)
        .await?)
}

/// (rating, count) pairs, ascending by rating
pub async fn rating_distribution(pool: &Pool<Sqlite>) -> Result<Vec<RatingCount>> {
    Ok(sqlx::query_as(
        "SELECT rating, COUNT(*) AS count FROM books GROUP BY rating ORDER BY rating ASC",
    )
    .fetch_all(pool)
    .await?)
}

/// Top authors by descending book count. Ties resolve by author name so
/// the ordering is deterministic.
pub async fn top_authors(pool: &Pool<Sqlite>, limit: i64) -> Result<Vec<AuthorCount>> {
    Ok(sqlx::query_as(
        r#"
        SELECT author, COUNT(*) AS book_count
        FROM books
        GROUP BY author
        ORDER BY book_count DESC, author ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;

    fn sample(title: &str, rating: i64, isbn: Option<&str>) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Test Author".to_string(),
            published_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            rating,
            isbn: isbn.map(str::to_string),
            description: None,
            page_count: None,
            thumbnail_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let pool = connect_memory().await;

        let book = insert_book(&pool, &sample("Dune", 5, Some("9780441172719")))
            .await
            .unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.rating, 5);
        assert!(book.updated_at >= book.created_at);

        let fetched = get_book(&pool, book.id).await.unwrap();
        assert_eq!(fetched.isbn.as_deref(), Some("9780441172719"));
    }

    #[tokio::test]
    async fn test_rating_bounds_enforced() {
        let pool = connect_memory().await;

        for rating in [0, 6, -1] {
            let err = insert_book(&pool, &sample("Bad", rating, None))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "rating {}", rating);
        }
        for rating in 1..=5 {
            insert_book(&pool, &sample("Good", rating, None))
                .await
                .unwrap();
        }
        assert_eq!(count_books(&pool).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_future_date_rejected() {
        let pool = connect_memory().await;

        let mut new = sample("Tomorrow", 3, None);
        new.published_date = Utc::now().date_naive() + chrono::Duration::days(1);

        let err = insert_book(&pool, &new).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_isbn_maps_to_typed_error() {
        let pool = connect_memory().await;

        insert_book(&pool, &sample("One", 4, Some("9780441172719")))
            .await
            .unwrap();
        let err = insert_book(&pool, &sample("Two", 4, Some("9780441172719")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateIsbn(_)));
    }

    #[tokio::test]
    async fn test_is_recent_derived() {
        let pool = connect_memory().await;

        let recent = insert_book(&pool, &sample("New", 4, None)).await.unwrap();
        assert!(recent.is_recent());

        let mut old = sample("Old", 4, None);
        old.published_date = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        let old = insert_book(&pool, &old).await.unwrap();
        assert!(!old.is_recent());
    }

    #[tokio::test]
    async fn test_partial_update_refreshes_updated_at() {
        let pool = connect_memory().await;

        let book = insert_book(&pool, &sample("Original", 3, None))
            .await
            .unwrap();

        let patch = BookPatch {
            rating: Some(5),
            description: Some(Some("revised".to_string())),
            ..Default::default()
        };
        let updated = update_book(&pool, book.id, &patch).await.unwrap();

        assert_eq!(updated.rating, 5);
        assert_eq!(updated.description.as_deref(), Some("revised"));
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.created_at, book.created_at);
        assert!(updated.updated_at >= book.updated_at);
    }

    #[tokio::test]
    async fn test_patch_null_clears_nullable_field() {
        let pool = connect_memory().await;

        let mut new = sample("Clearable", 3, Some("9780441172719"));
        new.description = Some("text".to_string());
        let book = insert_book(&pool, &new).await.unwrap();

        let patch: BookPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let updated = update_book(&pool, book.id, &patch).await.unwrap();

        assert_eq!(updated.description, None);
        // Absent field untouched
        assert_eq!(updated.isbn.as_deref(), Some("9780441172719"));
    }

    #[tokio::test]
    async fn test_patch_invalid_rating_rejected() {
        let pool = connect_memory().await;

        let book = insert_book(&pool, &sample("Valid", 3, None)).await.unwrap();

        let patch = BookPatch {
            rating: Some(9),
            ..Default::default()
        };
        let err = update_book(&pool, book.id, &patch).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Row unchanged
        assert_eq!(get_book(&pool, book.id).await.unwrap().rating, 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = connect_memory().await;

        let book = insert_book(&pool, &sample("Doomed", 2, None)).await.unwrap();
        delete_book(&pool, book.id).await.unwrap();

        assert!(matches!(
            get_book(&pool, book.id).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            delete_book(&pool, book.id).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = connect_memory().await;

        let mut a = sample("A", 5, None);
        a.author = "Ursula K. Le Guin".to_string();
        insert_book(&pool, &a).await.unwrap();

        let mut b = sample("B", 3, None);
        b.author = "Frank Herbert".to_string();
        insert_book(&pool, &b).await.unwrap();

        let by_author = list_books(
            &pool,
            &BookFilter {
                author: Some("le guin".to_string()),
                rating: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].title, "A");

        let by_rating = list_books(
            &pool,
            &BookFilter {
                author: None,
                rating: Some(3),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_rating.len(), 1);
        assert_eq!(by_rating[0].title, "B");

        let all = list_books(&pool, &BookFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].title, "B");
    }

    #[tokio::test]
    async fn test_aggregates() {
        let pool = connect_memory().await;

        assert_eq!(count_books(&pool).await.unwrap(), 0);
        assert_eq!(average_rating(&pool).await.unwrap(), None);
        assert!(rating_distribution(&pool).await.unwrap().is_empty());
        assert!(top_authors(&pool, 5).await.unwrap().is_empty());

        for (title, rating, author) in [
            ("A", 5, "Herbert"),
            ("B", 5, "Herbert"),
            ("C", 3, "Le Guin"),
        ] {
            let mut new = sample(title, rating, None);
            new.author = author.to_string();
            insert_book(&pool, &new).await.unwrap();
        }

        let dist = rating_distribution(&pool).await.unwrap();
        assert_eq!(
            dist,
            vec![
                RatingCount { rating: 3, count: 1 },
                RatingCount { rating: 5, count: 2 },
            ]
        );

        let top = top_authors(&pool, 5).await.unwrap();
        assert_eq!(top[0].author, "Herbert");
        assert_eq!(top[0].book_count, 2);
        assert_eq!(top.len(), 2);
    }
}
