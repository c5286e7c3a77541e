//! Record store: SQLite access layer for the books table.

use bookdex_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::info;

pub mod books;

pub use books::{AuthorCount, Book, BookFilter, BookPatch, NewBook, RatingCount};

/// Open (or create) the catalog database and prepare the schema.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    initialize_database(&pool).await?;

    Ok(pool)
}

/// Create the books table and its indexes if they do not exist yet.
///
/// Idempotent: safe to run on every startup.
pub async fn initialize_database(pool: &Pool<Sqlite>) -> Result<()> {
    info!("Initializing database structures");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            published_date DATE NOT NULL,
            rating INTEGER NOT NULL,
            isbn TEXT UNIQUE,
            description TEXT,
            page_count INTEGER,
            thumbnail_url TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    for stmt in [
        "CREATE INDEX IF NOT EXISTS idx_books_title ON books (title)",
        "CREATE INDEX IF NOT EXISTS idx_books_author ON books (author)",
        "CREATE INDEX IF NOT EXISTS idx_books_rating ON books (rating)",
    ] {
        sqlx::query(stmt).execute(pool).await?;
    }

    info!("Database initialization complete");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn connect_memory() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    initialize_database(&pool).await.unwrap();
    pool
}
