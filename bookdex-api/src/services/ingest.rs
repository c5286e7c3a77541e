//! Ingestion orchestrator.
//!
//! Performs the external lookup, normalizes the payload, and optionally
//! persists a validated book. The lookup half and the save half fail
//! independently: a save failure becomes an advisory note on an otherwise
//! successful outcome, never an error for the whole operation.

use bookdex_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::lookup::MetadataLookupProvider;
use super::normalizer::{self, NormalizedBook};
use crate::db::books::{self, NewBook};

/// The external source carries no rating signal, so auto-ingested books
/// get this fixed rating.
pub const DEFAULT_RATING: i64 = 4;

const TITLE_MAX_CHARS: usize = 200;
const AUTHOR_MAX_CHARS: usize = 100;

/// Result of one ingestion call: the normalized record, plus persistence
/// annotations when a save was requested.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: String,
    pub description: String,
    pub page_count: Option<i64>,
    pub thumbnail: String,
    pub isbn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to_db: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}

impl From<NormalizedBook> for IngestOutcome {
    fn from(normalized: NormalizedBook) -> Self {
        Self {
            title: normalized.title,
            authors: normalized.authors,
            published_date: normalized.published_date,
            description: normalized.description,
            page_count: normalized.page_count,
            thumbnail: normalized.thumbnail,
            isbn: normalized.isbn,
            saved_to_db: None,
            db_id: None,
            save_error: None,
        }
    }
}

/// Look up `title` and, when `save` is set, persist the best match.
///
/// Fails with `NotFound` when the upstream returns zero results and with
/// `UpstreamUnavailable` on any network or HTTP failure (single attempt,
/// no retry). With `save = false` nothing is ever written.
pub async fn fetch_and_store(
    pool: &SqlitePool,
    provider: &dyn MetadataLookupProvider,
    title: &str,
    save: bool,
) -> Result<IngestOutcome> {
    let list = provider.lookup(title).await?;

    let Some(volume) = list.items.first() else {
        return Err(Error::NotFound(
            "No books found for the given title".to_string(),
        ));
    };

    let mut outcome = IngestOutcome::from(normalizer::normalize(&volume.volume_info));

    if !save {
        return Ok(outcome);
    }

    match normalizer::parse_published_date(&outcome.published_date) {
        None => {
            outcome.save_error = Some("Invalid or missing published date".to_string());
        }
        Some(published_date) => {
            let new = NewBook {
                title: truncate_chars(&outcome.title, TITLE_MAX_CHARS),
                author: if outcome.authors.is_empty() {
                    "Unknown".to_string()
                } else {
                    truncate_chars(&outcome.authors.join(", "), AUTHOR_MAX_CHARS)
                },
                published_date,
                rating: DEFAULT_RATING,
                isbn: outcome.isbn.clone(),
                description: non_empty(&outcome.description),
                page_count: outcome.page_count,
                thumbnail_url: non_empty(&outcome.thumbnail),
            };

            match books::insert_book(pool, &new).await {
                Ok(book) => {
                    info!(id = book.id, title = %book.title, "Saved ingested book");
                    outcome.saved_to_db = Some(true);
                    outcome.db_id = Some(book.id);
                }
                Err(e) if e.is_save_failure() => {
                    warn!(title = %outcome.title, error = %e, "Ingested book not saved");
                    outcome.save_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(outcome)
}

/// Truncate on character boundaries, never inside a code point
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
