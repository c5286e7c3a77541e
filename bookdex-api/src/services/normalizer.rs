//! Metadata normalizer.
//!
//! Reshapes a raw lookup payload into the internal book-like field set.
//! Missing optional fields default instead of failing; this is intentional
//! and must stay lenient so sparse upstream payloads remain accepted.

use chrono::NaiveDate;
use serde::Serialize;

use super::lookup::VolumeInfo;

/// Lookup response reshaped into the internal field set, prior to any
/// validation or persistence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedBook {
    pub title: String,
    pub authors: Vec<String>,
    /// Raw date string, not yet parsed
    pub published_date: String,
    pub description: String,
    pub page_count: Option<i64>,
    pub thumbnail: String,
    pub isbn: Option<String>,
}

/// Normalize one volume payload.
///
/// Defaulting rules: missing title and thumbnail become empty strings
/// (never the query title), missing authors become an empty list, and the
/// isbn is the first identifier of type ISBN_13 or ISBN_10 in list order.
pub fn normalize(info: &VolumeInfo) -> NormalizedBook {
    let isbn = info
        .industry_identifiers
        .iter()
        .find(|id| id.id_type == "ISBN_13" || id.id_type == "ISBN_10")
        .map(|id| id.identifier.clone());

    NormalizedBook {
        title: info.title.clone().unwrap_or_default(),
        authors: info.authors.clone().unwrap_or_default(),
        published_date: info.published_date.clone().unwrap_or_default(),
        description: info.description.clone().unwrap_or_default(),
        page_count: info.page_count,
        thumbnail: info
            .image_links
            .as_ref()
            .and_then(|links| links.thumbnail.clone())
            .unwrap_or_default(),
        isbn,
    }
}

/// Parse a raw published-date string.
///
/// Accepts a 4-digit year (interpreted as January 1 of that year) or a
/// full ISO `YYYY-MM-DD` date. Anything else, including the empty string,
/// is None.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() == 4 {
        let year: i32 = raw.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
