//! Metadata lookup provider boundary.
//!
//! The orchestrator only depends on this trait, so alternate providers or
//! a test double can be substituted without touching it. Response types
//! follow the Google Books volume shape; every field is optional because
//! upstream payloads are arbitrarily sparse.

use async_trait::async_trait;
use bookdex_common::Result;
use serde::{Deserialize, Serialize};

/// Lookup response: a (possibly empty) list of volumes
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VolumeList {
    /// Absent entirely when the query matched nothing
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// One search result
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Volume {
    #[serde(rename = "volumeInfo", default)]
    pub volume_info: VolumeInfo,
}

/// Bibliographic fields of a volume
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub authors: Option<Vec<String>>,

    /// Raw date string; may be a bare year or a full ISO date
    #[serde(rename = "publishedDate", default)]
    pub published_date: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "pageCount", default)]
    pub page_count: Option<i64>,

    #[serde(rename = "imageLinks", default)]
    pub image_links: Option<ImageLinks>,

    #[serde(rename = "industryIdentifiers", default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
}

/// Cover image links
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// ISBN or other identifier attached to a volume
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub identifier: String,
}

/// Capability boundary for the external book-metadata service.
///
/// One bounded request per call; implementations must not retry.
#[async_trait]
pub trait MetadataLookupProvider: Send + Sync {
    /// Search for the volume best matching `title`.
    async fn lookup(&self, title: &str) -> Result<VolumeList>;
}
