//! Business services: metadata lookup, normalization, ingestion,
//! reporting, and chart rendering.

pub mod chart;
pub mod google_books;
pub mod ingest;
pub mod lookup;
pub mod normalizer;
pub mod report;
