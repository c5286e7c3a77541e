//! Shared types for the bookdex catalog backend.
//!
//! Holds the error taxonomy and the startup configuration used by the
//! HTTP service crate.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
