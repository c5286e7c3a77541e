//! Startup configuration
//!
//! All deployment knobs are resolved exactly once at startup, from
//! command-line flags with environment-variable fallbacks. Business logic
//! never inspects the environment directly.

use crate::{Error, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments / resolved configuration for bookdex-api
#[derive(Parser, Debug, Clone)]
#[command(name = "bookdex-api")]
#[command(about = "Book catalog backend with metadata ingestion and reporting")]
#[command(version)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1", env = "BOOKDEX_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "BOOKDEX_PORT")]
    pub port: u16,

    /// Path to the SQLite database file (created if missing)
    #[arg(short, long, default_value = "bookdex.db", env = "BOOKDEX_DATABASE")]
    pub database: PathBuf,

    /// Base URL of the book-metadata lookup service
    #[arg(
        long,
        default_value = "https://www.googleapis.com/books/v1",
        env = "BOOKDEX_LOOKUP_URL"
    )]
    pub lookup_base_url: String,

    /// Timeout for a single metadata lookup request, in seconds
    #[arg(long, default_value = "10", env = "BOOKDEX_LOOKUP_TIMEOUT_SECS")]
    pub lookup_timeout_secs: u64,

    /// Allowed CORS origins (comma separated). Empty means permissive.
    #[arg(long, env = "BOOKDEX_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Resolve the socket address to bind the server to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address: {}", e)))
    }
}
