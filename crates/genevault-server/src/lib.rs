//! GeneVault Server Library
//!
//! Read-only HTTP API over the gene store filled by `genevault-ingest`.
//!
//! - **features**: sequence and expression lookups and downloads
//! - **export**: FASTA and TSV rendering
//! - **config**: environment-based configuration
//! - **middleware**: CORS and request tracing
//!
//! # Example
//!
//! ```no_run
//! use genevault_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let app = api::create_router(pool, &config);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod features;
pub mod middleware;

pub use error::AppError;
