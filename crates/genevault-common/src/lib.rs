//! GeneVault Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the GeneVault workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`GeneVaultError`] and the [`Result`] alias
//! - **Logging**: Centralized `tracing` subscriber setup
//! - **Types**: Expression sample layout shared by the importer and the API
//!
//! # Example
//!
//! ```no_run
//! use genevault_common::logging::{init_logging, LogConfig};
//! use genevault_common::types::SAMPLE_NAMES;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!(samples = ?SAMPLE_NAMES, "Ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{GeneVaultError, Result};
