//! Error types for GeneVault

use thiserror::Error;

/// Result type alias for GeneVault operations
pub type Result<T> = std::result::Result<T, GeneVaultError>;

/// Main error type for GeneVault
#[derive(Error, Debug)]
pub enum GeneVaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
