//! Feature modules implementing the GeneVault API
//!
//! Each feature is a vertical slice with its own `queries/` and `routes.rs`:
//!
//! - **sequences**: sequence lookup and FASTA download
//! - **expressions**: expression lookup and TSV download
//!
//! Both are read-only. Data enters the store through the importer.

pub mod expressions;
pub mod sequences;
pub mod shared;

use axum::Router;
use sqlx::PgPool;

use crate::error::AppError;

/// Creates the feature router
///
/// - `/sequences` - Sequence lookup and download
/// - `/expressions` - Expression lookup and download
pub fn router(db: PgPool) -> Router<()> {
    Router::new()
        .nest("/sequences", sequences::sequences_routes())
        .nest("/expressions", expressions::expressions_routes())
        .with_state(db)
}

/// Method fallback for lookup endpoints that only accept POST
pub(crate) async fn post_only() -> AppError {
    AppError::BadRequest(r#"Use POST with JSON {"genes": [...]}"#.to_string())
}
