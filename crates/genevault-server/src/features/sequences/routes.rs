//! Sequence API routes
//!
//! - `POST /api/sequences` - Look up sequences for a list of genes
//! - `GET /api/sequences/download?genes=A,B&ext=fa&wrap=60` - FASTA download

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;

use super::queries::{
    DownloadSequencesError, DownloadSequencesQuery, LookupSequencesError, LookupSequencesQuery,
};
use crate::error::AppError;
use crate::features::post_only;

/// Creates the sequences router
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/sequences", sequences_routes())
///     .with_state(pool);
/// ```
pub fn sequences_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(lookup_sequences).fallback(post_only))
        .route("/download", get(download_sequences))
}

/// Look up sequences
///
/// # Request Body
///
/// ```json
/// { "genes": ["GeneA", "GeneB"] }
/// ```
///
/// # Response
///
/// - `200 OK` - `{"count": 1, "not_found": ["GeneB"], "sequences": [{"gene": "GeneA", "sequence": "MK"}]}`
/// - `400 Bad Request` - Invalid JSON or no genes
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool, body), fields(body_len = body.len()))]
async fn lookup_sequences(
    State(pool): State<PgPool>,
    body: Bytes,
) -> Result<Response, SequenceApiError> {
    let query: LookupSequencesQuery = serde_json::from_slice(&body)
        .map_err(|e| LookupSequencesError::InvalidJson(e.to_string()))?;

    let response = super::queries::lookup::handle(pool, query).await?;

    tracing::debug!(
        count = response.count,
        not_found = response.not_found.len(),
        "Sequences looked up via API"
    );

    Ok(Json(response).into_response())
}

/// Download sequences as FASTA
///
/// # Query Parameters
///
/// - `genes` - Comma-separated gene identifiers (required)
/// - `ext` - `fa` or `fasta` (default `fasta`)
/// - `wrap` - Line width, 0 or invalid for a single line
#[tracing::instrument(skip(pool, query), fields(genes = ?query.genes))]
async fn download_sequences(
    State(pool): State<PgPool>,
    Query(query): Query<DownloadSequencesQuery>,
) -> Result<Response, SequenceApiError> {
    let attachment = super::queries::download::handle(pool, query).await?;

    tracing::info!(filename = %attachment.filename, "Sequences exported via API");

    Ok(attachment.into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum SequenceApiError {
    Lookup(LookupSequencesError),
    Download(DownloadSequencesError),
}

impl From<LookupSequencesError> for SequenceApiError {
    fn from(err: LookupSequencesError) -> Self {
        Self::Lookup(err)
    }
}

impl From<DownloadSequencesError> for SequenceApiError {
    fn from(err: DownloadSequencesError) -> Self {
        Self::Download(err)
    }
}

impl SequenceApiError {
    fn into_app_error(self) -> AppError {
        match self {
            SequenceApiError::Lookup(LookupSequencesError::InvalidJson(reason)) => {
                tracing::debug!(%reason, "Rejected sequence lookup body");
                AppError::BadRequest("Invalid JSON".to_string())
            },
            SequenceApiError::Lookup(LookupSequencesError::Genes(e)) => {
                AppError::Validation(e.to_string())
            },
            SequenceApiError::Lookup(LookupSequencesError::Database(e))
            | SequenceApiError::Download(DownloadSequencesError::Database(e)) => {
                AppError::Database(e)
            },
            SequenceApiError::Download(e @ DownloadSequencesError::NoGenes) => {
                AppError::Validation(e.to_string())
            },
        }
    }
}

impl IntoResponse for SequenceApiError {
    fn into_response(self) -> Response {
        self.into_app_error().into_response()
    }
}
