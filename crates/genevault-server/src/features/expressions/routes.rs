//! Expression API routes
//!
//! - `POST /api/expressions` - Look up expression values for a list of genes
//! - `GET /api/expressions/download?genes=A,B` - TSV download

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;

use super::queries::{
    DownloadExpressionsError, DownloadExpressionsQuery, LookupExpressionsError,
    LookupExpressionsQuery,
};
use crate::error::AppError;
use crate::features::post_only;

pub fn expressions_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(lookup_expressions).fallback(post_only))
        .route("/download", get(download_expressions))
}

/// Look up expression values
///
/// # Response
///
/// - `200 OK` - `{"samples": [...], "rows": [{"gene": "GeneA", "values": [1, 2, 3, 4, 0, 6]}], "not_found": []}`
/// - `400 Bad Request` - Invalid JSON or no genes
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool, body), fields(body_len = body.len()))]
async fn lookup_expressions(
    State(pool): State<PgPool>,
    body: Bytes,
) -> Result<Response, ExpressionApiError> {
    let query: LookupExpressionsQuery = serde_json::from_slice(&body)
        .map_err(|e| LookupExpressionsError::InvalidJson(e.to_string()))?;

    let response = super::queries::lookup::handle(pool, query).await?;

    tracing::debug!(
        rows = response.rows.len(),
        not_found = response.not_found.len(),
        "Expressions looked up via API"
    );

    Ok(Json(response).into_response())
}

/// Download expression values as TSV
#[tracing::instrument(skip(pool, query), fields(genes = ?query.genes))]
async fn download_expressions(
    State(pool): State<PgPool>,
    Query(query): Query<DownloadExpressionsQuery>,
) -> Result<Response, ExpressionApiError> {
    let attachment = super::queries::download::handle(pool, query).await?;

    tracing::info!(filename = %attachment.filename, "Expressions exported via API");

    Ok(attachment.into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum ExpressionApiError {
    Lookup(LookupExpressionsError),
    Download(DownloadExpressionsError),
}

impl From<LookupExpressionsError> for ExpressionApiError {
    fn from(err: LookupExpressionsError) -> Self {
        Self::Lookup(err)
    }
}

impl From<DownloadExpressionsError> for ExpressionApiError {
    fn from(err: DownloadExpressionsError) -> Self {
        Self::Download(err)
    }
}

impl ExpressionApiError {
    fn into_app_error(self) -> AppError {
        match self {
            ExpressionApiError::Lookup(LookupExpressionsError::InvalidJson(reason)) => {
                tracing::debug!(%reason, "Rejected expression lookup body");
                AppError::BadRequest("Invalid JSON".to_string())
            },
            ExpressionApiError::Lookup(LookupExpressionsError::Genes(e)) => {
                AppError::Validation(e.to_string())
            },
            ExpressionApiError::Lookup(LookupExpressionsError::Database(e))
            | ExpressionApiError::Download(DownloadExpressionsError::Database(e)) => {
                AppError::Database(e)
            },
            ExpressionApiError::Download(e @ DownloadExpressionsError::NoGenes) => {
                AppError::Validation(e.to_string())
            },
        }
    }
}

impl IntoResponse for ExpressionApiError {
    fn into_response(self) -> Response {
        self.into_app_error().into_response()
    }
}
