use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::lookup::fetch_sequences;
use crate::api::response::Attachment;
use crate::export::{format_fasta, parse_wrap, SequenceExtension, FASTA_CONTENT_TYPE};
use crate::features::shared::validation::split_gene_param;

/// Query string of `GET /sequences/download`
///
/// Every field is kept as raw text so malformed `wrap` values can fall back
/// to no wrapping instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadSequencesQuery {
    pub genes: Option<String>,
    pub ext: Option<String>,
    pub wrap: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadSequencesError {
    #[error("Provide genes as a comma-separated query parameter")]
    NoGenes,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DownloadSequencesQuery {
    pub fn validate(&self) -> Result<Vec<String>, DownloadSequencesError> {
        let genes = split_gene_param(self.genes.as_deref().unwrap_or_default());
        if genes.is_empty() {
            return Err(DownloadSequencesError::NoGenes);
        }
        Ok(genes)
    }
}

#[tracing::instrument(skip(pool, query), fields(ext = ?query.ext, wrap = ?query.wrap))]
pub async fn handle(
    pool: PgPool,
    query: DownloadSequencesQuery,
) -> Result<Attachment, DownloadSequencesError> {
    let genes = query.validate()?;
    let extension = SequenceExtension::parse(query.ext.as_deref());
    let wrap = parse_wrap(query.wrap.as_deref());

    let found = fetch_sequences(&pool, &genes).await?;
    tracing::debug!(requested = genes.len(), found = found.len(), "Exporting sequences");

    Ok(Attachment {
        filename: extension.filename(),
        content_type: FASTA_CONTENT_TYPE,
        content: format_fasta(found.iter().map(|(g, s)| (g.as_str(), s.as_str())), wrap),
    })
}
