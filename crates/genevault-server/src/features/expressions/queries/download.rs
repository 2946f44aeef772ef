use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::lookup::{fetch_expressions, partition};
use crate::api::response::Attachment;
use crate::export::{format_expression_tsv, EXPRESSIONS_FILENAME, TSV_CONTENT_TYPE};
use crate::features::shared::validation::split_gene_param;

/// Query string of `GET /expressions/download`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadExpressionsQuery {
    pub genes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadExpressionsError {
    #[error("Provide genes as a comma-separated query parameter")]
    NoGenes,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DownloadExpressionsQuery {
    pub fn validate(&self) -> Result<Vec<String>, DownloadExpressionsError> {
        let genes = split_gene_param(self.genes.as_deref().unwrap_or_default());
        if genes.is_empty() {
            return Err(DownloadExpressionsError::NoGenes);
        }
        Ok(genes)
    }
}

#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    query: DownloadExpressionsQuery,
) -> Result<Attachment, DownloadExpressionsError> {
    let genes = query.validate()?;
    let found = fetch_expressions(&pool, &genes).await?;

    // Genes without an expression record are left out of the file.
    let (rows, not_found) = partition(&genes, &found);
    tracing::debug!(rows = rows.len(), omitted = not_found.len(), "Exporting expressions");

    Ok(Attachment {
        filename: EXPRESSIONS_FILENAME.to_string(),
        content_type: TSV_CONTENT_TYPE,
        content: format_expression_tsv(rows.iter().map(|r| (r.gene.as_str(), &r.values))),
    })
}
