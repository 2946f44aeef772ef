use std::collections::{HashMap, HashSet};

use genevault_common::types::{Samples, SAMPLE_NAMES};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::validation::{normalize_genes, require_genes, GeneListError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupExpressionsQuery {
    #[serde(default)]
    pub genes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionRow {
    pub gene: String,
    pub values: Samples,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupExpressionsResponse {
    pub samples: Vec<String>,
    pub rows: Vec<ExpressionRow>,
    pub not_found: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupExpressionsError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error(transparent)]
    Genes(#[from] GeneListError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LookupExpressionsQuery {
    /// Normalized gene list, rejected when empty
    pub fn validate(&self) -> Result<Vec<String>, LookupExpressionsError> {
        Ok(require_genes(normalize_genes(&self.genes))?)
    }
}

/// Stored genes matching a request; `None` marks a sequence with no expression
pub type ExpressionLookup = HashMap<String, Option<Samples>>;

#[tracing::instrument(skip(pool, query), fields(requested = query.genes.len()))]
pub async fn handle(
    pool: PgPool,
    query: LookupExpressionsQuery,
) -> Result<LookupExpressionsResponse, LookupExpressionsError> {
    let genes = query.validate()?;
    let found = fetch_expressions(&pool, &genes).await?;

    let (rows, not_found) = partition(&genes, &found);

    Ok(LookupExpressionsResponse {
        samples: SAMPLE_NAMES.iter().map(|s| s.to_string()).collect(),
        rows,
        not_found,
    })
}

/// Fetch sequences and their expression records in one round trip
pub async fn fetch_expressions(pool: &PgPool, genes: &[String]) -> sqlx::Result<ExpressionLookup> {
    let records = sqlx::query_as::<_, ExpressionRecord>(
        r#"
        SELECT p.gene_name,
               e.id IS NOT NULL AS has_expression,
               COALESCE(e.sample1, 0) AS sample1,
               COALESCE(e.sample2, 0) AS sample2,
               COALESCE(e.sample3, 0) AS sample3,
               COALESCE(e.sample4, 0) AS sample4,
               COALESCE(e.sample5, 0) AS sample5,
               COALESCE(e.sample6, 0) AS sample6
        FROM protein_sequences p
        LEFT JOIN gene_expressions e ON e.protein_id = p.id
        WHERE p.gene_name = ANY($1)
        "#,
    )
    .bind(genes)
    .fetch_all(pool)
    .await?;

    Ok(records.into_iter().map(ExpressionRecord::into_entry).collect())
}

/// Rows for genes with an expression record, one per distinct gene in request
/// order, plus every request entry that had none
pub fn partition(genes: &[String], found: &ExpressionLookup) -> (Vec<ExpressionRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut not_found = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for gene in genes {
        match found.get(gene) {
            Some(Some(values)) => {
                if seen.insert(gene) {
                    rows.push(ExpressionRow {
                        gene: gene.clone(),
                        values: *values,
                    });
                }
            },
            _ => not_found.push(gene.clone()),
        }
    }

    (rows, not_found)
}

#[derive(Debug, sqlx::FromRow)]
struct ExpressionRecord {
    gene_name: String,
    has_expression: bool,
    sample1: i32,
    sample2: i32,
    sample3: i32,
    sample4: i32,
    sample5: i32,
    sample6: i32,
}

impl ExpressionRecord {
    fn into_entry(self) -> (String, Option<Samples>) {
        let samples = self.has_expression.then_some([
            self.sample1,
            self.sample2,
            self.sample3,
            self.sample4,
            self.sample5,
            self.sample6,
        ]);
        (self.gene_name, samples)
    }
}
