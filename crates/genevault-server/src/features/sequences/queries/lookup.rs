use std::collections::{BTreeMap, HashSet};

use genevault_common::types::SequenceMap;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::validation::{normalize_genes, require_genes, GeneListError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupSequencesQuery {
    #[serde(default)]
    pub genes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub gene: String,
    pub sequence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSequencesResponse {
    pub count: usize,
    pub not_found: Vec<String>,
    pub sequences: Vec<SequenceEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupSequencesError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error(transparent)]
    Genes(#[from] GeneListError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LookupSequencesQuery {
    /// Normalized gene list, rejected when empty
    pub fn validate(&self) -> Result<Vec<String>, LookupSequencesError> {
        Ok(require_genes(normalize_genes(&self.genes))?)
    }
}

#[tracing::instrument(skip(pool, query), fields(requested = query.genes.len()))]
pub async fn handle(
    pool: PgPool,
    query: LookupSequencesQuery,
) -> Result<LookupSequencesResponse, LookupSequencesError> {
    let genes = query.validate()?;
    let found = fetch_sequences(&pool, &genes).await?;

    Ok(partition(&genes, &found))
}

/// Fetch stored sequences for the given genes in one round trip
pub async fn fetch_sequences(pool: &PgPool, genes: &[String]) -> sqlx::Result<SequenceMap> {
    let rows = sqlx::query_as::<_, SequenceRecord>(
        r#"
        SELECT gene_name, sequence
        FROM protein_sequences
        WHERE gene_name = ANY($1)
        "#,
    )
    .bind(genes)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| (r.gene_name, r.sequence)).collect())
}

/// Split requested genes into found entries and misses, keeping request order
pub fn partition(genes: &[String], found: &BTreeMap<String, String>) -> LookupSequencesResponse {
    let mut sequences = Vec::new();
    let mut not_found = Vec::new();
    let mut matched: HashSet<&str> = HashSet::new();

    for gene in genes {
        match found.get(gene) {
            Some(sequence) => {
                matched.insert(gene);
                sequences.push(SequenceEntry {
                    gene: gene.clone(),
                    sequence: sequence.clone(),
                });
            },
            None => not_found.push(gene.clone()),
        }
    }

    LookupSequencesResponse {
        count: matched.len(),
        not_found,
        sequences,
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SequenceRecord {
    gene_name: String,
    sequence: String,
}
