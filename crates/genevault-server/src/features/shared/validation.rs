//! Gene list validation
//!
//! Every entry point that accepts gene identifiers runs them through
//! [`normalize_genes`]: entries are trimmed, blanks are dropped, order and
//! duplicates are kept, and only the first [`MAX_GENES_PER_REQUEST`] survive.
//!
//! ```rust,ignore
//! use genevault_server::features::shared::validation::split_gene_param;
//!
//! assert_eq!(split_gene_param(" A, ,B,A"), vec!["A", "B", "A"]);
//! ```

use genevault_common::types::MAX_GENES_PER_REQUEST;
use thiserror::Error;

/// Errors raised for an unusable gene list
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneListError {
    #[error("No genes provided")]
    Empty,
}

/// Trim, drop blanks and cap a list of gene identifiers
pub fn normalize_genes<I, S>(genes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    genes
        .into_iter()
        .filter_map(|gene| {
            let trimmed = gene.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .take(MAX_GENES_PER_REQUEST)
        .collect()
}

/// Split a comma-separated query parameter and normalize it
pub fn split_gene_param(param: &str) -> Vec<String> {
    normalize_genes(param.split(','))
}

/// Reject a normalized list with nothing left in it
pub fn require_genes(genes: Vec<String>) -> Result<Vec<String>, GeneListError> {
    if genes.is_empty() {
        return Err(GeneListError::Empty);
    }
    Ok(genes)
}
