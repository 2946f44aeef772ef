//! Shared utilities for feature modules
//!
//! - **validation**: gene list normalization
//! - **test_helpers**: database fixtures (test-only)

pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use validation::{normalize_genes, require_genes, split_gene_param, GeneListError};
