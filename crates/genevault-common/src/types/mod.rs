//! Common types used across GeneVault

use std::collections::BTreeMap;

/// Number of expression samples recorded per gene
pub const SAMPLE_COUNT: usize = 6;

/// Column names for the expression samples, in storage order
pub const SAMPLE_NAMES: [&str; SAMPLE_COUNT] =
    ["Sample1", "Sample2", "Sample3", "Sample4", "Sample5", "Sample6"];

/// Expression values for one gene, ordered as [`SAMPLE_NAMES`]
pub type Samples = [i32; SAMPLE_COUNT];

/// Parsed FASTA content keyed by gene identifier
pub type SequenceMap = BTreeMap<String, String>;

/// Parsed expression table keyed by gene identifier
pub type ExpressionMap = BTreeMap<String, Samples>;

/// Maximum number of genes accepted by any lookup or export request
pub const MAX_GENES_PER_REQUEST: usize = 10;
