//! End-to-end import of a FASTA file and an expression table
//!
//! Both files are read and parsed before any transaction is opened, so a
//! missing or unreadable file aborts the run without touching the store.

use std::path::Path;

use genevault_common::GeneVaultError;
use sqlx::PgPool;
use tracing::info;

use crate::fasta::FastaParser;
use crate::reconcile::{ReconcileError, ReconcileStats, Reconciler};
use crate::table::TableParser;

/// Errors raised by an import run
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: GeneVaultError,
    },

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Parses both input files and reconciles them with the store
pub struct IngestPipeline {
    reconciler: Reconciler,
    fasta: FastaParser,
    table: TableParser,
}

impl IngestPipeline {
    pub fn new(db: PgPool) -> Self {
        Self {
            reconciler: Reconciler::new(db),
            fasta: FastaParser::new(),
            table: TableParser::new(),
        }
    }

    /// Import a FASTA file and a TSV expression table
    pub async fn run(
        &self,
        fasta_path: impl AsRef<Path>,
        tsv_path: impl AsRef<Path>,
    ) -> Result<ReconcileStats, IngestError> {
        let fasta_path = fasta_path.as_ref();
        let tsv_path = tsv_path.as_ref();

        info!(path = %fasta_path.display(), "Parsing FASTA");
        let sequences = self
            .fasta
            .parse_file(fasta_path)
            .map_err(|source| read_error(fasta_path, source))?;
        info!(count = sequences.len(), "Parsed sequences");

        info!(path = %tsv_path.display(), "Parsing TSV");
        let expressions = self
            .table
            .parse_file(tsv_path)
            .map_err(|source| read_error(tsv_path, source))?;
        info!(count = expressions.len(), "Parsed expression rows");

        Ok(self.reconciler.reconcile(&sequences, &expressions).await?)
    }
}

fn read_error(path: &Path, source: GeneVaultError) -> IngestError {
    IngestError::Read {
        path: path.display().to_string(),
        source,
    }
}
