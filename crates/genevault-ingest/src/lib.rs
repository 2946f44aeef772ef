//! GeneVault Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Parses protein sequences (FASTA) and expression tables (TSV) and
//! reconciles them with the GeneVault PostgreSQL store.
//!
//! # Modules
//!
//! - **fasta**: Multi-record FASTA parser, repeated headers are merged
//! - **table**: Wide/paired TSV layout detection and row parsing
//! - **reconcile**: Transactional, idempotent upsert with change counts
//! - **pipeline**: Read both files, then reconcile
//!
//! # Example
//!
//! ```no_run
//! use genevault_ingest::IngestPipeline;
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = PgPool::connect("postgresql://localhost/genevault").await?;
//!     let stats = IngestPipeline::new(pool).run("proteins.fasta", "expression.tsv").await?;
//!     println!("{}", stats);
//!     Ok(())
//! }
//! ```

pub mod fasta;
pub mod pipeline;
pub mod reconcile;
pub mod table;

pub use pipeline::{IngestError, IngestPipeline};
pub use reconcile::{ReconcileStats, Reconciler};
