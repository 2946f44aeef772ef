//! GeneVault Ingest - load protein sequences and expression values

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use genevault_common::logging::{init_logging, LogConfig, LogLevel};
use genevault_ingest::IngestPipeline;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "genevault-ingest")]
#[command(author, version, about = "Load protein sequences and gene expression data into the database")]
struct Cli {
    /// Path to FASTA file
    #[arg(long)]
    fasta: PathBuf,

    /// Path to TSV file
    #[arg(long)]
    tsv: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("genevault-ingest")
        .filter_directives("sqlx=warn")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    // Fail on unreadable inputs before connecting anywhere.
    for path in [&cli.fasta, &cli.tsv] {
        std::fs::metadata(path).with_context(|| format!("Cannot read {}", path.display()))?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&cli.database_url)
        .await
        .context("Failed to connect to database")?;

    let stats = IngestPipeline::new(pool).run(&cli.fasta, &cli.tsv).await?;

    info!(noop = stats.is_noop(), "Ingestion complete");
    println!("{}", stats);

    Ok(())
}
