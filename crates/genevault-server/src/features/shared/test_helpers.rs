//! Test fixtures for database tests
//!
//! ```rust,ignore
//! use crate::features::shared::test_helpers::TestGene;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     TestGene::new("GeneA", "MKTA").with_samples([1, 2, 3, 4, 5, 6]).insert(&pool).await?;
//!     Ok(())
//! }
//! ```

use genevault_common::types::Samples;
use sqlx::PgPool;

/// Builder for a stored gene with an optional expression record
#[derive(Debug, Clone)]
pub struct TestGene {
    pub gene_name: String,
    pub sequence: String,
    pub samples: Option<Samples>,
}

impl TestGene {
    pub fn new(gene_name: &str, sequence: &str) -> Self {
        Self {
            gene_name: gene_name.to_string(),
            sequence: sequence.to_string(),
            samples: None,
        }
    }

    /// Attach an expression record
    pub fn with_samples(mut self, samples: Samples) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Insert the sequence and, if set, its expression record
    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query("INSERT INTO protein_sequences (gene_name, sequence) VALUES ($1, $2)")
            .bind(&self.gene_name)
            .bind(&self.sequence)
            .execute(pool)
            .await?;

        if let Some(s) = self.samples {
            sqlx::query(
                r#"
                INSERT INTO gene_expressions
                    (protein_id, sample1, sample2, sample3, sample4, sample5, sample6)
                SELECT id, $2, $3, $4, $5, $6, $7
                FROM protein_sequences
                WHERE gene_name = $1
                "#,
            )
            .bind(&self.gene_name)
            .bind(s[0])
            .bind(s[1])
            .bind(s[2])
            .bind(s[3])
            .bind(s[4])
            .bind(s[5])
            .execute(pool)
            .await?;
        }

        Ok(self)
    }
}
