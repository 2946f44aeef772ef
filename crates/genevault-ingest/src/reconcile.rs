//! Idempotent reconciliation of parsed files into the store
//!
//! Reconciliation runs in three steps inside a single transaction:
//!
//! 1. Load a [`StoreSnapshot`] of every gene named by either input with one
//!    batched `= ANY($1)` query.
//! 2. Build a [`ReconcilePlan`] by comparing the parsed data to the snapshot.
//!    Planning is pure, so re-running it on unchanged input yields only
//!    [`Change::Unchanged`] and [`Change::Skip`] entries.
//! 3. Execute the planned writes and commit.
//!
//! Expression rows are only written for genes that have a sequence, either
//! already stored or created in the same run. Anything failing before the
//! commit rolls the whole batch back.

use std::collections::HashMap;

use genevault_common::types::{ExpressionMap, Samples, SequenceMap};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

/// Errors raised while reconciling parsed data
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of comparing one parsed entry with the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Create,
    Update,
    Unchanged,
    /// Expression for a gene without a stored or incoming sequence
    Skip,
}

/// Stored state for one gene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGene {
    pub sequence: String,
    pub expression: Option<Samples>,
}

/// Stored genes keyed by gene identifier
pub type StoreSnapshot = HashMap<String, StoredGene>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceWrite<'a> {
    pub gene: &'a str,
    pub sequence: &'a str,
    pub change: Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionWrite<'a> {
    pub gene: &'a str,
    pub samples: &'a Samples,
    pub change: Change,
}

/// Per-gene decisions for one reconciliation run
#[derive(Debug, Default)]
pub struct ReconcilePlan<'a> {
    pub sequences: Vec<SequenceWrite<'a>>,
    pub expressions: Vec<ExpressionWrite<'a>>,
}

impl<'a> ReconcilePlan<'a> {
    /// Compare parsed data against the stored snapshot
    pub fn build(
        snapshot: &StoreSnapshot,
        sequences: &'a SequenceMap,
        expressions: &'a ExpressionMap,
    ) -> Self {
        let sequence_writes = sequences
            .iter()
            .map(|(gene, sequence)| {
                let change = match snapshot.get(gene.as_str()) {
                    None => Change::Create,
                    Some(stored) if stored.sequence != *sequence => Change::Update,
                    Some(_) => Change::Unchanged,
                };
                SequenceWrite {
                    gene,
                    sequence,
                    change,
                }
            })
            .collect();

        let expression_writes = expressions
            .iter()
            .map(|(gene, samples)| {
                let change = match snapshot.get(gene.as_str()) {
                    Some(StoredGene {
                        expression: Some(stored),
                        ..
                    }) if stored == samples => Change::Unchanged,
                    Some(StoredGene {
                        expression: Some(_),
                        ..
                    }) => Change::Update,
                    Some(StoredGene {
                        expression: None, ..
                    }) => Change::Create,
                    None if sequences.contains_key(gene) => Change::Create,
                    None => Change::Skip,
                };
                ExpressionWrite {
                    gene,
                    samples,
                    change,
                }
            })
            .collect();

        Self {
            sequences: sequence_writes,
            expressions: expression_writes,
        }
    }

    /// Counts the plan will produce once applied
    pub fn stats(&self) -> ReconcileStats {
        let count_seq = |c: Change| self.sequences.iter().filter(|w| w.change == c).count();
        let count_expr = |c: Change| self.expressions.iter().filter(|w| w.change == c).count();

        ReconcileStats {
            sequences_created: count_seq(Change::Create),
            sequences_updated: count_seq(Change::Update),
            expressions_created: count_expr(Change::Create),
            expressions_updated: count_expr(Change::Update),
            expressions_skipped: count_expr(Change::Skip),
        }
    }

    fn pending_sequences(&self) -> impl Iterator<Item = &SequenceWrite<'a>> {
        self.sequences
            .iter()
            .filter(|w| matches!(w.change, Change::Create | Change::Update))
    }

    fn pending_expressions(&self) -> impl Iterator<Item = &ExpressionWrite<'a>> {
        self.expressions
            .iter()
            .filter(|w| matches!(w.change, Change::Create | Change::Update))
    }
}

/// Counts reported after a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub sequences_created: usize,
    pub sequences_updated: usize,
    pub expressions_created: usize,
    pub expressions_updated: usize,
    pub expressions_skipped: usize,
}

impl ReconcileStats {
    /// True when the run left the store untouched
    pub fn is_noop(&self) -> bool {
        self.sequences_created == 0
            && self.sequences_updated == 0
            && self.expressions_created == 0
            && self.expressions_updated == 0
    }
}

impl std::fmt::Display for ReconcileStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Created sequences: {}; Updated sequences: {}; Created expressions: {}; \
             Updated expressions: {}; Skipped expressions: {}",
            self.sequences_created,
            self.sequences_updated,
            self.expressions_created,
            self.expressions_updated,
            self.expressions_skipped
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StoredGeneRow {
    gene_name: String,
    sequence: String,
    has_expression: bool,
    sample1: Option<i32>,
    sample2: Option<i32>,
    sample3: Option<i32>,
    sample4: Option<i32>,
    sample5: Option<i32>,
    sample6: Option<i32>,
}

impl StoredGeneRow {
    fn into_entry(self) -> (String, StoredGene) {
        let expression = self.has_expression.then(|| {
            [
                self.sample1.unwrap_or(0),
                self.sample2.unwrap_or(0),
                self.sample3.unwrap_or(0),
                self.sample4.unwrap_or(0),
                self.sample5.unwrap_or(0),
                self.sample6.unwrap_or(0),
            ]
        });

        (
            self.gene_name,
            StoredGene {
                sequence: self.sequence,
                expression,
            },
        )
    }
}

/// Writes parsed sequences and expressions into PostgreSQL
#[derive(Clone)]
pub struct Reconciler {
    db: PgPool,
}

impl Reconciler {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Reconcile parsed data with the store in one transaction
    #[tracing::instrument(
        skip(self, sequences, expressions),
        fields(sequences = sequences.len(), expressions = expressions.len())
    )]
    pub async fn reconcile(
        &self,
        sequences: &SequenceMap,
        expressions: &ExpressionMap,
    ) -> Result<ReconcileStats, ReconcileError> {
        let mut tx = self.db.begin().await?;

        let snapshot = load_snapshot(&mut tx, sequences, expressions).await?;
        debug!(stored = snapshot.len(), "Loaded store snapshot");

        let plan = ReconcilePlan::build(&snapshot, sequences, expressions);
        let stats = plan.stats();

        // Sequences first so expressions for new genes can resolve their owner.
        for write in plan.pending_sequences() {
            write_sequence(&mut tx, write).await?;
        }

        for write in plan.pending_expressions() {
            write_expression(&mut tx, write).await?;
        }

        tx.commit().await?;

        info!(
            sequences_created = stats.sequences_created,
            sequences_updated = stats.sequences_updated,
            expressions_created = stats.expressions_created,
            expressions_updated = stats.expressions_updated,
            expressions_skipped = stats.expressions_skipped,
            "Reconciliation committed"
        );

        Ok(stats)
    }
}

async fn load_snapshot(
    tx: &mut Transaction<'_, Postgres>,
    sequences: &SequenceMap,
    expressions: &ExpressionMap,
) -> Result<StoreSnapshot, sqlx::Error> {
    let mut genes: Vec<String> = sequences.keys().cloned().collect();
    genes.extend(
        expressions
            .keys()
            .filter(|gene| !sequences.contains_key(*gene))
            .cloned(),
    );

    if genes.is_empty() {
        return Ok(StoreSnapshot::new());
    }

    let rows = sqlx::query_as::<_, StoredGeneRow>(
        r#"
        SELECT
            p.gene_name,
            p.sequence,
            e.id IS NOT NULL AS has_expression,
            e.sample1, e.sample2, e.sample3, e.sample4, e.sample5, e.sample6
        FROM protein_sequences p
        LEFT JOIN gene_expressions e ON e.protein_id = p.id
        WHERE p.gene_name = ANY($1)
        "#,
    )
    .bind(&genes)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(StoredGeneRow::into_entry).collect())
}

async fn write_sequence(
    tx: &mut Transaction<'_, Postgres>,
    write: &SequenceWrite<'_>,
) -> Result<(), sqlx::Error> {
    match write.change {
        Change::Create => {
            sqlx::query("INSERT INTO protein_sequences (gene_name, sequence) VALUES ($1, $2)")
                .bind(write.gene)
                .bind(write.sequence)
                .execute(&mut **tx)
                .await?;
            debug!(gene = write.gene, "Sequence created");
        },
        Change::Update => {
            sqlx::query(
                "UPDATE protein_sequences SET sequence = $2, updated_at = NOW() WHERE gene_name = $1",
            )
            .bind(write.gene)
            .bind(write.sequence)
            .execute(&mut **tx)
            .await?;
            debug!(gene = write.gene, "Sequence updated");
        },
        Change::Unchanged | Change::Skip => {},
    }

    Ok(())
}

async fn write_expression(
    tx: &mut Transaction<'_, Postgres>,
    write: &ExpressionWrite<'_>,
) -> Result<(), sqlx::Error> {
    let sql = match write.change {
        Change::Create => {
            r#"
            INSERT INTO gene_expressions
                (protein_id, sample1, sample2, sample3, sample4, sample5, sample6)
            SELECT id, $2, $3, $4, $5, $6, $7
            FROM protein_sequences
            WHERE gene_name = $1
            "#
        },
        Change::Update => {
            r#"
            UPDATE gene_expressions e
            SET sample1 = $2, sample2 = $3, sample3 = $4,
                sample4 = $5, sample5 = $6, sample6 = $7,
                updated_at = NOW()
            FROM protein_sequences p
            WHERE e.protein_id = p.id AND p.gene_name = $1
            "#
        },
        Change::Unchanged | Change::Skip => return Ok(()),
    };

    let mut query = sqlx::query(sql).bind(write.gene);
    for value in write.samples {
        query = query.bind(*value);
    }
    query.execute(&mut **tx).await?;

    debug!(gene = write.gene, change = ?write.change, "Expression written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sequences(entries: &[(&str, &str)]) -> SequenceMap {
        entries
            .iter()
            .map(|(g, s)| (g.to_string(), s.to_string()))
            .collect()
    }

    fn expressions(entries: &[(&str, Samples)]) -> ExpressionMap {
        entries.iter().map(|(g, v)| (g.to_string(), *v)).collect()
    }

    /// Mirror of what the SQL writes do, for checking idempotence without a database
    fn apply(snapshot: &mut StoreSnapshot, plan: &ReconcilePlan<'_>) {
        for write in plan.pending_sequences() {
            snapshot
                .entry(write.gene.to_string())
                .and_modify(|stored| stored.sequence = write.sequence.to_string())
                .or_insert_with(|| StoredGene {
                    sequence: write.sequence.to_string(),
                    expression: None,
                });
        }
        for write in plan.pending_expressions() {
            if let Some(stored) = snapshot.get_mut(write.gene) {
                stored.expression = Some(*write.samples);
            }
        }
    }

    #[test]
    fn test_plan_on_empty_store_creates_everything_known() {
        let seqs = sequences(&[("GeneA", "AAA"), ("GeneB", "BBBB")]);
        let exprs = expressions(&[("GeneA", [1, 2, 3, 4, 0, 6]), ("Orphan", [1; 6])]);

        let plan = ReconcilePlan::build(&StoreSnapshot::new(), &seqs, &exprs);
        let stats = plan.stats();

        assert_eq!(stats.sequences_created, 2);
        assert_eq!(stats.sequences_updated, 0);
        assert_eq!(stats.expressions_created, 1);
        assert_eq!(stats.expressions_updated, 0);
        assert_eq!(stats.expressions_skipped, 1);
        assert!(!stats.is_noop());
    }

    #[test]
    fn test_second_run_is_noop() {
        let seqs = sequences(&[("GeneA", "AAA"), ("GeneB", "BBBB")]);
        let exprs = expressions(&[("GeneA", [1, 2, 3, 4, 0, 6]), ("GeneB", [6, 5, 4, 3, 2, 1])]);
        let mut snapshot = StoreSnapshot::new();

        let first = ReconcilePlan::build(&snapshot, &seqs, &exprs);
        apply(&mut snapshot, &first);

        let second = ReconcilePlan::build(&snapshot, &seqs, &exprs);
        let stats = second.stats();

        assert!(stats.is_noop());
        assert_eq!(second.pending_sequences().count(), 0);
        assert_eq!(second.pending_expressions().count(), 0);
    }

    #[test]
    fn test_changed_sequence_is_updated() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.insert(
            "GeneA".to_string(),
            StoredGene {
                sequence: "AAA".to_string(),
                expression: None,
            },
        );
        let seqs = sequences(&[("GeneA", "AAAC")]);
        let no_expressions = ExpressionMap::new();

        let plan = ReconcilePlan::build(&snapshot, &seqs, &no_expressions);

        assert_eq!(plan.sequences[0].change, Change::Update);
        assert_eq!(plan.stats().sequences_updated, 1);
    }

    #[test]
    fn test_expression_update_when_any_sample_differs() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.insert(
            "GeneA".to_string(),
            StoredGene {
                sequence: "AAA".to_string(),
                expression: Some([1, 2, 3, 4, 5, 6]),
            },
        );

        let no_sequences = SequenceMap::new();

        let same = expressions(&[("GeneA", [1, 2, 3, 4, 5, 6])]);
        let plan = ReconcilePlan::build(&snapshot, &no_sequences, &same);
        assert_eq!(plan.expressions[0].change, Change::Unchanged);

        let changed = expressions(&[("GeneA", [1, 2, 3, 4, 5, 7])]);
        let plan = ReconcilePlan::build(&snapshot, &no_sequences, &changed);
        assert_eq!(plan.expressions[0].change, Change::Update);
    }

    #[test]
    fn test_expression_for_stored_gene_without_sequence_in_file() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.insert(
            "GeneA".to_string(),
            StoredGene {
                sequence: "AAA".to_string(),
                expression: None,
            },
        );
        let exprs = expressions(&[("GeneA", [0; 6])]);
        let no_sequences = SequenceMap::new();

        let plan = ReconcilePlan::build(&snapshot, &no_sequences, &exprs);

        assert_eq!(plan.expressions[0].change, Change::Create);
    }

    #[test]
    fn test_stats_display() {
        let stats = ReconcileStats {
            sequences_created: 2,
            expressions_created: 1,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("Created sequences: 2"));
        assert!(text.contains("Created expressions: 1"));
        assert!(text.contains("Updated expressions: 0"));
    }

    async fn count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_reconcile_twice_reports_no_changes(pool: PgPool) -> sqlx::Result<()> {
        let seqs = sequences(&[("GeneA", "AAA"), ("GeneB", "BBBB")]);
        let exprs = expressions(&[("GeneA", [1, 2, 3, 4, 0, 6]), ("Unknown", [1; 6])]);
        let reconciler = Reconciler::new(pool.clone());

        let first = reconciler.reconcile(&seqs, &exprs).await.unwrap();
        assert_eq!(first.sequences_created, 2);
        assert_eq!(first.expressions_created, 1);
        assert_eq!(first.expressions_skipped, 1);

        let second = reconciler.reconcile(&seqs, &exprs).await.unwrap();
        assert!(second.is_noop());

        assert_eq!(count(&pool, "protein_sequences").await, 2);
        assert_eq!(count(&pool, "gene_expressions").await, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_reconcile_overwrites_changed_values(pool: PgPool) -> sqlx::Result<()> {
        let reconciler = Reconciler::new(pool.clone());
        reconciler
            .reconcile(
                &sequences(&[("GeneA", "AAA")]),
                &expressions(&[("GeneA", [1; 6])]),
            )
            .await
            .unwrap();

        let stats = reconciler
            .reconcile(
                &sequences(&[("GeneA", "AAAT")]),
                &expressions(&[("GeneA", [2; 6])]),
            )
            .await
            .unwrap();
        assert_eq!(stats.sequences_updated, 1);
        assert_eq!(stats.expressions_updated, 1);

        let stored: (String, i32) = sqlx::query_as(
            "SELECT p.sequence, e.sample6 FROM protein_sequences p \
             JOIN gene_expressions e ON e.protein_id = p.id WHERE p.gene_name = 'GeneA'",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(stored, ("AAAT".to_string(), 2));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_failed_write_rolls_back_batch(pool: PgPool) -> sqlx::Result<()> {
        let too_long = "Z".repeat(300);
        let seqs = sequences(&[("AAA", "MK"), (too_long.as_str(), "MK")]);

        let result = Reconciler::new(pool.clone())
            .reconcile(&seqs, &ExpressionMap::new())
            .await;

        assert!(matches!(result, Err(ReconcileError::Database(_))));
        assert_eq!(count(&pool, "protein_sequences").await, 0);
        Ok(())
    }
}
