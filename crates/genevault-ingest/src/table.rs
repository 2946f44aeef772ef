//! Expression table parser
//!
//! Parses tab-separated expression tables into gene -> six sample values.
//! Two layouts are accepted, told apart by the shape of the first line only:
//!
//! **Wide** - header row followed by `gene, s1..s6` rows:
//! ```text
//! Gene    Sample1 Sample2 Sample3 Sample4 Sample5 Sample6
//! GeneA   1       2       3       4       0       6
//! ```
//!
//! **Paired** - no header, twelve columns alternating name and value:
//! ```text
//! GeneA   1   GeneA   2   GeneA   3   GeneA   4   GeneA   0   GeneA   6
//! ```
//!
//! Rows with the wrong number of fields are skipped, and unparsable values
//! become 0. A later row for a gene replaces an earlier one.

use std::path::Path;

use genevault_common::types::{ExpressionMap, Samples, SAMPLE_COUNT};
use genevault_common::Result;
use tracing::debug;

const FIELD_SEPARATOR: char = '\t';

/// Field count of a wide-layout row (gene + samples)
pub const WIDE_FIELD_COUNT: usize = SAMPLE_COUNT + 1;

/// Minimum field count of a paired-layout row (name/value per sample)
pub const PAIRED_MIN_FIELDS: usize = SAMPLE_COUNT * 2;

/// Row layout of an expression table, decided once from the first line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// Header line, then exactly 7 fields per row
    Wide,
    /// No header, at least 12 fields per row with values at odd positions
    Paired,
}

impl TableLayout {
    /// Classify a table by its first line
    ///
    /// Seven fields with a non-numeric leading field mean a header row, so the
    /// table is wide. Anything else is treated as paired data.
    pub fn detect(first_line: &str) -> Self {
        let fields: Vec<&str> = first_line.split(FIELD_SEPARATOR).collect();

        if fields.len() == WIDE_FIELD_COUNT && !is_numeric(fields[0]) {
            TableLayout::Wide
        } else {
            TableLayout::Paired
        }
    }

    /// Whether the first line is a header to discard
    pub fn has_header(self) -> bool {
        matches!(self, TableLayout::Wide)
    }

    /// Parse one row under this layout
    ///
    /// Returns `None` for rows that don't fit the layout.
    pub fn parse_row(self, line: &str) -> Option<(String, Samples)> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

        let value_at: fn(usize) -> usize = match self {
            TableLayout::Wide if fields.len() == WIDE_FIELD_COUNT => |i| i + 1,
            TableLayout::Paired if fields.len() >= PAIRED_MIN_FIELDS => |i| i * 2 + 1,
            _ => return None,
        };

        let gene = fields[0].trim();
        if gene.is_empty() {
            return None;
        }

        let mut samples: Samples = [0; SAMPLE_COUNT];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = parse_value(fields[value_at(i)]);
        }

        Some((gene.to_string(), samples))
    }
}

/// Parser for expression tables
#[derive(Debug, Default, Clone, Copy)]
pub struct TableParser;

impl TableParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse an expression table from disk
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ExpressionMap> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(self.parse(&content))
    }

    /// Parse expression table text
    pub fn parse(&self, content: &str) -> ExpressionMap {
        let mut expressions = ExpressionMap::new();
        let mut lines = content.lines().peekable();

        let Some(first_line) = lines.peek() else {
            return expressions;
        };

        let layout = TableLayout::detect(first_line);
        debug!(?layout, "Detected expression table layout");

        if layout.has_header() {
            lines.next();
        }

        let mut skipped = 0usize;
        for line in lines {
            match layout.parse_row(line) {
                Some((gene, samples)) => {
                    expressions.insert(gene, samples);
                },
                None => skipped += 1,
            }
        }

        debug!(
            parsed = expressions.len(),
            skipped,
            "Parsed expression table"
        );
        expressions
    }
}

fn is_numeric(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_digit())
}

fn parse_value(field: &str) -> i32 {
    field.trim().parse().unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAIRED_ROW: &str = "GeneA\t1\tGeneA\t2\tGeneA\t3\tGeneA\t4\tGeneA\t0\tGeneA\t6";

    #[test]
    fn test_detect_wide_header() {
        assert_eq!(
            TableLayout::detect("Gene\tS1\tS2\tS3\tS4\tS5\tS6"),
            TableLayout::Wide
        );
    }

    #[test]
    fn test_detect_numeric_first_field_is_paired() {
        assert_eq!(TableLayout::detect("42\t1\t2\t3\t4\t5\t6"), TableLayout::Paired);
    }

    #[test]
    fn test_detect_twelve_columns_is_paired() {
        assert_eq!(TableLayout::detect(PAIRED_ROW), TableLayout::Paired);
    }

    #[test]
    fn test_parse_wide_with_header() {
        let parsed =
            TableParser::new().parse("Gene\tS1\tS2\tS3\tS4\tS5\tS6\nGeneA\t1\t2\t3\t4\t0\t6\n");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["GeneA"], [1, 2, 3, 4, 0, 6]);
    }

    #[test]
    fn test_parse_paired_without_header() {
        let parsed = TableParser::new().parse(&format!("{}\n", PAIRED_ROW));

        assert_eq!(parsed["GeneA"], [1, 2, 3, 4, 0, 6]);
    }

    #[test]
    fn test_wide_skips_rows_with_wrong_field_count() {
        let content = "Gene\tS1\tS2\tS3\tS4\tS5\tS6\n\
                       GeneA\t1\t2\t3\n\
                       GeneB\t1\t2\t3\t4\t5\t6\t7\n\
                       GeneC\t6\t5\t4\t3\t2\t1\n";
        let parsed = TableParser::new().parse(content);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["GeneC"], [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_paired_skips_short_rows() {
        let content = format!("GeneX\t1\tGeneX\t2\n{}\n", PAIRED_ROW);
        let parsed = TableParser::new().parse(&content);

        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains_key("GeneA"));
    }

    #[test]
    fn test_invalid_values_become_zero() {
        let parsed =
            TableParser::new().parse("Gene\tS1\tS2\tS3\tS4\tS5\tS6\nGeneA\tx\t2\t\t4\t1.5\t 6 \n");

        assert_eq!(parsed["GeneA"], [0, 2, 0, 4, 0, 6]);
    }

    #[test]
    fn test_paired_last_row_wins() {
        let content = format!(
            "{}\nGeneA\t9\tGeneA\t9\tGeneA\t9\tGeneA\t9\tGeneA\t9\tGeneA\t9\n",
            PAIRED_ROW
        );
        let parsed = TableParser::new().parse(&content);

        assert_eq!(parsed["GeneA"], [9; 6]);
    }

    #[test]
    fn test_paired_ignores_trailing_columns() {
        let content = format!("{}\textra\t99\n", PAIRED_ROW);
        let parsed = TableParser::new().parse(&content);

        assert_eq!(parsed["GeneA"], [1, 2, 3, 4, 0, 6]);
    }

    #[test]
    fn test_paired_uses_first_name_column() {
        let parsed = TableParser::new()
            .parse("GeneA\t1\tOther\t2\tOther\t3\tOther\t4\tOther\t5\tOther\t6\n");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["GeneA"], [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_gene_names_are_trimmed() {
        let wide = TableParser::new()
            .parse("Gene\tS1\tS2\tS3\tS4\tS5\tS6\n GeneA \t1\t2\t3\t4\t5\t6\n");
        assert_eq!(wide.len(), 1);
        assert_eq!(wide["GeneA"], [1, 2, 3, 4, 5, 6]);

        let paired = TableParser::new()
            .parse(" GeneB\t1\tGeneB\t2\tGeneB\t3\tGeneB\t4\tGeneB\t5\tGeneB\t6\n");
        assert!(paired.contains_key("GeneB"));
        assert!(!paired.contains_key(" GeneB"));
    }

    #[test]
    fn test_blank_gene_name_skipped() {
        let parsed = TableParser::new()
            .parse("Gene\tS1\tS2\tS3\tS4\tS5\tS6\n  \t1\t2\t3\t4\t5\t6\nGeneA\t0\t0\t0\t0\t0\t0\n");

        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains_key("GeneA"));
    }

    #[test]
    fn test_header_only_and_empty_input() {
        assert!(TableParser::new().parse("").is_empty());
        assert!(TableParser::new().parse("Gene\tS1\tS2\tS3\tS4\tS5\tS6\n").is_empty());
    }

    #[test]
    fn test_layout_decided_from_first_line_only() {
        // A seven-column data row after paired rows is not reinterpreted as wide.
        let content = format!("{}\nGeneB\t1\t2\t3\t4\t5\t6\n", PAIRED_ROW);
        let parsed = TableParser::new().parse(&content);

        assert_eq!(parsed.len(), 1);
        assert!(!parsed.contains_key("GeneB"));
    }

    #[test]
    fn test_negative_and_signed_values() {
        let parsed =
            TableParser::new().parse("Gene\tS1\tS2\tS3\tS4\tS5\tS6\nGeneA\t-1\t+2\t3\t4\t5\t6\n");

        assert_eq!(parsed["GeneA"], [-1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", PAIRED_ROW).unwrap();

        let parsed = TableParser::new().parse_file(file.path()).unwrap();
        assert_eq!(parsed["GeneA"], [1, 2, 3, 4, 0, 6]);
    }
}
