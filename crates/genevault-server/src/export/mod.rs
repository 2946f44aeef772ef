//! Download formatting
//!
//! Renders found sequences as FASTA and expression rows as TSV. Nothing here
//! touches the database; callers hand over already-fetched records.

use genevault_common::types::{Samples, SAMPLE_NAMES};

/// Content type of FASTA downloads
pub const FASTA_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Content type of expression table downloads
pub const TSV_CONTENT_TYPE: &str = "text/tab-separated-values";

/// Filename of expression table downloads
pub const EXPRESSIONS_FILENAME: &str = "expressions.tsv";

/// File extension offered for FASTA downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceExtension {
    Fa,
    #[default]
    Fasta,
}

impl SequenceExtension {
    /// Interpret the `ext` query parameter; unknown values fall back to `fasta`
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("fa") => SequenceExtension::Fa,
            _ => SequenceExtension::Fasta,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SequenceExtension::Fa => "fa",
            SequenceExtension::Fasta => "fasta",
        }
    }

    pub fn filename(self) -> String {
        format!("sequences.{}", self.as_str())
    }
}

/// Interpret the `wrap` query parameter
///
/// Missing, non-integer and negative values all mean "no wrapping" (0).
pub fn parse_wrap(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

/// Render FASTA text
///
/// Records are written sorted by gene. Line breaks inside stored sequences
/// are dropped, then the sequence is split into `wrap`-wide lines when
/// `wrap > 0`.
pub fn format_fasta<'a, I>(records: I, wrap: usize) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut records: Vec<(&str, &str)> = records.into_iter().collect();
    records.sort_by(|a, b| a.0.cmp(b.0));

    let mut lines: Vec<String> = Vec::new();
    for (gene, sequence) in records {
        lines.push(format!(">{}", gene));

        let flat: String = sequence.chars().filter(|c| *c != '\r' && *c != '\n').collect();
        if wrap == 0 {
            lines.push(flat);
        } else {
            let chars: Vec<char> = flat.chars().collect();
            lines.extend(chars.chunks(wrap).map(|chunk| chunk.iter().collect::<String>()));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the expression table, rows in the order given
pub fn format_expression_tsv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Samples)>,
{
    let mut out = format!("Gene\t{}\n", SAMPLE_NAMES.join("\t"));

    for (gene, values) in rows {
        let values: Vec<String> = values.iter().map(i32::to_string).collect();
        out.push_str(gene);
        out.push('\t');
        out.push_str(&values.join("\t"));
        out.push('\n');
    }

    out
}
