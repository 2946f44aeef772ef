//! FASTA parser
//!
//! Reads multi-record FASTA text into a gene -> sequence mapping.
//!
//! # Format
//! ```text
//! >GeneA optional description
//! MKTAYIAKQR
//! QISFVKSHFS
//! >GeneB
//! MSDNE
//! ```
//!
//! The gene key is the first whitespace-delimited token after `>`. Sequence
//! lines are trimmed and concatenated until the next header. When a key shows
//! up again later in the file its fragments are appended to the earlier ones
//! in file order.

use std::path::Path;

use genevault_common::types::SequenceMap;
use genevault_common::Result;
use tracing::debug;

/// Record marker that opens a FASTA header line
pub const RECORD_MARKER: char = '>';

/// Parser for FASTA sequence files
#[derive(Debug, Default, Clone, Copy)]
pub struct FastaParser;

impl FastaParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a FASTA file from disk
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<SequenceMap> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(self.parse(&content))
    }

    /// Parse FASTA text
    ///
    /// Lines before the first header are ignored, as are blank lines and the
    /// body of any header that carries no gene token.
    pub fn parse(&self, content: &str) -> SequenceMap {
        let mut sequences = SequenceMap::new();
        let mut current: Option<String> = None;

        for (line_num, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix(RECORD_MARKER) {
                current = header.split_whitespace().next().map(str::to_string);
                match current {
                    Some(ref gene) => {
                        sequences.entry(gene.clone()).or_default();
                    },
                    None => debug!(line = line_num + 1, "Header without gene identifier"),
                }
                continue;
            }

            if let Some(ref gene) = current {
                if let Some(sequence) = sequences.get_mut(gene) {
                    sequence.push_str(line.trim());
                }
            }
        }

        debug!("Parsed {} sequences", sequences.len());
        sequences
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use genevault_common::GeneVaultError;
    use std::io::Write;

    #[test]
    fn test_parse_multiline_with_description() {
        let parsed = FastaParser::new().parse(">GeneA desc\nAA\nBB\n>GeneB\nCCC\n");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["GeneA"], "AABB");
        assert_eq!(parsed["GeneB"], "CCC");
    }

    #[test]
    fn test_repeated_header_appends_in_file_order() {
        let parsed = FastaParser::new().parse(">G\nAA\n>H\nTT\n>G\nBB\n");

        assert_eq!(parsed["G"], "AABB");
        assert_eq!(parsed["H"], "TT");
    }

    #[test]
    fn test_empty_input() {
        assert!(FastaParser::new().parse("").is_empty());
    }

    #[test]
    fn test_preamble_and_blank_lines_ignored() {
        let parsed = FastaParser::new().parse("junk before\n\n>GeneA\n\nMK\n\nTA\n");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["GeneA"], "MKTA");
    }

    #[test]
    fn test_crlf_and_padding_stripped() {
        let parsed = FastaParser::new().parse(">GeneA  extra words\r\n  MK \r\nTA\r\n");

        assert_eq!(parsed["GeneA"], "MKTA");
    }

    #[test]
    fn test_header_without_token_starts_no_record() {
        let parsed = FastaParser::new().parse(">GeneA\nMK\n>\nZZZ\n>GeneB\nTT\n");

        assert_eq!(parsed["GeneA"], "MK");
        assert_eq!(parsed["GeneB"], "TT");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_header_only_record_is_kept_empty() {
        let parsed = FastaParser::new().parse(">Lonely\n>GeneA\nMK\n");

        assert_eq!(parsed["Lonely"], "");
        assert_eq!(parsed["GeneA"], "MK");
    }

    #[test]
    fn test_gene_keys_are_case_sensitive() {
        let parsed = FastaParser::new().parse(">gene\nAA\n>GENE\nBB\n");

        assert_eq!(parsed["gene"], "AA");
        assert_eq!(parsed["GENE"], "BB");
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">GeneA\nAA\n>GeneA\nCC\n").unwrap();

        let parsed = FastaParser::new().parse_file(file.path()).unwrap();
        assert_eq!(parsed["GeneA"], "AACC");
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let result = FastaParser::new().parse_file("/nonexistent/genes.fasta");
        assert!(matches!(result, Err(GeneVaultError::Io(_))));
    }
}
