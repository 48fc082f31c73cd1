//! Read-only views of search results for structured and tabular output.

use serde::Serialize;

use crate::core::alignment::SearchResult;
use crate::core::database::{DatabaseSummary, ReferenceDatabase};
use crate::core::types::ImplementationName;

/// Column names of the BLAST-style tabular output, in order
pub const TABULAR_COLUMNS: [&str; 12] = [
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore",
];

/// One alignment, flattened for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentRecord {
    #[serde(rename = "evalue")]
    pub e_value: f64,
    #[serde(rename = "bitscore")]
    pub bit_score: i64,
    #[serde(rename = "percentid")]
    pub percent_identity: f64,
    pub mismatches: usize,
    #[serde(rename = "gapopens")]
    pub gap_opens: usize,

    #[serde(rename = "queryid")]
    pub query_id: String,
    #[serde(rename = "queryalignseq")]
    pub query_aligned_sequence: String,
    #[serde(rename = "querylenseq")]
    pub query_sequence_length: u64,
    #[serde(rename = "queryalignstart")]
    pub query_alignment_start: u64,
    #[serde(rename = "queryalignlen")]
    pub query_alignment_length: u64,

    #[serde(rename = "targetid")]
    pub target_id: String,
    #[serde(rename = "targetalignseq")]
    pub target_aligned_sequence: String,
    #[serde(rename = "targetlenseq")]
    pub target_sequence_length: u64,
    #[serde(rename = "targetalignstart")]
    pub target_alignment_start: u64,
    #[serde(rename = "targetalignlen")]
    pub target_alignment_length: u64,
}

impl From<&SearchResult> for AlignmentRecord {
    fn from(result: &SearchResult) -> Self {
        let query = result.query();
        let target = result.target();
        Self {
            e_value: result.e_value(),
            bit_score: result.bit_score(),
            percent_identity: result.percent_identity(),
            mismatches: result.mismatches(),
            gap_opens: result.gap_open_count(),
            query_id: query.id.clone(),
            query_aligned_sequence: query.aligned_sequence.clone(),
            query_sequence_length: query.sequence_length,
            query_alignment_start: query.alignment_start,
            query_alignment_length: query.alignment_length,
            target_id: target.id.clone(),
            target_aligned_sequence: target.aligned_sequence.clone(),
            target_sequence_length: target.sequence_length,
            target_alignment_start: target.alignment_start,
            target_alignment_length: target.alignment_length,
        }
    }
}

/// Full report of one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    #[serde(rename = "impl")]
    pub implementation: ImplementationName,
    pub database: DatabaseSummary,
    pub alignments: Vec<AlignmentRecord>,
}

impl SearchReport {
    #[must_use]
    pub fn new(database: &ReferenceDatabase, results: &[SearchResult]) -> Self {
        Self {
            implementation: database.implementation(),
            database: database.summary(),
            alignments: results.iter().map(AlignmentRecord::from).collect(),
        }
    }
}

/// Format a result as a BLAST tabular (outfmt 6) line, without trailing newline.
///
/// Percent identity is scaled to 0-100, coordinates are 1-based inclusive and
/// the e-value is written in scientific notation.
#[must_use]
pub fn tabular_row(result: &SearchResult) -> String {
    let query = result.query();
    let target = result.target();
    format!(
        "{}\t{}\t{:.2}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:e}\t{}",
        query.id,
        target.id,
        result.percent_identity() * 100.0,
        result.alignment_length(),
        result.mismatches(),
        result.gap_open_count(),
        query.one_based_start(),
        query.one_based_end(),
        target.one_based_start(),
        target.one_based_end(),
        result.e_value(),
        result.bit_score(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::AlignedSequence;
    use crate::core::types::Strand;

    fn example_result() -> SearchResult {
        SearchResult::new(
            AlignedSequence::new("q1", 50, "AC-GT", 9, 4, Strand::Forward),
            AlignedSequence::new("t1", 80, "ACTGT", 19, 5, Strand::Forward),
            2.5e-5,
            49,
        )
        .unwrap()
    }

    #[test]
    fn test_tabular_row() {
        let row = tabular_row(&example_result());
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields.len(), TABULAR_COLUMNS.len());
        assert_eq!(
            fields,
            vec!["q1", "t1", "80.00", "5", "0", "1", "10", "13", "20", "24", "2.5e-5", "49"]
        );
    }

    #[test]
    fn test_tabular_row_tiny_evalue() {
        let result = SearchResult::new(
            AlignedSequence::new("q1", 50, "ACGT", 0, 4, Strand::Forward),
            AlignedSequence::new("t1", 80, "ACGT", 0, 4, Strand::Forward),
            1e-150,
            512,
        )
        .unwrap();
        let row = tabular_row(&result);
        let evalue = row.split('\t').nth(10).unwrap();
        assert_eq!(evalue, "1e-150");
        assert_eq!(evalue.parse::<f64>().unwrap(), 1e-150);
    }

    #[test]
    fn test_alignment_record_json_fields() {
        let record = AlignmentRecord::from(&example_result());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["queryid"], "q1");
        assert_eq!(json["targetid"], "t1");
        assert_eq!(json["bitscore"], 49);
        assert_eq!(json["queryalignseq"], "AC-GT");
        assert_eq!(json["targetalignstart"], 19);
        assert_eq!(json["gapopens"], 1);
        assert!((json["percentid"].as_f64().unwrap() - 0.8).abs() < 1e-9);
    }
}
