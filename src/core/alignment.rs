use serde::Serialize;

use crate::core::types::Strand;
use crate::homology::scoring::AlignmentStats;
use crate::homology::HomologyError;

/// One side of a pairwise alignment as reported by the aligner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedSequence {
    /// Sequence identifier
    pub id: String,

    /// Length of the full, ungapped sequence
    pub sequence_length: u64,

    /// Aligned residues, with `-` marking gaps
    pub aligned_sequence: String,

    /// 0-based start of the alignment in the ungapped sequence
    pub alignment_start: u64,

    /// Length of the aligned region as reported by the aligner
    pub alignment_length: u64,

    pub strand: Strand,
}

impl AlignedSequence {
    pub fn new(
        id: impl Into<String>,
        sequence_length: u64,
        aligned_sequence: impl Into<String>,
        alignment_start: u64,
        alignment_length: u64,
        strand: Strand,
    ) -> Self {
        Self {
            id: id.into(),
            sequence_length,
            aligned_sequence: aligned_sequence.into(),
            alignment_start,
            alignment_length,
            strand,
        }
    }

    /// Number of alignment columns, gaps included
    pub fn alignment_length_with_gaps(&self) -> usize {
        self.aligned_sequence.len()
    }

    /// 1-based inclusive start coordinate
    pub fn one_based_start(&self) -> u64 {
        self.alignment_start + 1
    }

    /// 1-based inclusive end coordinate
    pub fn one_based_end(&self) -> u64 {
        self.alignment_start + self.alignment_length
    }
}

/// A scored alignment between the query and one database sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    query: AlignedSequence,
    target: AlignedSequence,
    e_value: f64,
    bit_score: i64,
    stats: AlignmentStats,
}

impl SearchResult {
    /// Build a result, deriving identity, mismatch and gap-open counts.
    ///
    /// # Errors
    ///
    /// Returns `HomologyError::MalformedOutput` if the query and target
    /// alignments differ in length.
    pub fn new(
        query: AlignedSequence,
        target: AlignedSequence,
        e_value: f64,
        bit_score: i64,
    ) -> Result<Self, HomologyError> {
        if query.alignment_length_with_gaps() != target.alignment_length_with_gaps() {
            return Err(HomologyError::MalformedOutput(format!(
                "Alignment of {} ({} columns) and {} ({} columns) differ in length",
                query.id,
                query.alignment_length_with_gaps(),
                target.id,
                target.alignment_length_with_gaps()
            )));
        }
        let stats = AlignmentStats::compute(&query.aligned_sequence, &target.aligned_sequence);
        Ok(Self {
            query,
            target,
            e_value,
            bit_score,
            stats,
        })
    }

    pub fn query(&self) -> &AlignedSequence {
        &self.query
    }

    pub fn target(&self) -> &AlignedSequence {
        &self.target
    }

    pub fn e_value(&self) -> f64 {
        self.e_value
    }

    pub fn bit_score(&self) -> i64 {
        self.bit_score
    }

    /// Alignment length including gaps
    pub fn alignment_length(&self) -> usize {
        self.query.alignment_length_with_gaps()
    }

    pub fn matches(&self) -> usize {
        self.stats.matches
    }

    pub fn mismatches(&self) -> usize {
        self.stats.mismatches
    }

    pub fn gap_open_count(&self) -> usize {
        self.stats.gap_opens
    }

    /// Fraction of alignment columns holding identical residues
    pub fn percent_identity(&self) -> f64 {
        self.stats.percent_identity
    }
}
