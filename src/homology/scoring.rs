//! Alignment statistics: Karlin–Altschul bit scores and the identity,
//! mismatch and gap-open counts derived from a pair of aligned rows.

/// Character marking a gap in an aligned row
pub const GAP: u8 = b'-';

/// Safely convert usize to f64 for percentage calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Convert a raw alignment score to a bit score using the Karlin–Altschul
/// parameters of the run:
///
/// ```text
/// bits = round((lambda * raw - ln K) / ln 2)
/// ```
///
/// # Examples
///
/// ```
/// use gene_homology::homology::scoring::bit_score;
///
/// assert_eq!(bit_score(100, 0.3176, 0.1375), 49);
/// ```
#[must_use]
pub fn bit_score(raw_score: i64, lambda: f64, k: f64) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let raw = raw_score as f64;
    let bits = (lambda * raw - k.ln()) / std::f64::consts::LN_2;
    #[allow(clippy::cast_possible_truncation)] // Bit scores are far below i64::MAX
    {
        bits.round() as i64
    }
}

/// Counts derived from two equal-length aligned rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentStats {
    /// Columns where neither row has a gap and the residues agree
    pub matches: usize,

    /// Columns where neither row has a gap and the residues differ
    pub mismatches: usize,

    /// Maximal runs of gap characters, summed over both rows
    pub gap_opens: usize,

    /// `matches` divided by the number of columns, gaps included
    pub percent_identity: f64,
}

impl AlignmentStats {
    /// Compute all statistics in one pass over both rows.
    ///
    /// Residues are compared ignoring ASCII case since aligners commonly
    /// lowercase masked regions. Columns beyond the shorter row are ignored;
    /// callers check that the rows have equal length.
    #[must_use]
    pub fn compute(query: &str, target: &str) -> Self {
        let mut matches = 0;
        let mut mismatches = 0;
        let mut gap_opens = 0;
        let mut in_query_gap = false;
        let mut in_target_gap = false;

        for (&q, &t) in query.as_bytes().iter().zip(target.as_bytes()) {
            let query_gap = q == GAP;
            let target_gap = t == GAP;

            if query_gap && !in_query_gap {
                gap_opens += 1;
            }
            if target_gap && !in_target_gap {
                gap_opens += 1;
            }
            in_query_gap = query_gap;
            in_target_gap = target_gap;

            if query_gap || target_gap {
                continue;
            }
            if q.eq_ignore_ascii_case(&t) {
                matches += 1;
            } else {
                mismatches += 1;
            }
        }

        let columns = query.len().min(target.len());
        let percent_identity = if columns == 0 {
            0.0
        } else {
            count_to_f64(matches) / count_to_f64(columns)
        };

        Self {
            matches,
            mismatches,
            gap_opens,
            percent_identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_score_reference_values() {
        // (31.76 + 1.9841) / 0.6931 = 48.68
        assert_eq!(bit_score(100, 0.3176, 0.1375), 49);
        assert_eq!(bit_score(0, 0.3176, 0.1375), 3);
    }

    #[test]
    fn test_bit_score_matches_formula() {
        for &(raw, lambda, k) in &[(35, 0.2718, 0.041), (1234, 0.3176, 0.1375), (7, 1.0, 1.0)] {
            #[allow(clippy::cast_possible_truncation)]
            let expected = ((lambda * f64::from(raw) - f64::ln(k)) / 2f64.ln()).round() as i64;
            assert_eq!(bit_score(i64::from(raw), lambda, k), expected);
        }
    }

    #[test]
    fn test_single_gap() {
        let stats = AlignmentStats::compute("AC-GT", "ACTGT");
        assert_eq!(stats.matches, 4);
        assert_eq!(stats.mismatches, 0);
        assert_eq!(stats.gap_opens, 1);
        assert!((stats.percent_identity - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_mismatches_exclude_gap_columns() {
        let stats = AlignmentStats::compute("AGGT-A", "ACG-TA");
        assert_eq!(stats.matches, 3);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.gap_opens, 2);
        assert!((stats.percent_identity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_gap_runs_counted_once() {
        // One run in the query at position 0, two runs in the target
        let stats = AlignmentStats::compute("---ACGTAC", "AAAA--G-C");
        assert_eq!(stats.gap_opens, 3);
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.mismatches, 1);
    }

    #[test]
    fn test_case_insensitive_matches() {
        let stats = AlignmentStats::compute("acgt", "ACGT");
        assert_eq!(stats.matches, 4);
        assert!((stats.percent_identity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_alignment() {
        let stats = AlignmentStats::compute("", "");
        assert_eq!(stats.matches, 0);
        assert_eq!(stats.gap_opens, 0);
        assert!(stats.percent_identity.abs() < f64::EPSILON);
    }
}
