//! Parser for the tabular (MAF) output of `lastal`.
//!
//! The output is line oriented:
//!
//! ```text
//! # LAST version 1060
//! # lambda=0.3176 K=0.1375
//! a score=120 EG2=1.2e-09 E=3.4e-17
//! s query1  0 30 + 30 MKVLAAGIVGLLLA-TAQAAPAEEKQPAQV
//! s target7 4 31 + 88 MKVLSAGIVALLLAGTAQAAPSEEKQPAQV
//! ```
//!
//! Comment lines start with `#`. One of them, before the first record, holds
//! the Karlin–Altschul parameters of the run. Each record is a header line
//! followed by one row per aligned sequence. All knowledge of field positions
//! lives in the constants below.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::alignment::AlignedSequence;
use crate::core::types::Strand;
use crate::homology::HomologyError;

/// Marker that starts a comment line
pub const COMMENT_MARKER: char = '#';

/// Token prefixes of the statistical parameters in the comment block
pub const LAMBDA_PREFIX: &str = "lambda=";
pub const K_PREFIX: &str = "K=";

/// Record header line: `a score=<raw> EG2=<..> E=<evalue>`
pub const HEADER_TAG: &str = "a";
pub const HEADER_TAG_FIELD: usize = 0;
pub const HEADER_SCORE_FIELD: usize = 1;
pub const HEADER_SCORE_PREFIX: &str = "score=";
pub const HEADER_EVALUE_FIELD: usize = 3;
pub const HEADER_EVALUE_PREFIX: &str = "E=";

/// Alignment row: `s <id> <start> <length> <strand> <seq length> <aligned text>`
pub const ROW_TAG: &str = "s";
pub const ROW_TAG_FIELD: usize = 0;
pub const ROW_ID_FIELD: usize = 1;
pub const ROW_START_FIELD: usize = 2;
pub const ROW_LENGTH_FIELD: usize = 3;
pub const ROW_STRAND_FIELD: usize = 4;
pub const ROW_SEQUENCE_LENGTH_FIELD: usize = 5;
pub const ROW_ALIGNED_FIELD: usize = 6;
pub const ROW_FIELD_COUNT: usize = 7;

/// Lines making up one record: the header plus two rows
pub const RECORD_LINES: usize = 3;

/// Karlin–Altschul parameters reported by the aligner for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticalParameters {
    pub lambda: f64,
    pub k: f64,
}

/// One record of aligner output, before scoring
#[derive(Debug, Clone, PartialEq)]
pub struct RawAlignment {
    pub query: AlignedSequence,
    pub target: AlignedSequence,
    pub e_value: f64,
    pub raw_score: i64,
    /// 1-based line number of the record header
    pub line_number: usize,
}

/// Parameters and records parsed from a complete output file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    pub parameters: StatisticalParameters,
    pub records: Vec<RawAlignment>,
}

/// Parse an aligner output file
///
/// # Errors
///
/// Returns `HomologyError::Io` if the file cannot be read, or
/// `HomologyError::MalformedOutput` if its content does not follow the format.
pub fn parse_output_file(path: &Path) -> Result<ParsedOutput, HomologyError> {
    let file = File::open(path).map_err(|e| HomologyError::io(path, e))?;
    parse_output(BufReader::new(file), path)
}

/// Parse aligner output from text
///
/// # Errors
///
/// Returns `HomologyError::MalformedOutput` if the text does not follow the format.
pub fn parse_output_text(text: &str) -> Result<ParsedOutput, HomologyError> {
    parse_output(text.as_bytes(), Path::new("<text>"))
}

/// Parse aligner output from any buffered reader. `source` is only used to
/// describe I/O errors.
///
/// # Errors
///
/// Returns `HomologyError::Io` if reading fails, or
/// `HomologyError::MalformedOutput` on any format violation.
pub fn parse_output<R: BufRead>(reader: R, source: &Path) -> Result<ParsedOutput, HomologyError> {
    let mut lines = NumberedLines::new(reader, source);
    let parameters = read_statistical_parameters(&mut lines)?;

    let mut records = Vec::new();
    while let Some((line_number, line)) = lines.next_line()? {
        if is_skippable(&line) {
            continue;
        }
        let (raw_score, e_value) = parse_header_line(line_number, &line)?;
        let query = next_row(&mut lines, line_number)?;
        let target = next_row(&mut lines, line_number)?;
        records.push(RawAlignment {
            query,
            target,
            e_value,
            raw_score,
            line_number,
        });
    }

    Ok(ParsedOutput {
        parameters,
        records,
    })
}

/// Line iterator that tracks 1-based line numbers
struct NumberedLines<R> {
    lines: Lines<R>,
    line_number: usize,
    source: PathBuf,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R, source: &Path) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            source: source.to_path_buf(),
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, HomologyError> {
        match self.lines.next() {
            Some(Ok(line)) => {
                self.line_number += 1;
                Ok(Some((self.line_number, line)))
            }
            Some(Err(e)) => Err(HomologyError::io(&self.source, e)),
            None => Ok(None),
        }
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_MARKER)
}

fn is_skippable(line: &str) -> bool {
    is_comment(line) || line.trim().is_empty()
}

/// Scan the leading comment block for the lambda and K parameters
fn read_statistical_parameters<R: BufRead>(
    lines: &mut NumberedLines<R>,
) -> Result<StatisticalParameters, HomologyError> {
    while let Some((line_number, line)) = lines.next_line()? {
        if line.trim().is_empty() {
            continue;
        }
        if !is_comment(&line) {
            return Err(HomologyError::MalformedOutput(format!(
                "missing statistical parameters: record at line {line_number} precedes the lambda and K comment"
            )));
        }
        if let Some(parameters) = parse_parameter_line(line_number, &line)? {
            return Ok(parameters);
        }
    }
    Err(HomologyError::MalformedOutput(
        "missing statistical parameters: no comment line with lambda and K".to_string(),
    ))
}

/// Parse a comment line carrying `lambda=` and `K=` tokens. Returns `None`
/// for comment lines that carry neither.
fn parse_parameter_line(
    line_number: usize,
    line: &str,
) -> Result<Option<StatisticalParameters>, HomologyError> {
    let body = line.trim_start_matches(COMMENT_MARKER);
    let lambda = body
        .split_whitespace()
        .find_map(|token| token.strip_prefix(LAMBDA_PREFIX));
    let k = body
        .split_whitespace()
        .find_map(|token| token.strip_prefix(K_PREFIX));

    let (Some(lambda), Some(k)) = (lambda, k) else {
        return Ok(None);
    };

    let lambda = parse_number::<f64>(lambda, "lambda", line_number, line)?;
    let k = parse_number::<f64>(k, "K", line_number, line)?;
    if k <= 0.0 {
        return Err(malformed(line_number, line, "K must be positive"));
    }
    Ok(Some(StatisticalParameters { lambda, k }))
}

/// Extract `(raw score, e-value)` from a record header line
fn parse_header_line(line_number: usize, line: &str) -> Result<(i64, f64), HomologyError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.get(HEADER_TAG_FIELD) != Some(&HEADER_TAG) {
        return Err(malformed(
            line_number,
            line,
            "expected a record header line starting with 'a'",
        ));
    }

    let score = prefixed_field(&fields, HEADER_SCORE_FIELD, HEADER_SCORE_PREFIX)
        .ok_or_else(|| malformed(line_number, line, "missing score"))?;
    let e_value = prefixed_field(&fields, HEADER_EVALUE_FIELD, HEADER_EVALUE_PREFIX)
        .ok_or_else(|| malformed(line_number, line, "missing e-value"))?;

    Ok((
        parse_number::<i64>(score, "score", line_number, line)?,
        parse_number::<f64>(e_value, "e-value", line_number, line)?,
    ))
}

fn prefixed_field<'a>(fields: &[&'a str], index: usize, prefix: &str) -> Option<&'a str> {
    fields.get(index).and_then(|f| f.strip_prefix(prefix))
}

/// Read and parse the next alignment row of the record starting at `record_line`
fn next_row<R: BufRead>(
    lines: &mut NumberedLines<R>,
    record_line: usize,
) -> Result<AlignedSequence, HomologyError> {
    let Some((line_number, line)) = lines.next_line()? else {
        return Err(HomologyError::MalformedOutput(format!(
            "incomplete record starting at line {record_line}: expected {RECORD_LINES} lines"
        )));
    };
    parse_row_line(line_number, &line)
}

/// Parse an alignment row into an `AlignedSequence`
fn parse_row_line(line_number: usize, line: &str) -> Result<AlignedSequence, HomologyError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != ROW_FIELD_COUNT {
        return Err(malformed(
            line_number,
            line,
            &format!(
                "expected {ROW_FIELD_COUNT} fields in alignment row, found {}",
                fields.len()
            ),
        ));
    }
    if fields[ROW_TAG_FIELD] != ROW_TAG {
        return Err(malformed(
            line_number,
            line,
            "expected an alignment row starting with 's'",
        ));
    }

    let strand = Strand::from_sign(fields[ROW_STRAND_FIELD])
        .ok_or_else(|| malformed(line_number, line, "invalid strand"))?;

    Ok(AlignedSequence::new(
        fields[ROW_ID_FIELD],
        parse_number(fields[ROW_SEQUENCE_LENGTH_FIELD], "sequence length", line_number, line)?,
        fields[ROW_ALIGNED_FIELD],
        parse_number(fields[ROW_START_FIELD], "alignment start", line_number, line)?,
        parse_number(fields[ROW_LENGTH_FIELD], "alignment length", line_number, line)?,
        strand,
    ))
}

fn parse_number<T: FromStr>(
    token: &str,
    name: &str,
    line_number: usize,
    line: &str,
) -> Result<T, HomologyError> {
    token
        .parse()
        .map_err(|_| malformed(line_number, line, &format!("invalid {name} '{token}'")))
}

fn malformed(line_number: usize, line: &str, what: &str) -> HomologyError {
    HomologyError::MalformedOutput(format!("line {line_number}: {what}: {line}"))
}
