//! Validation of query FASTA files using noodles.
//!
//! A search takes exactly one query sequence. Plain and gzip/bgzip
//! compressed files are accepted; compressed input is inflated into a temp
//! file since the aligner is handed a path.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Empty input FASTA file")]
    Empty,

    #[error("FASTA input must contain exactly one sequence")]
    MultipleSequences,

    #[error("Invalid input FASTA: {0}")]
    Invalid(String),
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, FastaError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Name and length of the single sequence in a query file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySequence {
    pub name: String,
    pub length: usize,
}

/// Check that a FASTA file contains exactly one sequence
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, `FastaError::Invalid`
/// if it is not valid FASTA, `FastaError::Empty` if it has no records, or
/// `FastaError::MultipleSequences` if it has more than one.
pub fn validate_single_sequence(path: &Path) -> Result<QuerySequence, FastaError> {
    let mut reader = fasta::io::Reader::new(open_reader(path)?);
    let mut records = reader.records();

    let first = records
        .next()
        .ok_or(FastaError::Empty)?
        .map_err(|e| FastaError::Invalid(e.to_string()))?;

    match records.next() {
        None => {}
        Some(Ok(_)) => return Err(FastaError::MultipleSequences),
        Some(Err(e)) => return Err(FastaError::Invalid(e.to_string())),
    }

    Ok(QuerySequence {
        name: String::from_utf8_lossy(first.name()).to_string(),
        length: first.sequence().len(),
    })
}

/// A validated query ready to hand to the aligner.
///
/// Decompressed queries are held in a temp file that is removed when this
/// value is dropped.
#[derive(Debug)]
pub struct QueryFasta {
    pub sequence: QuerySequence,
    source: QuerySource,
}

#[derive(Debug)]
enum QuerySource {
    Plain(PathBuf),
    Inflated(NamedTempFile),
}

impl QueryFasta {
    /// Path of an uncompressed FASTA holding the query
    pub fn path(&self) -> &Path {
        match &self.source {
            QuerySource::Plain(path) => path,
            QuerySource::Inflated(file) => file.path(),
        }
    }
}

/// Validate a query file and, if compressed, inflate it into `temp_dir`
///
/// # Errors
///
/// Returns any error from [`validate_single_sequence`], or `FastaError::Io`
/// if the temp file cannot be written.
pub fn load_query(path: &Path, temp_dir: &Path) -> Result<QueryFasta, FastaError> {
    let sequence = validate_single_sequence(path)?;

    let source = if is_gzipped(path) {
        let mut inflated = tempfile::Builder::new()
            .prefix("genehomol_input")
            .suffix(".tmp.fasta")
            .tempfile_in(temp_dir)?;
        let mut reader = open_reader(path)?;
        io::copy(&mut reader, inflated.as_file_mut())?;
        QuerySource::Inflated(inflated)
    } else {
        QuerySource::Plain(path.to_path_buf())
    };

    Ok(QueryFasta { sequence, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn create_fasta(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_single_sequence() {
        let file = create_fasta(".fasta", ">seq1 some protein\nMKVLAAG\nIVGLL\n");
        let seq = validate_single_sequence(file.path()).unwrap();
        assert_eq!(seq.name, "seq1");
        assert_eq!(seq.length, 12);
    }

    #[test]
    fn test_empty_fasta() {
        let file = create_fasta(".fasta", "");
        assert!(matches!(
            validate_single_sequence(file.path()),
            Err(FastaError::Empty)
        ));
    }

    #[test]
    fn test_multiple_sequences() {
        let file = create_fasta(".fa", ">a\nACGT\n>b\nTTGA\n");
        assert!(matches!(
            validate_single_sequence(file.path()),
            Err(FastaError::MultipleSequences)
        ));
    }

    #[test]
    fn test_invalid_fasta() {
        let file = create_fasta(".fa", "ACGT without a header\n");
        assert!(matches!(
            validate_single_sequence(file.path()),
            Err(FastaError::Invalid(_))
        ));
    }

    #[test]
    fn test_plain_query_uses_original_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = create_fasta(".fasta", ">q\nMKV\n");
        let query = load_query(file.path(), dir.path()).unwrap();
        assert_eq!(query.path(), file.path());
        assert_eq!(query.sequence.length, 3);
    }

    #[test]
    fn test_gzipped_query_is_inflated_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = NamedTempFile::with_suffix(".fa.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">q1\nMKVLA\n").unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let query = load_query(file.path(), dir.path()).unwrap();
        assert_eq!(query.sequence.name, "q1");
        let inflated = query.path().to_path_buf();
        assert!(inflated.starts_with(dir.path()));
        assert_eq!(std::fs::read_to_string(&inflated).unwrap(), ">q1\nMKVLA\n");

        drop(query);
        assert!(!inflated.exists());
    }
}
