//! # gene-homology
//!
//! A library for searching a single query sequence against a LAST database.
//!
//! Homology search tools are usually driven by hand: run `lastal`, capture its
//! MAF output, then convert raw scores and count identities yourself.
//! `gene-homology` wraps that loop. It runs the aligner under a timeout, parses
//! its output and reports each alignment with a bit score, e-value, percent
//! identity, mismatch count and gap-open count.
//!
//! ## Features
//!
//! - **Database descriptors**: Reads the sequence count from LAST `.prj` files
//! - **Bounded execution**: The aligner is killed if it outlives the timeout
//! - **Bit scores**: Raw scores converted with the reported lambda and K
//! - **Alignment statistics**: Identity, mismatches and gap opens per hit
//! - **Clean temp files**: Intermediate files are removed on every exit path
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use gene_homology::{DatabaseLocation, DatabaseName, LastAligner, SearchConfig};
//!
//! let aligner = LastAligner::new(SearchConfig::default()).unwrap();
//! let database = aligner
//!     .get_database(
//!         DatabaseName::new("uniref50").unwrap(),
//!         DatabaseLocation::new("/data/uniref50.last.prj").unwrap(),
//!     )
//!     .unwrap();
//!
//! for hit in aligner.search(&database, Path::new("query.fasta")).unwrap() {
//!     println!(
//!         "{}: bits={} identity={:.1}%",
//!         hit.target().id,
//!         hit.bit_score(),
//!         hit.percent_identity() * 100.0
//!     );
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for databases, alignments and reports
//! - [`homology`]: Aligner orchestration, scoring and errors
//! - [`parsing`]: Parsers for descriptors, MAF output and query FASTA
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod homology;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::alignment::{AlignedSequence, SearchResult};
pub use core::database::{DatabaseLocation, DatabaseSummary, ReferenceDatabase};
pub use core::report::{AlignmentRecord, SearchReport};
pub use core::types::*;
pub use homology::last::{LastAligner, SearchConfig};
pub use homology::HomologyError;
pub use parsing::descriptor::read_database;
