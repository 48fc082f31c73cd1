//! Parsers for the files a homology search reads.
//!
//! - **LAST database descriptors** (`.prj`): properties-style `key=value` files
//!   giving the sequence count of a database
//! - **LAST MAF output**: the aligner's tabular output, including the
//!   Karlin–Altschul parameters embedded in its comment block
//! - **Query FASTA**: validation that a query holds exactly one sequence
//!
//! ## Example
//!
//! ```rust
//! use gene_homology::parsing::maf::parse_output_text;
//!
//! let output = "# lambda=0.3176 K=0.1375\n\
//!               a score=100 EG2=1e-05 E=2e-12\n\
//!               s query 0 4 + 20 ACGT\n\
//!               s target 3 4 + 90 ACGT\n";
//!
//! let parsed = parse_output_text(output).unwrap();
//! assert_eq!(parsed.records.len(), 1);
//! assert_eq!(parsed.records[0].raw_score, 100);
//! ```

pub mod descriptor;
pub mod fasta;
pub mod maf;
