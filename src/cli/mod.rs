//! Command-line interface for gene-homology.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **search**: Search a single-sequence FASTA against a LAST database
//! - **database**: Show what a LAST database descriptor describes
//!
//! ## Usage
//!
//! ```text
//! # Search a protein against a LAST database
//! gene-homology search query.fasta --database /data/uniref50.last.prj
//!
//! # BLAST-style tabular output, 30 second limit
//! gene-homology search query.fa.gz -d uniref50.last.prj --timeout 30 --format tsv
//!
//! # JSON output for scripting
//! gene-homology search query.fasta -d uniref50.last.prj --format json
//!
//! # Inspect a database descriptor
//! gene-homology database uniref50.last.prj
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::core::types::DatabaseName;
use crate::homology::last::{SearchConfig, DEFAULT_TIMEOUT_SECS, LAST_ALIGN};

pub mod database;
pub mod search;

#[derive(Parser)]
#[command(name = "gene-homology")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Search a query sequence against a LAST database")]
#[command(
    long_about = "gene-homology runs LAST (lastal) for a single query sequence against a reference database and reports each alignment with:\n- Bit score and e-value\n- Percent identity, mismatches and gap opens\n- Query and target coordinates"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a query sequence against a LAST database
    Search(search::SearchArgs),

    /// Describe a LAST database
    Database(database::DatabaseArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Options controlling how the aligner is run
#[derive(clap::Args, Debug)]
pub struct SearchOptions {
    /// Directory for temporary files (defaults to a subdirectory of the system temp dir)
    #[arg(long, env = "GENE_HOMOLOGY_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Seconds to wait for the aligner before killing it
    #[arg(
        long,
        env = "GENE_HOMOLOGY_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Aligner executable
    #[arg(long, env = "GENE_HOMOLOGY_ALIGNER", default_value = LAST_ALIGN)]
    pub aligner: PathBuf,
}

impl SearchOptions {
    /// Build the search configuration these options describe
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is invalid.
    pub fn to_config(&self) -> anyhow::Result<SearchConfig> {
        let temp_dir = self
            .temp_dir
            .clone()
            .unwrap_or_else(|| SearchConfig::default().temp_dir);
        Ok(SearchConfig::new(temp_dir, self.timeout)?.with_aligner(&self.aligner))
    }
}

/// Database name from `--name`, falling back to the descriptor's file stem
///
/// # Errors
///
/// Returns an error if the resulting name is invalid.
pub fn database_name(name: Option<&str>, descriptor: &Path) -> anyhow::Result<DatabaseName> {
    let name = match name {
        Some(name) => name.to_string(),
        None => descriptor
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default(),
    };
    DatabaseName::new(&name).with_context(|| format!("Invalid database name '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_name_from_stem() {
        let name = database_name(None, Path::new("/data/uniref50.last.prj")).unwrap();
        assert_eq!(name.as_str(), "uniref50.last");
    }

    #[test]
    fn test_database_name_override() {
        let name = database_name(Some("UniRef50"), Path::new("/data/u.prj")).unwrap();
        assert_eq!(name.as_str(), "UniRef50");
        assert!(database_name(Some("  "), Path::new("/data/u.prj")).is_err());
    }

    #[test]
    fn test_search_options_to_config() {
        let options = SearchOptions {
            temp_dir: Some(PathBuf::from("/scratch/gh")),
            timeout: 30,
            aligner: PathBuf::from("/opt/last/lastal"),
        };
        let config = options.to_config().unwrap();
        assert_eq!(config.temp_dir, PathBuf::from("/scratch/gh"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.aligner, PathBuf::from("/opt/last/lastal"));
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "gene-homology",
            "search",
            "q.fasta",
            "--database",
            "db.prj",
            "--timeout",
            "5",
            "--format",
            "tsv",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Tsv));
        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query, PathBuf::from("q.fasta"));
        assert_eq!(args.options.timeout, 5);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let result = Cli::try_parse_from([
            "gene-homology",
            "search",
            "q.fasta",
            "-d",
            "db.prj",
            "--timeout",
            "0",
        ]);
        assert!(result.is_err());
    }
}
