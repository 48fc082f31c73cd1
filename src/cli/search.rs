use std::path::PathBuf;

use clap::Args;

use crate::cli::{database_name, OutputFormat, SearchOptions};
use crate::core::alignment::SearchResult;
use crate::core::database::{DatabaseLocation, ReferenceDatabase};
use crate::core::report::{tabular_row, SearchReport, TABULAR_COLUMNS};
use crate::homology::last::LastAligner;
use crate::parsing::fasta::{load_query, QuerySequence};

#[derive(Args)]
pub struct SearchArgs {
    /// Query FASTA containing exactly one sequence (optionally gzip compressed)
    #[arg(required = true)]
    pub query: PathBuf,

    /// LAST database descriptor (.prj file written by lastdb)
    #[arg(short, long, required = true)]
    pub database: PathBuf,

    /// Database name to report (defaults to the descriptor file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Maximum number of alignments to show (all by default)
    #[arg(short = 'n', long)]
    pub max_alignments: Option<usize>,

    #[command(flatten)]
    pub options: SearchOptions,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the database or query is invalid, or the search fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let aligner = LastAligner::new(args.options.to_config()?)?;

    let name = database_name(args.name.as_deref(), &args.database)?;
    let database = aligner.get_database(name, DatabaseLocation::new(&args.database)?)?;
    if verbose {
        eprintln!(
            "Database {} ({}, {} sequences)",
            database.name(),
            database.implementation(),
            database.sequence_count()
        );
    }

    let query = load_query(&args.query, &aligner.config().temp_dir)?;
    if verbose {
        eprintln!(
            "Query {} ({} residues)",
            query.sequence.name, query.sequence.length
        );
    }

    let mut results = aligner.search(&database, query.path())?;
    if let Some(max) = args.max_alignments {
        results.truncate(max);
    }

    if results.is_empty() && !matches!(format, OutputFormat::Json) {
        eprintln!("No alignments found.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_results(&results, &database, &query.sequence, verbose),
        OutputFormat::Json => print_json_results(&results, &database)?,
        OutputFormat::Tsv => print_tsv_results(&results),
    }

    Ok(())
}

fn print_text_results(
    results: &[SearchResult],
    database: &ReferenceDatabase,
    query: &QuerySequence,
    verbose: bool,
) {
    println!(
        "Query {} ({} residues) vs {} ({} sequences): {} alignments",
        query.name,
        query.length,
        database.name(),
        database.sequence_count(),
        results.len()
    );

    for (i, result) in results.iter().enumerate() {
        let q = result.query();
        let t = result.target();

        println!("\n#{} {}", i + 1, t.id);
        println!(
            "   Bit score: {}   E-value: {:e}",
            result.bit_score(),
            result.e_value()
        );
        println!(
            "   Identity: {}/{} ({:.1}%)   Mismatches: {}   Gap opens: {}",
            result.matches(),
            result.alignment_length(),
            result.percent_identity() * 100.0,
            result.mismatches(),
            result.gap_open_count()
        );
        println!(
            "   Query:  {}-{} of {} ({})",
            q.one_based_start(),
            q.one_based_end(),
            q.sequence_length,
            q.strand
        );
        println!(
            "   Target: {}-{} of {} ({})",
            t.one_based_start(),
            t.one_based_end(),
            t.sequence_length,
            t.strand
        );

        if verbose {
            println!("\n   {}", q.aligned_sequence);
            println!("   {}", t.aligned_sequence);
        }
    }
}

fn print_json_results(results: &[SearchResult], database: &ReferenceDatabase) -> anyhow::Result<()> {
    let report = SearchReport::new(database, results);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_tsv_results(results: &[SearchResult]) {
    println!("{}", TABULAR_COLUMNS.join("\t"));
    for result in results {
        println!("{}", tabular_row(result));
    }
}
