use std::path::PathBuf;

use clap::Args;

use crate::cli::{database_name, OutputFormat};
use crate::core::database::DatabaseLocation;
use crate::parsing::descriptor::read_database;

#[derive(Args)]
pub struct DatabaseArgs {
    /// LAST database descriptor (.prj file written by lastdb)
    #[arg(required = true)]
    pub descriptor: PathBuf,

    /// Database name to report (defaults to the descriptor file name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Execute database subcommand
///
/// # Errors
///
/// Returns an error if the descriptor is missing or invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DatabaseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let name = database_name(args.name.as_deref(), &args.descriptor)?;
    let location = DatabaseLocation::new(&args.descriptor)?;
    let database = read_database(name, location)?;
    let summary = database.summary();

    match format {
        OutputFormat::Text => {
            println!("Database: {}", summary.name);
            println!("   Implementation: {}", summary.implementation);
            println!("   Sequences: {}", summary.sequence_count);
            if verbose {
                println!("   Descriptor: {}", summary.location);
                println!(
                    "   Search prefix: {}",
                    database.location().database_prefix().display()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("name\timpl\tseqcount\tlocation");
            println!(
                "{}\t{}\t{}\t{}",
                summary.name, summary.implementation, summary.sequence_count, summary.location
            );
        }
    }

    Ok(())
}
