//! Search orchestration for LAST.
//!
//! A search runs `lastal <database prefix> <query fasta>` with stdout and
//! stderr redirected to temp files, so the child can never block on a full
//! pipe. The child runs in its own process group and is polled until it
//! exits or the configured timeout elapses, in which case the whole group is
//! killed. The temp files are owned by [`NamedTempFile`] guards and removed
//! on every return path.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::core::alignment::SearchResult;
use crate::core::database::{DatabaseLocation, ReferenceDatabase};
use crate::core::types::{DatabaseName, ImplementationName};
use crate::homology::scoring::bit_score;
use crate::homology::HomologyError;
use crate::parsing::descriptor::read_database;
use crate::parsing::maf::parse_output_file;

/// Default aligner binary
pub const LAST_ALIGN: &str = "lastal";

/// Default search timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Minimum allowed search timeout in seconds
pub const MINIMUM_TIMEOUT_SECS: u64 = 1;

/// Name of the temp directory created under the system temp dir by default
pub const DEFAULT_TEMP_DIR_NAME: &str = "gene_homology";

/// Interval between checks on a running aligner
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Settings shared by all searches. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Directory holding per-search temp files
    pub temp_dir: PathBuf,

    /// Wall-clock limit for one aligner run, in seconds
    pub timeout_secs: u64,

    /// Aligner executable
    pub aligner: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join(DEFAULT_TEMP_DIR_NAME),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            aligner: PathBuf::from(LAST_ALIGN),
        }
    }
}

impl SearchConfig {
    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if `timeout_secs` is below
    /// [`MINIMUM_TIMEOUT_SECS`].
    pub fn new(temp_dir: impl Into<PathBuf>, timeout_secs: u64) -> Result<Self, HomologyError> {
        let config = Self {
            temp_dir: temp_dir.into(),
            timeout_secs,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_aligner(mut self, aligner: impl Into<PathBuf>) -> Self {
        self.aligner = aligner.into();
        self
    }

    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if the timeout is too small.
    pub fn validate(&self) -> Result<(), HomologyError> {
        if self.timeout_secs < MINIMUM_TIMEOUT_SECS {
            return Err(HomologyError::Configuration(format!(
                "Search timeout must be at least {MINIMUM_TIMEOUT_SECS} second(s), was {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Runs homology searches against LAST databases
#[derive(Debug, Clone)]
pub struct LastAligner {
    config: SearchConfig,
}

impl LastAligner {
    /// Create an aligner, creating the temp directory if needed
    ///
    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if the configuration is invalid
    /// or the temp directory cannot be created.
    pub fn new(config: SearchConfig) -> Result<Self, HomologyError> {
        config.validate()?;
        std::fs::create_dir_all(&config.temp_dir).map_err(|e| {
            HomologyError::Configuration(format!(
                "Couldn't create temporary directory {}: {e}",
                config.temp_dir.display()
            ))
        })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn implementation(&self) -> ImplementationName {
        ImplementationName::Last
    }

    /// Load the database described by the descriptor at `location`
    ///
    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if the descriptor is unreadable
    /// or invalid.
    pub fn get_database(
        &self,
        name: DatabaseName,
        location: DatabaseLocation,
    ) -> Result<ReferenceDatabase, HomologyError> {
        read_database(name, location)
    }

    /// Resolve the database descriptor, then search it
    ///
    /// # Errors
    ///
    /// See [`LastAligner::search`]; descriptor problems are reported as
    /// `HomologyError::Configuration`.
    pub fn search_location(
        &self,
        name: DatabaseName,
        location: DatabaseLocation,
        query_fasta: &Path,
    ) -> Result<Vec<SearchResult>, HomologyError> {
        let database = self.get_database(name, location)?;
        self.search(&database, query_fasta)
    }

    /// Search a single-sequence query FASTA against `database`.
    ///
    /// Results are returned in the aligner's order. Records whose query and
    /// target rows differ in length are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if the temp file cannot be
    /// created, `HomologyError::Subprocess` if the aligner fails,
    /// `HomologyError::Timeout` if it runs too long, and
    /// `HomologyError::MalformedOutput` or `HomologyError::Io` if its output
    /// cannot be parsed.
    pub fn search(
        &self,
        database: &ReferenceDatabase,
        query_fasta: &Path,
    ) -> Result<Vec<SearchResult>, HomologyError> {
        let output = self.create_temp_file("last_output")?;
        let database_prefix = database.location().database_prefix();

        info!(
            database = %database.name(),
            query = %query_fasta.display(),
            "Running homology search"
        );
        self.run_to_output_file(&output, &[database_prefix.as_path(), query_fasta])?;

        let parsed = parse_output_file(output.path())?;
        let lambda = parsed.parameters.lambda;
        let k = parsed.parameters.k;
        debug!(lambda, k, records = parsed.records.len(), "Parsed aligner output");

        let mut results = Vec::with_capacity(parsed.records.len());
        for record in parsed.records {
            let score = bit_score(record.raw_score, lambda, k);
            match SearchResult::new(record.query, record.target, record.e_value, score) {
                Ok(result) => results.push(result),
                Err(e) => warn!(line = record.line_number, error = %e, "Skipping alignment record"),
            }
        }
        Ok(results)
    }

    fn create_temp_file(&self, prefix: &str) -> Result<NamedTempFile, HomologyError> {
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".tmp")
            .tempfile_in(&self.config.temp_dir)
            .map_err(|e| {
                HomologyError::Configuration(format!(
                    "Couldn't create temporary file in {}: {e}",
                    self.config.temp_dir.display()
                ))
            })
    }

    /// Run the aligner with stdout written to `output`
    fn run_to_output_file(
        &self,
        output: &NamedTempFile,
        args: &[&Path],
    ) -> Result<(), HomologyError> {
        let program = self.program_name();
        let stdout = output
            .reopen()
            .map_err(|e| HomologyError::io(output.path(), e))?;
        let stderr_file = self.create_temp_file("last_error")?;
        let stderr = stderr_file
            .reopen()
            .map_err(|e| HomologyError::io(stderr_file.path(), e))?;

        let mut command = Command::new(&self.config.aligner);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        // The aligner leads its own process group; a timeout kills the group
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| HomologyError::Subprocess {
                program: program.clone(),
                status: None,
                stderr: e.to_string(),
            })?;
        debug!(pid = child.id(), program = %program, "Started aligner");

        let status = self.wait_with_timeout(&mut child, &program)?;
        debug!(status = %status, "Aligner exited");

        if !status.success() {
            let stderr = std::fs::read_to_string(stderr_file.path())
                .map_err(|e| HomologyError::io(stderr_file.path(), e))?;
            return Err(HomologyError::Subprocess {
                program,
                status: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Wait for `child` to exit, killing it once the timeout elapses
    fn wait_with_timeout(
        &self,
        child: &mut Child,
        program: &str,
    ) -> Result<ExitStatus, HomologyError> {
        let timeout = self.config.timeout();
        let started = Instant::now();

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    terminate(child);
                    return Err(HomologyError::Subprocess {
                        program: program.to_string(),
                        status: None,
                        stderr: format!("failed waiting for process: {e}"),
                    });
                }
            }

            if started.elapsed() >= timeout {
                warn!(
                    pid = child.id(),
                    seconds = self.config.timeout_secs,
                    "Aligner timed out, killing it"
                );
                terminate(child);
                return Err(HomologyError::Timeout {
                    program: program.to_string(),
                    seconds: self.config.timeout_secs,
                });
            }
            sleep(POLL_INTERVAL);
        }
    }

    fn program_name(&self) -> String {
        self.config.aligner.file_name().map_or_else(
            || self.config.aligner.display().to_string(),
            |name| name.to_string_lossy().to_string(),
        )
    }
}

/// Kill the aligner and everything in its process group, then reap it
fn terminate(child: &mut Child) {
    kill_tree(child);
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "Failed to reap aligner");
    }
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // The aligner leads its own group, so its pid is the group id
    let Ok(pgid) = i32::try_from(child.id()) else {
        kill_process(child);
        return;
    };
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) => debug!(pgid, "Sent SIGKILL to aligner process group"),
        Err(e) => {
            warn!(pgid, error = %e, "Failed to kill aligner process group, killing aligner only");
            kill_process(child);
        }
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    kill_process(child);
}

fn kill_process(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!(pid = child.id(), error = %e, "Failed to kill aligner");
    }
}
