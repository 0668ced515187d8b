//! The SAT oracle boundary.
//!
//! An [`Oracle`] decides a DIMACS problem. [`ExternalSolver`] runs a solver
//! executable on a CNF file and reads its answer back; spawn failures,
//! timeouts and unreadable answers are all "undecided" (`Ok(None)`).

use crate::config::{ResultChannel, SolverConfig};
use paramsat_base::Result;
use paramsat_format::{DimacsCnf, SolverAnswer};
use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;
use wait_timeout::ChildExt;

/// Something that decides CNF problems.
pub trait Oracle {
    /// Returns `None` when the problem could not be decided.
    fn solve(&self, cnf: &DimacsCnf) -> Result<Option<SolverAnswer>>;
}

/// Runs an external solver process.
#[derive(Debug, Clone, Default)]
pub struct ExternalSolver {
    config: SolverConfig,
}

impl ExternalSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn run_in(&self, dir: &Path, cnf: &DimacsCnf) -> Result<Option<SolverAnswer>> {
        let cnf_path = dir.join("problem.cnf");
        let result_path = dir.join("result.txt");
        fs::write(&cnf_path, cnf.to_dimacs())?;

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .arg(&cnf_path)
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        match self.config.channel {
            ResultChannel::ResultFile => {
                command.arg(&result_path).stdout(Stdio::null());
            }
            // Redirected to a file so a large model cannot fill a pipe while
            // we wait.
            ResultChannel::Stdout => {
                command.stdout(Stdio::from(File::create(&result_path)?));
            }
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to spawn solver {}: {}", self.config.command, e);
                return Ok(None);
            }
        };
        let status = match self.config.timeout() {
            Some(timeout) => match child.wait_timeout(timeout)? {
                Some(status) => status,
                None => {
                    tracing::warn!(
                        "Solver {} timed out after {:?}",
                        self.config.command,
                        timeout
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
            },
            None => child.wait()?,
        };
        // minisat-style solvers exit with 10/20, so the status is not an error.
        tracing::debug!("Solver {} exited with {}", self.config.command, status);

        let output = match fs::read_to_string(&result_path) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("No answer from solver {}: {}", self.config.command, e);
                return Ok(None);
            }
        };
        let answer = SolverAnswer::parse(&output);
        if answer.is_none() {
            tracing::warn!("Solver {} gave an undecided answer", self.config.command);
        }
        Ok(answer)
    }
}

impl Oracle for ExternalSolver {
    fn solve(&self, cnf: &DimacsCnf) -> Result<Option<SolverAnswer>> {
        tracing::info!(
            "Running {} on {} variables and {} clauses",
            self.config.command,
            cnf.num_vars,
            cnf.clauses.len()
        );
        let start = Instant::now();
        let answer = match &self.config.work_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                self.run_in(dir, cnf)?
            }
            None => {
                let dir = tempfile::tempdir()?;
                self.run_in(dir.path(), cnf)?
            }
        };
        tracing::info!("Solver finished in {:?}", start.elapsed());
        Ok(answer)
    }
}
