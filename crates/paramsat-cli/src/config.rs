//! CLI configuration.
//!
//! The solver configuration comes from the first of: `--config FILE`,
//! `./paramsat.toml`, `~/.paramsat/config.toml`, built-in defaults.
//! Command-line flags override whatever was loaded.

use anyhow::Context;
use clap::Args;
use paramsat_kit::SolverConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Flags that override the loaded solver configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct SolverOverrides {
    /// Solver preset (minisat, kissat, cadical) or executable
    #[arg(short, long)]
    pub solver: Option<String>,

    /// Timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

impl SolverOverrides {
    /// Applies the flags on top of `config`.
    pub fn apply(&self, mut config: SolverConfig) -> SolverConfig {
        if let Some(solver) = &self.solver {
            config = match SolverConfig::preset(solver) {
                Some(preset) => SolverConfig {
                    timeout_secs: config.timeout_secs,
                    work_dir: config.work_dir,
                    ..preset
                },
                None => SolverConfig {
                    command: solver.clone(),
                    ..config
                },
            };
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        config
    }
}

/// Configuration files searched when `--config` is absent, in order.
fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("paramsat.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".paramsat").join("config.toml"));
    }
    paths
}

/// Loads the solver configuration.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<SolverConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => candidates().into_iter().find(|p| p.is_file()),
    };
    let Some(path) = path else {
        tracing::debug!("No configuration file, using defaults");
        return Ok(SolverConfig::default());
    };
    read(&path)
}

fn read(path: &Path) -> anyhow::Result<SolverConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration {}", path.display()))?;
    let config = SolverConfig::from_toml(&text)
        .with_context(|| format!("in configuration {}", path.display()))?;
    tracing::info!("Loaded solver configuration from {}", path.display());
    Ok(config)
}
