//! External solver configuration.
//!
//! ```toml
//! command = "kissat"
//! args = ["-q"]
//! channel = "stdout"
//! timeout_secs = 60
//! ```

use paramsat_base::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the solver leaves its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultChannel {
    /// `command args.. <cnf> <result>`, answer written to `<result>`
    /// (minisat convention).
    #[default]
    ResultFile,
    /// `command args.. <cnf>`, answer printed on stdout.
    Stdout,
}

/// How to run the external SAT solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Executable name or path.
    pub command: String,
    /// Arguments placed before the file names.
    pub args: Vec<String>,
    /// Kill the solver after this many seconds (None = wait forever).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub channel: ResultChannel,
    /// Directory for the CNF and result files. A temporary directory that is
    /// removed afterwards is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::minisat()
    }
}

impl SolverConfig {
    /// Names accepted by [`SolverConfig::preset`].
    pub const PRESETS: [&'static str; 3] = ["minisat", "kissat", "cadical"];

    pub fn minisat() -> Self {
        Self {
            command: "minisat".to_string(),
            args: Vec::new(),
            timeout_secs: None,
            channel: ResultChannel::ResultFile,
            work_dir: None,
        }
    }

    pub fn kissat() -> Self {
        Self {
            command: "kissat".to_string(),
            args: vec!["-q".to_string()],
            channel: ResultChannel::Stdout,
            ..Self::minisat()
        }
    }

    pub fn cadical() -> Self {
        Self {
            command: "cadical".to_string(),
            args: vec!["-q".to_string()],
            channel: ResultChannel::Stdout,
            ..Self::minisat()
        }
    }

    /// A named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "minisat" => Some(Self::minisat()),
            "kissat" => Some(Self::kissat()),
            "cadical" => Some(Self::cadical()),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parses a TOML document; missing keys take the minisat defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Serialization(format!("invalid solver config: {e}")))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("cannot render solver config: {e}")))
    }
}
