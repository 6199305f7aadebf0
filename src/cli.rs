//! CLI command implementations for Skirmish.

pub(crate) mod run;
pub(crate) mod search;
pub(crate) mod solve;

mod output;

use clap::ValueEnum;
use skirmish::{BattleError, Faction, Scenario, ScenarioError};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` and `search` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Faction named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FactionArg {
    /// Elves (`E`).
    Elf,
    /// Goblins (`G`).
    Goblin,
}

impl From<FactionArg> for Faction {
    fn from(arg: FactionArg) -> Self {
        match arg {
            FactionArg::Elf => Faction::Elf,
            FactionArg::Goblin => Faction::Goblin,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<BattleError> for CliError {
    fn from(e: BattleError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Load a map file, naming it in any parse error.
fn load_scenario(path: &Path) -> Result<Scenario, CliError> {
    Scenario::load(path).map_err(|e| match e {
        ScenarioError::Io { .. } => CliError::from(e),
        other => CliError::new(format!("{}: {other}", path.display())),
    })
}
