//! `archsim.toml` study manifest parsing.
//!
//! A study is a directory holding a manifest, a `configs/` directory of
//! `.arch.toml` files and an `out/` directory for rendered reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Manifest file name.
pub const MANIFEST_FILE: &str = "archsim.toml";

/// The top-level manifest structure for a study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyManifest {
    /// Study metadata (required).
    pub project: ProjectConfig,
    /// Defaults for `archsim simulate`.
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
    /// Defaults for `archsim compare`.
    #[serde(default)]
    pub compare: Option<CompareConfig>,
}

/// Study metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Study name (required).
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Simulation defaults section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Preset used when no preset or file is given on the command line.
    #[serde(default)]
    pub preset: Option<String>,
    /// Overrides applied after the preset for every simulation in the study.
    #[serde(default)]
    pub overrides: toml::Table,
}

/// Comparison defaults section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Metric to rank by.
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl StudyManifest {
    /// Search upward from `start_dir` for an `archsim.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: StudyManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing archsim.toml")
    }

    /// The study's default preset id, if any.
    pub fn default_preset(&self) -> Option<&str> {
        self.simulation
            .as_ref()
            .and_then(|s| s.preset.as_deref())
    }

    /// The study-wide overrides as a key/value map.
    pub fn overrides(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match &self.simulation {
            Some(sim) => archsim_model::parse::toml_table_to_map(&sim.overrides)
                .context("reading [simulation.overrides]"),
            None => Ok(serde_json::Map::new()),
        }
    }

    /// The metric `archsim compare` ranks by when none is given.
    pub fn default_sort_metric(&self) -> Option<&str> {
        self.compare
            .as_ref()
            .and_then(|c| c.sort_by.as_deref())
    }

    /// Generate the default template for `archsim init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
version = "0.1.0"

[simulation]
preset = "balanced"

[simulation.overrides]
num_instructions = 1000000

[compare]
sort_by = "efficiency_index"
"#
        )
    }
}
