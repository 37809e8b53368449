//! Building a configuration from command-line sources.
//!
//! Layering order: defaults, preset, study overrides, configuration file,
//! `--set` assignments. Each layer only touches the keys it names.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use archsim_model::overrides::assignments_to_map;
use archsim_model::parse::{load_config_toml_onto, CONFIG_SUFFIX};
use archsim_model::{apply_overrides, preset_config, ArchConfig};

use crate::manifest::StudyManifest;

/// Where a simulated configuration comes from.
#[derive(Debug, Default)]
pub struct ConfigSource<'a> {
    pub preset: Option<&'a str>,
    pub file: Option<&'a Path>,
    pub assignments: &'a [String],
}

impl ConfigSource<'_> {
    /// Short label for reports: the file stem, the preset id, or "default".
    pub fn label(&self, manifest: Option<&StudyManifest>) -> String {
        if let Some(file) = self.file {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("config");
            return name.strip_suffix(CONFIG_SUFFIX).unwrap_or(name).to_string();
        }
        self.preset
            .or_else(|| manifest.and_then(|m| m.default_preset()))
            .unwrap_or("default")
            .to_string()
    }

    /// Resolve every layer into one configuration.
    pub fn resolve(&self, manifest: Option<&StudyManifest>) -> Result<ArchConfig> {
        let preset = self
            .preset
            .or_else(|| manifest.and_then(|m| m.default_preset()));

        let mut cfg = match preset {
            Some(id) => preset_config(id).with_context(|| {
                format!("resolving preset '{id}' (see `archsim preset list`)")
            })?,
            None => ArchConfig::default(),
        };

        if let Some(manifest) = manifest {
            cfg = apply_overrides(&cfg, &manifest.overrides()?)
                .context("applying study overrides")?;
        }

        if let Some(file) = self.file {
            cfg = load_config_toml_onto(&cfg, file)
                .with_context(|| format!("loading {}", file.display()))?;
        }

        if !self.assignments.is_empty() {
            let overrides = assignments_to_map(self.assignments)?;
            cfg = apply_overrides(&cfg, &overrides).context("applying --set overrides")?;
        }

        Ok(cfg)
    }
}

/// Resolve a name given to `archsim compare`.
///
/// Tries, in order: a built-in preset, `configs/NAME.arch.toml` in the
/// study, and a path to a configuration file.
pub fn resolve_named(
    name: &str,
    study_dir: &Path,
    manifest: Option<&StudyManifest>,
) -> Result<ArchConfig> {
    if archsim_model::find_preset(name).is_some() {
        let source = ConfigSource {
            preset: Some(name),
            ..ConfigSource::default()
        };
        return source.resolve(manifest);
    }

    let candidates = [
        study_dir.join("configs").join(format!("{name}{CONFIG_SUFFIX}")),
        PathBuf::from(name),
    ];
    for path in &candidates {
        if path.is_file() {
            let source = ConfigSource {
                file: Some(path.as_path()),
                ..ConfigSource::default()
            };
            return source.resolve(manifest);
        }
    }

    bail!("'{name}' is neither a preset nor a configuration in configs/")
}
