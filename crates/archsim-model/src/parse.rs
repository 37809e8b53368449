//! TOML parsing, serialization, validation, and discovery for configuration files.
//!
//! Configuration files (`*.arch.toml`) hold any subset of the configuration
//! keys at top level; missing keys take their defaults. Studies keep them in
//! a `configs/` directory.

use std::path::{Path, PathBuf};

use crate::config::ArchConfig;
use crate::error::{ModelError, Result};
use crate::evaluate::{evaluate, METRIC_KEYS};
use crate::overrides::apply_overrides;

/// File suffix for configuration files.
pub const CONFIG_SUFFIX: &str = ".arch.toml";

/// A validation issue found in a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: "error",
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: "warning",
            message: message.into(),
        }
    }

    /// Whether this issue is an error rather than a warning.
    pub fn is_error(&self) -> bool {
        self.severity == "error"
    }
}

/// Load a configuration from a `.arch.toml` file, layered onto defaults.
pub fn load_config_toml(path: &Path) -> Result<ArchConfig> {
    load_config_toml_onto(&ArchConfig::default(), path)
}

/// Load a configuration file and layer it onto `base`.
pub fn load_config_toml_onto(base: &ArchConfig, path: &Path) -> Result<ArchConfig> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_config_toml_onto(base, &content)
}

/// Parse a configuration from a TOML string, layered onto defaults.
pub fn parse_config_toml(toml_str: &str) -> Result<ArchConfig> {
    parse_config_toml_onto(&ArchConfig::default(), toml_str)
}

/// Parse a TOML string and layer its keys onto `base`.
///
/// Values go through the same coercion as key/value overrides, so
/// `issue_width = "4"` and `issue_width = 4` behave alike.
pub fn parse_config_toml_onto(base: &ArchConfig, toml_str: &str) -> Result<ArchConfig> {
    let table: toml::Table = toml::from_str(toml_str)?;
    let overrides = toml_table_to_map(&table)?;
    apply_overrides(base, &overrides)
}

/// Convert a TOML table into a JSON object for the override path.
pub fn toml_table_to_map(table: &toml::Table) -> Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::to_value(table)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ModelError::Validation {
            detail: "TOML document is not a table".into(),
        }),
    }
}

/// Serialize a configuration to pretty TOML.
pub fn config_to_toml(cfg: &ArchConfig) -> Result<String> {
    let toml_str = toml::to_string_pretty(cfg)?;
    Ok(toml_str)
}

/// Check a configuration for unrealistic or inconsistent values.
///
/// This is advisory: [`evaluate`](crate::evaluate) clamps and succeeds on
/// any of these inputs. Returns `Err(issues)` if anything was found.
pub fn validate_config(cfg: &ArchConfig) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. Every float is finite
    for (key, value) in cfg.to_map() {
        if value.is_null() {
            issues.push(ValidationIssue::error(format!("'{key}' is not a finite number")));
        }
    }

    // 2. L1 exists
    if cfg.cache_size_kb <= 0.0 {
        issues.push(ValidationIssue::error(format!(
            "L1 cache size must be positive (got {} KB); every reference will miss",
            cfg.cache_size_kb
        )));
    }

    // 3. Cache geometry
    if cfg.cache_associativity <= 0 {
        issues.push(ValidationIssue::error(format!(
            "cache associativity must be positive (got {})",
            cfg.cache_associativity
        )));
    }
    if cfg.cache_block_size_b <= 0 {
        issues.push(ValidationIssue::error(format!(
            "cache block size must be positive (got {} B)",
            cfg.cache_block_size_b
        )));
    } else if !cfg.cache_block_size_b.unsigned_abs().is_power_of_two() {
        issues.push(ValidationIssue::warning(format!(
            "cache block size {} B is not a power of 2",
            cfg.cache_block_size_b
        )));
    }

    // 4. Lower levels are bigger and slower
    if cfg.has_l2() {
        if cfg.l2_cache_size_kb < cfg.cache_size_kb {
            issues.push(ValidationIssue::warning(format!(
                "L2 ({} KB) is smaller than L1 ({} KB) in an inclusive hierarchy",
                cfg.l2_cache_size_kb, cfg.cache_size_kb
            )));
        }
        if cfg.l2_cache_hit_time_ns < cfg.cache_hit_time_ns {
            issues.push(ValidationIssue::warning(format!(
                "L2 hit time ({} ns) is lower than L1 hit time ({} ns)",
                cfg.l2_cache_hit_time_ns, cfg.cache_hit_time_ns
            )));
        }
    }
    if cfg.has_l3() && cfg.has_l2() {
        if cfg.l3_cache_size_kb < cfg.l2_cache_size_kb {
            issues.push(ValidationIssue::warning(format!(
                "L3 ({} KB) is smaller than L2 ({} KB) in an inclusive hierarchy",
                cfg.l3_cache_size_kb, cfg.l2_cache_size_kb
            )));
        }
        if cfg.l3_cache_hit_time_ns < cfg.l2_cache_hit_time_ns {
            issues.push(ValidationIssue::warning(format!(
                "L3 hit time ({} ns) is lower than L2 hit time ({} ns)",
                cfg.l3_cache_hit_time_ns, cfg.l2_cache_hit_time_ns
            )));
        }
    }

    // 5. Memory
    if cfg.mem_bandwidth_gbs <= 0.0 {
        issues.push(ValidationIssue::warning(format!(
            "memory bandwidth {} GB/s is not positive; latency will be doubled",
            cfg.mem_bandwidth_gbs
        )));
    }

    // 6. Core
    if cfg.clock_freq_ghz <= 0.0 {
        issues.push(ValidationIssue::error(format!(
            "clock frequency must be positive (got {} GHz)",
            cfg.clock_freq_ghz
        )));
    }
    if cfg.issue_width <= 0 {
        issues.push(ValidationIssue::error(format!(
            "issue width must be positive (got {})",
            cfg.issue_width
        )));
    }
    if cfg.pipeline_depth <= 0 {
        issues.push(ValidationIssue::error(format!(
            "pipeline depth must be positive (got {})",
            cfg.pipeline_depth
        )));
    }
    if cfg.operating_voltage <= 0.0 {
        issues.push(ValidationIssue::warning(format!(
            "operating voltage {} V is not positive",
            cfg.operating_voltage
        )));
    }

    // 7. Branch predictor name
    if cfg.predictor().is_none() {
        issues.push(ValidationIssue::warning(format!(
            "unknown branch predictor '{}' (expected off, static, bimodal or tournament); bimodal rate is used",
            cfg.branch_predictor
        )));
    }

    // 8. Workload
    if cfg.num_instructions <= 0 {
        issues.push(ValidationIssue::warning(format!(
            "instruction count {} is not positive; treated as 1",
            cfg.num_instructions
        )));
    }
    if cfg.mispredict_penalty_cycles < 0 {
        issues.push(ValidationIssue::warning(format!(
            "mispredict penalty {} cycles is negative; mispredictions will speed the run up",
            cfg.mispredict_penalty_cycles
        )));
    }

    // 9. Magnitudes large enough to overflow a result
    let report = evaluate(cfg);
    for key in METRIC_KEYS {
        if let Some(value) = report.metric(key).filter(|v| !v.is_finite()) {
            issues.push(ValidationIssue::error(format!(
                "result '{key}' is {value}; an input is out of range"
            )));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Generate a template `.arch.toml` seeded from the defaults.
pub fn generate_template(name: &str) -> Result<String> {
    let body = config_to_toml(&ArchConfig::default())?;
    Ok(format!(
        "# Architecture configuration: {name}\n\
         # Remove any key to fall back to its default.\n\
         # A cache level with size <= 0 is disabled.\n\n\
         {body}"
    ))
}

/// Discover all `.arch.toml` files in a study's `configs/` directory.
///
/// Returns a list of (config_name, file_path) pairs sorted by name.
pub fn discover_configs(study_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let configs_dir = study_dir.join("configs");
    if !configs_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut configs = Vec::new();
    for entry in std::fs::read_dir(&configs_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(CONFIG_SUFFIX))
            .map(str::to_string);
        if let Some(name) = name {
            configs.push((name, path));
        }
    }
    configs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(configs)
}
