//! Built-in preset catalog.
//!
//! Each preset is a named override set layered onto the defaults. The
//! catalog is built once and never changes at runtime; bump
//! [`PRESET_CATALOG_VERSION`] whenever an entry is added or edited.

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::ArchConfig;
use crate::error::{ModelError, Result};
use crate::overrides::apply_overrides;

/// Version of the preset catalog.
pub const PRESET_CATALOG_VERSION: u32 = 1;

/// A named starting-point configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    /// Stable identifier, e.g. "balanced".
    pub id: String,
    /// Display name.
    pub name: String,
    /// Overrides applied on top of [`ArchConfig::default`].
    pub config: Map<String, Value>,
}

impl Preset {
    fn new(id: &str, name: &str, config: Value) -> Self {
        let config = match config {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            name: name.into(),
            config,
        }
    }

    /// The preset's overrides resolved against the defaults.
    pub fn resolve(&self) -> Result<ArchConfig> {
        apply_overrides(&ArchConfig::default(), &self.config)
    }
}

/// All presets, in catalog order.
pub fn presets() -> &'static [Preset] {
    static CATALOG: OnceLock<Vec<Preset>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            Preset::new(
                "small-l1",
                "Small L1, Simple Core",
                json!({
                    "cache_size_kb": 16,
                    "cache_block_size_b": 32,
                    "cache_associativity": 2,
                    "mem_size_gb": 4,
                    "mem_bandwidth_gbs": 15,
                    "mem_latency_ns": 100,
                    "reg_count": 16,
                    "reg_width_bits": 64,
                    "bus_width_bits": 32,
                    "bus_freq_ghz": 1.8,
                    "clock_freq_ghz": 2.0,
                    "pipeline_depth": 10,
                    "issue_width": 2,
                    "alu_width_bits": 32,
                    "branch_predictor": "static",
                }),
            ),
            Preset::new(
                "balanced",
                "Balanced Desktop Core",
                json!({
                    "cache_size_kb": 32,
                    "cache_block_size_b": 64,
                    "cache_associativity": 4,
                    "mem_size_gb": 8,
                    "mem_bandwidth_gbs": 25,
                    "mem_latency_ns": 80,
                    "reg_count": 32,
                    "reg_width_bits": 64,
                    "bus_width_bits": 64,
                    "bus_freq_ghz": 2.4,
                    "clock_freq_ghz": 3.0,
                    "pipeline_depth": 14,
                    "issue_width": 4,
                    "alu_width_bits": 64,
                    "branch_predictor": "bimodal",
                }),
            ),
            Preset::new(
                "high-perf",
                "High-Performance OoO Core",
                json!({
                    "cache_size_kb": 64,
                    "cache_block_size_b": 64,
                    "cache_associativity": 8,
                    "mem_size_gb": 16,
                    "mem_bandwidth_gbs": 50,
                    "mem_latency_ns": 60,
                    "reg_count": 128,
                    "reg_width_bits": 64,
                    "bus_width_bits": 128,
                    "bus_freq_ghz": 3.6,
                    "clock_freq_ghz": 4.0,
                    "pipeline_depth": 20,
                    "issue_width": 6,
                    "alu_width_bits": 128,
                    "branch_predictor": "tournament",
                }),
            ),
        ]
    })
}

/// Look up a preset by id.
pub fn find_preset(id: &str) -> Option<&'static Preset> {
    presets().iter().find(|p| p.id == id)
}

/// Resolve a preset id straight to a configuration.
pub fn preset_config(id: &str) -> Result<ArchConfig> {
    find_preset(id)
        .ok_or_else(|| ModelError::UnknownPreset { id: id.into() })?
        .resolve()
}
