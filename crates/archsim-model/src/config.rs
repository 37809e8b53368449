//! Architecture configuration.
//!
//! A flat record of every parameter the models read. Sub-models borrow it
//! immutably; nothing in the crate mutates a configuration after it has
//! been built.

use serde::{Deserialize, Serialize};

use crate::branch::PredictorKind;
use crate::error::Result;

/// All architecture parameters, each with a documented default.
///
/// Serialized field names are the snake_case keys used by presets,
/// override maps and `.arch.toml` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchConfig {
    // L1 cache
    /// L1 capacity in KB. `<= 0` disables the level.
    pub cache_size_kb: f64,
    /// Cache line size in bytes (shared by every level).
    pub cache_block_size_b: i64,
    /// Set associativity (shared by every level).
    pub cache_associativity: i64,
    /// Replacement policy name. Informational only.
    pub cache_replacement_policy: String,
    /// L1 hit latency in ns.
    pub cache_hit_time_ns: f64,

    // Lower levels
    /// L2 capacity in KB. `<= 0` means no L2.
    pub l2_cache_size_kb: f64,
    pub l2_cache_hit_time_ns: f64,
    /// L3 capacity in KB. `<= 0` means no L3.
    pub l3_cache_size_kb: f64,
    pub l3_cache_hit_time_ns: f64,

    // Memory
    pub mem_size_gb: f64,
    pub mem_bandwidth_gbs: f64,
    /// Unloaded DRAM latency in ns, before bandwidth adjustment.
    pub mem_latency_ns: f64,

    // Registers / bus / ALU
    pub reg_count: i64,
    pub reg_width_bits: i64,
    pub bus_width_bits: i64,
    pub bus_freq_ghz: f64,
    pub alu_width_bits: i64,

    // Core
    pub clock_freq_ghz: f64,
    pub pipeline_depth: i64,
    pub issue_width: i64,

    // Branch prediction
    /// Predictor class name, matched case-insensitively.
    pub branch_predictor: String,
    pub mispredict_penalty_cycles: i64,

    // Power
    /// Static power in W per KB of L1.
    pub static_power_per_kb: f64,
    /// Dynamic power in W per cache hit.
    pub dynamic_power_per_access: f64,
    /// Fixed leakage in W.
    pub cache_leakage_power: f64,
    /// Extra power in W per cache miss.
    pub miss_penalty_power: f64,
    pub operating_voltage: f64,

    // Workload
    /// Dynamic instruction count. Zero or negative counts are treated as 1.
    pub num_instructions: i64,
}

impl Default for ArchConfig {
    fn default() -> Self {
        Self {
            cache_size_kb: 32.0,
            cache_block_size_b: 64,
            cache_associativity: 4,
            cache_replacement_policy: "lru".into(),
            cache_hit_time_ns: 1.0,

            l2_cache_size_kb: 0.0,
            l2_cache_hit_time_ns: 4.0,
            l3_cache_size_kb: 0.0,
            l3_cache_hit_time_ns: 12.0,

            mem_size_gb: 8.0,
            mem_bandwidth_gbs: 25.0,
            mem_latency_ns: 80.0,

            reg_count: 32,
            reg_width_bits: 64,
            bus_width_bits: 64,
            bus_freq_ghz: 2.4,
            alu_width_bits: 64,

            clock_freq_ghz: 3.0,
            pipeline_depth: 14,
            issue_width: 4,

            branch_predictor: "bimodal".into(),
            mispredict_penalty_cycles: 15,

            static_power_per_kb: 0.02,
            dynamic_power_per_access: 0.005,
            cache_leakage_power: 0.1,
            miss_penalty_power: 0.05,
            operating_voltage: 1.0,

            num_instructions: 1_000_000,
        }
    }
}

impl ArchConfig {
    /// Build a configuration from untyped key/value input layered onto defaults.
    pub fn from_overrides(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        crate::overrides::apply_overrides(&Self::default(), map)
    }

    /// The resolved configuration as a key/value mapping, echoed in results.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A struct of scalars always serializes to an object.
            _ => serde_json::Map::new(),
        }
    }

    /// Instruction count as a float, floored at 1.
    pub fn instructions(&self) -> f64 {
        self.num_instructions.max(1) as f64
    }

    /// The recognized predictor class, if the name is one of the known ones.
    pub fn predictor(&self) -> Option<PredictorKind> {
        PredictorKind::from_name(&self.branch_predictor)
    }

    /// Whether an L2 is configured.
    pub fn has_l2(&self) -> bool {
        self.l2_cache_size_kb > 0.0
    }

    /// Whether an L3 is configured.
    pub fn has_l3(&self) -> bool {
        self.l3_cache_size_kb > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ArchConfig::default();
        assert_eq!(cfg.cache_size_kb, 32.0);
        assert_eq!(cfg.cache_associativity, 4);
        assert_eq!(cfg.cache_block_size_b, 64);
        assert_eq!(cfg.branch_predictor, "bimodal");
        assert_eq!(cfg.num_instructions, 1_000_000);
        assert!(!cfg.has_l2());
        assert!(!cfg.has_l3());
    }

    #[test]
    fn instructions_floor_at_one() {
        let cfg = ArchConfig {
            num_instructions: 0,
            ..ArchConfig::default()
        };
        assert_eq!(cfg.instructions(), 1.0);
    }

    #[test]
    fn negative_instructions_floor_at_one() {
        let cfg = ArchConfig {
            num_instructions: -5,
            ..ArchConfig::default()
        };
        assert_eq!(cfg.instructions(), 1.0);
    }

    #[test]
    fn to_map_has_every_field() {
        let map = ArchConfig::default().to_map();
        assert_eq!(map.len(), 28);
        assert_eq!(map["cache_replacement_policy"], "lru");
        assert_eq!(map["issue_width"], 4);
        assert_eq!(map["mem_latency_ns"], 80.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ArchConfig = serde_json::from_str(r#"{ "issue_width": 2 }"#).unwrap();
        assert_eq!(cfg.issue_width, 2);
        assert_eq!(cfg.clock_freq_ghz, 3.0);
    }

    #[test]
    fn predictor_lookup_ignores_case() {
        let cfg = ArchConfig {
            branch_predictor: "Tournament".into(),
            ..ArchConfig::default()
        };
        assert_eq!(cfg.predictor(), Some(PredictorKind::Tournament));
    }
}
