//! The evaluation pipeline.
//!
//! Runs every sub-model once, in dependency order, and assembles the flat
//! result mapping:
//!
//! 1. cache hierarchy: hit/miss rate, AMAT
//! 2. misprediction rate
//! 3. IPC and the performance/power/efficiency indices
//! 4. branch stall analysis seeded with the IPC from step 3
//! 5. execution time from step 4's IPC before/after
//! 6. power and energy from step 1's hit/miss rates

use serde::Serialize;

use crate::analysis::{analyze_branch_prediction, analyze_execution_time};
use crate::analysis::{BranchAnalysis, ExecutionAnalysis};
use crate::branch::mispredict_rate;
use crate::cache::estimate_multi_level_cache;
use crate::config::ArchConfig;
use crate::error::Result;
use crate::perf::{efficiency_index, estimate_ipc, performance_index, power_index};
use crate::power::{estimate_power_consumption, PowerAnalysis};

/// Every numeric key of the result mapping (everything except `config`).
pub const METRIC_KEYS: [&str; 27] = [
    "cache_hit_rate",
    "cache_miss_rate",
    "cache_hit_time_ns",
    "amat_ns",
    "l1_cache_hit_rate",
    "l2_cache_hit_rate",
    "l3_cache_hit_rate",
    "branch_mispredict_rate",
    "ipc_index",
    "performance_index",
    "power_index",
    "efficiency_index",
    "total_energy_consumption",
    "average_power_consumption",
    "energy_per_access",
    "power_density",
    "branch_total_branches",
    "branch_mispredict_count",
    "branch_stall_cycles",
    "branch_ipc_before",
    "branch_ipc_after",
    "branch_ipc_loss_percent",
    "branch_predictor_efficiency",
    "execution_time_sec",
    "stall_cycles_total",
    "ideal_cycles",
    "actual_cycles",
];

/// Full result of one evaluation.
///
/// Serializes to a single flat mapping: the nested analyses are flattened
/// into the top level and their key prefixes keep the names disjoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// The resolved input, echoed for traceability.
    pub config: ArchConfig,

    pub cache_hit_rate: f64,
    pub cache_miss_rate: f64,
    pub cache_hit_time_ns: f64,
    pub amat_ns: f64,
    pub l1_cache_hit_rate: f64,
    pub l2_cache_hit_rate: f64,
    pub l3_cache_hit_rate: f64,

    pub branch_mispredict_rate: f64,
    pub ipc_index: f64,
    pub performance_index: f64,
    pub power_index: f64,
    pub efficiency_index: f64,

    #[serde(flatten)]
    pub power: PowerAnalysis,
    #[serde(flatten)]
    pub branch: BranchAnalysis,
    #[serde(flatten)]
    pub execution: ExecutionAnalysis,
}

impl SimulationReport {
    /// The report as a flat key/value mapping with sorted keys.
    ///
    /// JSON has no infinity or NaN, so a metric that overflowed appears as
    /// `null`. [`validate_config`](crate::parse::validate_config) reports
    /// inputs that cause this.
    pub fn to_map(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(crate::error::ModelError::Validation {
                detail: format!("report serialized to a non-object: {other}"),
            }),
        }
    }

    /// Look up a numeric metric by its result key.
    pub fn metric(&self, key: &str) -> Option<f64> {
        let value = match key {
            "cache_hit_rate" => self.cache_hit_rate,
            "cache_miss_rate" => self.cache_miss_rate,
            "cache_hit_time_ns" => self.cache_hit_time_ns,
            "amat_ns" => self.amat_ns,
            "l1_cache_hit_rate" => self.l1_cache_hit_rate,
            "l2_cache_hit_rate" => self.l2_cache_hit_rate,
            "l3_cache_hit_rate" => self.l3_cache_hit_rate,
            "branch_mispredict_rate" => self.branch_mispredict_rate,
            "ipc_index" => self.ipc_index,
            "performance_index" => self.performance_index,
            "power_index" => self.power_index,
            "efficiency_index" => self.efficiency_index,
            "total_energy_consumption" => self.power.total_energy_consumption,
            "average_power_consumption" => self.power.average_power_consumption,
            "energy_per_access" => self.power.energy_per_access,
            "power_density" => self.power.power_density,
            "branch_total_branches" => self.branch.branch_total_branches,
            "branch_mispredict_count" => self.branch.branch_mispredict_count,
            "branch_stall_cycles" => self.branch.branch_stall_cycles,
            "branch_ipc_before" => self.branch.branch_ipc_before,
            "branch_ipc_after" => self.branch.branch_ipc_after,
            "branch_ipc_loss_percent" => self.branch.branch_ipc_loss_percent,
            "branch_predictor_efficiency" => self.branch.branch_predictor_efficiency,
            "execution_time_sec" => self.execution.execution_time_sec,
            "stall_cycles_total" => self.execution.stall_cycles_total,
            "ideal_cycles" => self.execution.ideal_cycles,
            "actual_cycles" => self.execution.actual_cycles,
            _ => return None,
        };
        Some(value)
    }
}

/// Run the full model chain on one configuration.
pub fn evaluate(cfg: &ArchConfig) -> SimulationReport {
    let cache = estimate_multi_level_cache(cfg);
    log::debug!(
        "cache: l1={:.4} l2={:.4} l3={:.4} overall={:.4} amat={:.3}ns",
        cache.l1_hit_rate,
        cache.l2_hit_rate,
        cache.l3_hit_rate,
        cache.overall_hit_rate,
        cache.amat_ns
    );

    let mispredict = mispredict_rate(cfg);

    let ipc = estimate_ipc(cfg, cache.amat_ns, mispredict);
    let perf = performance_index(cfg, ipc);
    let power_idx = power_index(cfg);
    let efficiency = efficiency_index(perf, power_idx);
    log::debug!(
        "core: mispredict={mispredict} ipc={ipc:.4} perf={perf:.4} power={power_idx:.4} eff={efficiency:.4}"
    );

    let branch = analyze_branch_prediction(cfg, mispredict, ipc);
    let execution =
        analyze_execution_time(cfg, branch.branch_ipc_before, branch.branch_ipc_after);
    log::debug!(
        "branch: ipc {:.4} -> {:.4}, time={:.6}s",
        branch.branch_ipc_before,
        branch.branch_ipc_after,
        execution.execution_time_sec
    );

    let power = estimate_power_consumption(cfg, cache.overall_hit_rate, cache.overall_miss_rate);

    SimulationReport {
        config: cfg.clone(),
        cache_hit_rate: cache.overall_hit_rate,
        cache_miss_rate: cache.overall_miss_rate,
        cache_hit_time_ns: cfg.cache_hit_time_ns,
        amat_ns: cache.amat_ns,
        l1_cache_hit_rate: cache.l1_hit_rate,
        l2_cache_hit_rate: cache.l2_hit_rate,
        l3_cache_hit_rate: cache.l3_hit_rate,
        branch_mispredict_rate: mispredict,
        ipc_index: ipc,
        performance_index: perf,
        power_index: power_idx,
        efficiency_index: efficiency,
        power,
        branch,
        execution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_has_exactly_the_documented_keys() {
        let map = evaluate(&ArchConfig::default()).to_map().unwrap();
        assert_eq!(map.len(), METRIC_KEYS.len() + 1);
        assert!(map["config"].is_object());
        for key in METRIC_KEYS {
            assert!(map[key].is_number(), "missing or non-numeric key {key}");
        }
    }

    #[test]
    fn metric_matches_map() {
        let report = evaluate(&ArchConfig::default());
        let map = report.to_map().unwrap();
        for key in METRIC_KEYS {
            assert_eq!(report.metric(key), map[key].as_f64(), "{key}");
        }
        assert_eq!(report.metric("config"), None);
        assert_eq!(report.metric("no_such_metric"), None);
    }

    #[test]
    fn overflowing_metric_maps_to_null() {
        let report = evaluate(&ArchConfig {
            clock_freq_ghz: 1e308,
            ..ArchConfig::default()
        });
        assert!(report.performance_index.is_infinite());
        let map = report.to_map().unwrap();
        assert!(map["performance_index"].is_null());
        assert!(map["ipc_index"].is_number());
    }

    #[test]
    fn branch_analysis_seeded_from_general_ipc() {
        let report = evaluate(&ArchConfig::default());
        assert_eq!(report.branch.branch_ipc_before, report.ipc_index);
        assert!(report.branch.branch_ipc_after < report.ipc_index);
    }

    #[test]
    fn echoed_config_is_input() {
        let cfg = ArchConfig {
            issue_width: 6,
            ..ArchConfig::default()
        };
        assert_eq!(evaluate(&cfg).config, cfg);
    }
}
