//! Power and energy model.
//!
//! Every instruction is counted as one cache access. Energy is reported
//! over a normalized one-second window, so `total_energy_consumption` and
//! `average_power_consumption` are numerically equal.

use serde::{Deserialize, Serialize};

use crate::config::ArchConfig;

/// Smallest die area, in cm², used for power density.
pub const MIN_AREA_CM2: f64 = 0.001;

/// Power and energy figures for one workload run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAnalysis {
    /// Energy in J over the normalized window.
    pub total_energy_consumption: f64,
    /// Static + dynamic + leakage + miss power, in W.
    pub average_power_consumption: f64,
    pub energy_per_access: f64,
    /// W per cm² of estimated L1 area.
    pub power_density: f64,
}

/// Estimate power and energy from overall cache hit/miss rates.
pub fn estimate_power_consumption(cfg: &ArchConfig, hit_rate: f64, miss_rate: f64) -> PowerAnalysis {
    let total_accesses = cfg.instructions();
    let hits = total_accesses * hit_rate;
    let misses = total_accesses * miss_rate;

    let static_power = cfg.static_power_per_kb * cfg.cache_size_kb;
    let dynamic_power = cfg.dynamic_power_per_access * hits;
    let leakage_power = cfg.cache_leakage_power;
    let miss_power = cfg.miss_penalty_power * misses;

    let average_power = static_power + dynamic_power + leakage_power + miss_power;
    let total_energy = average_power * 1.0;
    let energy_per_access = total_energy / total_accesses;

    let area_cm2 = (cfg.cache_size_kb * 0.001).max(MIN_AREA_CM2);

    PowerAnalysis {
        total_energy_consumption: total_energy,
        average_power_consumption: average_power,
        energy_per_access,
        power_density: average_power / area_cm2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn default_workload() {
        let p = estimate_power_consumption(&ArchConfig::default(), 0.9, 0.1);
        // 0.64 static + 4500 dynamic + 0.1 leakage + 5000 miss
        assert!(close(p.average_power_consumption, 9500.74));
        assert_eq!(p.total_energy_consumption, p.average_power_consumption);
        assert!(close(p.energy_per_access, 9500.74 / 1e6));
        assert!(close(p.power_density, 9500.74 / 0.032));
    }

    #[test]
    fn zero_instructions_counts_one_access() {
        let cfg = ArchConfig {
            num_instructions: 0,
            ..ArchConfig::default()
        };
        let p = estimate_power_consumption(&cfg, 1.0, 0.0);
        assert!(close(p.average_power_consumption, 0.64 + 0.005 + 0.1));
        assert!(p.energy_per_access.is_finite());
    }

    #[test]
    fn area_floor_for_missing_l1() {
        let cfg = ArchConfig {
            cache_size_kb: 0.0,
            num_instructions: 1,
            ..ArchConfig::default()
        };
        let p = estimate_power_consumption(&cfg, 0.0, 1.0);
        assert!(close(p.power_density, (0.1 + 0.05) / MIN_AREA_CM2));
    }

    #[test]
    fn more_misses_cost_more() {
        let cfg = ArchConfig::default();
        let good = estimate_power_consumption(&cfg, 0.99, 0.01);
        let bad = estimate_power_consumption(&cfg, 0.5, 0.5);
        assert!(bad.average_power_consumption > good.average_power_consumption);
    }
}
