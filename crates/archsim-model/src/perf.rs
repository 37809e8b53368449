//! IPC and normalized performance/power/efficiency indices.
//!
//! Indices are unitless and relative to a reference core: 3 GHz clock,
//! 64-bit register and ALU widths, 32 KB L1, 1.0 V.

use crate::config::ArchConfig;
use crate::util::clamp;

/// Reference clock for the performance and power indices, in GHz.
pub const REFERENCE_CLOCK_GHZ: f64 = 3.0;

pub const MIN_IPC: f64 = 0.1;
pub const MAX_IPC: f64 = 5.0;
pub const MIN_POWER_INDEX: f64 = 0.1;
pub const MAX_POWER_INDEX: f64 = 10.0;

/// Instructions per cycle from issue width and pipeline depth, derated by
/// memory stalls (via AMAT) and branch mispredictions.
pub fn estimate_ipc(cfg: &ArchConfig, amat_ns: f64, mispredict_rate: f64) -> f64 {
    let mut base_ipc = (cfg.issue_width as f64 * 0.9).min(4.0);

    // Only pipelines deeper than 8 stages are penalized; shallow ones get no bonus.
    let depth_penalty = clamp((cfg.pipeline_depth as f64 - 8.0) / 32.0, -0.3, 0.3);
    base_ipc *= 1.0 - depth_penalty.max(0.0);

    let mem_factor = clamp(1.0 - amat_ns / 200.0, 0.4, 1.0);
    let branch_factor = clamp(1.0 - mispredict_rate * 0.8, 0.3, 1.0);

    clamp(base_ipc * mem_factor * branch_factor, MIN_IPC, MAX_IPC)
}

/// IPC scaled by clock relative to 3 GHz.
pub fn performance_index(cfg: &ArchConfig, ipc: f64) -> f64 {
    ipc * cfg.clock_freq_ghz / REFERENCE_CLOCK_GHZ
}

/// Relative power draw from frequency, datapath width, L1 size and voltage.
pub fn power_index(cfg: &ArchConfig) -> f64 {
    let freq_factor = cfg.clock_freq_ghz / REFERENCE_CLOCK_GHZ;
    let width_factor =
        (cfg.reg_width_bits as f64 / 64.0 + cfg.alu_width_bits as f64 / 64.0) / 2.0;
    let cache_factor = cfg.cache_size_kb / 32.0;
    let voltage_factor = cfg.operating_voltage / 1.0;

    let idx = freq_factor
        * (0.5 + 0.5 * width_factor)
        * (0.6 + 0.4 * cache_factor)
        * voltage_factor;
    clamp(idx, MIN_POWER_INDEX, MAX_POWER_INDEX)
}

/// Performance per unit power; 0 when the power index is not positive.
pub fn efficiency_index(performance: f64, power: f64) -> f64 {
    if power <= 0.0 {
        return 0.0;
    }
    performance / power
}
