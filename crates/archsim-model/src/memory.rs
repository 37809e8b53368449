//! DRAM latency model.

use crate::config::ArchConfig;
use crate::util::clamp;

/// Reference bandwidth in GB/s at which the base latency applies unchanged.
pub const REFERENCE_BANDWIDTH_GBS: f64 = 25.0;

/// Fixed bus/controller cost in ns added to every access that reaches DRAM.
pub const TRANSFER_PENALTY_NS: f64 = 10.0;

/// Effective DRAM latency in ns.
///
/// The base latency is scaled by `25 / bandwidth`, clamped to `[0.7, 2.0]`:
/// starved links inflate latency up to 2x, wide ones compress it to 0.7x.
pub fn memory_latency_ns(cfg: &ArchConfig) -> f64 {
    if cfg.mem_bandwidth_gbs <= 0.0 {
        log::warn!(
            "memory bandwidth {} GB/s is not positive; using the 2x latency ceiling",
            cfg.mem_bandwidth_gbs
        );
    }
    let bw_factor = clamp(
        REFERENCE_BANDWIDTH_GBS / cfg.mem_bandwidth_gbs.max(1e-3),
        0.7,
        2.0,
    );
    cfg.mem_latency_ns * bw_factor
}

/// Full cost of going to memory: effective latency plus transfer overhead.
pub fn memory_penalty_ns(cfg: &ArchConfig) -> f64 {
    memory_latency_ns(cfg) + TRANSFER_PENALTY_NS
}
