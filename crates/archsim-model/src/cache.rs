//! Analytical cache hierarchy model.
//!
//! Hit rates come from a per-level formula with diminishing returns; AMAT is
//! composed as an inclusive miss chain L1 -> L2 -> L3 -> memory, where an
//! absent level adds no time and filters no misses.

use serde::{Deserialize, Serialize};

use crate::config::ArchConfig;
use crate::memory::memory_penalty_ns;
use crate::util::clamp;

/// Hit rate of a level at the reference geometry (32 KB, 4-way, 64 B lines).
pub const BASE_HIT_RATE: f64 = 0.90;
/// Lowest hit rate an enabled level can report.
pub const MIN_HIT_RATE: f64 = 0.30;
/// Highest hit rate an enabled level can report.
pub const MAX_HIT_RATE: f64 = 0.995;

/// Results of the multi-level model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHierarchyMetrics {
    pub l1_hit_rate: f64,
    /// 0 when no L2 is configured.
    pub l2_hit_rate: f64,
    /// 0 when no L3 is configured.
    pub l3_hit_rate: f64,
    /// Probability a reference is served by any cache level.
    pub overall_hit_rate: f64,
    pub overall_miss_rate: f64,
    /// Average memory access time in ns.
    pub amat_ns: f64,
}

/// Hit rate of a single cache level.
///
/// Returns 0 for a disabled level (`size_kb <= 0`). Otherwise each of size,
/// associativity and block size contributes linearly relative to the
/// reference geometry, saturating at 4x (size, associativity) or 2x (block),
/// and the sum is clamped to `[0.30, 0.995]`.
pub fn estimate_level_hit_rate(size_kb: f64, associativity: i64, block_size_b: i64) -> f64 {
    if size_kb <= 0.0 {
        return 0.0;
    }

    let size_factor = (size_kb / 32.0).min(4.0);
    let assoc_factor = (associativity as f64 / 4.0).min(4.0);
    let block_factor = (block_size_b as f64 / 64.0).min(2.0);

    let hit = BASE_HIT_RATE
        + 0.03 * (size_factor - 1.0)
        + 0.02 * (assoc_factor - 1.0)
        + 0.01 * (block_factor - 1.0);
    clamp(hit, MIN_HIT_RATE, MAX_HIT_RATE)
}

/// One level of the hierarchy as seen by the miss chain.
struct Level {
    hit_rate: f64,
    hit_time_ns: f64,
    present: bool,
}

impl Level {
    fn new(size_kb: f64, hit_time_ns: f64, cfg: &ArchConfig) -> Self {
        let present = size_kb > 0.0;
        Self {
            hit_rate: if present {
                estimate_level_hit_rate(size_kb, cfg.cache_associativity, cfg.cache_block_size_b)
            } else {
                0.0
            },
            hit_time_ns: if present { hit_time_ns } else { 0.0 },
            present,
        }
    }

    /// Fraction of incoming references passed on to the next level.
    fn pass_through(&self) -> f64 {
        if self.present {
            1.0 - self.hit_rate
        } else {
            1.0
        }
    }
}

/// L1/L2/L3 hit rates, overall hit/miss probability and AMAT.
///
/// L2 and L3 reuse L1's associativity and block size.
pub fn estimate_multi_level_cache(cfg: &ArchConfig) -> CacheHierarchyMetrics {
    let l1_hit = estimate_level_hit_rate(
        cfg.cache_size_kb,
        cfg.cache_associativity,
        cfg.cache_block_size_b,
    );
    let l1_miss = 1.0 - l1_hit;
    let l2 = Level::new(cfg.l2_cache_size_kb, cfg.l2_cache_hit_time_ns, cfg);
    let l3 = Level::new(cfg.l3_cache_size_kb, cfg.l3_cache_hit_time_ns, cfg);

    let mem_penalty = memory_penalty_ns(cfg);

    let amat = cfg.cache_hit_time_ns
        + l1_miss
            * (l2.hit_time_ns
                + l2.pass_through() * (l3.hit_time_ns + l3.pass_through() * mem_penalty));

    let overall_hit = l1_hit + l1_miss * (l2.hit_rate + (1.0 - l2.hit_rate) * l3.hit_rate);

    CacheHierarchyMetrics {
        l1_hit_rate: l1_hit,
        l2_hit_rate: l2.hit_rate,
        l3_hit_rate: l3.hit_rate,
        overall_hit_rate: overall_hit,
        overall_miss_rate: 1.0 - overall_hit,
        amat_ns: amat,
    }
}
