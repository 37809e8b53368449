//! Branch stall accounting and execution time.
//!
//! The branch analysis re-derives IPC by adding misprediction stalls to the
//! CPI of a seed IPC. Its `ipc_after` is reported next to the general IPC
//! model's value; the two are not reconciled.

use serde::{Deserialize, Serialize};

use crate::config::ArchConfig;
use crate::perf::MAX_IPC;

/// Fraction of dynamic instructions that are branches.
pub const BRANCH_DENSITY: f64 = 0.20;

/// Floor applied to IPC before it is inverted.
const MIN_IPC: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAnalysis {
    pub branch_total_branches: f64,
    pub branch_mispredict_count: f64,
    /// Cycles lost to mispredictions over the whole workload.
    pub branch_stall_cycles: f64,
    pub branch_ipc_before: f64,
    pub branch_ipc_after: f64,
    pub branch_ipc_loss_percent: f64,
    /// `1 - mispredict_rate`.
    pub branch_predictor_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionAnalysis {
    pub execution_time_sec: f64,
    /// Extra cycles of the actual run over the ideal one, never negative.
    pub stall_cycles_total: f64,
    pub ideal_cycles: f64,
    pub actual_cycles: f64,
}

/// Stall cycles and IPC loss caused by branch mispredictions.
pub fn analyze_branch_prediction(
    cfg: &ArchConfig,
    mispredict_rate: f64,
    raw_ipc: f64,
) -> BranchAnalysis {
    let instructions = cfg.instructions();

    let total_branches = instructions * BRANCH_DENSITY;
    let mispredict_count = total_branches * mispredict_rate;
    let stall_cycles = mispredict_count * cfg.mispredict_penalty_cycles as f64;

    let ipc_before = raw_ipc.max(MIN_IPC);
    // A negative penalty removes cycles; CPI bottoms out at the IPC ceiling.
    let cpi_floor = 1.0 / ipc_before.max(MAX_IPC);
    let cpi_after = (1.0 / ipc_before + stall_cycles / instructions).max(cpi_floor);
    let ipc_after = 1.0 / cpi_after;

    let ipc_loss_percent = if ipc_before > 0.0 {
        (ipc_before - ipc_after) / ipc_before * 100.0
    } else {
        0.0
    };

    BranchAnalysis {
        branch_total_branches: total_branches,
        branch_mispredict_count: mispredict_count,
        branch_stall_cycles: stall_cycles,
        branch_ipc_before: ipc_before,
        branch_ipc_after: ipc_after,
        branch_ipc_loss_percent: ipc_loss_percent,
        branch_predictor_efficiency: 1.0 - mispredict_rate,
    }
}

/// Ideal and actual cycle counts and wall-clock time for the workload.
pub fn analyze_execution_time(
    cfg: &ArchConfig,
    ipc_before: f64,
    ipc_after: f64,
) -> ExecutionAnalysis {
    let instructions = cfg.instructions();

    let ideal_cycles = instructions / ipc_before.max(MIN_IPC);
    let actual_cycles = instructions / ipc_after.max(MIN_IPC);
    let cycles_per_sec = (cfg.clock_freq_ghz * 1e9).max(1.0);

    ExecutionAnalysis {
        execution_time_sec: actual_cycles / cycles_per_sec,
        stall_cycles_total: (actual_cycles - ideal_cycles).max(0.0),
        ideal_cycles,
        actual_cycles,
    }
}
