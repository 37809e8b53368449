//! Closed-form performance, power and efficiency models for processor configurations.
//!
//! Every metric is an analytical function of an [`ArchConfig`]; nothing is
//! simulated cycle by cycle. The models compose in a fixed order:
//! - **Cache hierarchy:** per-level hit rates and inclusive AMAT
//! - **Branch prediction:** predictor class to misprediction rate
//! - **Performance:** IPC, performance/power/efficiency indices
//! - **Analysis:** branch stall accounting, execution time, power/energy
//!
//! [`evaluate`] runs the whole chain and returns a [`SimulationReport`].

pub mod analysis;
pub mod branch;
pub mod cache;
pub mod compare;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod memory;
pub mod overrides;
pub mod parse;
pub mod perf;
pub mod power;
pub mod preset;

mod util;

pub use analysis::{BranchAnalysis, ExecutionAnalysis};
pub use branch::PredictorKind;
pub use cache::CacheHierarchyMetrics;
pub use compare::{compare, rank_by, LabelledReport};
pub use config::ArchConfig;
pub use error::{ModelError, Result};
pub use evaluate::{evaluate, SimulationReport};
pub use overrides::{apply_overrides, parse_assignment};
pub use parse::ValidationIssue;
pub use power::PowerAnalysis;
pub use preset::{find_preset, preset_config, presets, Preset, PRESET_CATALOG_VERSION};
