//! Batch evaluation and ranking of several configurations.
//!
//! Each configuration is evaluated on its own; nothing is shared between
//! runs, so the order of the input does not affect any result.

use serde::Serialize;

use crate::config::ArchConfig;
use crate::error::{ModelError, Result};
use crate::evaluate::{evaluate, SimulationReport, METRIC_KEYS};

/// One evaluated configuration and the label it was requested under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledReport {
    pub label: String,
    pub report: SimulationReport,
}

/// Evaluate every `(label, config)` pair.
pub fn compare<S: AsRef<str>>(configs: &[(S, ArchConfig)]) -> Vec<LabelledReport> {
    configs
        .iter()
        .map(|(label, cfg)| {
            log::debug!("evaluating '{}'", label.as_ref());
            LabelledReport {
                label: label.as_ref().to_string(),
                report: evaluate(cfg),
            }
        })
        .collect()
}

/// Sort reports by `metric`, highest first. Ties keep their input order.
pub fn rank_by(reports: &mut [LabelledReport], metric: &str) -> Result<()> {
    if !METRIC_KEYS.contains(&metric) {
        return Err(ModelError::Validation {
            detail: format!("unknown metric '{metric}'"),
        });
    }
    reports.sort_by(|a, b| {
        let a = a.report.metric(metric).unwrap_or(f64::NEG_INFINITY);
        let b = b.report.metric(metric).unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::presets;

    fn preset_pairs() -> Vec<(String, ArchConfig)> {
        presets()
            .iter()
            .map(|p| (p.id.clone(), p.resolve().unwrap()))
            .collect()
    }

    #[test]
    fn compare_keeps_labels_and_order() {
        let reports = compare(&preset_pairs());
        let labels: Vec<&str> = reports.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["small-l1", "balanced", "high-perf"]);
    }

    #[test]
    fn batch_matches_single_evaluation() {
        let pairs = preset_pairs();
        let reports = compare(&pairs);
        for ((_, cfg), labelled) in pairs.iter().zip(&reports) {
            assert_eq!(labelled.report, evaluate(cfg));
        }
    }

    #[test]
    fn rank_by_performance() {
        let mut reports = compare(&preset_pairs());
        rank_by(&mut reports, "performance_index").unwrap();
        assert_eq!(reports[0].label, "high-perf");
        assert_eq!(reports[2].label, "small-l1");
    }

    #[test]
    fn rank_by_unknown_metric() {
        let mut reports = compare(&preset_pairs());
        assert!(rank_by(&mut reports, "config").is_err());
        assert!(rank_by(&mut reports, "speed").is_err());
    }
}
