//! `archsim compare` — evaluate several configurations side by side.

use std::path::Path;

use anyhow::{bail, Context, Result};
use archsim_model::parse::discover_configs;
use archsim_model::{compare, presets, rank_by, ArchConfig, LabelledReport};
use serde_json::json;

use super::log_issues;
use crate::manifest::StudyManifest;
use crate::source::{resolve_named, ConfigSource};

/// Compare the named configurations, or every preset and study config if
/// no names are given.
pub fn run(
    study_dir: &Path,
    manifest: Option<&StudyManifest>,
    names: &[String],
    sort_by: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    let reports = collect(study_dir, manifest, names, sort_by)?;
    let rendered = match format.unwrap_or("text") {
        "text" => render_table(&reports),
        "json" => {
            let mut rows = Vec::with_capacity(reports.len());
            for r in &reports {
                rows.push(json!({ "label": r.label, "metrics": r.report.to_map()? }));
            }
            serde_json::to_string_pretty(&rows)? + "\n"
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    };
    print!("{rendered}");
    Ok(())
}

/// Resolve, evaluate and rank.
pub fn collect(
    study_dir: &Path,
    manifest: Option<&StudyManifest>,
    names: &[String],
    sort_by: Option<&str>,
) -> Result<Vec<LabelledReport>> {
    let mut configs: Vec<(String, ArchConfig)> = Vec::new();

    if names.is_empty() {
        for preset in presets() {
            let source = ConfigSource {
                preset: Some(preset.id.as_str()),
                ..ConfigSource::default()
            };
            configs.push((preset.id.clone(), source.resolve(manifest)?));
        }
        for (name, path) in discover_configs(study_dir)? {
            let source = ConfigSource {
                file: Some(path.as_path()),
                ..ConfigSource::default()
            };
            configs.push((format!("configs/{name}"), source.resolve(manifest)?));
        }
    } else {
        for name in names {
            let cfg = resolve_named(name, study_dir, manifest)?;
            configs.push((name.clone(), cfg));
        }
    }

    if configs.is_empty() {
        bail!("nothing to compare");
    }
    for (label, cfg) in &configs {
        log_issues(label, cfg);
    }

    let mut reports = compare(&configs);
    if let Some(metric) = sort_by.or_else(|| manifest.and_then(|m| m.default_sort_metric())) {
        rank_by(&mut reports, metric).with_context(|| format!("sorting by '{metric}'"))?;
    }
    Ok(reports)
}

/// Fixed-width comparison table.
pub fn render_table(reports: &[LabelledReport]) -> String {
    let width = reports
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(0)
        .max("config".len());

    let mut text = String::new();
    text.push_str(&format!(
        "{:<width$}  {:>8}  {:>8}  {:>6}  {:>6}  {:>6}  {:>10}  {:>12}\n",
        "config", "hit", "amat ns", "ipc", "perf", "power", "efficiency", "time s",
    ));
    for r in reports {
        let m = &r.report;
        text.push_str(&format!(
            "{:<width$}  {:>7.2}%  {:>8.3}  {:>6.3}  {:>6.3}  {:>6.3}  {:>10.4}  {:>12.6}\n",
            r.label,
            m.cache_hit_rate * 100.0,
            m.amat_ns,
            m.ipc_index,
            m.performance_index,
            m.power_index,
            m.efficiency_index,
            m.execution.execution_time_sec,
        ));
    }
    text
}
