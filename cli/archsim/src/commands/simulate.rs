//! `archsim simulate` — evaluate one configuration.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use archsim_model::{evaluate, SimulationReport};

use super::{log_issues, percent};
use crate::manifest::StudyManifest;
use crate::source::ConfigSource;

/// Resolve, evaluate and print (or write) one configuration.
pub fn run(
    manifest: Option<&StudyManifest>,
    source: &ConfigSource<'_>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let label = source.label(manifest);
    let cfg = source.resolve(manifest)?;
    log_issues(&label, &cfg);

    let report = evaluate(&cfg);
    let rendered = render(&label, &report, format)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Render a report as `text` (default) or `json`.
pub fn render(label: &str, report: &SimulationReport, format: Option<&str>) -> Result<String> {
    match format.unwrap_or("text") {
        "text" => Ok(render_text(label, report)),
        "json" => {
            let map = report.to_map()?;
            let mut json = serde_json::to_string_pretty(&map)?;
            json.push('\n');
            Ok(json)
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
}

fn level(rate: f64) -> String {
    if rate > 0.0 {
        percent(rate)
    } else {
        "-".into()
    }
}

/// Human-readable report.
pub fn render_text(label: &str, r: &SimulationReport) -> String {
    let cfg = &r.config;
    let mut text = String::new();

    text.push_str(&format!("=== Simulation: {label} ===\n"));
    text.push_str(&format!(
        "Core: {} GHz, {}-wide, {} stages, {} predictor\n",
        cfg.clock_freq_ghz, cfg.issue_width, cfg.pipeline_depth, cfg.branch_predictor
    ));
    text.push_str(&format!("Workload: {} instructions\n\n", cfg.num_instructions));

    text.push_str("--- Cache & Memory ---\n");
    text.push_str(&format!(
        "  Hit rate:   {} (L1 {}, L2 {}, L3 {})\n",
        percent(r.cache_hit_rate),
        level(r.l1_cache_hit_rate),
        level(r.l2_cache_hit_rate),
        level(r.l3_cache_hit_rate),
    ));
    text.push_str(&format!("  Miss rate:  {}\n", percent(r.cache_miss_rate)));
    text.push_str(&format!("  L1 hit:     {:.3} ns\n", r.cache_hit_time_ns));
    text.push_str(&format!("  AMAT:       {:.3} ns\n\n", r.amat_ns));

    text.push_str("--- Performance ---\n");
    text.push_str(&format!("  Mispredict: {}\n", percent(r.branch_mispredict_rate)));
    text.push_str(&format!("  IPC:        {:.4}\n", r.ipc_index));
    text.push_str(&format!("  Perf index: {:.4}\n", r.performance_index));
    text.push_str(&format!("  Power idx:  {:.4}\n", r.power_index));
    text.push_str(&format!("  Efficiency: {:.4}\n\n", r.efficiency_index));

    let b = &r.branch;
    text.push_str("--- Branch Analysis ---\n");
    text.push_str(&format!(
        "  Branches:   {:.0} ({:.0} mispredicted)\n",
        b.branch_total_branches, b.branch_mispredict_count
    ));
    text.push_str(&format!("  Stalls:     {:.0} cycles\n", b.branch_stall_cycles));
    text.push_str(&format!(
        "  IPC:        {:.4} -> {:.4} (-{:.2}%)\n",
        b.branch_ipc_before, b.branch_ipc_after, b.branch_ipc_loss_percent
    ));
    text.push_str(&format!(
        "  Predictor:  {} efficient\n\n",
        percent(b.branch_predictor_efficiency)
    ));

    let e = &r.execution;
    text.push_str("--- Execution ---\n");
    text.push_str(&format!("  Ideal:      {:.0} cycles\n", e.ideal_cycles));
    text.push_str(&format!("  Actual:     {:.0} cycles\n", e.actual_cycles));
    text.push_str(&format!("  Stalls:     {:.0} cycles\n", e.stall_cycles_total));
    text.push_str(&format!("  Time:       {:.6} s\n\n", e.execution_time_sec));

    let p = &r.power;
    text.push_str("--- Power ---\n");
    text.push_str(&format!("  Average:    {:.3} W\n", p.average_power_consumption));
    text.push_str(&format!("  Energy:     {:.3} J\n", p.total_energy_consumption));
    text.push_str(&format!("  Per access: {:.6} J\n", p.energy_per_access));
    text.push_str(&format!("  Density:    {:.1} W/cm²\n", p.power_density));

    text
}
