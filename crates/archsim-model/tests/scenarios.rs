//! End-to-end scenarios and properties of the evaluation pipeline.

use archsim_model::cache::estimate_level_hit_rate;
use archsim_model::evaluate::METRIC_KEYS;
use archsim_model::{evaluate, presets, ArchConfig, PredictorKind};
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_configuration_scenario() {
    let report = evaluate(&ArchConfig::default());

    assert_eq!(report.cache_hit_rate, 0.90);
    assert_eq!(report.l1_cache_hit_rate, 0.90);
    assert_eq!(report.l2_cache_hit_rate, 0.0);
    assert_eq!(report.l3_cache_hit_rate, 0.0);
    assert_eq!(report.branch_mispredict_rate, 0.08);
    assert_eq!(report.cache_hit_time_ns, 1.0);
    // 1.0 + 0.10 * (80 * clamp(25 / 25) + 10)
    assert!(close(report.amat_ns, 10.0), "amat = {}", report.amat_ns);

    let expected_ipc = 3.6 * (1.0 - 6.0 / 32.0) * (1.0 - 10.0 / 200.0) * (1.0 - 0.08 * 0.8);
    assert!(close(report.ipc_index, expected_ipc));
    assert!(close(report.performance_index, expected_ipc));
    assert!(close(report.power_index, 1.0));
    assert!(close(report.efficiency_index, expected_ipc));

    assert!(close(report.branch.branch_total_branches, 200_000.0));
    assert!(close(report.branch.branch_stall_cycles, 240_000.0));
    assert!(close(report.branch.branch_predictor_efficiency, 0.92));
}

#[test]
fn adding_l2_improves_hit_rate_and_amat() {
    let base = evaluate(&ArchConfig::default());
    let with_l2 = evaluate(&ArchConfig {
        l2_cache_size_kb: 256.0,
        l2_cache_hit_time_ns: 4.0,
        ..ArchConfig::default()
    });

    assert!(with_l2.cache_hit_rate > base.cache_hit_rate);
    assert!(with_l2.amat_ns < base.amat_ns);
    assert!(with_l2.l2_cache_hit_rate > 0.0);
    assert!(with_l2.ipc_index >= base.ipc_index);
}

#[test]
fn disabling_l2_removes_its_contribution() {
    let disabled = evaluate(&ArchConfig {
        l2_cache_size_kb: 0.0,
        l2_cache_hit_time_ns: 40.0,
        ..ArchConfig::default()
    });
    let default = evaluate(&ArchConfig::default());
    assert_eq!(disabled.l2_cache_hit_rate, 0.0);
    assert_eq!(disabled.amat_ns, default.amat_ns);
}

#[test]
fn level_hit_rate_is_monotone() {
    for assoc in [1, 2, 4, 8, 16] {
        for block in [16, 32, 64, 128] {
            let mut prev = 0.0;
            for size in [4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 1024.0] {
                let hit = estimate_level_hit_rate(size, assoc, block);
                assert!(hit >= prev, "size {size} assoc {assoc} block {block}");
                prev = hit;
            }
        }
    }
}

#[test]
fn predictor_ordering() {
    let rate = |name: &str| {
        evaluate(&ArchConfig {
            branch_predictor: name.into(),
            ..ArchConfig::default()
        })
        .branch_mispredict_rate
    };
    assert!(rate("tournament") < rate("bimodal"));
    assert!(rate("bimodal") < rate("static"));
    assert!(rate("static") < rate("off"));
    assert_eq!(rate("gshare"), rate("bimodal"));
    assert_eq!(rate("OFF"), PredictorKind::Off.mispredict_rate());
}

#[test]
fn bounds_hold_across_a_sweep() {
    for size in [-8.0, 0.0, 1.0, 16.0, 32.0, 128.0, 4096.0] {
        for issue_width in [-2, 0, 1, 4, 8] {
            for clock in [0.0, 1.0, 3.0, 6.0] {
                for voltage in [-1.0, 0.0, 1.0, 1.4] {
                    for predictor in ["off", "static", "bimodal", "tournament", "?"] {
                        let cfg = ArchConfig {
                            cache_size_kb: size,
                            issue_width,
                            clock_freq_ghz: clock,
                            operating_voltage: voltage,
                            branch_predictor: predictor.into(),
                            ..ArchConfig::default()
                        };
                        let r = evaluate(&cfg);
                        if size > 0.0 {
                            assert!((0.30..=0.995).contains(&r.cache_hit_rate));
                        } else {
                            // A disabled L1 with no L2/L3 hits nothing.
                            assert_eq!(r.l1_cache_hit_rate, 0.0);
                            assert_eq!(r.cache_hit_rate, 0.0);
                            assert_eq!(r.cache_miss_rate, 1.0);
                        }
                        assert!((0.1..=5.0).contains(&r.ipc_index));
                        assert!((0.1..=10.0).contains(&r.power_index));
                        assert!(r.efficiency_index >= 0.0);
                        assert!(r.execution.stall_cycles_total >= 0.0);
                        for key in METRIC_KEYS {
                            let value = r.metric(key).unwrap();
                            assert!(value.is_finite(), "{key} = {value} for {cfg:?}");
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn negative_integer_inputs_are_clamped() {
    let overrides = match json!({
        "num_instructions": -5,
        "mispredict_penalty_cycles": -3,
        "issue_width": -2,
    }) {
        serde_json::Value::Object(m) => m,
        _ => unreachable!(),
    };
    let cfg = ArchConfig::from_overrides(&overrides).unwrap();
    let r = evaluate(&cfg);
    assert!(close(r.branch.branch_total_branches, 0.2));
    assert_eq!(r.ipc_index, 0.1);
    assert!(r.execution.stall_cycles_total >= 0.0);
    for key in METRIC_KEYS {
        let value = r.metric(key).unwrap();
        assert!(value.is_finite(), "{key} = {value}");
    }
}

#[test]
fn determinism() {
    for preset in presets() {
        let cfg = preset.resolve().unwrap();
        let a = serde_json::to_string(&evaluate(&cfg).to_map().unwrap()).unwrap();
        let b = serde_json::to_string(&evaluate(&cfg).to_map().unwrap()).unwrap();
        assert_eq!(a, b, "{}", preset.id);
    }
}

#[test]
fn pathological_inputs_stay_finite() {
    let cfg = ArchConfig {
        mem_bandwidth_gbs: 0.0,
        num_instructions: 0,
        clock_freq_ghz: 0.0,
        pipeline_depth: 0,
        cache_associativity: 0,
        cache_block_size_b: 0,
        ..ArchConfig::default()
    };
    let report = evaluate(&cfg);
    for key in METRIC_KEYS {
        let value = report.metric(key).unwrap();
        assert!(value.is_finite(), "{key} = {value}");
    }
    // Zero bandwidth doubles memory latency: 1 + (1 - hit) * (160 + 10)
    let miss = 1.0 - report.l1_cache_hit_rate;
    assert!(close(report.amat_ns, 1.0 + miss * 170.0));
}

#[test]
fn branch_and_general_ipc_are_both_reported() {
    let r = evaluate(&ArchConfig {
        branch_predictor: "off".into(),
        ..ArchConfig::default()
    });
    assert_eq!(r.branch.branch_ipc_before, r.ipc_index);
    assert!(r.branch.branch_ipc_after < r.ipc_index);
    assert!(r.branch.branch_ipc_loss_percent > 0.0);
    assert!(close(r.execution.ideal_cycles, 1_000_000.0 / r.branch.branch_ipc_before));
    assert!(close(r.execution.actual_cycles, 1_000_000.0 / r.branch.branch_ipc_after));
}

#[test]
fn energy_equals_power_over_unit_window() {
    for preset in presets() {
        let r = evaluate(&preset.resolve().unwrap());
        assert_eq!(r.power.total_energy_consumption, r.power.average_power_consumption);
    }
}

#[test]
fn config_is_echoed_in_the_map() {
    let cfg = ArchConfig {
        branch_predictor: "Tournament".into(),
        ..ArchConfig::default()
    };
    let map = evaluate(&cfg).to_map().unwrap();
    assert_eq!(map["config"]["branch_predictor"], "Tournament");
    assert_eq!(map["config"]["num_instructions"], 1_000_000);
}
