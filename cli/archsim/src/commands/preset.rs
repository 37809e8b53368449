//! `archsim preset` — preset listing and description.

use anyhow::{bail, Context, Result};
use archsim_model::parse::config_to_toml;
use archsim_model::{find_preset, presets, PRESET_CATALOG_VERSION};

/// List all built-in presets.
pub fn list() -> Result<()> {
    println!("Built-in presets (catalog v{PRESET_CATALOG_VERSION}):");
    println!();
    for preset in presets() {
        println!("  {:<12} {}", preset.id, preset.name);
    }
    println!();
    println!("Use 'archsim preset show <id>' for details.");
    Ok(())
}

/// Show one preset: its overrides (text), the resolved configuration
/// (toml), or the catalog entry (json).
pub fn show(id: &str, format: Option<&str>) -> Result<()> {
    print!("{}", render(id, format)?);
    Ok(())
}

pub fn render(id: &str, format: Option<&str>) -> Result<String> {
    let Some(preset) = find_preset(id) else {
        bail!("unknown preset: '{id}'. Use 'archsim preset list' to see available presets.");
    };

    match format.unwrap_or("text") {
        "text" => {
            let mut text = format!("=== Preset: {} ===\n{}\n\n", preset.id, preset.name);
            text.push_str("Overrides (all other keys use defaults):\n");
            for (key, value) in &preset.config {
                text.push_str(&format!("  {key:<22} {value}\n"));
            }
            Ok(text)
        }
        "toml" => {
            let cfg = preset
                .resolve()
                .with_context(|| format!("resolving preset '{id}'"))?;
            Ok(config_to_toml(&cfg)?)
        }
        "json" => Ok(serde_json::to_string_pretty(preset)? + "\n"),
        other => bail!("unknown format '{other}' (expected text, toml or json)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_runs() {
        assert!(list().is_ok());
    }

    #[test]
    fn show_known_preset() {
        let text = render("small-l1", None).unwrap();
        assert!(text.contains("Small L1, Simple Core"));
        assert!(text.contains("branch_predictor"));
    }

    #[test]
    fn toml_output_parses_back() {
        let toml_str = render("high-perf", Some("toml")).unwrap();
        let cfg = archsim_model::parse::parse_config_toml(&toml_str).unwrap();
        assert_eq!(cfg.issue_width, 6);
    }

    #[test]
    fn json_output_has_id() {
        let json = render("balanced", Some("json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "balanced");
        assert_eq!(value["config"]["cache_size_kb"], 32);
    }

    #[test]
    fn show_unknown_preset() {
        assert!(show("nonexistent", None).is_err());
    }
}
