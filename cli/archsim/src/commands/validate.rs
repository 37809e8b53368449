//! `archsim validate` — check a configuration file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use archsim_model::parse::{load_config_toml, validate_config};

/// Load a `.arch.toml` file and report validation issues.
///
/// Fails if any issue has error severity; warnings are printed only.
pub fn run(path: &Path) -> Result<()> {
    let cfg = load_config_toml(path).with_context(|| format!("loading {}", path.display()))?;

    let issues = match validate_config(&cfg) {
        Ok(()) => {
            println!("{}: ok", path.display());
            return Ok(());
        }
        Err(issues) => issues,
    };

    for issue in &issues {
        println!("  {}: {}", issue.severity, issue.message);
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("{}: {errors} error(s), {} warning(s)", path.display(), issues.len() - errors);
    }
    println!("{}: ok ({} warning(s))", path.display(), issues.len());
    Ok(())
}
