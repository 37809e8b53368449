//! CLI command implementations.

pub mod compare;
pub mod init;
pub mod preset;
pub mod simulate;
pub mod validate;

use archsim_model::parse::validate_config;
use archsim_model::ArchConfig;

/// Log advisory validation issues; evaluation goes ahead regardless.
pub(crate) fn log_issues(label: &str, cfg: &ArchConfig) {
    if let Err(issues) = validate_config(cfg) {
        for issue in issues {
            log::warn!("{label}: {} ({})", issue.message, issue.severity);
        }
    }
}

/// Format a fraction as a percentage.
pub(crate) fn percent(x: f64) -> String {
    format!("{:.2}%", x * 100.0)
}
