//! Branch predictor classes and their misprediction rates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ArchConfig;

/// Rate used when the predictor name is not recognized (same as bimodal).
pub const FALLBACK_MISPREDICT_RATE: f64 = 0.08;

/// Known predictor classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorKind {
    /// No prediction at all.
    Off,
    /// Fixed direction (e.g. backward-taken).
    Static,
    /// Table of 2-bit saturating counters.
    Bimodal,
    /// Local/global hybrid with a chooser.
    Tournament,
}

impl PredictorKind {
    /// Every class, worst to best.
    pub const ALL: [PredictorKind; 4] = [
        PredictorKind::Off,
        PredictorKind::Static,
        PredictorKind::Bimodal,
        PredictorKind::Tournament,
    ];

    /// Parse a predictor name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "off" => Some(Self::Off),
            "static" => Some(Self::Static),
            "bimodal" => Some(Self::Bimodal),
            "tournament" => Some(Self::Tournament),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Static => "static",
            Self::Bimodal => "bimodal",
            Self::Tournament => "tournament",
        }
    }

    /// Fraction of branches mispredicted by this class.
    pub fn mispredict_rate(self) -> f64 {
        match self {
            Self::Off => 0.50,
            Self::Static => 0.15,
            Self::Bimodal => 0.08,
            Self::Tournament => 0.04,
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Misprediction rate for the configured predictor.
///
/// Unknown names are not an error: they get the bimodal rate.
pub fn mispredict_rate(cfg: &ArchConfig) -> f64 {
    match cfg.predictor() {
        Some(kind) => kind.mispredict_rate(),
        None => {
            log::warn!(
                "unknown branch predictor '{}'; assuming bimodal rate {FALLBACK_MISPREDICT_RATE}",
                cfg.branch_predictor
            );
            FALLBACK_MISPREDICT_RATE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_for(name: &str) -> f64 {
        mispredict_rate(&ArchConfig {
            branch_predictor: name.into(),
            ..ArchConfig::default()
        })
    }

    #[test]
    fn table_values() {
        assert_eq!(rate_for("off"), 0.50);
        assert_eq!(rate_for("static"), 0.15);
        assert_eq!(rate_for("bimodal"), 0.08);
        assert_eq!(rate_for("tournament"), 0.04);
    }

    #[test]
    fn better_predictors_mispredict_less() {
        let rates: Vec<f64> = PredictorKind::ALL.iter().map(|k| k.mispredict_rate()).collect();
        assert!(rates.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(rate_for("TOURNAMENT"), 0.04);
        assert_eq!(rate_for("Static"), 0.15);
    }

    #[test]
    fn unknown_falls_back_to_bimodal() {
        assert_eq!(rate_for("perceptron"), rate_for("bimodal"));
        assert_eq!(rate_for(""), rate_for("bimodal"));
    }

    #[test]
    fn name_round_trip() {
        for kind in PredictorKind::ALL {
            assert_eq!(PredictorKind::from_name(kind.name()), Some(kind));
        }
    }
}
