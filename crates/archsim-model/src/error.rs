//! Error types for configuration handling.
//!
//! The numeric models never fail; these errors come only from the boundary
//! that turns files, presets and key/value input into an [`ArchConfig`].
//!
//! [`ArchConfig`]: crate::config::ArchConfig

use std::path::PathBuf;

/// Errors that can occur while building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON conversion error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading/writing configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file not found.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No preset with this id in the catalog.
    #[error("unknown preset: '{id}'")]
    UnknownPreset {
        /// The requested preset id.
        id: String,
    },

    /// A value could not be coerced to the field's type.
    #[error("cannot use {value} for '{field}': expected {expected}")]
    Coercion {
        /// Field name.
        field: String,
        /// The offending value as given.
        value: String,
        /// Human-readable expected kind ("number", "non-negative integer", ...).
        expected: &'static str,
    },

    /// Malformed input that is not tied to a single field.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the failure.
        detail: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ModelError>;
