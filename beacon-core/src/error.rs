//! Error types for beacon-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from preference persistence.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Underlying I/O failure (permission denied, read-only filesystem, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse preferences at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.beacon/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A key outside the known preference set was written.
    #[error("unknown preference key '{key}'; expected one of: {expected}")]
    UnknownKey { key: String, expected: String },
}
