//! Error types for option registration and definition loading.
//!
//! Every failure here happens before parsing starts: a definition without a
//! key, a pattern that does not compile, or a definition file that cannot be
//! read. Problems with the arguments themselves never surface as errors; the
//! engine reports them through its [`Reporter`](crate::Reporter).

use thiserror::Error;

/// Errors raised while building option definitions.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The definition has no canonical key (absent or empty).
    #[error("invalid option provided, \"key\" is required")]
    MissingKey,

    /// The validation pattern is not a valid regular expression.
    #[error("invalid pattern for option -{key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// Definition file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON definition file could not be parsed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML definition file could not be parsed.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Definition file extension is neither JSON nor YAML.
    #[error("unsupported definition file format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience alias for results with [`ConfigurationError`].
pub type Result<T> = std::result::Result<T, ConfigurationError>;
