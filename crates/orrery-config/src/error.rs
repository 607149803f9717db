use std::path::PathBuf;

/// Errors from loading, saving or checking `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write config: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("malformed config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("cannot serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A setting parsed but is outside its meaningful range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
