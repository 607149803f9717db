use thiserror::Error;

/// Errors from time control.
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("preset index {index} is outside the ladder (0..{len})")]
    PresetOutOfRange { index: usize, len: usize },
    #[error("invalid timestamp '{input}': {source}")]
    InvalidTimestamp {
        input: String,
        source: chrono::ParseError,
    },
}
