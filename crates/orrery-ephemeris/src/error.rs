//! Ephemeris error types.

/// Errors raised while building, loading or saving the element catalog, or when
/// a caller asks for geometry of a body that does not exist.
///
/// Numerical trouble during position resolution is not an error; see
/// [`ResolveStatus`](crate::ResolveStatus).
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    /// A body with the same name is already registered.
    #[error("body '{0}' is already in the catalog")]
    DuplicateBody(String),

    /// The requested body is not in the catalog.
    #[error("unknown body '{0}'")]
    UnknownBody(String),

    /// Failed to read a catalog file.
    #[error("failed to read catalog: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write a catalog file.
    #[error("failed to write catalog: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON catalog content.
    #[error("failed to parse catalog: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the catalog to RON.
    #[error("failed to serialize catalog: {0}")]
    SerializeError(#[source] ron::Error),
}
