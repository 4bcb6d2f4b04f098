use crate::EngineError;
use thiserror::Error;

/// A crate-specific error enum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The search engine is unreachable, of an unsupported version, or the
    /// transport failed mid-request.
    #[error("connection error: {0}")]
    Connection(String),

    /// [geojson::Error]
    #[error(transparent)]
    Geojson(#[from] Box<geojson::Error>),

    /// An input item cannot be mapped to the engine's document shape.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// No record matches the identifier.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// [ogcfeat::Error]
    #[error(transparent)]
    Ogcfeat(#[from] ogcfeat::Error),

    /// A malformed or unsupported query, or a schema-introspection failure.
    #[error("query error: {0}")]
    Query(String),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Error {
        match err {
            EngineError::Connection(message) => Error::Connection(message),
            EngineError::Request(message) => Error::Query(message),
            EngineError::NotFound(message) => Error::Query(message),
        }
    }
}
