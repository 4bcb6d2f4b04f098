use thiserror::Error;

/// A crate-specific error enum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The database is unreachable, or the connection failed mid-request.
    #[error("connection error: {0}")]
    Connection(String),

    /// Domain enumeration is not implemented for the relational strategy.
    #[error("domains are not implemented for the relational strategy")]
    DomainsNotImplemented,

    /// [geojson::Error]
    #[error(transparent)]
    Geojson(#[from] Box<geojson::Error>),

    /// An input item cannot be mapped to the table's columns.
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
