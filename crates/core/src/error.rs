use thiserror::Error;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [chrono::ParseError]
    #[error(transparent)]
    ChronoParse(#[from] chrono::ParseError),

    /// [cql2::Error]
    #[error(transparent)]
    Cql2(#[from] cql2::Error),

    /// A datetime interval with both bounds open.
    #[error("empty datetime interval")]
    EmptyDatetimeInterval,

    /// [geojson::Error]
    #[error(transparent)]
    Geojson(#[from] Box<geojson::Error>),

    /// This vector is not a valid bounding box.
    #[error("invalid bbox: {0:?}")]
    InvalidBbox(Vec<f64>),

    /// This string is not a valid datetime instant or interval.
    #[error("invalid datetime: {0}")]
    InvalidDatetime(String),

    /// This string is not a valid sort descriptor.
    #[error("invalid sortby: {0}")]
    InvalidSortby(String),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// A datetime interval whose start is after its end.
    #[error("start is after end: {0} > {1}")]
    StartIsAfterEnd(String, String),

    /// A coordinate transform could not be applied.
    #[error("geometry transform failed: {0}")]
    Transform(String),
}
