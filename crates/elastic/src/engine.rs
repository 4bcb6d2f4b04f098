use serde_json::{Map, Value};
use std::future::Future;
use thiserror::Error;

/// Errors a [SearchEngine] implementation can surface.
///
/// The provider maps these onto its own taxonomy: connection failures stay
/// connection failures, rejected requests become query errors, and missing
/// indices or documents are interpreted per call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The engine could not be reached, or the transport failed mid-request.
    #[error("engine connection error: {0}")]
    Connection(String),

    /// The engine rejected the request as malformed.
    #[error("engine rejected request: {0}")]
    Request(String),

    /// The named index or document does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// One page of a forward-only cursor walk.
#[derive(Debug, Default)]
pub struct ScrollPage {
    /// The raw hits in this page, in sorted order.
    pub hits: Vec<Value>,

    /// Cursor for the next page; `None` when the walk is exhausted.
    pub cursor: Option<String>,
}

/// The document search engine collaborator.
///
/// One long-lived engine handle is shared read-only across concurrent
/// provider calls; implementations must be safe for concurrent use.
/// Implementors wrap whatever transport the embedder uses — this crate only
/// consumes the contract.
pub trait SearchEngine: Send + Sync {
    /// Returns whether the engine is reachable.
    fn ping(&self) -> impl Future<Output = Result<bool, EngineError>> + Send;

    /// Returns the engine's version string, e.g. `"8.14.3"`.
    fn version(&self) -> impl Future<Output = Result<String, EngineError>> + Send;

    /// Returns schema metadata keyed by concrete index name, covering every
    /// index matched by `index` (wildcards allowed).
    fn mappings(
        &self,
        index: &str,
    ) -> impl Future<Output = Result<Map<String, Value>, EngineError>> + Send;

    /// Executes a query body against an index.
    ///
    /// The response carries `hits.total.value`, `hits.hits`, and, when the
    /// body requests them, `aggregations`.
    fn search(
        &self,
        index: &str,
        body: &Value,
        from: u64,
        size: u64,
    ) -> impl Future<Output = Result<Value, EngineError>> + Send;

    /// Starts or continues a forward-only sorted walk over the documents
    /// matching a query body.
    fn scroll(
        &self,
        index: &str,
        body: &Value,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<ScrollPage, EngineError>> + Send;

    /// Returns a document by its native identifier.
    fn get(
        &self,
        index: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Value>, EngineError>> + Send;

    /// Inserts or replaces a document (upsert semantics).
    fn index(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Removes a document, returning whether one was actually removed.
    fn delete(
        &self,
        index: &str,
        id: &str,
    ) -> impl Future<Output = Result<bool, EngineError>> + Send;
}
