use crate::{Feature, FeatureCollection, FieldCatalog, Query};
use indexmap::IndexMap;
use serde_json::Value;
use std::future::Future;

/// Distinct values per field, in catalog order.
pub type Domains = IndexMap<String, Vec<Value>>;

/// The provider façade: one uniform contract over a backing store.
///
/// Every method is safe to call from multiple concurrent tasks; all mutable
/// per-call state is local to the call, and the long-lived store handle is
/// shared read-only. Providers never retry internally — connectivity
/// failures surface to the caller, who owns retry policy.
///
/// # Examples
///
/// ```no_run
/// use ogcfeat::{FeatureProvider, Query};
///
/// async fn first_page<P: FeatureProvider>(provider: &P) -> Result<u64, P::Error> {
///     let collection = provider.query(Query::new().limit(10)).await?;
///     Ok(collection.number_matched)
/// }
/// ```
pub trait FeatureProvider: Send + Sync {
    /// The error type for this provider.
    type Error: Send;

    /// Returns the field catalog for this provider's collection.
    ///
    /// Idempotent and cached after the first success; schema changes in the
    /// backing store are not observed until the process restarts.
    fn fields(&self) -> impl Future<Output = Result<FieldCatalog, Self::Error>> + Send;

    /// Returns the distinct value set (capped) for the given fields, or for
    /// every cataloged field when `properties` is empty.
    ///
    /// The boolean in the result reports whether the domains were derived
    /// from the live dataset.
    fn domains(
        &self,
        properties: &[String],
        current: bool,
    ) -> impl Future<Output = Result<(Domains, bool), Self::Error>> + Send;

    /// Executes the uniform query contract against the backing store.
    fn query(
        &self,
        query: Query,
    ) -> impl Future<Output = Result<FeatureCollection, Self::Error>> + Send;

    /// Returns a single feature by identifier.
    fn get(&self, identifier: &str) -> impl Future<Output = Result<Feature, Self::Error>> + Send;

    /// Persists a new feature, returning its final identifier.
    ///
    /// When the input carries no identifier, one is generated.
    fn create(&self, item: Feature) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Replaces the feature with the given identifier (insert-or-replace,
    /// not a partial patch merge).
    fn update(
        &self,
        identifier: &str,
        item: Feature,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Removes the feature with the given identifier, returning whether a
    /// record was actually removed.
    fn delete(&self, identifier: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
