//! Uniform feature-query contract over heterogeneous geospatial stores.
//!
//! This crate **is**:
//!
//! - The query contract ([Query]) and its building blocks ([Bbox], [Sortby],
//!   [TemporalFilter], [Filter])
//! - The canonical result shapes ([Feature], [FeatureCollection])
//! - The typed field catalog ([Field], [FieldCatalog])
//! - The provider façade ([FeatureProvider]) implemented by the backend crates
//!
//! This crate **is not**:
//!
//! - A query engine. The store-specific compilation, pagination, and
//!   normalization live in the backend crates (`ogcfeat-elastic`,
//!   `ogcfeat-postgres`).

#![warn(unused_qualifications)]

mod bbox;
mod config;
mod error;
mod feature;
mod field;
mod filter;
mod provider;
mod query;
mod sort;
mod temporal;
mod transform;

pub use bbox::Bbox;
pub use config::{DEFAULT_STORAGE_CRS, ProviderConfig};
pub use error::Error;
pub use feature::{Feature, FeatureCollection};
pub use field::{Field, FieldCatalog, FieldType};
pub use filter::Filter;
pub use provider::{Domains, FeatureProvider};
pub use query::{DEFAULT_LIMIT, Query, ResultType};
pub use sort::{Direction, Sortby};
pub use temporal::TemporalFilter;
pub use transform::{CrsTransform, GeometryTransformer};

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Return this crate's version.
///
/// # Examples
///
/// ```
/// println!("{}", ogcfeat::version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
