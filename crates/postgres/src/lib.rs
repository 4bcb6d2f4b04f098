//! PostGIS strategy for the [ogcfeat] feature-query contract.
//!
//! [PostgresProvider] reflects a table's columns into a typed field catalog,
//! compiles the uniform [Query](ogcfeat::Query) into SQL fragments with
//! numbered parameters, pages with plain `ORDER BY … OFFSET … LIMIT`, and
//! relocates the geometry column (selected as GeoJSON text) onto the
//! canonical feature. Writes run in a short-lived transaction per call.

#![warn(unused_qualifications)]

mod error;
mod pool;
mod provider;
mod sql;

pub use error::Error;
pub use provider::PostgresProvider;
pub use sql::{SqlParam, SqlQuery, compile};

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Return this crate's version.
///
/// # Examples
///
/// ```
/// println!("{}", ogcfeat_postgres::version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
