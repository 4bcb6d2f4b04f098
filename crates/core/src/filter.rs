use crate::Error;
use cql2::Expr;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// A CQL2 filter expression, in either the text or the JSON encoding.
///
/// The expression itself is opaque to this crate: each backend renders the
/// parsed form to its native predicate with a catalog-backed field resolver.
///
/// # Examples
///
/// ```
/// use ogcfeat::Filter;
///
/// let filter: Filter = "population > 1000000".parse().unwrap();
/// let _ = filter.to_expr().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    /// A cql2-json expression.
    Cql2Json(Map<String, Value>),

    /// A cql2-text expression.
    Cql2Text(String),
}

impl Filter {
    /// Parses this filter into an expression tree.
    pub fn to_expr(&self) -> Result<Expr, Error> {
        match self {
            Filter::Cql2Json(object) => {
                serde_json::from_value(Value::Object(object.clone())).map_err(Error::from)
            }
            Filter::Cql2Text(text) => text.parse().map_err(Error::from),
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Filter, Error> {
        let _: Expr = s.parse()?;
        Ok(Filter::Cql2Text(s.to_string()))
    }
}
