use crate::{Bbox, Error, Filter, Sortby, TemporalFilter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The default number of results returned when no limit is requested.
pub const DEFAULT_LIMIT: u64 = 10;

/// The uniform query contract.
///
/// A `Query` is constructed per request and immutable once built; providers
/// thread it through their compiler and normalizer calls rather than storing
/// any of it on the shared provider instance.
///
/// # Examples
///
/// ```
/// use ogcfeat::{Query, Sortby};
///
/// let query = Query::new()
///     .bbox([-180.0, -90.0, 180.0, 90.0])
///     .datetime("2023-01-01/..")
///     .sortby(vec![Sortby::desc("population")])
///     .limit(5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The index of the first record to return.
    #[serde(default)]
    pub offset: u64,

    /// The maximum number of records to return.
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Whether to return results or only the match count.
    #[serde(default)]
    pub result_type: ResultType,

    /// A bounding box the results must intersect.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox: Option<Bbox>,

    /// A temporal instant or interval (see [TemporalFilter]).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datetime: Option<String>,

    /// Exact-match property filters, ANDed together.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub properties: Vec<(String, Value)>,

    /// Sort descriptors, in priority order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sortby: Vec<Sortby>,

    /// Property names to project the results down to.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub select_properties: Vec<String>,

    /// Whether to omit geometries from the results.
    #[serde(default)]
    pub skip_geometry: bool,

    /// A free-text search term set, comma-separated for OR groups.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub q: Option<String>,

    /// A CQL2 filter expression.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filter: Option<Filter>,

    /// A (source, target) CRS pair to transform result geometries with.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crs_transform: Option<(String, String)>,
}

/// Whether a query returns results or only a hit count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Return matching features.
    #[default]
    Results,

    /// Return only the match count; the feature sequence is always empty.
    Hits,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for Query {
    fn default() -> Query {
        Query {
            offset: 0,
            limit: DEFAULT_LIMIT,
            result_type: ResultType::default(),
            bbox: None,
            datetime: None,
            properties: Vec::new(),
            sortby: Vec::new(),
            select_properties: Vec::new(),
            skip_geometry: false,
            q: None,
            filter: None,
            crs_transform: None,
        }
    }
}

impl Query {
    /// Creates a new, empty query.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat::Query;
    ///
    /// let query = Query::new();
    /// assert_eq!(query.limit, ogcfeat::DEFAULT_LIMIT);
    /// ```
    pub fn new() -> Query {
        Query::default()
    }

    /// Sets the offset of this query.
    pub fn offset(mut self, offset: u64) -> Query {
        self.offset = offset;
        self
    }

    /// Sets the limit of this query.
    pub fn limit(mut self, limit: u64) -> Query {
        self.limit = limit;
        self
    }

    /// Requests only the match count.
    pub fn hits(mut self) -> Query {
        self.result_type = ResultType::Hits;
        self
    }

    /// Sets the bbox of this query.
    pub fn bbox(mut self, bbox: impl Into<Bbox>) -> Query {
        self.bbox = Some(bbox.into());
        self
    }

    /// Sets the datetime of this query.
    pub fn datetime(mut self, datetime: impl ToString) -> Query {
        self.datetime = Some(datetime.to_string());
        self
    }

    /// Adds an exact-match property filter.
    pub fn property(mut self, name: impl ToString, value: impl Into<Value>) -> Query {
        self.properties.push((name.to_string(), value.into()));
        self
    }

    /// Sets the sortby of this query.
    pub fn sortby(mut self, sortby: Vec<Sortby>) -> Query {
        self.sortby = sortby;
        self
    }

    /// Sets the property selection of this query.
    pub fn select_properties(mut self, select_properties: Vec<String>) -> Query {
        self.select_properties = select_properties;
        self
    }

    /// Omits geometries from the results.
    pub fn skip_geometry(mut self) -> Query {
        self.skip_geometry = true;
        self
    }

    /// Sets the free-text search term of this query.
    pub fn q(mut self, q: impl ToString) -> Query {
        self.q = Some(q.to_string());
        self
    }

    /// Sets the filter of this query.
    pub fn filter(mut self, filter: Filter) -> Query {
        self.filter = Some(filter);
        self
    }

    /// Requests a CRS transform of result geometries.
    pub fn crs_transform(mut self, source: impl ToString, target: impl ToString) -> Query {
        self.crs_transform = Some((source.to_string(), target.to_string()));
        self
    }

    /// Parses this query's datetime parameter, if any.
    pub fn temporal_filter(&self) -> Result<Option<TemporalFilter>, Error> {
        self.datetime.as_deref().map(TemporalFilter::parse).transpose()
    }

    /// Returns the limit to fetch with: the requested limit, or zero when
    /// only a hit count was requested.
    pub fn effective_limit(&self) -> u64 {
        if self.result_type == ResultType::Hits {
            0
        } else {
            self.limit
        }
    }
}
