use geojson::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A canonical feature: one record normalized out of a backing store.
///
/// Produced fresh per result row; a feature has no identity beyond the
/// response it appears in.
///
/// # Examples
///
/// ```
/// use ogcfeat::Feature;
///
/// let feature = Feature::new("an-id").property("name", "Paris");
/// assert!(feature.geometry.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// The feature identifier.
    ///
    /// An empty identifier on a write input means "assign one for me".
    #[serde(default)]
    pub id: String,

    /// Always `"Feature"`.
    #[serde(rename = "type", default = "feature_type")]
    pub r#type: String,

    /// The feature geometry, in the target CRS.
    ///
    /// Serialized as `null` when absent, never omitted.
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// The feature properties, in projection order.
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// The identifier immediately below this one in identifier order.
    ///
    /// Only populated by backends with ordered identifier navigation;
    /// self-referential when there is no lower neighbor.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prev: Option<String>,

    /// The identifier immediately above this one in identifier order.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next: Option<String>,
}

/// A paginated set of canonical features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type", default = "feature_collection_type")]
    pub r#type: String,

    /// The returned features.
    pub features: Vec<Feature>,

    /// The total number of records satisfying the filter, independent of
    /// pagination.
    pub number_matched: u64,

    /// The number of features in this response.
    pub number_returned: u64,
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn feature_collection_type() -> String {
    "FeatureCollection".to_string()
}

impl Feature {
    /// Creates a new feature with the given identifier.
    pub fn new(id: impl ToString) -> Feature {
        Feature {
            id: id.to_string(),
            r#type: feature_type(),
            geometry: None,
            properties: Map::new(),
            prev: None,
            next: None,
        }
    }

    /// Sets a property on this feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat::Feature;
    ///
    /// let feature = Feature::new("an-id").property("population", 42);
    /// ```
    pub fn property(mut self, name: impl ToString, value: impl Into<Value>) -> Feature {
        let _ = self.properties.insert(name.to_string(), value.into());
        self
    }

    /// Sets the geometry of this feature.
    pub fn geometry(mut self, geometry: Geometry) -> Feature {
        self.geometry = Some(geometry);
        self
    }
}

impl FeatureCollection {
    /// Creates a feature collection, deriving `number_returned` from the
    /// features.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat::{Feature, FeatureCollection};
    ///
    /// let collection = FeatureCollection::new(vec![Feature::new("a")], 100);
    /// assert_eq!(collection.number_returned, 1);
    /// assert_eq!(collection.number_matched, 100);
    /// ```
    pub fn new(features: Vec<Feature>, number_matched: u64) -> FeatureCollection {
        let number_returned = features.len() as u64;
        FeatureCollection {
            r#type: feature_collection_type(),
            features,
            number_matched,
            number_returned,
        }
    }

    /// Creates an empty collection carrying only a match count.
    pub fn hits(number_matched: u64) -> FeatureCollection {
        FeatureCollection::new(Vec::new(), number_matched)
    }
}
