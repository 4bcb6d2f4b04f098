//! End-to-end provider tests against an in-memory search engine.
//!
//! The fake engine interprets the compiled query DSL (bool trees, terms,
//! matches, ranges, envelopes, sorts, scrolls, aggregations), which lets the
//! deep-pagination fallback be compared against direct-mode results.

use geo::Intersects;
use ogcfeat::{
    Feature, FeatureProvider, GeometryTransformer, ProviderConfig, Query, Sortby,
};
use ogcfeat_elastic::{
    ElasticProvider, EngineError, Error, ScrollPage, SearchEngine, build_query,
};
use serde_json::{Map, Value, json};
use std::cmp::Ordering;
use std::sync::Mutex;

const SCROLL_PAGE: usize = 100;

struct FakeEngine {
    reachable: bool,
    version: String,
    mappings: Map<String, Value>,
    docs: Mutex<Vec<(String, Value)>>,
}

impl FakeEngine {
    fn new(docs: Vec<(String, Value)>) -> FakeEngine {
        FakeEngine {
            reachable: true,
            version: "8.14.3".to_string(),
            mappings: mappings(),
            docs: Mutex::new(docs),
        }
    }

    fn matched(&self, body: &Value) -> Vec<(String, Value)> {
        let mut matched: Vec<(String, Value)> = self
            .docs
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, source)| matches_query(source, body))
            .cloned()
            .collect();
        sort_docs(&mut matched, body.get("sort").and_then(Value::as_array));
        matched
    }
}

impl SearchEngine for FakeEngine {
    async fn ping(&self) -> Result<bool, EngineError> {
        Ok(self.reachable)
    }

    async fn version(&self) -> Result<String, EngineError> {
        Ok(self.version.clone())
    }

    async fn mappings(&self, index: &str) -> Result<Map<String, Value>, EngineError> {
        if self.mappings.is_empty() {
            Err(EngineError::NotFound(index.to_string()))
        } else {
            Ok(self.mappings.clone())
        }
    }

    async fn search(
        &self,
        _index: &str,
        body: &Value,
        from: u64,
        size: u64,
    ) -> Result<Value, EngineError> {
        let matched = self.matched(body);
        let total = matched.len();
        if let Some(aggs) = body.get("aggs").and_then(Value::as_object) {
            let aggregations = compute_aggregations(&matched, aggs);
            return Ok(json!({
                "hits": {"total": {"value": total}, "hits": []},
                "aggregations": aggregations,
            }));
        }
        let hits: Vec<Value> = matched
            .into_iter()
            .skip(from as usize)
            .take(size as usize)
            .map(|(id, source)| to_hit(&id, &source, body.get("_source")))
            .collect();
        Ok(json!({"hits": {"total": {"value": total}, "hits": hits}}))
    }

    async fn scroll(
        &self,
        _index: &str,
        body: &Value,
        cursor: Option<&str>,
    ) -> Result<ScrollPage, EngineError> {
        let matched = self.matched(body);
        let start: usize = cursor.map(|cursor| cursor.parse().unwrap()).unwrap_or(0);
        let hits: Vec<Value> = matched
            .iter()
            .skip(start)
            .take(SCROLL_PAGE)
            .map(|(id, source)| to_hit(id, source, body.get("_source")))
            .collect();
        let next = start + hits.len();
        let cursor = (next < matched.len()).then(|| next.to_string());
        Ok(ScrollPage { hits, cursor })
    }

    async fn get(&self, _index: &str, id: &str) -> Result<Option<Value>, EngineError> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(doc_id, source)| json!({"_id": doc_id, "_source": source})))
    }

    async fn index(&self, _index: &str, id: &str, document: &Value) -> Result<(), EngineError> {
        let mut docs = self.docs.lock().unwrap();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some(entry) => entry.1 = document.clone(),
            None => docs.push((id.to_string(), document.clone())),
        }
        Ok(())
    }

    async fn delete(&self, _index: &str, id: &str) -> Result<bool, EngineError> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        Ok(docs.len() < before)
    }
}

fn to_hit(id: &str, source: &Value, source_filter: Option<&Value>) -> Value {
    json!({"_id": id, "_source": apply_source_filter(source, source_filter)})
}

fn compute_aggregations(matched: &[(String, Value)], aggs: &Map<String, Value>) -> Value {
    let mut result = json!({});
    for (key, spec) in aggs {
        let Some(field) = spec.pointer("/terms/field").and_then(Value::as_str) else {
            continue;
        };
        let size = spec
            .pointer("/terms/size")
            .and_then(Value::as_u64)
            .unwrap_or(10) as usize;
        let path = strip_raw(field);
        let mut buckets: Vec<Value> = Vec::new();
        let mut seen: Vec<Value> = Vec::new();
        for (_, source) in matched {
            let Some(value) = lookup(source, &path).filter(|value| !value.is_null()) else {
                continue;
            };
            if seen.contains(value) {
                continue;
            }
            seen.push(value.clone());
            buckets.push(json!({"key": value, "doc_count": 1}));
            if buckets.len() == size {
                break;
            }
        }
        result[key.as_str()] = json!({"buckets": buckets});
    }
    result
}

fn matches_query(source: &Value, body: &Value) -> bool {
    body.get("query")
        .map(|query| matches_clause(source, query))
        .unwrap_or(true)
}

fn matches_clause(source: &Value, clause: &Value) -> bool {
    let Some((kind, spec)) = clause.as_object().and_then(|object| object.iter().next()) else {
        return true;
    };
    match kind.as_str() {
        "bool" => {
            let all = |key: &str| {
                spec.get(key)
                    .and_then(Value::as_array)
                    .map(|clauses| clauses.iter().all(|clause| matches_clause(source, clause)))
                    .unwrap_or(true)
            };
            let must_not = spec
                .get("must_not")
                .and_then(Value::as_array)
                .map(|clauses| clauses.iter().any(|clause| matches_clause(source, clause)))
                .unwrap_or(false);
            let should = match spec.get("should").and_then(Value::as_array) {
                Some(clauses) => {
                    let minimum = spec
                        .get("minimum_should_match")
                        .and_then(Value::as_u64)
                        .unwrap_or(1) as usize;
                    clauses
                        .iter()
                        .filter(|clause| matches_clause(source, clause))
                        .count()
                        >= minimum
                }
                None => true,
            };
            all("filter") && all("must") && !must_not && should
        }
        "term" | "match_phrase" => {
            let Some((path, expected)) = single(spec) else {
                return false;
            };
            lookup(source, &strip_raw(path)) == Some(expected)
        }
        "match" => {
            let Some((path, spec)) = single(spec) else {
                return false;
            };
            let expected = spec.get("query").unwrap_or(spec);
            lookup(source, &strip_raw(path)) == Some(expected)
        }
        "terms" => {
            let Some((path, expected)) = single(spec) else {
                return false;
            };
            let Some(value) = lookup(source, &strip_raw(path)) else {
                return false;
            };
            expected
                .as_array()
                .is_some_and(|values| values.contains(value))
        }
        "range" => {
            let Some((path, bounds)) = single(spec) else {
                return false;
            };
            let Some(value) = lookup(source, &strip_raw(path)) else {
                return false;
            };
            bounds.as_object().is_some_and(|bounds| {
                bounds.iter().all(|(bound, limit)| {
                    let ordering = compare_values(Some(value), Some(limit));
                    match bound.as_str() {
                        "gte" => ordering != Ordering::Less,
                        "gt" => ordering == Ordering::Greater,
                        "lte" => ordering != Ordering::Greater,
                        "lt" => ordering == Ordering::Less,
                        _ => true,
                    }
                })
            })
        }
        "geo_shape" => {
            let Some((field, spec)) = single(spec) else {
                return false;
            };
            matches_envelope(source, field, spec)
        }
        "exists" => {
            let Some(path) = spec.get("field").and_then(Value::as_str) else {
                return false;
            };
            lookup(source, &strip_raw(path)).is_some_and(|value| !value.is_null())
        }
        // Anything else (e.g. query_string) is out of scope for the fake.
        _ => true,
    }
}

fn matches_envelope(source: &Value, field: &str, spec: &Value) -> bool {
    let Some(corners) = spec.pointer("/shape/coordinates").and_then(Value::as_array) else {
        return false;
    };
    let corner = |index: usize, axis: usize| {
        corners
            .get(index)
            .and_then(|pair| pair.get(axis))
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN)
    };
    // Corners arrive as [[xmin, ymax], [xmax, ymin]].
    let rect = geo::Rect::new(
        geo::coord! { x: corner(0, 0), y: corner(1, 1) },
        geo::coord! { x: corner(1, 0), y: corner(0, 1) },
    );
    let Some(value) = source.get(field) else {
        return false;
    };
    let Ok(geometry) = serde_json::from_value::<geojson::Geometry>(value.clone()) else {
        return false;
    };
    let Ok(geometry) = geo_types::Geometry::<f64>::try_from(geometry) else {
        return false;
    };
    rect.to_polygon().intersects(&geometry)
}

fn single(spec: &Value) -> Option<(&String, &Value)> {
    spec.as_object().and_then(|object| object.iter().next())
}

fn strip_raw(path: &str) -> String {
    path.strip_suffix(".raw").unwrap_or(path).to_string()
}

fn lookup<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    let mut value = source;
    for segment in path.split('.') {
        value = value.get(segment)?;
    }
    Some(value)
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => {
            if let (Some(left), Some(right)) = (left.as_f64(), right.as_f64()) {
                left.partial_cmp(&right).unwrap_or(Ordering::Equal)
            } else if let (Some(left), Some(right)) = (left.as_str(), right.as_str()) {
                left.cmp(right)
            } else {
                Ordering::Equal
            }
        }
    }
}

fn sort_docs(docs: &mut [(String, Value)], sort: Option<&Vec<Value>>) {
    let Some(entries) = sort else {
        return;
    };
    docs.sort_by(|left, right| {
        for entry in entries {
            let Some((path, spec)) = single(entry) else {
                continue;
            };
            let path = strip_raw(path);
            let ordering = compare_values(lookup(&left.1, &path), lookup(&right.1, &path));
            let ordering = if spec.get("order").and_then(Value::as_str) == Some("desc") {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        left.0.cmp(&right.0)
    });
}

fn apply_source_filter(source: &Value, spec: Option<&Value>) -> Value {
    let Some(spec) = spec else {
        return source.clone();
    };
    let mut result = match spec.get("includes").and_then(Value::as_array) {
        Some(includes) => {
            let mut projected = json!({});
            for path in includes.iter().filter_map(Value::as_str) {
                if let Some(value) = lookup(source, path) {
                    insert_path(&mut projected, path, value.clone());
                }
            }
            projected
        }
        None => source.clone(),
    };
    if let Some(excludes) = spec.get("excludes").and_then(Value::as_array) {
        for path in excludes.iter().filter_map(Value::as_str) {
            remove_path(&mut result, path);
        }
    }
    result
}

fn insert_path(target: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = target;
    for segment in &segments[..segments.len() - 1] {
        current = current
            .as_object_mut()
            .unwrap()
            .entry(segment.to_string())
            .or_insert(json!({}));
    }
    let _ = current
        .as_object_mut()
        .unwrap()
        .insert(segments[segments.len() - 1].to_string(), value);
}

fn remove_path(target: &mut Value, path: &str) {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = target;
    for segment in &segments[..segments.len() - 1] {
        match current.get_mut(segment) {
            Some(next) => current = next,
            None => return,
        }
    }
    if let Some(object) = current.as_object_mut() {
        let _ = object.remove(segments[segments.len() - 1]);
    }
}

fn mappings() -> Map<String, Value> {
    json!({
        "cities": {
            "mappings": {
                "properties": {
                    "geometry": {"type": "geo_shape"},
                    "id": {"type": "text"},
                    "properties": {
                        "properties": {
                            "name": {"type": "text"},
                            "population": {"type": "long"},
                            "updated": {"type": "date"},
                            "address": {
                                "properties": {
                                    "street": {"type": "text"},
                                }
                            },
                        }
                    },
                }
            }
        }
    })
    .as_object()
    .unwrap()
    .clone()
}

fn city(id: &str, name: &str, population: u64, lon: f64, lat: f64, updated: &str) -> (String, Value) {
    (
        id.to_string(),
        json!({
            "id": id,
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [lon, lat]},
            "properties": {
                "id": id,
                "name": name,
                "population": population,
                "updated": updated,
            },
        }),
    )
}

fn cities() -> Vec<(String, Value)> {
    vec![
        city("paris", "Paris", 2_100_000, 2.35, 48.85, "2023-01-01T00:00:00Z"),
        city("berlin", "Berlin", 3_600_000, 13.4, 52.5, "2023-06-15T00:00:00Z"),
        city("tokyo", "Tokyo", 13_900_000, 139.7, 35.7, "2022-12-31T23:59:59Z"),
    ]
}

fn config() -> ProviderConfig {
    ProviderConfig::new("http://localhost:9200/", "cities", "id").time_field("updated")
}

async fn provider() -> ElasticProvider<FakeEngine> {
    ElasticProvider::new(FakeEngine::new(cities()), config())
        .await
        .unwrap()
}

#[tokio::test]
async fn construction_fails_when_unreachable() {
    let mut engine = FakeEngine::new(Vec::new());
    engine.reachable = false;
    let err = ElasticProvider::new(engine, config()).await.unwrap_err();
    assert!(matches!(err, Error::Connection(_)));
}

#[tokio::test]
async fn construction_requires_version_8() {
    let mut engine = FakeEngine::new(Vec::new());
    engine.version = "7.17.0".to_string();
    let err = ElasticProvider::new(engine, config()).await.unwrap_err();
    assert!(matches!(err, Error::Connection(_)));
}

#[tokio::test]
async fn construction_fails_on_missing_index() {
    let mut engine = FakeEngine::new(Vec::new());
    engine.mappings = Map::new();
    let err = ElasticProvider::new(engine, config()).await.unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}

#[tokio::test]
async fn discovers_fields_once() {
    let provider = provider().await;
    let fields = provider.fields().await.unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("address.street"));
    assert_eq!(fields, provider.fields().await.unwrap());
}

#[tokio::test]
async fn query_counters() {
    let provider = provider().await;
    let collection = provider.query(Query::new()).await.unwrap();
    assert_eq!(collection.number_matched, 3);
    assert_eq!(collection.number_returned, 3);
    assert_eq!(collection.features.len(), 3);

    let collection = provider.query(Query::new().limit(2)).await.unwrap();
    assert_eq!(collection.number_matched, 3);
    assert_eq!(collection.number_returned, 2);
}

#[tokio::test]
async fn hits_returns_no_features() {
    let provider = provider().await;
    let collection = provider.query(Query::new().limit(100).hits()).await.unwrap();
    assert!(collection.features.is_empty());
    assert_eq!(collection.number_matched, 3);
    assert_eq!(collection.number_returned, 0);
}

#[tokio::test]
async fn property_filter() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().property("name", "Paris"))
        .await
        .unwrap();
    assert_eq!(collection.number_returned, 1);
    assert_eq!(collection.features[0].properties["name"], json!("Paris"));
}

#[tokio::test]
async fn sort_descending_population() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().sortby(vec![Sortby::desc("population")]))
        .await
        .unwrap();
    let populations: Vec<u64> = collection
        .features
        .iter()
        .map(|feature| feature.properties["population"].as_u64().unwrap())
        .collect();
    let mut sorted = populations.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(populations, sorted);
    assert!(populations.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn bbox_filters_by_envelope() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().bbox([0.0, 40.0, 20.0, 60.0]))
        .await
        .unwrap();
    let ids: Vec<&str> = collection
        .features
        .iter()
        .map(|feature| feature.id.as_str())
        .collect();
    assert!(ids.contains(&"paris"));
    assert!(ids.contains(&"berlin"));
    assert!(!ids.contains(&"tokyo"));
}

#[tokio::test]
async fn datetime_open_bounds_include_the_boundary() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().datetime("../2022-12-31T23:59:59Z"))
        .await
        .unwrap();
    assert_eq!(collection.number_returned, 1);
    assert_eq!(collection.features[0].id, "tokyo");

    let collection = provider
        .query(Query::new().datetime("2023-01-01T00:00:00Z/.."))
        .await
        .unwrap();
    let ids: Vec<&str> = collection
        .features
        .iter()
        .map(|feature| feature.id.as_str())
        .collect();
    assert_eq!(collection.number_returned, 2);
    assert!(ids.contains(&"paris"));
}

#[tokio::test]
async fn cql_filter() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().filter("population > 3000000".parse().unwrap()))
        .await
        .unwrap();
    let ids: Vec<&str> = collection
        .features
        .iter()
        .map(|feature| feature.id.as_str())
        .collect();
    assert_eq!(collection.number_returned, 2);
    assert!(ids.contains(&"berlin"));
    assert!(ids.contains(&"tokyo"));
}

#[tokio::test]
async fn cql_filter_unknown_field() {
    let provider = provider().await;
    let err = provider
        .query(Query::new().filter("altitude > 3000".parse().unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}

#[tokio::test]
async fn projection_yields_exactly_the_selection() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().select_properties(vec!["name".to_string()]))
        .await
        .unwrap();
    for feature in &collection.features {
        let names: Vec<&String> = feature.properties.keys().collect();
        assert_eq!(names, ["name"]);
        assert!(!feature.id.is_empty());
        assert!(feature.geometry.is_some());
    }
}

#[tokio::test]
async fn skip_geometry() {
    let provider = provider().await;
    let collection = provider
        .query(Query::new().skip_geometry())
        .await
        .unwrap();
    assert!(collection.features.iter().all(|feature| feature.geometry.is_none()));
}

#[tokio::test]
async fn deep_pagination_matches_direct_mode() {
    let docs: Vec<(String, Value)> = (0..10_020)
        .map(|index| {
            (
                format!("doc-{index:05}"),
                json!({
                    "id": format!("doc-{index:05}"),
                    "type": "Feature",
                    "geometry": null,
                    "properties": {
                        "id": format!("doc-{index:05}"),
                        "name": format!("name-{index:05}"),
                        "population": index,
                        "updated": "2023-01-01T00:00:00Z",
                    },
                }),
            )
        })
        .collect();
    let provider = ElasticProvider::new(FakeEngine::new(docs), config())
        .await
        .unwrap();

    let query = Query::new()
        .sortby(vec![Sortby::asc("population")])
        .offset(9999)
        .limit(5);
    let scrolled = provider.query(query.clone()).await.unwrap();
    assert_eq!(scrolled.number_returned, 5);
    // Scroll mode reports offset + returned, a documented approximation.
    assert_eq!(scrolled.number_matched, 10_004);

    // Direct mode is independently computable on the fake, bypassing the
    // provider's window check.
    let catalog = provider.fields().await.unwrap();
    let body = build_query(&query, &catalog, provider.config()).unwrap();
    let direct = FakeEngine::new(
        (0..10_020)
            .map(|index| {
                (
                    format!("doc-{index:05}"),
                    json!({
                        "id": format!("doc-{index:05}"),
                        "type": "Feature",
                        "geometry": null,
                        "properties": {
                            "id": format!("doc-{index:05}"),
                            "population": index,
                        },
                    }),
                )
            })
            .collect(),
    );
    let response = direct.search("cities", &body, 9999, 5).await.unwrap();
    let direct_ids: Vec<&str> = response["hits"]["hits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| hit["_id"].as_str().unwrap())
        .collect();
    let scrolled_ids: Vec<&str> = scrolled
        .features
        .iter()
        .map(|feature| feature.id.as_str())
        .collect();
    assert_eq!(scrolled_ids, direct_ids);
    assert_eq!(scrolled_ids[0], "doc-09999");
}

#[tokio::test]
async fn get_by_native_id() {
    let provider = provider().await;
    let feature = provider.get("paris").await.unwrap();
    assert_eq!(feature.id, "paris");
    assert_eq!(feature.properties["name"], json!("Paris"));
}

#[tokio::test]
async fn get_falls_back_to_identifier_field_query() {
    let mut docs = cities();
    docs.push((
        "native-1".to_string(),
        json!({
            "id": "pretty-1",
            "type": "Feature",
            "geometry": null,
            "properties": {"id": "pretty-1", "name": "Lyon", "population": 500_000},
        }),
    ));
    let provider = ElasticProvider::new(FakeEngine::new(docs), config())
        .await
        .unwrap();
    let feature = provider.get("pretty-1").await.unwrap();
    assert_eq!(feature.id, "pretty-1");
    assert_eq!(feature.properties["name"], json!("Lyon"));
}

#[tokio::test]
async fn get_missing_is_item_not_found() {
    let provider = provider().await;
    let err = provider.get("atlantis").await.unwrap_err();
    assert!(matches!(err, Error::ItemNotFound(_)));
}

#[tokio::test]
async fn create_get_roundtrip() {
    let provider = provider().await;
    let item = Feature::new("")
        .property("name", "Madrid")
        .property("population", 3_200_000)
        .geometry(geojson::Geometry::new(geojson::Value::Point(vec![
            -3.7, 40.4,
        ])));
    let identifier = provider.create(item.clone()).await.unwrap();
    assert!(!identifier.is_empty());
    let feature = provider.get(&identifier).await.unwrap();
    assert_eq!(feature.properties["name"], json!("Madrid"));
    assert_eq!(feature.geometry, item.geometry);
}

#[tokio::test]
async fn create_uses_identifier_property_when_present() {
    let provider = provider().await;
    let item = Feature::new("").property("id", "madrid").property("name", "Madrid");
    let identifier = provider.create(item).await.unwrap();
    assert_eq!(identifier, "madrid");
}

#[tokio::test]
async fn update_replaces_the_document() {
    let provider = provider().await;
    let item = Feature::new("paris").property("name", "Paris").property("population", 2_200_000);
    assert!(provider.update("paris", item).await.unwrap());
    let feature = provider.get("paris").await.unwrap();
    assert_eq!(feature.properties["population"], json!(2_200_000));
}

#[tokio::test]
async fn delete_reports_removal() {
    let provider = provider().await;
    assert!(provider.delete("paris").await.unwrap());
    assert!(!provider.delete("paris").await.unwrap());
}

#[tokio::test]
async fn domains_contains_scalar_fields_only() {
    let provider = provider().await;
    let (domains, live) = provider.domains(&[], false).await.unwrap();
    assert!(live);
    let names = domains.get("name").unwrap();
    assert!(names.contains(&json!("Paris")));
    assert!(domains.get("population").unwrap().iter().all(Value::is_number));
    // No document carries address.street, so it has no domain.
    assert!(!domains.contains_key("address.street"));
}

#[tokio::test]
async fn domains_unknown_field() {
    let provider = provider().await;
    let err = provider
        .domains(&["altitude".to_string()], false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}

struct Shift;

impl GeometryTransformer for Shift {
    fn transform(
        &self,
        geometry: geojson::Geometry,
        _source_crs: &str,
        _target_crs: &str,
    ) -> ogcfeat::Result<geojson::Geometry> {
        match geometry.value {
            geojson::Value::Point(mut coordinates) => {
                coordinates[0] += 1.0;
                Ok(geojson::Geometry::new(geojson::Value::Point(coordinates)))
            }
            other => Ok(geojson::Geometry::new(other)),
        }
    }
}

#[tokio::test]
async fn crs_transform_applies_to_geometries() {
    let provider = ElasticProvider::with_transformer(
        FakeEngine::new(cities()),
        config(),
        Some(std::sync::Arc::new(Shift)),
    )
    .await
    .unwrap();
    let collection = provider
        .query(
            Query::new()
                .property("name", "Paris")
                .crs_transform("EPSG:4326", "EPSG:3857"),
        )
        .await
        .unwrap();
    match &collection.features[0].geometry.as_ref().unwrap().value {
        geojson::Value::Point(coordinates) => assert_eq!(coordinates[0], 3.35),
        other => panic!("expected a point, got {other:?}"),
    }
}

#[tokio::test]
async fn crs_transform_without_transformer_is_a_query_error() {
    let provider = provider().await;
    let err = provider
        .query(Query::new().crs_transform("EPSG:4326", "EPSG:3857"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}
