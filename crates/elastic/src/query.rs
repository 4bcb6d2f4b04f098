use crate::{Error, Result};
use ogcfeat::{Direction, Field, FieldCatalog, ProviderConfig, Query, TemporalFilter};
use serde_json::{Map, Value, json};

/// Internal metadata fields suppressed from free-text search results.
pub const METADATA_EXCLUDES: [&str; 3] = [
    "properties._metadata-payload",
    "properties._metadata-schema",
    "properties._metadata-format",
];

/// Prefixes a property name with the document properties namespace.
pub fn mask_property(name: &str) -> String {
    format!("properties.{name}")
}

/// Returns the exact-match reference for a cataloged field: the un-analyzed
/// `raw` sub-field for plain strings, the masked field itself otherwise.
pub(crate) fn exact_field(name: &str, field: &Field) -> String {
    if field.is_plain_string() {
        format!("{}.raw", mask_property(name))
    } else {
        mask_property(name)
    }
}

/// The property names a response is projected down to, in configured order.
///
/// A per-request selection wins over the provider-wide allow-list; an empty
/// result means no projection is active.
pub(crate) fn effective_properties(
    config: &ProviderConfig,
    select_properties: &[String],
) -> Vec<String> {
    if select_properties.is_empty() {
        config.properties.clone()
    } else {
        select_properties.to_vec()
    }
}

/// Compiles the uniform query contract into the engine's query DSL.
///
/// Pure function of its inputs: no side effects, no I/O. Pagination is not
/// part of the body — `from`/`size` are passed to the engine separately.
pub fn build_query(query: &Query, catalog: &FieldCatalog, config: &ProviderConfig) -> Result<Value> {
    let mut filters: Vec<Value> = Vec::new();
    let mut musts: Vec<Value> = Vec::new();
    let mut source_excludes: Vec<String> = Vec::new();

    if let Some(bbox) = &query.bbox {
        let mut geo_shape = Map::new();
        let _ = geo_shape.insert(
            config.geometry_field.clone(),
            json!({
                "shape": {
                    "type": "envelope",
                    "coordinates": bbox.envelope_corners(),
                },
                "relation": "intersects",
            }),
        );
        filters.push(json!({"geo_shape": geo_shape}));
    }

    if let Some(temporal) = query.temporal_filter()? {
        let time_field = config.time_field.as_deref().ok_or_else(|| {
            Error::Query("time_field is not configured for this collection".to_string())
        })?;
        let time_field = mask_property(time_field);
        match temporal {
            TemporalFilter::Instant(value) => {
                let mut matcher = Map::new();
                let _ = matcher.insert(time_field, json!(value));
                filters.push(json!({"match": matcher}));
            }
            TemporalFilter::Range { start, end } => {
                let mut bounds = Map::new();
                if let Some(start) = start {
                    let _ = bounds.insert("gte".to_string(), json!(start));
                }
                if let Some(end) = end {
                    let _ = bounds.insert("lte".to_string(), json!(end));
                }
                let mut range = Map::new();
                let _ = range.insert(time_field, Value::Object(bounds));
                filters.push(json!({"range": range}));
            }
        }
    }

    for (name, value) in &query.properties {
        // `|`-separated values relax the match to an analyzed OR instead of
        // an exact term.
        let or_value = value.as_str().is_some_and(|s| s.contains('|'));
        match catalog.get(name) {
            Some(field) if field.is_plain_string() && !or_value => {
                let mut term = Map::new();
                let _ = term.insert(format!("{}.raw", mask_property(name)), value.clone());
                filters.push(json!({"term": term}));
            }
            _ => {
                let mut matcher = Map::new();
                let _ = matcher.insert(mask_property(name), json!({"query": value}));
                filters.push(json!({"match": matcher}));
            }
        }
    }

    if let Some(q) = query.q.as_deref() {
        // Split inclusive on ',' (OR), quoting each token as a phrase.
        let phrases = q
            .split(',')
            .map(|token| format!("\"{token}\""))
            .collect::<Vec<_>>()
            .join(" OR ");
        musts.push(json!({"query_string": {"query": phrases}}));
        source_excludes.extend(METADATA_EXCLUDES.iter().map(|name| (*name).to_string()));
    }

    if let Some(filter) = &query.filter {
        let expr = filter.to_expr()?;
        musts.push(crate::cql::to_query(&expr, catalog)?);
    }

    let mut sort: Vec<Value> = Vec::new();
    for sortby in &query.sortby {
        let field = catalog.get(&sortby.field).ok_or_else(|| {
            Error::Query(format!("cannot sort on unknown field: {}", sortby.field))
        })?;
        let order = match sortby.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        let mut entry = Map::new();
        let _ = entry.insert(exact_field(&sortby.field, field), json!({"order": order}));
        sort.push(Value::Object(entry));
    }

    let mut source_includes: Vec<String> = Vec::new();
    let selection = effective_properties(config, &query.select_properties);
    if !selection.is_empty() {
        source_includes = selection.iter().map(|name| mask_property(name)).collect();
        source_includes.push("id".to_string());
        source_includes.push("type".to_string());
        source_includes.push(config.geometry_field.clone());
    }
    if query.skip_geometry {
        source_excludes.push(config.geometry_field.clone());
    }

    let mut boolean = Map::new();
    let _ = boolean.insert("filter".to_string(), Value::Array(filters));
    if !musts.is_empty() {
        let _ = boolean.insert("must".to_string(), Value::Array(musts));
    }

    let mut body = Map::new();
    let _ = body.insert("track_total_hits".to_string(), Value::Bool(true));
    let _ = body.insert("query".to_string(), json!({"bool": boolean}));
    if !sort.is_empty() {
        let _ = body.insert("sort".to_string(), Value::Array(sort));
    }
    let mut source = Map::new();
    if !source_includes.is_empty() {
        let _ = source.insert("includes".to_string(), json!(source_includes));
    }
    if !source_excludes.is_empty() {
        let _ = source.insert("excludes".to_string(), json!(source_excludes));
    }
    if !source.is_empty() {
        let _ = body.insert("_source".to_string(), Value::Object(source));
    }
    Ok(Value::Object(body))
}
