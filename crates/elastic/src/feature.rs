use crate::{Error, Result};
use log::{debug, warn};
use ogcfeat::{CrsTransform, Feature, ProviderConfig};
use serde_json::{Map, Value};

/// Builds a canonical feature from a raw engine hit.
///
/// Identifier resolution order: the configured identifier property under the
/// document's properties namespace, then a top-level `id` field, then the
/// engine's native document id. A missing source is logged and the next one
/// tried, never a hard failure.
pub(crate) fn to_feature(
    hit: &Value,
    config: &ProviderConfig,
    selection: &[String],
    crs_transform: Option<&CrsTransform<'_>>,
) -> Result<Feature> {
    let source = hit
        .get("_source")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::Query("document has no _source".to_string()))?;

    let mut feature = Feature::new(resolve_id(hit, source, config));
    if let Some(r#type) = source.get("type").and_then(Value::as_str) {
        feature.r#type = r#type.to_string();
    }

    if let Some(value) = source
        .get(&config.geometry_field)
        .filter(|value| !value.is_null())
    {
        let geometry = geojson::Geometry::from_json_value(value.clone()).map_err(Box::new)?;
        feature.geometry = Some(match crs_transform {
            Some(transform) => transform.apply(geometry)?,
            None => geometry,
        });
    }

    let properties = source.get("properties").and_then(Value::as_object);
    if selection.is_empty() {
        if let Some(properties) = properties {
            feature.properties = properties.clone();
        }
    } else if let Some(properties) = properties {
        // Thinning: copy the selected names in configured order, skipping
        // (not failing on) anything the document does not carry.
        for name in selection {
            match properties.get(name) {
                Some(value) => {
                    let _ = feature.properties.insert(name.clone(), value.clone());
                }
                None => warn!("property {name} missing; continuing"),
            }
        }
    }
    Ok(feature)
}

fn resolve_id(hit: &Value, source: &Map<String, Value>, config: &ProviderConfig) -> String {
    if let Some(id) = source
        .get("properties")
        .and_then(|properties| properties.get(&config.id_field))
        .filter(|id| !id.is_null())
    {
        return id_string(id);
    }
    debug!(
        "missing identifier property {}; falling back",
        config.id_field
    );
    if let Some(id) = source.get("id").filter(|id| !id.is_null()) {
        return id_string(id);
    }
    hit.get("_id").map(id_string).unwrap_or_default()
}

pub(crate) fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
