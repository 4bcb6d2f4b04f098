use crate::engine::EngineError;
use crate::feature::{id_string, to_feature};
use crate::query::{build_query, effective_properties, exact_field, mask_property};
use crate::{Error, Result, SearchEngine, pagination};
use log::{debug, warn};
use ogcfeat::{
    CrsTransform, Domains, Feature, FeatureCollection, FeatureProvider, Field, FieldCatalog,
    FieldType, GeometryTransformer, ProviderConfig, Query, ResultType,
};
use serde_json::{Map, Value, json};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// The lowest engine major version this provider supports.
pub const MINIMUM_MAJOR_VERSION: u32 = 8;

/// Number of distinct values returned per field by domain enumeration.
pub const DOMAIN_BUCKETS: u64 = 500;

/// A feature provider backed by a document search engine.
///
/// The engine handle is shared read-only across concurrent calls; all
/// per-call state (compiled bodies, cursors) is local to the call.
///
/// # Examples
///
/// ```no_run
/// use ogcfeat::{FeatureProvider, ProviderConfig, Query};
/// use ogcfeat_elastic::{ElasticProvider, SearchEngine};
///
/// async fn count<E: SearchEngine>(engine: E) -> ogcfeat_elastic::Result<u64> {
///     let config = ProviderConfig::new("http://localhost:9200", "cities", "id");
///     let provider = ElasticProvider::new(engine, config).await?;
///     Ok(provider.query(Query::new().hits()).await?.number_matched)
/// }
/// ```
pub struct ElasticProvider<E: SearchEngine> {
    engine: E,
    config: ProviderConfig,
    transformer: Option<Arc<dyn GeometryTransformer>>,
    fields: RwLock<Option<FieldCatalog>>,
}

impl<E: SearchEngine> std::fmt::Debug for ElasticProvider<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticProvider")
            .field("config", &self.config)
            .field("transformer", &self.transformer.is_some())
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<E: SearchEngine> ElasticProvider<E> {
    /// Connects to the engine and discovers the field catalog.
    ///
    /// Construction fails with a connection error when the engine is
    /// unreachable or older than [MINIMUM_MAJOR_VERSION], and with a query
    /// error when the configured index does not exist — a provider never
    /// serves requests against a store it could not introspect.
    pub async fn new(engine: E, config: ProviderConfig) -> Result<ElasticProvider<E>> {
        ElasticProvider::with_transformer(engine, config, None).await
    }

    /// Like [ElasticProvider::new], with a geometry transformer for requests
    /// that carry a CRS pair.
    pub async fn with_transformer(
        engine: E,
        config: ProviderConfig,
        transformer: Option<Arc<dyn GeometryTransformer>>,
    ) -> Result<ElasticProvider<E>> {
        debug!("connecting to search engine at {}", config.redacted_data());
        if !engine.ping().await? {
            return Err(Error::Connection(format!(
                "cannot connect to search engine: {}",
                config.redacted_data()
            )));
        }
        let version = engine.version().await?;
        let major = version
            .split('.')
            .next()
            .and_then(|major| major.parse::<u32>().ok())
            .unwrap_or(0);
        if major < MINIMUM_MAJOR_VERSION {
            return Err(Error::Connection(format!(
                "only search engine version {MINIMUM_MAJOR_VERSION}+ is supported, got {version}"
            )));
        }
        let provider = ElasticProvider {
            engine,
            config,
            transformer,
            fields: RwLock::new(None),
        };
        let _ = provider.field_catalog().await?;
        Ok(provider)
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn field_catalog(&self) -> Result<FieldCatalog> {
        if let Some(catalog) = self
            .fields
            .read()
            .expect("field catalog lock is poisoned")
            .clone()
        {
            return Ok(catalog);
        }
        let mappings = self
            .engine
            .mappings(&self.config.collection)
            .await
            .map_err(|err| match err {
                EngineError::NotFound(_) => Error::Query(format!(
                    "no such index {} on {}",
                    self.config.collection,
                    self.config.redacted_data()
                )),
                other => other.into(),
            })?;
        let catalog = catalog_from_mappings(&self.config.collection, &mappings);
        // Concurrent first accesses race benignly: discovery is idempotent
        // and the last write wins.
        *self.fields.write().expect("field catalog lock is poisoned") = Some(catalog.clone());
        Ok(catalog)
    }

    fn crs_transform<'a>(&'a self, query: &'a Query) -> Result<Option<CrsTransform<'a>>> {
        match (&query.crs_transform, &self.transformer) {
            (Some((source, target)), Some(transformer)) => Ok(Some(CrsTransform {
                transformer: transformer.as_ref(),
                source,
                target,
            })),
            (Some(_), None) => Err(Error::Query(
                "no geometry transformer configured for this provider".to_string(),
            )),
            _ => Ok(None),
        }
    }
}

impl<E: SearchEngine> FeatureProvider for ElasticProvider<E> {
    type Error = Error;

    async fn fields(&self) -> Result<FieldCatalog> {
        self.field_catalog().await
    }

    async fn domains(&self, properties: &[String], _current: bool) -> Result<(Domains, bool)> {
        let catalog = self.field_catalog().await?;
        let keys: Vec<String> = if properties.is_empty() {
            catalog.keys().cloned().collect()
        } else {
            properties.to_vec()
        };
        let mut aggs = Map::new();
        for key in &keys {
            let field = catalog
                .get(key)
                .ok_or_else(|| Error::Query(format!("unknown field: {key}")))?;
            let _ = aggs.insert(
                key.clone(),
                json!({"terms": {"field": exact_field(key, field), "size": DOMAIN_BUCKETS}}),
            );
        }
        let body = json!({"size": 0, "aggs": aggs});
        let response = self
            .engine
            .search(&self.config.collection, &body, 0, 0)
            .await?;
        let mut domains = Domains::new();
        if let Some(aggregations) = response.get("aggregations").and_then(Value::as_object) {
            for key in &keys {
                let Some(field) = catalog.get(key) else {
                    continue;
                };
                if !matches!(field.r#type, FieldType::String | FieldType::Number) {
                    continue;
                }
                let Some(buckets) = aggregations
                    .get(key)
                    .and_then(|aggregation| aggregation.get("buckets"))
                    .and_then(Value::as_array)
                else {
                    continue;
                };
                let values: Vec<Value> = buckets
                    .iter()
                    .filter_map(|bucket| bucket.get("key"))
                    .filter(|key| key.is_string() || key.is_number())
                    .cloned()
                    .collect();
                if !values.is_empty() {
                    let _ = domains.insert(key.clone(), values);
                }
            }
        }
        // Term aggregations always run against the live dataset.
        Ok((domains, true))
    }

    async fn query(&self, query: Query) -> Result<FeatureCollection> {
        let catalog = self.field_catalog().await?;
        let body = build_query(&query, &catalog, &self.config)?;
        debug!("engine query body: {body}");
        let (hits, matched) = pagination::execute(
            &self.engine,
            &self.config.collection,
            &body,
            query.offset,
            query.effective_limit(),
        )
        .await?;
        if query.result_type == ResultType::Hits {
            return Ok(FeatureCollection::hits(matched));
        }
        let selection = effective_properties(&self.config, &query.select_properties);
        let crs_transform = self.crs_transform(&query)?;
        let mut features = Vec::with_capacity(hits.len());
        for hit in &hits {
            features.push(to_feature(hit, &self.config, &selection, crs_transform.as_ref())?);
        }
        Ok(FeatureCollection::new(features, matched))
    }

    async fn get(&self, identifier: &str) -> Result<Feature> {
        let selection = effective_properties(&self.config, &[]);
        match self.engine.get(&self.config.collection, identifier).await {
            Ok(Some(document)) => {
                return to_feature(&document, &self.config, &selection, None);
            }
            Ok(None) | Err(EngineError::NotFound(_)) => {
                debug!("{identifier} not found via native id; trying an identifier field query");
            }
            Err(err) => return Err(err.into()),
        }
        let mut phrase = Map::new();
        let _ = phrase.insert(mask_property(&self.config.id_field), json!(identifier));
        let body = json!({"query": {"bool": {"filter": [{"match_phrase": phrase}]}}});
        let response = self
            .engine
            .search(&self.config.collection, &body, 0, 1)
            .await
            .map_err(|err| match err {
                EngineError::Request(_) | EngineError::NotFound(_) => {
                    Error::ItemNotFound(identifier.to_string())
                }
                other => other.into(),
            })?;
        match response.pointer("/hits/hits/0") {
            Some(hit) => to_feature(hit, &self.config, &selection, None),
            None => Err(Error::ItemNotFound(identifier.to_string())),
        }
    }

    async fn create(&self, mut item: Feature) -> Result<String> {
        if item.id.is_empty() {
            item.id = match item
                .properties
                .get(&self.config.id_field)
                .filter(|id| !id.is_null())
            {
                Some(id) => id_string(id),
                None => Uuid::new_v4().to_string(),
            };
        }
        let identifier = item.id.clone();
        debug!("inserting document with identifier {identifier}");
        let document = serde_json::to_value(&item)?;
        self.engine
            .index(&self.config.collection, &identifier, &document)
            .await
            .map_err(write_error)?;
        Ok(identifier)
    }

    async fn update(&self, identifier: &str, mut item: Feature) -> Result<bool> {
        item.id = identifier.to_string();
        let document = serde_json::to_value(&item)?;
        self.engine
            .index(&self.config.collection, identifier, &document)
            .await
            .map_err(write_error)?;
        Ok(true)
    }

    async fn delete(&self, identifier: &str) -> Result<bool> {
        match self.engine.delete(&self.config.collection, identifier).await {
            Ok(removed) => Ok(removed),
            Err(EngineError::NotFound(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

fn write_error(err: EngineError) -> Error {
    match err {
        EngineError::Request(message) => Error::InvalidData(message),
        other => other.into(),
    }
}

fn catalog_from_mappings(index: &str, mappings: &Map<String, Value>) -> FieldCatalog {
    let node = if index.contains('*') {
        debug!("wildcard index; using the first matching index");
        mappings.values().next()
    } else {
        mappings.get(index).or_else(|| {
            warn!("index {index} not in mapping response; trying the first entry as an alias");
            mappings.values().next()
        })
    };
    let Some(properties) = node.and_then(|node| node.pointer("/mappings/properties/properties"))
    else {
        warn!("could not get fields; returning an empty catalog");
        return FieldCatalog::new();
    };
    let mut catalog = FieldCatalog::new();
    collect_fields(properties, None, &mut catalog);
    catalog
}

fn collect_fields(node: &Value, prefix: Option<&str>, catalog: &mut FieldCatalog) {
    let Some(properties) = node.get("properties").and_then(Value::as_object) else {
        return;
    };
    for (name, child) in properties {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };
        if child.get("properties").is_some() {
            collect_fields(child, Some(&path), catalog);
        } else {
            let native = child.get("type").and_then(Value::as_str).unwrap_or("object");
            let _ = catalog.insert(path, native_field(native));
        }
    }
}

fn native_field(native: &str) -> Field {
    match native {
        "text" => Field::new(FieldType::String),
        "date" => Field::with_format(FieldType::String, "date"),
        "float" | "long" => Field::with_format(FieldType::Number, native),
        "boolean" => Field::new(FieldType::Boolean),
        "integer" => Field::new(FieldType::Integer),
        "object" => Field::new(FieldType::Object),
        other => Field::new(FieldType::Other(other.to_string())),
    }
}
