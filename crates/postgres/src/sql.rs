use crate::{Error, Result};
use bytes::BytesMut;
use cql2::{Expr, ToDuckSQL};
use ogcfeat::{Direction, Field, FieldCatalog, FieldType, ProviderConfig, Query, TemporalFilter};
use serde_json::Value;
use tokio_postgres::types::{IsNull, ToSql, Type};
use tracing::debug;

/// A typed SQL parameter.
///
/// Every placeholder this crate emits carries an explicit cast
/// (`$1::text`, `$2::int8`, …), so the wire type always matches the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    /// A text value.
    Text(String),

    /// A double-precision value.
    Float(f64),

    /// A 64-bit integer value.
    Int(i64),

    /// A boolean value.
    Bool(bool),

    /// A JSON document value.
    Json(Value),

    /// SQL NULL.
    Null,
}

impl ToSql for SqlParam {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlParam::Text(value) => value.to_sql(ty, out),
            SqlParam::Float(value) => value.to_sql(ty, out),
            SqlParam::Int(value) => value.to_sql(ty, out),
            SqlParam::Bool(value) => value.to_sql(ty, out),
            SqlParam::Json(value) => value.to_sql(ty, out),
            SqlParam::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlParam::Text(value) => value.to_sql_checked(ty, out),
            SqlParam::Float(value) => value.to_sql_checked(ty, out),
            SqlParam::Int(value) => value.to_sql_checked(ty, out),
            SqlParam::Bool(value) => value.to_sql_checked(ty, out),
            SqlParam::Json(value) => value.to_sql_checked(ty, out),
            SqlParam::Null => Ok(IsNull::Yes),
        }
    }
}

/// Compiled SQL fragments for one request.
///
/// The table is always aliased `t` so column references stay unambiguous
/// against projected output names.
#[derive(Debug, Default)]
pub struct SqlQuery {
    /// The projected select-list entries.
    pub columns: Vec<String>,

    /// WHERE conjuncts.
    pub wheres: Vec<String>,

    /// ORDER BY entries.
    pub order_by: Vec<String>,

    params: Vec<SqlParam>,
}

impl SqlQuery {
    /// Appends a parameter, returning its cast placeholder (`$n::type`).
    pub fn bind(&mut self, param: SqlParam) -> String {
        let cast = match &param {
            SqlParam::Text(_) | SqlParam::Null => "text",
            SqlParam::Float(_) => "float8",
            SqlParam::Int(_) => "int8",
            SqlParam::Bool(_) => "bool",
            SqlParam::Json(_) => "jsonb",
        };
        self.params.push(param);
        format!("${}::{}", self.params.len(), cast)
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect()
    }

    /// Renders the count statement.
    pub fn count_sql(&self, table: &str) -> String {
        format!("SELECT count(*) FROM {table} AS t{}", self.where_clause())
    }

    /// Renders the select statement for one page.
    pub fn select_sql(&self, table: &str, offset: u64, limit: u64) -> String {
        let order = if self.order_by.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {}", self.order_by.join(", "))
        };
        format!(
            "SELECT {} FROM {table} AS t{}{order} OFFSET {offset} LIMIT {limit}",
            self.columns.join(", "),
            self.where_clause(),
        )
    }

    fn where_clause(&self) -> String {
        if self.wheres.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.wheres.join(" AND "))
        }
    }
}

/// Quotes an identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// References a column on the aliased table.
pub(crate) fn col_ref(name: &str) -> String {
    format!("t.{}", quote_ident(name))
}

/// Wraps a bound text placeholder in the cast a formatted column expects.
pub(crate) fn typed_expr(placeholder: String, field: &Field) -> String {
    match field.format.as_deref() {
        Some("date-time") => format!("({placeholder})::timestamptz"),
        Some("date") => format!("({placeholder})::date"),
        Some("time") => format!("({placeholder})::time"),
        Some("duration") => format!("({placeholder})::interval"),
        _ => placeholder,
    }
}

/// Converts a JSON value to a parameter for a typed column.
pub(crate) fn coerce_param(field: &Field, value: &Value) -> std::result::Result<SqlParam, String> {
    match (&field.r#type, value) {
        (_, Value::Null) => Ok(SqlParam::Null),
        (FieldType::Boolean, Value::Bool(value)) => Ok(SqlParam::Bool(*value)),
        (FieldType::Integer, Value::Number(value)) => value
            .as_i64()
            .map(SqlParam::Int)
            .ok_or_else(|| format!("{value} is not an integer")),
        (FieldType::Number, Value::Number(value)) => value
            .as_f64()
            .map(SqlParam::Float)
            .ok_or_else(|| format!("{value} is not a number")),
        (FieldType::Object, value) => Ok(SqlParam::Json(value.clone())),
        (FieldType::String | FieldType::Other(_), Value::String(value)) => {
            Ok(SqlParam::Text(value.clone()))
        }
        (r#type, value) => Err(format!("{value} does not match the {type:?} column type")),
    }
}

/// Compiles the uniform query contract into SQL fragments.
///
/// Pure function of its inputs: no side effects, no I/O.
pub fn compile(query: &Query, catalog: &FieldCatalog, config: &ProviderConfig) -> Result<SqlQuery> {
    let mut sql = SqlQuery::default();

    // Projection: the selected set plus identifier and geometry.
    let requested: Vec<String> = if query.select_properties.is_empty() {
        catalog.keys().cloned().collect()
    } else {
        query.select_properties.clone()
    };
    let mut names: Vec<String> = Vec::new();
    for name in requested {
        if !config.properties.is_empty() && !config.properties.contains(&name) {
            continue;
        }
        if !catalog.contains_key(&name) {
            debug!("ignoring unknown column: {name}");
            continue;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if !names.contains(&config.id_field) {
        names.insert(0, config.id_field.clone());
    }
    for name in &names {
        sql.columns.push(projected_column(name, catalog.get(name)));
    }
    if !query.skip_geometry {
        sql.columns.push(format!(
            "ST_AsGeoJSON({}) AS {}",
            col_ref(&config.geometry_field),
            quote_ident(&config.geometry_field)
        ));
    }

    if let Some(bbox) = &query.bbox {
        let srid = config.storage_srid().unwrap_or(4326);
        let corners =
            [bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax].map(|value| sql.bind(SqlParam::Float(value)));
        sql.wheres.push(format!(
            "ST_Intersects(ST_MakeEnvelope({}, {}, {}, {}, {srid}), {})",
            corners[0],
            corners[1],
            corners[2],
            corners[3],
            col_ref(&config.geometry_field)
        ));
    }

    if let Some(temporal) = query.temporal_filter()? {
        let time_field = config.time_field.as_deref().ok_or_else(|| {
            Error::Query("time_field is not configured for this collection".to_string())
        })?;
        let column = col_ref(time_field);
        match temporal {
            TemporalFilter::Instant(value) => {
                let value = timestamp_bound(&mut sql, value);
                sql.wheres.push(format!("{column} = {value}"));
            }
            TemporalFilter::Range { start, end } => match (start, end) {
                (Some(start), Some(end)) => {
                    let start = timestamp_bound(&mut sql, start);
                    let end = timestamp_bound(&mut sql, end);
                    sql.wheres
                        .push(format!("{column} BETWEEN {start} AND {end}"));
                }
                (Some(start), None) => {
                    let start = timestamp_bound(&mut sql, start);
                    sql.wheres.push(format!("{column} >= {start}"));
                }
                (None, Some(end)) => {
                    let end = timestamp_bound(&mut sql, end);
                    sql.wheres.push(format!("{column} <= {end}"));
                }
                // Rejected at parse time.
                (None, None) => {}
            },
        }
    }

    for (name, value) in &query.properties {
        let field = catalog
            .get(name)
            .ok_or_else(|| Error::Query(format!("unknown property filter field: {name}")))?;
        let param = coerce_param(field, value)
            .map_err(|message| Error::Query(format!("bad filter for {name}: {message}")))?;
        let placeholder = typed_expr(sql.bind(param), field);
        sql.wheres.push(format!("{} = {}", col_ref(name), placeholder));
    }

    if let Some(filter) = &query.filter {
        let expr = filter.to_expr()?;
        let mut known: Vec<&str> = catalog.keys().map(String::as_str).collect();
        known.push(config.geometry_field.as_str());
        if let Some(unknown) = unknown_property(&expr, &known) {
            return Err(Error::Query(format!(
                "unknown field in filter expression: {unknown}"
            )));
        }
        let rendered = expr
            .to_ducksql()
            .map_err(|err| Error::Query(format!("could not render filter expression: {err}")))?;
        sql.wheres.push(format!("({rendered})"));
    }

    if query.q.is_some() {
        debug!("free-text search is not supported by the relational strategy; ignoring q");
    }

    for sortby in &query.sortby {
        if !catalog.contains_key(&sortby.field) {
            return Err(Error::Query(format!(
                "cannot sort on unknown field: {}",
                sortby.field
            )));
        }
        let direction = match sortby.direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        sql.order_by
            .push(format!("{} {}", col_ref(&sortby.field), direction));
    }
    // Unordered pagination is unsound; fall back to the identifier.
    if sql.order_by.is_empty() {
        sql.order_by
            .push(format!("{} ASC", col_ref(&config.id_field)));
    }

    Ok(sql)
}

fn timestamp_bound(sql: &mut SqlQuery, value: String) -> String {
    let placeholder = sql.bind(SqlParam::Text(value));
    format!("({placeholder})::timestamptz")
}

fn projected_column(name: &str, field: Option<&Field>) -> String {
    let reference = col_ref(name);
    let quoted = quote_ident(name);
    let cast = match field.map(|field| &field.r#type) {
        Some(FieldType::Integer) => Some("int8"),
        Some(FieldType::Number) => Some("float8"),
        Some(FieldType::Boolean | FieldType::Object) => None,
        _ => Some("text"),
    };
    match cast {
        Some(cast) => format!("({reference})::{cast} AS {quoted}"),
        None => reference,
    }
}

fn unknown_property(expr: &Expr, known: &[&str]) -> Option<String> {
    use Expr::*;

    match expr {
        Property { property } => {
            (!known.contains(&property.as_str())).then(|| property.clone())
        }
        Operation { args, .. } => args.iter().find_map(|expr| unknown_property(expr, known)),
        Interval { interval } => interval.iter().find_map(|expr| unknown_property(expr, known)),
        Timestamp { timestamp } => unknown_property(timestamp, known),
        Date { date } => unknown_property(date, known),
        Array(exprs) => exprs.iter().find_map(|expr| unknown_property(expr, known)),
        BBox { bbox } => bbox.iter().find_map(|expr| unknown_property(expr, known)),
        _ => None,
    }
}
