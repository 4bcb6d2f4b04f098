use crate::query::{exact_field, mask_property};
use crate::{Error, Result};
use cql2::Expr;
use ogcfeat::{Field, FieldCatalog};
use serde_json::{Map, Value, json};

/// Renders a parsed CQL2 expression to the engine's query DSL.
///
/// Field references are resolved against the catalog — plain string fields
/// match on their raw sub-field — and an expression naming an unknown field
/// is a query error.
pub(crate) fn to_query(expr: &Expr, catalog: &FieldCatalog) -> Result<Value> {
    match expr {
        Expr::Operation { op, args } => operation(op, args, catalog),
        _ => Err(Error::Query(
            "filter expression must be an operation".to_string(),
        )),
    }
}

fn operation(op: &str, args: &[Box<Expr>], catalog: &FieldCatalog) -> Result<Value> {
    match op {
        "and" => Ok(json!({"bool": {"must": subqueries(args, catalog)?}})),
        "or" => Ok(json!({
            "bool": {"should": subqueries(args, catalog)?, "minimum_should_match": 1}
        })),
        "not" => {
            let [arg] = args else {
                return Err(malformed(op));
            };
            Ok(json!({"bool": {"must_not": [to_query(arg, catalog)?]}}))
        }
        "=" => {
            let (name, field, value) = binary(args, catalog)?;
            Ok(term_or_match(name, field, value))
        }
        "<>" => {
            let (name, field, value) = binary(args, catalog)?;
            Ok(json!({"bool": {"must_not": [term_or_match(name, field, value)]}}))
        }
        "<" | "<=" | ">" | ">=" => {
            let (name, _, value) = binary(args, catalog)?;
            let bound = match op {
                "<" => "lt",
                "<=" => "lte",
                ">" => "gt",
                _ => "gte",
            };
            let mut bounds = Map::new();
            let _ = bounds.insert(bound.to_string(), value);
            Ok(keyed("range", mask_property(name), Value::Object(bounds)))
        }
        "like" => {
            let (name, field, value) = binary(args, catalog)?;
            let pattern = value
                .as_str()
                .ok_or_else(|| Error::Query("like pattern must be a string".to_string()))?
                .replace('%', "*");
            Ok(keyed(
                "wildcard",
                exact_field(name, field),
                json!(pattern),
            ))
        }
        "between" => {
            let [property, low, high] = args else {
                return Err(malformed(op));
            };
            let name = property_name(property)?;
            let _ = resolve(name, catalog)?;
            let mut bounds = Map::new();
            let _ = bounds.insert("gte".to_string(), literal(low)?);
            let _ = bounds.insert("lte".to_string(), literal(high)?);
            Ok(keyed("range", mask_property(name), Value::Object(bounds)))
        }
        "in" => {
            let [property, array] = args else {
                return Err(malformed(op));
            };
            let name = property_name(property)?;
            let field = resolve(name, catalog)?;
            let Expr::Array(items) = &**array else {
                return Err(malformed(op));
            };
            let values = items.iter().map(|item| literal(item)).collect::<Result<Vec<_>>>()?;
            Ok(keyed("terms", exact_field(name, field), Value::Array(values)))
        }
        "isNull" => {
            let [property] = args else {
                return Err(malformed(op));
            };
            let name = property_name(property)?;
            let _ = resolve(name, catalog)?;
            Ok(json!({
                "bool": {"must_not": [{"exists": {"field": mask_property(name)}}]}
            }))
        }
        other => Err(Error::Query(format!(
            "unsupported filter operation: {other}"
        ))),
    }
}

fn subqueries(args: &[Box<Expr>], catalog: &FieldCatalog) -> Result<Vec<Value>> {
    args.iter().map(|arg| to_query(arg, catalog)).collect()
}

fn binary<'a>(
    args: &'a [Box<Expr>],
    catalog: &'a FieldCatalog,
) -> Result<(&'a str, &'a Field, Value)> {
    let [property, value] = args else {
        return Err(Error::Query(
            "expected two arguments in filter comparison".to_string(),
        ));
    };
    let name = property_name(property)?;
    let field = resolve(name, catalog)?;
    Ok((name, field, literal(value)?))
}

fn property_name(expr: &Expr) -> Result<&str> {
    if let Expr::Property { property } = expr {
        Ok(property)
    } else {
        Err(Error::Query(
            "expected a property reference in filter expression".to_string(),
        ))
    }
}

fn resolve<'a>(name: &str, catalog: &'a FieldCatalog) -> Result<&'a Field> {
    catalog
        .get(name)
        .ok_or_else(|| Error::Query(format!("unknown field in filter expression: {name}")))
}

fn literal(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Float(value) => Ok(json!(value)),
        Expr::Literal(value) => Ok(json!(value)),
        Expr::Bool(value) => Ok(json!(value)),
        Expr::Timestamp { timestamp } => literal(timestamp),
        Expr::Date { date } => literal(date),
        _ => Err(Error::Query(
            "expected a literal value in filter expression".to_string(),
        )),
    }
}

fn term_or_match(name: &str, field: &Field, value: Value) -> Value {
    if field.is_plain_string() {
        keyed("term", exact_field(name, field), value)
    } else {
        keyed("match", mask_property(name), value)
    }
}

fn keyed(outer: &str, key: String, value: Value) -> Value {
    let mut inner = Map::new();
    let _ = inner.insert(key, value);
    let mut object = Map::new();
    let _ = object.insert(outer.to_string(), Value::Object(inner));
    Value::Object(object)
}

fn malformed(op: &str) -> Error {
    Error::Query(format!("malformed {op} filter expression"))
}
