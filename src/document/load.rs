/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     document/load.rs
 * Purpose:  The thin collaborator that converts between the on-disk JSON
 *           format and the Document Model, and back again.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use serde_json::Value;

use super::{Document, Mapping};
use crate::error::PoshError;

/// Parses `text` as JSON and lifts it into the Document Model.
pub fn load_str(text: &str) -> Result<Document, PoshError> {
    let value: Value = serde_json::from_str(text).map_err(|e| PoshError::load(e.to_string()))?;
    from_json(value)
}

fn from_json(value: Value) -> Result<Document, PoshError> {
    match value {
        Value::Object(map) => {
            let mut mapping = Mapping::new();
            for (key, val) in map {
                mapping.insert(key, from_json(val)?);
            }
            Ok(Document::Mapping(mapping))
        }
        Value::Array(items) => {
            let items = items.into_iter().map(from_json).collect::<Result<Vec<_>, _>>()?;
            Ok(Document::Sequence(items))
        }
        Value::String(s) => Ok(Document::String(s)),
        Value::Bool(b) => Ok(Document::Boolean(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Document::Integer(i)),
            None => Err(PoshError::load(format!(
                "number {n} is not representable as an integer (floats are not part of the document model)"
            ))),
        },
        Value::Null => Err(PoshError::load("null is not part of the document model".to_string())),
    }
}

/// Serialises a fully-resolved document back to JSON text.
///
/// Assumes the resolution check has already run; an `Unresolved` node
/// reaching this function is an internal error, not a user-facing one.
pub fn to_json_string(doc: &Document) -> Result<String, PoshError> {
    let value = to_json(doc)?;
    serde_json::to_string_pretty(&value).map_err(|e| PoshError::load(e.to_string()))
}

fn to_json(doc: &Document) -> Result<Value, PoshError> {
    match doc {
        Document::Mapping(m) => {
            let mut map = serde_json::Map::new();
            for (k, v) in m.iter() {
                map.insert(k.clone(), to_json(v)?);
            }
            Ok(Value::Object(map))
        }
        Document::Sequence(items) => {
            let items = items.iter().map(to_json).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(items))
        }
        Document::String(s) => Ok(Value::String(s.clone())),
        Document::Integer(i) => Ok(Value::Number((*i).into())),
        Document::Boolean(b) => Ok(Value::Bool(*b)),
        Document::Unresolved(_) => Err(PoshError::load(
            "internal error: attempted to serialise an unresolved expression".to_string(),
        )),
    }
}
