//! JSON <-> BSON conversion for tour documents.
//!
//! Tours arrive and leave as JSON; the store speaks BSON. Integers keep their
//! integer type so `tour_id` filters match, and the ObjectId `_id` is
//! rendered as its hex string on the way out.

use bson::{Bson, Document};
use serde_json::{Number, Value};

use crate::models::{Fields, Tour};

pub fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(v) => Bson::Boolean(*v),
        Value::Number(n) => number_to_bson(n),
        Value::String(v) => Bson::String(v.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(to_bson).collect()),
        Value::Object(fields) => Bson::Document(to_document(fields)),
    }
}

fn number_to_bson(n: &Number) -> Bson {
    if let Some(v) = n.as_i64() {
        Bson::Int64(v)
    } else if let Some(v) = n.as_f64() {
        // Covers u64 values above i64::MAX as well.
        Bson::Double(v)
    } else {
        Bson::String(n.to_string())
    }
}

pub fn to_document(fields: &Fields) -> Document {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), to_bson(value)))
        .collect()
}

pub fn from_bson(bson: Bson) -> Value {
    match bson {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(v) => Value::Bool(v),
        Bson::Int32(v) => Value::from(v),
        Bson::Int64(v) => Value::from(v),
        Bson::Double(v) => Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(v) => Value::String(v),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Array(items) => Value::Array(items.into_iter().map(from_bson).collect()),
        Bson::Document(doc) => Value::Object(from_document(doc)),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        other => other.into_relaxed_extjson(),
    }
}

pub fn from_document(doc: Document) -> Fields {
    doc.into_iter()
        .map(|(key, value)| (key, from_bson(value)))
        .collect()
}

pub fn document_to_tour(doc: Document) -> Tour {
    Tour::from_fields(from_document(doc))
}

/// Render an inserted id the way tours expose `_id`.
pub fn storage_id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}
