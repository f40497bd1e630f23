use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::utils::AppError;

/// Renders a stored document as plain JSON.
///
/// ObjectIds become their 24-char hex string and dates become RFC 3339
/// strings, so clients see `"_id": "65f0..."` instead of extended JSON.
pub fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

pub fn documents_to_json(docs: Vec<Document>) -> Value {
    Value::Array(docs.into_iter().map(document_to_json).collect())
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// A schemaless JSON object body, stored as received.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct RawDocument(pub Map<String, Value>);

impl RawDocument {
    /// Converts the body into a storable document.
    ///
    /// A client-supplied `_id` is dropped; identifiers are always generated by the store.
    pub fn into_document(self) -> Result<Document, AppError> {
        let mut body = self.0;
        body.remove("_id");
        Ok(bson::to_document(&body)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId(id.to_string()))
}

/// Hex form of an ObjectId id, or the plain rendering of any other id type.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
