//! Record - The backend's raw key/value document.
//!
//! A `Record` is what travels between the crate and a [`Backend`](crate::Backend):
//! the collection it belongs to, the id the backend assigned (if it has one yet),
//! and an untyped map of fields. Typed models convert to and from it through
//! [`Model`](crate::Model).

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error converting between a typed value and a record's fields.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("value for collection {collection} did not serialize to an object")]
    NotAnObject { collection: String },
}

/// A raw document as stored by the backend.
///
/// Serializes as `{"collection": ..., "id": ..., "fields": {...}}`, with `id`
/// omitted until the backend has assigned one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record scoped to `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: None,
            fields: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Backend-assigned identifier. `None` until the record has been saved.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deserialize the field map into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    /// Serialize `value` and copy each of its top-level keys onto this record.
    ///
    /// Keys not produced by `value` are left untouched.
    pub fn merge<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RecordError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => {
                self.fields.extend(map);
                Ok(())
            }
            _ => Err(RecordError::NotAnObject {
                collection: self.collection.clone(),
            }),
        }
    }
}

/// Merge `value` onto `record`, logging instead of failing.
///
/// Backs derived [`Model::apply`](crate::Model::apply), which has no error channel.
pub fn apply_serialized<T: Serialize + ?Sized>(value: &T, record: &mut Record) {
    if let Err(err) = record.merge(value) {
        tracing::warn!(
            collection = record.collection(),
            error = %err,
            "failed to serialize model onto record"
        );
    }
}
