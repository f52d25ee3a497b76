//! Models used across integration tests.

use docquery::{Model, Record};
use serde::{Deserialize, Serialize};

use super::recording::CallLog;

/// Hand-written mapping: `name` is required, `age` is optional.
#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: Option<i64>,
}

impl Person {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            age: None,
        }
    }

    pub fn aged(name: &str, age: i64) -> Self {
        Self {
            name: name.to_string(),
            age: Some(age),
        }
    }
}

impl Model for Person {
    const COLLECTION: &'static str = "Person";

    fn from_record(record: &Record) -> Option<Self> {
        Some(Person {
            name: record.get_str("name")?.to_string(),
            age: record.get_i64("age"),
        })
    }

    fn apply(&self, record: &mut Record) {
        record.set("name", self.name.as_str());
        if let Some(age) = self.age {
            record.set("age", age);
        }
    }
}

/// Derived mapping with a mirrored backend id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, docquery::Model)]
#[model(collection = "Widget")]
pub struct Widget {
    #[model(id)]
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub name: String,
    pub teeth: u32,
}

impl Widget {
    pub fn new(name: &str, teeth: u32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            teeth,
        }
    }
}

/// Id field serialized under an explicit serde name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, docquery::Model)]
pub struct Renamed {
    #[model(id)]
    #[serde(rename = "objectId", default)]
    pub id: Option<String>,
    pub name: String,
}

/// Id field whose key comes from a struct-wide rename rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, docquery::Model)]
#[serde(rename_all = "camelCase")]
pub struct Gadget {
    #[model(id)]
    #[serde(default)]
    pub object_id: Option<String>,
    pub display_name: String,
}

/// Derived mapping with the default collection name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, docquery::Model)]
pub struct Sprocket {
    pub size: f64,
}

/// Model that writes each `apply` call into a shared call log.
pub struct Tracked {
    pub name: String,
    pub log: CallLog,
}

impl Model for Tracked {
    const COLLECTION: &'static str = "Widget";

    fn from_record(record: &Record) -> Option<Self> {
        Some(Tracked {
            name: record.get_str("name")?.to_string(),
            log: CallLog::default(),
        })
    }

    fn apply(&self, record: &mut Record) {
        self.log.lock().unwrap().push("apply".to_string());
        record.set("name", self.name.as_str());
    }
}
