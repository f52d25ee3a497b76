//! Models - Typed values that map to backend records.
//!
//! A model names the collection it lives in and knows how to convert to and
//! from a raw [`Record`]. Queries use it to map results; [`save`] uses it to
//! persist.
//!
//! ## Example
//!
//! ```ignore
//! use docquery::{Model, Record};
//!
//! struct Widget {
//!     name: String,
//! }
//!
//! impl Model for Widget {
//!     const COLLECTION: &'static str = "Widget";
//!
//!     fn from_record(record: &Record) -> Option<Self> {
//!         Some(Widget { name: record.get_str("name")?.to_string() })
//!     }
//!
//!     fn apply(&self, record: &mut Record) {
//!         record.set("name", self.name.as_str());
//!     }
//! }
//! ```
//!
//! Serde types can use `#[derive(Model)]` instead.

mod save;

use crate::record::Record;

/// Trait for types that can be read from and written to backend records.
pub trait Model: Sized + Send + 'static {
    /// The backend collection for this type, used verbatim.
    const COLLECTION: &'static str;

    /// Collection name used when creating queries and records for this type.
    ///
    /// Always returns [`Model::COLLECTION`]; it exists so callers holding only
    /// the type can name its collection without reaching for the constant.
    fn collection_name() -> &'static str {
        Self::COLLECTION
    }

    /// Build a value from a raw record.
    ///
    /// Returns `None` when required fields are missing or have the wrong shape.
    fn from_record(record: &Record) -> Option<Self>;

    /// Copy this value's fields onto `record`.
    fn apply(&self, record: &mut Record);
}

#[cfg(feature = "async")]
pub use save::persist;
pub use save::{save, save_blocking, save_detached};
