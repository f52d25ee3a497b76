//! Backend - The remote document service a query runs against.
//!
//! The crate never talks to a network itself. It configures a [`QueryHandle`]
//! obtained from a [`Backend`], hands it a completion callback, and maps what
//! comes back. Transport, authentication and retry belong to the implementation.
//!
//! ```text
//! ┌──────────────┐  create_query(collection)   ┌─────────────────────┐
//! │   Query<M>   │ ──────────────────────────▶ │       Backend       │
//! │ constraints  │  add_*/where_*/set_limit    │  QueryHandle        │
//! │              │ ──────────────────────────▶ │  execute_async(cb)  │
//! └──────────────┘                             └─────────────────────┘
//!        ▲        Result<Vec<Record>, BackendError>        │
//!        └─────────────────────────────────────────────────┘
//! ```

pub mod in_memory;

pub use in_memory::{Execution, InMemoryBackend, InMemoryQuery};

use crate::record::Record;

/// Completion callback for [`QueryHandle::execute_async`].
pub type QueryCallback = Box<dyn FnOnce(Result<Vec<Record>, BackendError>) + Send + 'static>;

/// Completion callback for [`Backend::save_async`]. Receives the record id.
pub type SaveCallback = Box<dyn FnOnce(Result<String, BackendError>) + Send + 'static>;

/// Error reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The service could not be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// The service refused the request.
    #[error("backend rejected request: {0}")]
    Rejected(String),
    #[error("backend lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("backend error: {0}")]
    Other(String),
}

/// A backend query being configured, then executed once.
///
/// Each configuration method corresponds to exactly one
/// [`Constraint`](crate::Constraint) variant.
pub trait QueryHandle: Send {
    fn add_ascending_order(&mut self, field: &str);

    fn add_descending_order(&mut self, field: &str);

    fn where_field_exists(&mut self, field: &str);

    fn where_field_does_not_exist(&mut self, field: &str);

    fn where_field_has_prefix(&mut self, field: &str, prefix: &str);

    fn where_field_less_than(&mut self, field: &str, value: f64);

    /// Cap the number of returned records. The last call wins.
    fn set_limit(&mut self, limit: usize);

    /// Run the query. `callback` is invoked once, on a context of the
    /// backend's choosing, with the matching records in result order.
    fn execute_async(self, callback: QueryCallback);
}

/// Entry point to a document service.
pub trait Backend: Send + Sync {
    type Query: QueryHandle;

    /// Start a query against `collection`.
    fn create_query(&self, collection: &str) -> Self::Query;

    /// Create an empty record scoped to `collection`.
    fn create_record(&self, collection: &str) -> Record {
        Record::new(collection)
    }

    /// Persist `record`. With no callback the outcome is not observable.
    fn save_async(&self, record: Record, callback: Option<SaveCallback>);
}
