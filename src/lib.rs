//! Typed constraint queries and record mapping over document-style backends.
//!
//! Build a [`Query`] from [`Constraint`]s, run it against any [`Backend`], and
//! get typed [`Model`] values back. [`save`] goes the other way.
//!
//! ```ignore
//! use docquery::{InMemoryBackend, Model, Query};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! #[model(collection = "Widget")]
//! struct Widget {
//!     name: String,
//!     teeth: u32,
//! }
//!
//! let backend = InMemoryBackend::new();
//! docquery::save_blocking(&backend, &Widget { name: "gear".into(), teeth: 12 })?;
//!
//! let found = Query::<Widget>::new().has_prefix("name", "ge").find_blocking(&backend)?;
//! assert_eq!(found.len(), 1);
//! ```

pub mod backend;
mod constraint;
mod error;
pub mod model;
mod query;
pub mod record;

pub use backend::{
    Backend, BackendError, Execution, InMemoryBackend, InMemoryQuery, QueryCallback, QueryHandle,
    SaveCallback,
};
pub use constraint::Constraint;
pub use error::WaitError;
#[cfg(feature = "async")]
pub use model::persist;
pub use model::{save, save_blocking, save_detached, Model};
pub use query::{Found, Query, Rejected};
pub use record::{Record, RecordError};

#[cfg(feature = "derive")]
pub use docquery_macros::Model;
