//! Query - An immutable, ordered list of constraints bound to a model type.
//!
//! Combinators never modify the receiver; each returns a new query with one
//! more constraint at the end. Executing a query translates every constraint,
//! in order, into one call on the backend's [`QueryHandle`], then maps the
//! returned records through [`Model::from_record`].
//!
//! ## Example
//!
//! ```ignore
//! use docquery::{InMemoryBackend, Query};
//!
//! let backend = InMemoryBackend::new();
//! let oldest = Query::<Person>::new().descending("age").limit(10);
//!
//! oldest.find_in_background(&backend, |outcome| match outcome {
//!     Ok(found) => println!("{} people", found.len()),
//!     Err(err) => eprintln!("query failed: {}", err),
//! });
//! ```

mod found;

use std::fmt;
use std::marker::PhantomData;
use std::sync::mpsc;

use tracing::{debug, trace, warn};

use crate::backend::{Backend, BackendError, QueryHandle};
use crate::constraint::Constraint;
use crate::error::WaitError;
use crate::model::Model;

pub use found::{Found, Rejected};

/// Typed query over the collection of `M`.
pub struct Query<M> {
    constraints: Vec<Constraint>,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Query<M> {
    /// An empty query: every record in the collection, backend order.
    pub fn new() -> Self {
        Self::with_constraints(Vec::new())
    }

    pub fn with_constraints(constraints: Vec<Constraint>) -> Self {
        Self {
            constraints,
            _marker: PhantomData,
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Return a new query with `constraint` appended.
    pub fn and(&self, constraint: Constraint) -> Self {
        let mut constraints = Vec::with_capacity(self.constraints.len() + 1);
        constraints.extend(self.constraints.iter().cloned());
        constraints.push(constraint);
        Self::with_constraints(constraints)
    }

    pub fn ascending(&self, field: impl Into<String>) -> Self {
        self.and(Constraint::Ascending(field.into()))
    }

    pub fn descending(&self, field: impl Into<String>) -> Self {
        self.and(Constraint::Descending(field.into()))
    }

    pub fn exists(&self, field: impl Into<String>) -> Self {
        self.and(Constraint::Exists(field.into()))
    }

    pub fn does_not_exist(&self, field: impl Into<String>) -> Self {
        self.and(Constraint::DoesNotExist(field.into()))
    }

    pub fn has_prefix(&self, field: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.and(Constraint::HasPrefix {
            field: field.into(),
            prefix: prefix.into(),
        })
    }

    pub fn less_than(&self, field: impl Into<String>, value: f64) -> Self {
        self.and(Constraint::LessThan {
            field: field.into(),
            value,
        })
    }

    pub fn limit(&self, count: usize) -> Self {
        self.and(Constraint::Limit(count))
    }

    /// Configure `handle` with every constraint, in order, one call each.
    pub fn apply_to<H: QueryHandle + ?Sized>(&self, handle: &mut H) {
        for constraint in &self.constraints {
            trace!(%constraint, "translating constraint");
            match constraint {
                Constraint::Ascending(field) => handle.add_ascending_order(field),
                Constraint::Descending(field) => handle.add_descending_order(field),
                Constraint::Exists(field) => handle.where_field_exists(field),
                Constraint::DoesNotExist(field) => handle.where_field_does_not_exist(field),
                Constraint::HasPrefix { field, prefix } => {
                    handle.where_field_has_prefix(field, prefix)
                }
                Constraint::LessThan { field, value } => {
                    handle.where_field_less_than(field, *value)
                }
                Constraint::Limit(count) => handle.set_limit(*count),
            }
        }
    }
}

impl<M: Model> Query<M> {
    /// Run the query without blocking.
    ///
    /// Translation happens on the calling thread before this returns. `callback`
    /// is invoked exactly once, on whatever thread the backend completes on,
    /// with the converted results or the backend's error.
    pub fn find_in_background<B, F>(&self, backend: &B, callback: F)
    where
        B: Backend,
        F: FnOnce(Result<Found<M>, BackendError>) + Send + 'static,
    {
        let mut handle = backend.create_query(M::COLLECTION);
        self.apply_to(&mut handle);

        debug!(
            collection = M::COLLECTION,
            constraints = self.constraints.len(),
            "executing query"
        );

        handle.execute_async(Box::new(move |outcome| {
            let outcome = outcome.map(Found::<M>::from_records);
            match &outcome {
                Ok(found) => debug!(
                    collection = M::COLLECTION,
                    items = found.items.len(),
                    rejected = found.rejected.len(),
                    "query completed"
                ),
                Err(err) => warn!(collection = M::COLLECTION, error = %err, "query failed"),
            }
            callback(outcome);
        }));
    }

    /// Run the query and block the calling thread until the backend completes.
    pub fn find_blocking<B: Backend>(&self, backend: &B) -> Result<Found<M>, WaitError> {
        let (tx, rx) = mpsc::channel();
        self.find_in_background(backend, move |outcome| {
            let _ = tx.send(outcome);
        });
        Ok(rx.recv().map_err(|_| WaitError::Disconnected)??)
    }

    /// Run the query and await the backend's completion.
    #[cfg(feature = "async")]
    pub async fn find<B: Backend>(&self, backend: &B) -> Result<Found<M>, WaitError> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.find_in_background(backend, move |outcome| {
            let _ = tx.send(outcome);
        });
        Ok(rx.await.map_err(|_| WaitError::Disconnected)??)
    }
}

impl<M> Default for Query<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self::with_constraints(self.constraints.clone())
    }
}

impl<M> PartialEq for Query<M> {
    fn eq(&self, other: &Self) -> bool {
        self.constraints == other.constraints
    }
}

impl<M> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("model", &std::any::type_name::<M>())
            .field("constraints", &self.constraints)
            .finish()
    }
}
