use std::sync::mpsc;

use tracing::{debug, warn};

use super::Model;
use crate::backend::{Backend, BackendError};
use crate::error::WaitError;
use crate::record::Record;

fn to_record<M: Model, B: Backend>(backend: &B, model: &M) -> Record {
    let mut record = backend.create_record(M::COLLECTION);
    model.apply(&mut record);
    record
}

/// Persist `model` in its collection.
///
/// Creates one record through the backend, applies the model to it once, and
/// issues one asynchronous save. `callback` receives the record id or the
/// backend's error, on whatever thread the backend completes on.
pub fn save<M, B, F>(backend: &B, model: &M, callback: F)
where
    M: Model,
    B: Backend,
    F: FnOnce(Result<String, BackendError>) + Send + 'static,
{
    let record = to_record(backend, model);
    debug!(collection = M::COLLECTION, fields = record.len(), "saving model");
    backend.save_async(record, Some(Box::new(callback)));
}

/// Persist `model` without waiting for or reporting the outcome.
///
/// Failures are only visible as a `warn` log line.
pub fn save_detached<M: Model, B: Backend>(backend: &B, model: &M) {
    save(backend, model, |outcome| {
        if let Err(err) = outcome {
            warn!(collection = M::COLLECTION, error = %err, "detached save failed");
        }
    });
}

/// Persist `model` and block the calling thread until the backend completes.
pub fn save_blocking<M: Model, B: Backend>(backend: &B, model: &M) -> Result<String, WaitError> {
    let (tx, rx) = mpsc::channel();
    save(backend, model, move |outcome| {
        let _ = tx.send(outcome);
    });
    Ok(rx.recv().map_err(|_| WaitError::Disconnected)??)
}

/// Persist `model` and await the backend's completion.
#[cfg(feature = "async")]
pub async fn persist<M: Model, B: Backend>(backend: &B, model: &M) -> Result<String, WaitError> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    save(backend, model, move |outcome| {
        let _ = tx.send(outcome);
    });
    Ok(rx.await.map_err(|_| WaitError::Disconnected)??)
}
