//! InMemoryBackend - HashMap-backed document service for tests and single-process use.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;

use serde_json::Value;

use super::{Backend, BackendError, QueryCallback, QueryHandle, SaveCallback};
use crate::record::Record;

/// Where completion callbacks run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// On a freshly spawned thread, like a remote client's callback queue.
    #[default]
    Threaded,
    /// On the thread that issued the call, before it returns.
    Inline,
}

#[derive(Default)]
struct PendingFailures {
    query: Option<BackendError>,
    save: Option<BackendError>,
}

#[derive(Default)]
struct Shared {
    /// Records per collection, in insertion order.
    collections: RwLock<HashMap<String, Vec<Record>>>,
    next_id: AtomicU64,
    failures: Mutex<PendingFailures>,
}

impl Shared {
    fn take_query_failure(&self) -> Result<Option<BackendError>, BackendError> {
        let mut failures = self
            .failures
            .lock()
            .map_err(|_| BackendError::LockPoisoned("query"))?;
        Ok(failures.query.take())
    }

    fn take_save_failure(&self) -> Result<Option<BackendError>, BackendError> {
        let mut failures = self
            .failures
            .lock()
            .map_err(|_| BackendError::LockPoisoned("save"))?;
        Ok(failures.save.take())
    }

    fn save(&self, mut record: Record) -> Result<String, BackendError> {
        if let Some(err) = self.take_save_failure()? {
            return Err(err);
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|_| BackendError::LockPoisoned("save"))?;

        let records = collections
            .entry(record.collection().to_string())
            .or_default();

        let id = match record.id() {
            Some(id) => id.to_string(),
            None => {
                // Generated ids skip any already taken in the collection.
                let id = loop {
                    let candidate =
                        format!("rec-{}", self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1);
                    if !records.iter().any(|existing| existing.id() == Some(candidate.as_str())) {
                        break candidate;
                    }
                };
                record.set_id(id.clone());
                id
            }
        };

        match records.iter_mut().find(|existing| existing.id() == Some(id.as_str())) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        Ok(id)
    }
}

fn dispatch<F>(execution: Execution, job: F)
where
    F: FnOnce() + Send + 'static,
{
    match execution {
        Execution::Inline => job(),
        Execution::Threaded => {
            thread::spawn(job);
        }
    }
}

/// In-memory document backend.
///
/// Clone-friendly via Arc: clones share storage and pending failures.
///
/// ## Example
///
/// ```
/// use docquery::{InMemoryBackend, Record};
///
/// let backend = InMemoryBackend::inline()
///     .with_records([Record::new("Widget").with("name", "gear")]);
///
/// assert_eq!(backend.records("Widget").unwrap().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    shared: Arc<Shared>,
    execution: Execution,
}

impl InMemoryBackend {
    /// Create an empty backend that completes on spawned threads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend that completes on the calling thread.
    pub fn inline() -> Self {
        Self::new().with_execution(Execution::Inline)
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Seed the backend with records. Records without an id are given one.
    pub fn with_records(self, records: impl IntoIterator<Item = Record>) -> Self {
        for record in records {
            if let Err(err) = self.insert(record) {
                tracing::warn!(error = %err, "failed to seed in-memory backend");
            }
        }
        self
    }

    /// Store a record synchronously, returning its id.
    pub fn insert(&self, record: Record) -> Result<String, BackendError> {
        self.shared.save(record)
    }

    /// Snapshot of a collection in insertion order.
    pub fn records(&self, collection: &str) -> Result<Vec<Record>, BackendError> {
        let collections = self
            .shared
            .collections
            .read()
            .map_err(|_| BackendError::LockPoisoned("records"))?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    /// Make the next executed query report `err` instead of results.
    pub fn fail_next_query(&self, err: BackendError) -> Result<(), BackendError> {
        let mut failures = self
            .shared
            .failures
            .lock()
            .map_err(|_| BackendError::LockPoisoned("fail_next_query"))?;
        failures.query = Some(err);
        Ok(())
    }

    /// Make the next save report `err` instead of persisting.
    pub fn fail_next_save(&self, err: BackendError) -> Result<(), BackendError> {
        let mut failures = self
            .shared
            .failures
            .lock()
            .map_err(|_| BackendError::LockPoisoned("fail_next_save"))?;
        failures.save = Some(err);
        Ok(())
    }
}

impl Backend for InMemoryBackend {
    type Query = InMemoryQuery;

    fn create_query(&self, collection: &str) -> InMemoryQuery {
        InMemoryQuery {
            collection: collection.to_string(),
            sort_keys: Vec::new(),
            filters: Vec::new(),
            limit: None,
            shared: Arc::clone(&self.shared),
            execution: self.execution,
        }
    }

    fn save_async(&self, record: Record, callback: Option<SaveCallback>) {
        let shared = Arc::clone(&self.shared);
        dispatch(self.execution, move || {
            let outcome = shared.save(record);
            if let Some(callback) = callback {
                callback(outcome);
            }
        });
    }
}

#[derive(Debug, Clone)]
struct SortKey {
    field: String,
    descending: bool,
}

#[derive(Debug, Clone)]
enum Filter {
    Exists(String),
    DoesNotExist(String),
    HasPrefix(String, String),
    LessThan(String, f64),
}

impl Filter {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Exists(field) => is_present(record, field),
            Filter::DoesNotExist(field) => !is_present(record, field),
            Filter::HasPrefix(field, prefix) => record
                .get_str(field)
                .is_some_and(|value| value.starts_with(prefix.as_str())),
            Filter::LessThan(field, bound) => {
                record.get_f64(field).is_some_and(|value| value < *bound)
            }
        }
    }
}

fn is_present(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(|value| !value.is_null())
}

/// Total order across JSON values: missing < null < bool < number < string < array < object.
fn compare_values(lhs: Option<&Value>, rhs: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (lhs, rhs) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(lhs).cmp(&rank(rhs)),
    }
}

/// Query handle produced by [`InMemoryBackend`].
pub struct InMemoryQuery {
    collection: String,
    sort_keys: Vec<SortKey>,
    filters: Vec<Filter>,
    limit: Option<usize>,
    shared: Arc<Shared>,
    execution: Execution,
}

impl InMemoryQuery {
    fn compare(&self, lhs: &Record, rhs: &Record) -> Ordering {
        self.sort_keys
            .iter()
            .map(|key| {
                let ordering = compare_values(lhs.get(&key.field), rhs.get(&key.field));
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    fn run(&self) -> Result<Vec<Record>, BackendError> {
        if let Some(err) = self.shared.take_query_failure()? {
            return Err(err);
        }

        let mut matched: Vec<Record> = {
            let collections = self
                .shared
                .collections
                .read()
                .map_err(|_| BackendError::LockPoisoned("query"))?;

            collections
                .get(&self.collection)
                .map(|records| {
                    records
                        .iter()
                        .filter(|record| self.filters.iter().all(|filter| filter.matches(record)))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if !self.sort_keys.is_empty() {
            // Stable: records equal on every key keep insertion order.
            matched.sort_by(|lhs, rhs| self.compare(lhs, rhs));
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        Ok(matched)
    }
}

impl QueryHandle for InMemoryQuery {
    fn add_ascending_order(&mut self, field: &str) {
        self.sort_keys.push(SortKey {
            field: field.to_string(),
            descending: false,
        });
    }

    fn add_descending_order(&mut self, field: &str) {
        self.sort_keys.push(SortKey {
            field: field.to_string(),
            descending: true,
        });
    }

    fn where_field_exists(&mut self, field: &str) {
        self.filters.push(Filter::Exists(field.to_string()));
    }

    fn where_field_does_not_exist(&mut self, field: &str) {
        self.filters.push(Filter::DoesNotExist(field.to_string()));
    }

    fn where_field_has_prefix(&mut self, field: &str, prefix: &str) {
        self.filters
            .push(Filter::HasPrefix(field.to_string(), prefix.to_string()));
    }

    fn where_field_less_than(&mut self, field: &str, value: f64) {
        self.filters.push(Filter::LessThan(field.to_string(), value));
    }

    fn set_limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    fn execute_async(self, callback: QueryCallback) {
        dispatch(self.execution, move || {
            let outcome = self.run();
            callback(outcome);
        });
    }
}
