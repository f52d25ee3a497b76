//! RecordingBackend - Logs every backend call and answers with scripted results.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use docquery::{Backend, BackendError, QueryCallback, QueryHandle, Record, SaveCallback};

/// Shared, ordered log of backend (and model) calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// What the next executed query does with its callback.
#[derive(Debug, Clone)]
pub enum Script {
    Respond(Result<Vec<Record>, BackendError>),
    /// Drop the callback without calling it.
    Drop,
}

#[derive(Clone, Default)]
pub struct RecordingBackend {
    log: CallLog,
    scripts: Arc<Mutex<VecDeque<Script>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing log, so models can write into the same timeline.
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            scripts: Arc::default(),
        }
    }

    /// Queue the answer for the next executed query. Unscripted queries return no records.
    pub fn respond(&self, outcome: Result<Vec<Record>, BackendError>) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Script::Respond(outcome));
        self
    }

    pub fn drop_next(&self) -> &Self {
        self.scripts.lock().unwrap().push_back(Script::Drop);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }
}

pub struct RecordingQuery {
    backend: RecordingBackend,
}

impl RecordingQuery {
    fn push(&self, call: String) {
        self.backend.push(call);
    }
}

impl QueryHandle for RecordingQuery {
    fn add_ascending_order(&mut self, field: &str) {
        self.push(format!("add_ascending_order {}", field));
    }

    fn add_descending_order(&mut self, field: &str) {
        self.push(format!("add_descending_order {}", field));
    }

    fn where_field_exists(&mut self, field: &str) {
        self.push(format!("where_field_exists {}", field));
    }

    fn where_field_does_not_exist(&mut self, field: &str) {
        self.push(format!("where_field_does_not_exist {}", field));
    }

    fn where_field_has_prefix(&mut self, field: &str, prefix: &str) {
        self.push(format!("where_field_has_prefix {} {}", field, prefix));
    }

    fn where_field_less_than(&mut self, field: &str, value: f64) {
        self.push(format!("where_field_less_than {} {}", field, value));
    }

    fn set_limit(&mut self, limit: usize) {
        self.push(format!("set_limit {}", limit));
    }

    fn execute_async(self, callback: QueryCallback) {
        self.push("execute_async".to_string());
        let script = self
            .backend
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::Respond(Ok(Vec::new())));

        match script {
            Script::Respond(outcome) => callback(outcome),
            Script::Drop => drop(callback),
        }
    }
}

impl Backend for RecordingBackend {
    type Query = RecordingQuery;

    fn create_query(&self, collection: &str) -> RecordingQuery {
        self.push(format!("create_query {}", collection));
        RecordingQuery {
            backend: self.clone(),
        }
    }

    fn create_record(&self, collection: &str) -> Record {
        self.push(format!("create_record {}", collection));
        Record::new(collection)
    }

    fn save_async(&self, record: Record, callback: Option<SaveCallback>) {
        self.push(format!("save_async {}", serde_json::to_string(&record).unwrap()));
        if let Some(callback) = callback {
            callback(Ok("saved-1".to_string()));
        }
    }
}
