use crate::model::Model;
use crate::record::Record;

/// A record the backend returned that could not be converted to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Position in the backend's result list.
    pub position: usize,
    /// Backend id of the record, if it had one.
    pub id: Option<String>,
}

/// Outcome of a successful query: converted models plus the records that failed to convert.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<M> {
    /// Converted models, in backend result order.
    pub items: Vec<M>,
    pub rejected: Vec<Rejected>,
}

impl<M: Model> Found<M> {
    /// Convert each record with [`Model::from_record`], keeping result order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut items = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            match M::from_record(&record) {
                Some(item) => items.push(item),
                None => {
                    tracing::debug!(
                        collection = M::COLLECTION,
                        position,
                        id = record.id(),
                        "record did not convert to model"
                    );
                    rejected.push(Rejected {
                        position,
                        id: record.id().map(str::to_string),
                    });
                }
            }
        }

        Found { items, rejected }
    }
}

impl<M> Found<M> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when every returned record converted.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<M> {
        self.items
    }
}

impl<M> IntoIterator for Found<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a Found<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
