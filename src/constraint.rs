//! Constraint - One filter, ordering or limit clause of a query.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single clause of a [`Query`](crate::Query).
///
/// The set of variants is closed: every backend translation matches on it
/// exhaustively, so adding a variant means teaching every translator about it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Sort ascending by field.
    Ascending(String),
    /// Sort descending by field.
    Descending(String),
    /// Field must be present.
    Exists(String),
    /// Field must be absent.
    DoesNotExist(String),
    /// String field starts with `prefix`.
    HasPrefix { field: String, prefix: String },
    /// Numeric field is strictly less than `value`.
    LessThan { field: String, value: f64 },
    /// Cap on the number of returned records.
    Limit(usize),
}

impl Constraint {
    /// The field this clause targets, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Constraint::Ascending(field)
            | Constraint::Descending(field)
            | Constraint::Exists(field)
            | Constraint::DoesNotExist(field)
            | Constraint::HasPrefix { field, .. }
            | Constraint::LessThan { field, .. } => Some(field),
            Constraint::Limit(_) => None,
        }
    }

    /// Whether this clause affects result ordering.
    pub fn is_ordering(&self) -> bool {
        matches!(self, Constraint::Ascending(_) | Constraint::Descending(_))
    }

    /// Whether this clause removes records from the result.
    pub fn is_filter(&self) -> bool {
        matches!(
            self,
            Constraint::Exists(_)
                | Constraint::DoesNotExist(_)
                | Constraint::HasPrefix { .. }
                | Constraint::LessThan { .. }
        )
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Ascending(field) => write!(f, "order by {} asc", field),
            Constraint::Descending(field) => write!(f, "order by {} desc", field),
            Constraint::Exists(field) => write!(f, "{} exists", field),
            Constraint::DoesNotExist(field) => write!(f, "{} does not exist", field),
            Constraint::HasPrefix { field, prefix } => {
                write!(f, "{} starts with {:?}", field, prefix)
            }
            Constraint::LessThan { field, value } => write!(f, "{} < {}", field, value),
            Constraint::Limit(count) => write!(f, "limit {}", count),
        }
    }
}
