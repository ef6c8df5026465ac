use crate::collection::{Body, Document, ObjectId};
use crate::common::{Value, DOC_ID};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

pub(crate) type ClauseVec = SmallVec<[(String, Value); 4]>;

/// A conjunction of field equality clauses.
///
/// A document matches when, for every clause, it has the field and the field
/// equals the value. A document that lacks a queried field does not match;
/// this is not an error. Clauses on the same field are all checked, so
/// `field("a").eq(1).and(field("a").eq(2))` matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: ClauseVec,
}

impl Filter {
    /// Adds a `field == value` clause.
    pub fn with_clause<T: Into<Value>>(mut self, field: &str, value: T) -> Filter {
        self.clauses.push((field.to_string(), value.into()));
        self
    }

    /// Combines this filter with another using logical AND.
    pub fn and(mut self, other: Filter) -> Filter {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Returns `true` if the filter has no clause and matches everything.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Checks every clause against the document.
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

impl From<Body> for Filter {
    fn from(body: Body) -> Self {
        Filter {
            clauses: body.into_iter().collect(),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "all()");
        }
        write!(
            f,
            "{}",
            self.clauses
                .iter()
                .map(|(field, value)| format!("{} == {}", field, value))
                .join(" AND ")
        )
    }
}

/// A filter matching every document.
pub fn all() -> Filter {
    Filter::default()
}

/// A filter matching the document with the given identifier.
pub fn by_id(id: ObjectId) -> Filter {
    Filter::default().with_clause(DOC_ID, id)
}
