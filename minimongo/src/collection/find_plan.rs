use crate::collection::ObjectId;
use crate::common::Value;
use itertools::Itertools;
use std::fmt::Display;

/// The strategy a collection uses to answer a query.
///
/// A plan is derived from a [crate::filter::Filter] and the indices that
/// exist when the query runs:
///
/// * **Id lookup** - an `objectId` clause holding an identifier; the
///   candidate set is at most that one document.
/// * **Index scans** - clauses on indexed fields, ordered from the shortest
///   equal-value run to the longest. Their runs are intersected.
/// * **Remaining** - clauses with no index to help them.
///
/// With no id lookup and no index scan the plan is a full collection scan.
/// Whatever the plan, every clause of the filter is checked against each
/// candidate, so the plan only changes the cost of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindPlan {
    id_lookup: Option<ObjectId>,
    index_scans: Vec<(String, Value)>,
    remaining: Vec<(String, Value)>,
}

impl FindPlan {
    pub(crate) fn new(
        id_lookup: Option<ObjectId>,
        index_scans: Vec<(String, Value)>,
        remaining: Vec<(String, Value)>,
    ) -> Self {
        FindPlan {
            id_lookup,
            index_scans,
            remaining,
        }
    }

    /// The identifier to look up directly, if the query names one.
    pub fn id_lookup(&self) -> Option<ObjectId> {
        self.id_lookup
    }

    /// Clauses answered from an index, smallest run first.
    pub fn index_scans(&self) -> &[(String, Value)] {
        &self.index_scans
    }

    /// Clauses checked only by the final linear filter.
    pub fn remaining(&self) -> &[(String, Value)] {
        &self.remaining
    }

    /// Returns `true` if the plan visits every document.
    pub fn is_full_scan(&self) -> bool {
        self.id_lookup.is_none() && self.index_scans.is_empty()
    }
}

fn join_clauses(clauses: &[(String, Value)]) -> String {
    clauses
        .iter()
        .map(|(field, value)| format!("{} == {}", field, value))
        .join(", ")
}

impl Display for FindPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(id) = self.id_lookup {
            write!(f, "id lookup({})", id)?;
        } else if self.index_scans.is_empty() {
            write!(f, "collection scan")?;
        } else {
            write!(f, "index scan[{}]", join_clauses(&self.index_scans))?;
        }

        if !self.remaining.is_empty() {
            write!(f, " filter[{}]", join_clauses(&self.remaining))?;
        }
        Ok(())
    }
}
