use crate::collection::Document;
use crate::errors::{ErrorKind, MongoError, MongoResult};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Specifies the direction for sorting documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest)
    Ascending,
    /// Sort in descending order (largest to smallest)
    Descending,
}

/// The ordering policy of a collection's primary store.
///
/// A `SortKey` is a list of `(field, order)` pairs compared left to right.
/// A document missing a field sorts before every document that has it, and
/// documents that tie on every field are ordered by identifier, so the order
/// is always total. The empty key (the default) is plain identifier order.
///
/// ```text
/// let key = SortKey::ascending("author").then("date", SortOrder::Descending);
/// collection.sort(key)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SortKey {
    sorting_order: SmallVec<[(String, SortOrder); 2]>,
}

impl SortKey {
    /// The identifier order every collection starts with.
    pub fn by_id() -> SortKey {
        SortKey::default()
    }

    pub fn ascending(field: &str) -> SortKey {
        SortKey::by_id().then(field, SortOrder::Ascending)
    }

    pub fn descending(field: &str) -> SortKey {
        SortKey::by_id().then(field, SortOrder::Descending)
    }

    /// Adds a field compared after the ones already in the key.
    pub fn then(mut self, field: &str, sort_order: SortOrder) -> SortKey {
        self.sorting_order.push((field.to_string(), sort_order));
        self
    }

    /// Returns `true` if this key is plain identifier order.
    #[inline]
    pub fn is_by_id(&self) -> bool {
        self.sorting_order.is_empty()
    }

    #[inline]
    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    pub(crate) fn validate(&self) -> MongoResult<()> {
        if self.sorting_order.iter().any(|(field, _)| field.is_empty()) {
            log::error!("Sort key contains an empty field name");
            return Err(MongoError::new(
                "Sort key contains an empty field name",
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(())
    }

    /// Compares two documents under this key.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for (field, sort_order) in self.sorting_order.iter() {
            let ordering = a.get(field).cmp(&b.get(field));
            let ordering = match sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.id().cmp(&b.id())
    }
}
