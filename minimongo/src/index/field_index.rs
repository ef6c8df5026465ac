use crate::collection::{Document, ObjectId};
use crate::common::Value;

/// One entry of a [FieldIndex]: the indexed value of a document and its id.
///
/// Entries order by value first and identifier second, which makes the
/// relative order of documents sharing a value deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
pub struct IndexEntry {
    value: Value,
    id: ObjectId,
}

impl IndexEntry {
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}

/// A sorted secondary index over one field.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct FieldIndex {
    field: String,
    entries: Vec<IndexEntry>,
}

impl FieldIndex {
    /// Builds an index over every document that has `field`.
    pub fn build<'a>(field: &str, documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut entries: Vec<IndexEntry> = documents
            .into_iter()
            .filter_map(|doc| {
                doc.get(field).map(|value| IndexEntry {
                    value: value.clone(),
                    id: doc.id(),
                })
            })
            .collect();
        entries.sort_unstable();

        log::debug!("Built index on '{}' with {} entries", field, entries.len());
        FieldIndex {
            field: field.to_string(),
            entries,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Returns the run of entries whose value equals `value`.
    pub fn lookup(&self, value: &Value) -> &[IndexEntry] {
        let start = self.entries.partition_point(|entry| &entry.value < value);
        let run = self.entries[start..].partition_point(|entry| &entry.value == value);
        &self.entries[start..start + run]
    }

    /// Adds a document if it has the indexed field.
    pub(crate) fn insert(&mut self, document: &Document) {
        if let Some(value) = document.get(&self.field) {
            let entry = IndexEntry {
                value: value.clone(),
                id: document.id(),
            };
            let position = self.entries.partition_point(|existing| existing < &entry);
            self.entries.insert(position, entry);
        }
    }

    /// Removes a document's entry, returning whether one was found.
    ///
    /// The entry is located by bisecting on the document's current value. If
    /// the field was changed in place after indexing, that search misses and
    /// the entry is found by identifier instead.
    pub(crate) fn remove(&mut self, document: &Document) -> bool {
        let id = document.id();
        if let Some(value) = document.get(&self.field) {
            let probe = IndexEntry {
                value: value.clone(),
                id,
            };
            if let Ok(position) = self.entries.binary_search(&probe) {
                self.entries.remove(position);
                return true;
            }
        }

        match self.entries.iter().position(|entry| entry.id == id) {
            Some(position) => {
                log::warn!(
                    "Index on '{}' was stale for document {}, removed by id",
                    self.field,
                    id
                );
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
