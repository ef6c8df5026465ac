use crate::collection::{Body, Document, DocumentFactory, FindOptimizer, FindPlan, ObjectId};
use crate::common::{SortKey, DOC_ID};
use crate::errors::{ErrorKind, MongoError, MongoResult};
use crate::filter::Filter;
use crate::index::FieldIndex;
use itertools::Either;
use log::{debug, error, warn};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

/// A named collection of [Document]s with sorted secondary indices.
///
/// A collection keeps three structures in step:
///
/// * the **primary store**, every document ordered by identifier, or by the
///   [SortKey] passed to the last [MongoCollection::sort] call,
/// * the **reserved ids**, the identifiers of the stored documents,
/// * one [FieldIndex] per indexed field, holding `(value, id)` for every
///   document that has the field.
///
/// Inserts, deletes, `clear` and `sort` maintain all three. Queries are
/// conjunctions of equality clauses, see [Filter]; the planner narrows
/// candidates with an id lookup or by intersecting index runs and then
/// checks every clause on each candidate, so indices never change a result.
///
/// ## Live references
///
/// `insert_one`, `find`, `get` and friends hand out borrows of the stored
/// documents. Through [MongoCollection::get_mut] a document can be changed in
/// place. Such changes are not re-sorted or re-indexed: after editing an
/// indexed field, or a field of a custom sort key, call
/// [MongoCollection::rebuild_indices] or [MongoCollection::sort] again.
///
/// # Examples
///
/// ```rust,ignore
/// use minimongo::body;
/// use minimongo::filter::field;
///
/// let posts = db.collection("posts")?;
/// let id = posts.insert_one(body!{ author: "Mike", tags: ["x"] })?.id();
/// posts.create_index("author")?;
///
/// let mike = posts.find_one(&field("author").eq("Mike"));
/// assert_eq!(mike.map(|d| d.id()), Some(id));
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct MongoCollection {
    name: String,
    documents: Vec<Document>,
    reserved_ids: BTreeSet<ObjectId>,
    indices: BTreeMap<String, FieldIndex>,
    sort_key: SortKey,
    document_factory: DocumentFactory,
}

impl MongoCollection {
    pub fn new(name: &str) -> Self {
        MongoCollection::with_factory(name, DocumentFactory::new())
    }

    /// Creates an empty collection minting identifiers with `document_factory`.
    pub fn with_factory(name: &str, document_factory: DocumentFactory) -> Self {
        MongoCollection {
            name: name.to_string(),
            documents: Vec::new(),
            reserved_ids: BTreeSet::new(),
            indices: BTreeMap::new(),
            sort_key: SortKey::by_id(),
            document_factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The ordering policy of the primary store.
    pub fn sort_key(&self) -> &SortKey {
        &self.sort_key
    }

    /// Iterates over the documents in primary-store order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.reserved_ids.contains(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&Document> {
        self.position_of(id).map(|position| &self.documents[position])
    }

    /// Mutable access to a stored document.
    ///
    /// Indices and the store order are not updated to follow the change.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Document> {
        let position = self.position_of(id)?;
        Some(&mut self.documents[position])
    }

    /// Inserts a body and returns the stored document.
    ///
    /// The body gets a fresh identifier unless it already carries one under
    /// `objectId`, which is how a document is moved between collections.
    ///
    /// # Errors
    ///
    /// * `TypeMismatch` if `objectId` holds something other than an id.
    /// * `DuplicateKey` if the identifier is already in the collection.
    pub fn insert_one(&mut self, body: Body) -> MongoResult<&Document> {
        let document = self.document_factory.new_document(body)?;
        let id = document.id();
        if self.reserved_ids.contains(&id) {
            error!("Document {} already exists in collection '{}'", id, self.name);
            return Err(MongoError::new(
                &format!("Document {} already exists in collection '{}'", id, self.name),
                ErrorKind::DuplicateKey,
            ));
        }

        for index in self.indices.values_mut() {
            index.insert(&document);
        }

        let position = self
            .documents
            .partition_point(|existing| self.sort_key.compare(existing, &document).is_lt());
        self.reserved_ids.insert(id);
        self.documents.insert(position, document);
        Ok(&self.documents[position])
    }

    /// Inserts every body in order and returns the stored documents.
    ///
    /// This is not atomic. On the first failure the documents inserted so
    /// far stay in the collection, and the error (caused by the failing
    /// insert) says how many went in.
    pub fn insert_many<I>(&mut self, bodies: I) -> MongoResult<Vec<&Document>>
    where
        I: IntoIterator<Item = Body>,
    {
        let mut ids = Vec::new();
        for body in bodies {
            match self.insert_one(body) {
                Ok(document) => ids.push(document.id()),
                Err(err) => {
                    error!(
                        "Insert into '{}' stopped after {} documents: {}",
                        self.name,
                        ids.len(),
                        err
                    );
                    return Err(MongoError::new_with_cause(
                        &format!(
                            "Insert into '{}' stopped after {} documents",
                            self.name,
                            ids.len()
                        ),
                        err.kind().clone(),
                        err,
                    ));
                }
            }
        }

        Ok(ids.iter().filter_map(|id| self.get(id)).collect())
    }

    /// Removes a document and returns it.
    ///
    /// # Errors
    ///
    /// `NotFound` if no document has this identifier.
    pub fn delete_one(&mut self, id: &ObjectId) -> MongoResult<Document> {
        if !self.reserved_ids.contains(id) {
            error!("Document {} not found in collection '{}'", id, self.name);
            return Err(MongoError::new(
                &format!("Document {} not found in collection '{}'", id, self.name),
                ErrorKind::NotFound,
            ));
        }

        let position = match self.position_of(id) {
            Some(position) => position,
            None => {
                error!("Document {} is reserved but not stored in '{}'", id, self.name);
                return Err(MongoError::new(
                    &format!("Document {} is reserved but not stored in '{}'", id, self.name),
                    ErrorKind::InternalError,
                ));
            }
        };

        let document = self.documents.remove(position);
        self.reserved_ids.remove(id);
        for index in self.indices.values_mut() {
            index.remove(&document);
        }
        Ok(document)
    }

    /// Removes every listed document in order and returns them.
    ///
    /// Same partial-failure behavior as [MongoCollection::insert_many].
    pub fn delete_many<I, T>(&mut self, ids: I) -> MongoResult<Vec<Document>>
    where
        I: IntoIterator<Item = T>,
        T: Borrow<ObjectId>,
    {
        let mut deleted = Vec::new();
        for id in ids {
            match self.delete_one(id.borrow()) {
                Ok(document) => deleted.push(document),
                Err(err) => {
                    error!(
                        "Delete from '{}' stopped after {} documents: {}",
                        self.name,
                        deleted.len(),
                        err
                    );
                    return Err(MongoError::new_with_cause(
                        &format!(
                            "Delete from '{}' stopped after {} documents",
                            self.name,
                            deleted.len()
                        ),
                        err.kind().clone(),
                        err,
                    ));
                }
            }
        }
        Ok(deleted)
    }

    /// Removes every document. Index definitions and the sort key are kept.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.reserved_ids.clear();
        for index in self.indices.values_mut() {
            index.clear();
        }
        debug!("Cleared collection '{}'", self.name);
    }

    /// Builds an index on `field`, replacing any existing one.
    ///
    /// Dotted paths index embedded fields.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the field name is empty or is `objectId`, which
    /// the primary store already keys on.
    pub fn create_index(&mut self, field: &str) -> MongoResult<()> {
        if field.is_empty() {
            error!("Index field name cannot be empty");
            return Err(MongoError::new(
                "Index field name cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        if field == DOC_ID {
            error!("Cannot create an index on the reserved field '{}'", DOC_ID);
            return Err(MongoError::new(
                &format!("Cannot create an index on the reserved field '{}'", DOC_ID),
                ErrorKind::InvalidArgument,
            ));
        }

        let index = FieldIndex::build(field, &self.documents);
        self.indices.insert(field.to_string(), index);
        Ok(())
    }

    /// Removes the index on `field` and returns it.
    pub fn drop_index(&mut self, field: &str) -> MongoResult<FieldIndex> {
        match self.indices.remove(field) {
            Some(index) => Ok(index),
            None => {
                error!("No index on '{}' in collection '{}'", field, self.name);
                Err(MongoError::new(
                    &format!("No index on '{}' in collection '{}'", field, self.name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    pub fn has_index(&self, field: &str) -> bool {
        self.indices.contains_key(field)
    }

    pub fn index(&self, field: &str) -> Option<&FieldIndex> {
        self.indices.get(field)
    }

    /// Indexed field names, sorted.
    pub fn index_fields(&self) -> Vec<String> {
        self.indices.keys().cloned().collect()
    }

    /// Rebuilds every index from the current documents.
    pub fn rebuild_indices(&mut self) {
        for (field, index) in self.indices.iter_mut() {
            *index = FieldIndex::build(field, &self.documents);
        }
    }

    /// Re-sorts the primary store by `sort_key` and rebuilds every index.
    ///
    /// Later inserts keep the new order. [SortKey::by_id] restores identifier
    /// order.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the key names an empty field.
    pub fn sort(&mut self, sort_key: SortKey) -> MongoResult<()> {
        sort_key.validate()?;
        self.documents.sort_by(|a, b| sort_key.compare(a, b));
        self.sort_key = sort_key;
        self.rebuild_indices();
        debug!("Sorted collection '{}' by {:?}", self.name, self.sort_key);
        Ok(())
    }

    /// Returns the plan [MongoCollection::find] would use for `filter`.
    pub fn explain(&self, filter: &Filter) -> FindPlan {
        FindOptimizer.create_find_plan(filter, &self.indices)
    }

    /// Returns every matching document in primary-store order.
    pub fn find(&self, filter: &Filter) -> Vec<&Document> {
        let plan = self.explain(filter);
        self.candidates(&plan)
            .filter(|document| filter.matches(document))
            .collect()
    }

    /// Returns the first matching document in primary-store order.
    pub fn find_one(&self, filter: &Filter) -> Option<&Document> {
        let plan = self.explain(filter);
        self.candidates(&plan).find(|document| filter.matches(document))
    }

    /// Verifies that the reserved ids, the store order and every index agree
    /// with the stored documents.
    ///
    /// Fails with `InternalError` naming the first inconsistency, which is
    /// usually an indexed field changed through [MongoCollection::get_mut].
    pub fn check_integrity(&self) -> MongoResult<()> {
        self.check_reserved_ids()?;

        let sorted = self
            .documents
            .windows(2)
            .all(|pair| self.sort_key.compare(&pair[0], &pair[1]).is_lt());
        if !sorted {
            return Err(self.integrity_error("documents are out of order"));
        }

        for (field, index) in self.indices.iter() {
            let expected = FieldIndex::build(field, &self.documents);
            if expected.entries() != index.entries() {
                return Err(self.integrity_error(&format!("index on '{}' is stale", field)));
            }
        }
        Ok(())
    }

    /// Restores the store order and every index from the documents.
    ///
    /// Only order and indices are derived state; if the reserved ids do not
    /// match the stored documents the collection cannot be repaired and this
    /// fails with `InternalError`. Returns `true` if anything had to change.
    pub(crate) fn repair(&mut self) -> MongoResult<bool> {
        self.check_reserved_ids()?;
        if self.check_integrity().is_ok() {
            return Ok(false);
        }

        warn!("Repairing order and indices of collection '{}'", self.name);
        let sort_key = self.sort_key.clone();
        self.documents.sort_by(|a, b| sort_key.compare(a, b));
        self.rebuild_indices();
        Ok(true)
    }

    fn check_reserved_ids(&self) -> MongoResult<()> {
        let stored: BTreeSet<ObjectId> = self.documents.iter().map(Document::id).collect();
        if stored.len() != self.documents.len() || stored != self.reserved_ids {
            return Err(self.integrity_error("reserved ids do not match stored documents"));
        }
        Ok(())
    }

    fn integrity_error(&self, reason: &str) -> MongoError {
        error!("Collection '{}' is inconsistent: {}", self.name, reason);
        MongoError::new(
            &format!("Collection '{}' is inconsistent: {}", self.name, reason),
            ErrorKind::InternalError,
        )
    }

    fn position_of(&self, id: &ObjectId) -> Option<usize> {
        if !self.reserved_ids.contains(id) {
            return None;
        }

        if self.sort_key.is_by_id() {
            self.documents
                .binary_search_by(|document| document.id().cmp(id))
                .ok()
        } else {
            self.documents.iter().position(|document| &document.id() == id)
        }
    }

    fn candidates<'a>(
        &'a self,
        plan: &FindPlan,
    ) -> Either<std::vec::IntoIter<&'a Document>, std::slice::Iter<'a, Document>> {
        if let Some(id) = plan.id_lookup() {
            return Either::Left(self.get(&id).into_iter().collect::<Vec<_>>().into_iter());
        }

        let mut runs = plan
            .index_scans()
            .iter()
            .filter_map(|(field, value)| self.indices.get(field).map(|index| index.lookup(value)));

        let first = match runs.next() {
            Some(run) => run,
            None => return Either::Right(self.documents.iter()),
        };

        // equal-value runs are ordered by id, so membership is a binary search
        let mut ids: BTreeSet<ObjectId> = first.iter().map(|entry| entry.id()).collect();
        for run in runs {
            ids.retain(|id| run.binary_search_by(|entry| entry.id().cmp(id)).is_ok());
            if ids.is_empty() {
                break;
            }
        }

        let documents: Vec<&Document> = if self.sort_key.is_by_id() {
            ids.iter().filter_map(|id| self.get(id)).collect()
        } else {
            self.documents
                .iter()
                .filter(|document| ids.contains(&document.id()))
                .collect()
        };
        Either::Left(documents.into_iter())
    }
}

impl<'a> IntoIterator for &'a MongoCollection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
