use im::OrdMap;

use crate::collection::ObjectId;
use crate::common::{Value, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, MongoError, MongoResult};
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

/// The field/value mapping a caller hands to `insert_one`.
///
/// It is a persistent ordered map, so cloning a body (or taking one out of a
/// [Document]) is O(1) and later edits to either copy never show through the
/// other.
pub type Body = OrdMap<String, Value>;

/// A stored record: an ordered field/value mapping tagged with its [ObjectId].
///
/// The identifier also lives in the document under the reserved `objectId`
/// field. That field is fixed at construction: `set` and `remove` refuse to
/// touch it, and the only way to "change" an id is to build a new document.
///
/// Equality and hashing look at the identifier only. Two documents with the
/// same id are the same record even if their fields differ.
///
/// Nested objects are reachable with dotted paths, e.g. `get("address.city")`,
/// and array elements with numeric segments, e.g. `get("tags.0")`. A top-level
/// field whose name contains the separator always wins over the dotted path.
#[derive(Clone, serde::Deserialize, serde::Serialize)]
pub struct Document {
    id: ObjectId,
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a document with the given id from an optional body.
    ///
    /// A missing body yields a document holding only `objectId`. An
    /// `objectId` entry in the body is replaced by `id`.
    pub fn new(id: ObjectId, body: Option<Body>) -> Self {
        let data = body.unwrap_or_default();
        Document {
            id,
            data: data.update(DOC_ID.to_string(), Value::ObjectId(id)),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the value under `key`, following dotted paths into nested
    /// objects and arrays, or `None` if the field does not exist.
    ///
    /// A field holding [Value::Null] is present and returns `Some`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.data.get(key) {
            Some(value) => Some(value),
            None if key.contains(FIELD_SEPARATOR) => self.deep_get(key),
            None => None,
        }
    }

    /// Sets a top-level field and returns its previous value.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the key is empty or is the reserved `objectId`.
    pub fn set<T: Into<Value>>(&mut self, key: &str, value: T) -> MongoResult<Option<Value>> {
        validate_key(key)?;
        Ok(self.data.insert(key.to_string(), value.into()))
    }

    /// Removes a top-level field and returns its value.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the key is empty or is the reserved `objectId`.
    pub fn remove(&mut self, key: &str) -> MongoResult<Option<Value>> {
        validate_key(key)?;
        Ok(self.data.remove(key))
    }

    /// Checks if a top level key exists in the document.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Checks if a top level or embedded field exists in the document.
    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Number of top-level fields, `objectId` included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Top-level field names, in order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Iterates over a snapshot of the fields.
    ///
    /// The iterator owns an O(1) copy of the field map, so the document can be
    /// mutated while iterating without affecting what the iterator yields.
    pub fn iter(&self) -> DocumentIter {
        DocumentIter {
            keys: self.data.keys().cloned().collect(),
            data: self.data.clone(),
            index: 0,
        }
    }

    /// Returns a copy of every field, `objectId` included.
    ///
    /// Inserting the returned body into a collection re-uses this document's
    /// identity.
    pub fn to_body(&self) -> Body {
        self.data.clone()
    }

    fn deep_get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split(FIELD_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.data.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(object) => object.get(segment)?,
                Value::Array(array) => array.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        let mut json_string = String::with_capacity(self.data.len() * 30 + indent * 2);
        json_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            json_string.push_str(&format!("{}\"{}\": {},\n", indent_str, key, value));
        }
        json_string.pop();
        json_string.pop();
        json_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        json_string
    }
}

fn validate_key(key: &str) -> MongoResult<()> {
    if key.is_empty() {
        log::error!("Document does not support empty key");
        return Err(MongoError::new(
            "Document does not support empty key",
            ErrorKind::InvalidArgument,
        ));
    }

    if key == DOC_ID {
        log::error!("Document id is assigned at creation and cannot be modified");
        return Err(MongoError::new(
            "Document id is assigned at creation and cannot be modified",
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document({:?}) {}", self.id, self.to_pretty_json(0))
    }
}

impl From<&Document> for Body {
    fn from(value: &Document) -> Self {
        value.to_body()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (String, Value);
    type IntoIter = DocumentIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a snapshot of a document's fields.
pub struct DocumentIter {
    keys: Vec<String>,
    data: OrdMap<String, Value>,
    index: usize,
}

impl Iterator for DocumentIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.get(self.index)?;
        self.index += 1;
        let value = self.data.get(key).cloned().unwrap_or_default();
        Some((key.clone(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keys.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DocumentIter {}

/// Strips the quotes `stringify!` leaves around string literal keys.
#[inline]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Body] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use minimongo::body;
///
/// let empty = body!{};
///
/// let post = body!{
///     "author": "Mike",
///     "tags": ["mongodb", "python"],
///     "meta": { "views": 10 },
///     "score": (40 + 2),
/// };
/// assert_eq!(post.len(), 4);
/// ```
#[macro_export]
macro_rules! body {
    () => {
        $crate::collection::Body::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut body = $crate::collection::Body::new();
            $(
                body.insert(
                    $crate::collection::normalize(stringify!($key)),
                    $crate::body_value!($value),
                );
            )*
            body
        }
    };
}

/// Helper macro to convert values for the body! macro.
/// Handles nested objects, arrays, and expressions.
#[macro_export]
macro_rules! body_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Object($crate::body!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::body_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
