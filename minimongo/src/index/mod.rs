//! Single-field secondary indices.
//!
//! A [FieldIndex] keeps `(value, id)` entries for every document that has
//! the indexed field, sorted by value and then by identifier. An equality
//! lookup is two binary searches that bound the run of equal values, so it
//! costs `O(log n + k)` for a run of `k` documents.
//!
//! # Creating Indexes
//!
//! ```rust,ignore
//! let collection = db.collection("posts")?;
//! collection.create_index("author")?;
//! ```
//!
//! # Index Maintenance
//!
//! - Indexes are updated on insert, delete and clear
//! - `sort` and `rebuild_indices` rebuild every index from the documents
//! - Changing an indexed field through `get_mut` leaves the index stale
//!   until the caller re-indexes

mod field_index;

pub use field_index::*;
