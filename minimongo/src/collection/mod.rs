//! Collections, documents and identifiers.
//!
//! # Documents
//!
//! A [Document] is an ordered map from field names to [crate::common::Value]s
//! that always holds its own [ObjectId] under the reserved `objectId` field.
//! Callers never build documents for insertion directly: they hand a [Body]
//! to a collection and the collection's [DocumentFactory] mints the id.
//!
//! ```rust,ignore
//! use minimongo::body;
//!
//! let id = posts.insert_one(body!{ author: "Mike", meta: { views: 3 } })?.id();
//! let doc = posts.get(&id).unwrap();
//! assert_eq!(doc.get("meta.views"), Some(&val!(3)));
//! ```
//!
//! # Collections
//!
//! A [MongoCollection] keeps its documents in a sorted primary store, reserves
//! every identifier it holds and maintains one sorted [crate::index::FieldIndex]
//! per indexed field. Queries are [crate::filter::Filter]s; [MongoCollection::explain]
//! shows the [FindPlan] chosen for one.
//!
//! # Document IDs
//!
//! Identifiers are 12 bytes: a random 4-byte tag chosen when the collection's
//! factory is created, followed by an 8-byte sequence number. The factory is
//! saved with the collection, so identifiers minted after a reload never
//! repeat earlier ones.

mod document;
mod document_factory;
mod find_optimizer;
mod find_plan;
mod id_generator;
mod mongo_collection;
mod object_id;

pub use document::*;
pub use document_factory::*;
pub(crate) use find_optimizer::*;
pub use find_plan::*;
pub use id_generator::*;
pub use mongo_collection::*;
pub use object_id::*;
