//! # minimongo - an embedded document store
//!
//! minimongo keeps named collections of schema-less documents in memory.
//! Every document is addressed by an [collection::ObjectId], collections can
//! index single fields, and queries are conjunctions of field equalities.
//! A whole database can be snapshotted to a file and loaded back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use minimongo::{body, MongoDatabase};
//! use minimongo::filter::field;
//!
//! let mut db = MongoDatabase::builder().name("blog").open()?;
//!
//! // Get or create a collection
//! let posts = db.collection("posts")?;
//!
//! // Insert documents; each gets a fresh id
//! let mike = posts.insert_one(body!{ author: "Mike", tags: ["mongodb", "python"] })?.id();
//! posts.insert_one(body!{ author: "Dwight", tags: ["beets"] })?;
//!
//! // Index a field and query it
//! posts.create_index("author")?;
//! let found = posts.find_one(&field("author").eq("Mike"));
//! assert_eq!(found.map(|doc| doc.id()), Some(mike));
//!
//! // Write a snapshot
//! let path = db.save()?;
//! let restored = MongoDatabase::load(&path)?;
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, identifiers and the collection engine
//! - [`common`] - Values, sort keys and constants
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Equality filters
//! - [`index`] - Sorted single-field indices
//! - [`database`] - The collection registry and snapshots
//! - [`database_builder`] - Database builder
//! - [`database_config`] - Database configuration

pub mod collection;
pub mod common;
pub mod database;
pub mod database_builder;
pub mod database_config;
pub mod errors;
pub mod filter;
pub mod index;
pub(crate) mod store;

pub use database::MongoDatabase;
pub use database_builder::DatabaseBuilder;
pub use database_config::DatabaseConfig;
