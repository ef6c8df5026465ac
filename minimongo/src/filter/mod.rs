//! Conjunctive equality filters.
//!
//! A [Filter] is a list of `field == value` clauses that must all hold. There
//! is no `or`, no ranges and no negation: combining two filters with `and`
//! just concatenates their clauses.
//!
//! # Creating Filters
//!
//! - `field("author").eq("Mike")` - one equality clause
//! - `all()` - no clauses, matches every document
//! - `by_id(id)` - match the document with that identifier
//! - `field("a").eq(1).and(field("b").eq(2))` - logical AND
//! - `Filter::from(body!{ a: 1, b: 2 })` - one clause per body field
//!
//! # Examples
//!
//! ```rust,ignore
//! use minimongo::filter::{field, all};
//!
//! let filter = field("author").eq("Mike").and(field("year").eq(2012));
//! let posts = collection.find(&filter);
//! let everything = collection.find(&all());
//! ```

mod filter;
mod fluent;

pub use filter::*;
pub use fluent::*;
