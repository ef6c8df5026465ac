//! Shared building blocks: the dynamically typed [Value], the [SortKey]
//! used to order a collection, and crate-wide constants.

mod constants;
mod sort_order;
mod value;

pub use constants::*;
pub use sort_order::*;
pub use value::*;
