use crate::common::Value;
use crate::filter::Filter;

/// Starts a filter clause on the given field.
///
/// ```rust,ignore
/// let filter = field("author").eq("Mike");
/// ```
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for a clause on a specific field.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Creates a filter matching documents whose field equals `value`.
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::default().with_clause(&self.field_name, value)
    }
}
