use crate::collection::{Body, ObjectId};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

/// Compare two floats with a total order: NaN equals NaN and sorts after
/// every other number.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares an integer with a float exactly, without rounding the integer
/// through `f64`. NaN is greater than every integer.
fn num_cmp_int_float(a: i64, b: f64) -> Ordering {
    // 2^63, exactly representable
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() || b >= I64_BOUND {
        return Ordering::Less;
    }
    if b < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => num_cmp_float(whole, b),
        ordering => ordering,
    }
}

/// A dynamically typed field value stored in a [crate::collection::Document].
///
/// Values are totally ordered so they can key the sorted secondary indices:
///
/// * values of different kinds order by kind, in declaration order
///   (`Null < Bool < numbers < String < DateTime < ObjectId < Array < Object < Bytes`),
/// * `I64` and `F64` are one kind and compare numerically with each other,
/// * `NaN` equals `NaN` and sorts after every other number.
///
/// Equality is derived from that order, so `val!(1) == val!(1.0)`.
///
/// ```text
/// let v1: Value = 42.into();
/// let v2 = Value::from("hello");
/// let v3 = val!(true);
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed integer.
    I64(i64),
    /// Represents a floating point number.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a point in time (UTC).
    DateTime(DateTime<Utc>),
    /// Represents a document identifier.
    ObjectId(ObjectId),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a nested object.
    Object(Body),
    /// Represents binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Creates a new [Value] from anything convertible into one.
    pub fn from<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I64(_) | Value::F64(_) => 2,
            Value::String(_) => 3,
            Value::DateTime(_) => 4,
            Value::ObjectId(_) => 5,
            Value::Array(_) => 6,
            Value::Object(_) => 7,
            Value::Bytes(_) => 8,
        }
    }

    /// Returns a short name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I64(_) => "i64",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::ObjectId(_) => "objectId",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Bytes(_) => "bytes",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object_id(&self) -> bool {
        matches!(self, Value::ObjectId(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            Value::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Value::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Body> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            (Value::F64(a), Value::F64(b)) => num_cmp_float(*a, *b),
            (Value::I64(a), Value::F64(b)) => num_cmp_int_float(*a, *b),
            (Value::F64(a), Value::I64(b)) => num_cmp_int_float(*b, *a).reverse(),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::ObjectId(a), Value::ObjectId(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Object(a), Value::Object(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{:?}", v),
            Value::DateTime(v) => write!(f, "\"{}\"", v.to_rfc3339()),
            Value::ObjectId(v) => write!(f, "ObjectId(\"{}\")", v),
            Value::Array(v) => write!(f, "[{}]", v.iter().join(", ")),
            Value::Object(v) => write!(
                f,
                "{{{}}}",
                v.iter().map(|(k, v)| format!("{:?}: {}", k, v)).join(", ")
            ),
            Value::Bytes(v) => write!(f, "bytes({})", v.len()),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind_name(), self)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::I64(value as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::ObjectId(value)
    }
}

impl From<&ObjectId> for Value {
    fn from(value: &ObjectId) -> Self {
        Value::ObjectId(*value)
    }
}

impl From<Body> for Value {
    fn from(value: Body) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

/// A macro to create a `Value` from a given expression.
///
/// ```rust
/// use minimongo::common::Value;
/// use minimongo::val;
///
/// assert_eq!(val!(42), Value::I64(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
