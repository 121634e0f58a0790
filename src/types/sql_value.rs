use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// Represents a caller-supplied value in a driver-agnostic way.
/// Drivers decide which of these they can type; anything they refuse is
/// bound as a string.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    /// A value of a type the crate knows nothing about.
    Other(OpaqueValue),
}

impl SqlValue {
    /// Wraps an arbitrary displayable value.
    pub fn other<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        SqlValue::Other(OpaqueValue::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Name of the native type held, used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Text(_) => "String",
            SqlValue::Int16(_) => "i16",
            SqlValue::Int32(_) => "i32",
            SqlValue::Int64(_) => "i64",
            SqlValue::Float32(_) => "f32",
            SqlValue::Float64(_) => "f64",
            SqlValue::Bool(_) => "bool",
            SqlValue::Bytes(_) => "Vec<u8>",
            SqlValue::Other(v) => v.type_name(),
        }
    }

    /// Default string rendering of the value. `Null` has none.
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Int16(i) => Some(i.to_string()),
            SqlValue::Int32(i) => Some(i.to_string()),
            SqlValue::Int64(i) => Some(i.to_string()),
            SqlValue::Float32(f) => Some(f.to_string()),
            SqlValue::Float64(f) => Some(f.to_string()),
            SqlValue::Bool(b) => Some(b.to_string()),
            SqlValue::Bytes(b) => Some(format!("{:?}", b)),
            SqlValue::Other(v) => Some(v.to_string()),
        }
    }

    /// The value degraded to text: `Null` stays `Null`, everything else
    /// becomes `Text` of its default rendering.
    pub fn into_text(self) -> SqlValue {
        match self.to_display_string() {
            Some(s) => SqlValue::Text(s),
            None => SqlValue::Null,
        }
    }
}

/// A type-erased value that only knows how to render itself.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: &'static str,
    inner: Arc<dyn fmt::Display + Send + Sync>,
}

impl OpaqueValue {
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self {
            type_name: type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueValue({}: {})", self.type_name, self.inner)
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.to_string() == other.to_string()
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i16> for SqlValue {
    fn from(value: i16) -> Self {
        SqlValue::Int16(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float32(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float64(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self {
        SqlValue::Bytes(value.to_vec())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Builds a `Vec<SqlValue>` from a list of expressions.
///
/// ```
/// use antisqli::{params, SqlValue};
///
/// let values = params![7, "alice", None::<i32>];
/// assert_eq!(values[1], SqlValue::Text("alice".to_string()));
/// assert!(values[2].is_null());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::SqlValue>::new()
    };
    ( $( $value:expr ),+ $(,)? ) => {
        ::std::vec![ $( $crate::SqlValue::from($value) ),+ ]
    };
}
