use std::{
    fmt,
    hash::{Hash, Hasher},
};

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// A literal value carried by a [`Literal`](crate::ast::Literal) operand.
///
/// The model does not interpret values; it only needs to know which kind of
/// value it holds so the unparser can decide whether to quote it. Parsing,
/// conversion and comparison belong to the [`TypeSystem`](crate::types::TypeSystem).
///
/// # Examples
///
/// ```
/// use aqm::Value;
///
/// let name = Value::Name("jcr:content".to_string());
/// let count = Value::Long(42);
///
/// assert!(name.is_string_like());
/// assert!(!count.is_string_like());
/// assert_eq!(count.kind().name(), "LONG");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// UTF-8 string
    String(String),

    /// Signed 64-bit integer
    Long(i64),

    /// Double-precision floating point number
    Double(f64),

    /// Exact decimal number
    Decimal(Decimal),

    /// Boolean (true/false)
    Boolean(bool),

    /// Qualified node or property name, e.g. `jcr:primaryType`
    Name(String),

    /// Absolute or relative path in the content tree
    Path(String),

    /// Identifier of a referenced node
    Reference(String),

    /// URI
    Uri(String),
}

/// The kind of a [`Value`], named the way the type system names its types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    String,
    Long,
    Double,
    Decimal,
    Boolean,
    Name,
    Path,
    Reference,
    Uri,
}

impl ValueKind {
    /// All kinds, in registration order.
    pub const ALL: [ValueKind; 9] = [
        ValueKind::String,
        ValueKind::Long,
        ValueKind::Double,
        ValueKind::Decimal,
        ValueKind::Boolean,
        ValueKind::Name,
        ValueKind::Path,
        ValueKind::Reference,
        ValueKind::Uri,
    ];

    /// Upper-case type name, e.g. `"DECIMAL"`.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "STRING",
            ValueKind::Long => "LONG",
            ValueKind::Double => "DOUBLE",
            ValueKind::Decimal => "DECIMAL",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::Name => "NAME",
            ValueKind::Path => "PATH",
            ValueKind::Reference => "REFERENCE",
            ValueKind::Uri => "URI",
        }
    }

    /// Look a kind up by its type name, ignoring case.
    pub fn for_name(name: &str) -> Option<ValueKind> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            ValueKind::String
                | ValueKind::Name
                | ValueKind::Path
                | ValueKind::Reference
                | ValueKind::Uri
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Long(_) => ValueKind::Long,
            Value::Double(_) => ValueKind::Double,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Name(_) => ValueKind::Name,
            Value::Path(_) => ValueKind::Path,
            Value::Reference(_) => ValueKind::Reference,
            Value::Uri(_) => ValueKind::Uri,
        }
    }

    /// Whether the value renders as quoted text (string, name, path, reference, URI).
    pub fn is_string_like(&self) -> bool {
        self.kind().is_string_like()
    }

    /// Get as float
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Long(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            Value::Double(n) => Some(n.round() as i64),
            Value::Decimal(d) => d.round().to_i64(),
            _ => None,
        }
    }

    /// Borrow the text of a string-like value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s)
            | Value::Name(s)
            | Value::Path(s)
            | Value::Reference(s)
            | Value::Uri(s) => Some(s),
            _ => None,
        }
    }

    /// Plain string form, without quoting.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s)
            | Value::Name(s)
            | Value::Path(s)
            | Value::Reference(s)
            | Value::Uri(s) => s.clone(),
            Value::Long(n) => n.to_string(),
            Value::Double(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

// Doubles compare by bit pattern so that equal values hash equally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b))
            | (Value::Name(a), Value::Name(b))
            | (Value::Path(a), Value::Path(b))
            | (Value::Reference(a), Value::Reference(b))
            | (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::String(s)
            | Value::Name(s)
            | Value::Path(s)
            | Value::Reference(s)
            | Value::Uri(s) => s.hash(state),
            Value::Long(n) => n.hash(state),
            Value::Double(n) => n.to_bits().hash(state),
            Value::Decimal(d) => d.hash(state),
            Value::Boolean(b) => b.hash(state),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}
