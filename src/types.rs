//! Pluggable value-type registry.
//!
//! The query model only consumes this boundary: the unparser asks it for the
//! display form of literal values, and the CLI decoder asks it to parse typed
//! literals. Comparison and conversion are provided for execution layers that
//! evaluate constraints; nothing in the model itself compares values.
//!
//! [`StandardTypeSystem`] registers one factory per [`ValueKind`]. Callers can
//! register their own factories to override how a type is parsed or displayed.

use std::{
    cmp::Ordering,
    collections::HashMap,
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::{
    error::TypeError,
    value::{Value, ValueKind},
};

static URI_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("URI scheme pattern is valid")
});

/// Parses, converts, compares and displays values of one type.
pub trait TypeFactory: Send + Sync {
    /// Upper-case name of the type this factory produces.
    fn type_name(&self) -> &'static str;

    /// Parse text into a value of this type.
    fn parse(&self, text: &str) -> Result<Value, TypeError>;

    /// Convert an arbitrary value into this type.
    fn convert(&self, value: &Value) -> Result<Value, TypeError>;

    /// Order two values of this type.
    fn compare(&self, left: &Value, right: &Value) -> Ordering;

    /// Render a value as display text (never quoted).
    fn display(&self, value: &Value) -> String;
}

/// A registry of [`TypeFactory`] instances keyed by type name.
pub trait TypeSystem: Send + Sync {
    /// Look up the factory for a type name, ignoring case.
    fn factory(&self, type_name: &str) -> Option<&dyn TypeFactory>;

    /// Names of every registered type.
    fn type_names(&self) -> Vec<&'static str>;

    /// Display text for a value, using the factory registered for its kind.
    fn display(&self, value: &Value) -> String {
        match self.factory(value.kind().name()) {
            Some(factory) => factory.display(value),
            None => value.as_string(),
        }
    }

    /// Parse text as the named type.
    fn parse(&self, type_name: &str, text: &str) -> Result<Value, TypeError> {
        self.factory(type_name)
            .ok_or_else(|| TypeError::UnknownType(type_name.to_string()))?
            .parse(text)
    }

    /// Compare two values, converting the right-hand value to the left-hand type first.
    ///
    /// Values that cannot be brought to a common type order by kind.
    fn compare(&self, left: &Value, right: &Value) -> Ordering {
        let Some(factory) = self.factory(left.kind().name()) else {
            return left.kind().cmp(&right.kind());
        };
        match factory.convert(right) {
            Ok(converted) => factory.compare(left, &converted),
            Err(_) => left.kind().cmp(&right.kind()),
        }
    }
}

/// The factory used for every built-in [`ValueKind`].
#[derive(Debug, Clone, Copy)]
pub struct StandardFactory {
    kind: ValueKind,
}

impl StandardFactory {
    pub fn new(kind: ValueKind) -> Self {
        StandardFactory { kind }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    fn invalid(&self, text: &str) -> TypeError {
        TypeError::InvalidValue {
            type_name: self.kind.name(),
            value: text.to_string(),
        }
    }

    fn incompatible(&self, value: &Value) -> TypeError {
        TypeError::Incompatible {
            from: value.kind().name(),
            to: self.kind.name(),
        }
    }

    fn text(&self, text: String) -> Value {
        match self.kind {
            ValueKind::Name => Value::Name(text),
            ValueKind::Path => Value::Path(text),
            ValueKind::Reference => Value::Reference(text),
            ValueKind::Uri => Value::Uri(text),
            _ => Value::String(text),
        }
    }
}

impl TypeFactory for StandardFactory {
    fn type_name(&self) -> &'static str {
        self.kind.name()
    }

    fn parse(&self, text: &str) -> Result<Value, TypeError> {
        let trimmed = text.trim();
        match self.kind {
            ValueKind::Long => trimmed
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|_| self.invalid(text)),
            ValueKind::Double => trimmed
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| self.invalid(text)),
            ValueKind::Decimal => Decimal::from_str(trimmed)
                .map(Value::Decimal)
                .map_err(|_| self.invalid(text)),
            ValueKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(self.invalid(text)),
            },
            ValueKind::Uri if !URI_SCHEME.is_match(trimmed) => Err(self.invalid(text)),
            ValueKind::Name | ValueKind::Path | ValueKind::Reference if trimmed.is_empty() => {
                Err(self.invalid(text))
            }
            _ => Ok(self.text(text.to_string())),
        }
    }

    fn convert(&self, value: &Value) -> Result<Value, TypeError> {
        if value.kind() == self.kind {
            return Ok(value.clone());
        }
        if let Some(text) = value.as_str() {
            return self.parse(text);
        }
        match self.kind {
            ValueKind::Long => value.as_long().map(Value::Long),
            ValueKind::Double => value.as_double().map(Value::Double),
            ValueKind::Decimal => match value {
                Value::Long(n) => Some(Value::Decimal(Decimal::from(*n))),
                Value::Double(n) => Decimal::from_f64(*n).map(Value::Decimal),
                _ => None,
            },
            ValueKind::Boolean => None,
            _ => Some(self.text(value.as_string())),
        }
        .ok_or_else(|| self.incompatible(value))
    }

    fn compare(&self, left: &Value, right: &Value) -> Ordering {
        match (left, right) {
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => match (left.as_str(), right.as_str()) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => left.kind().cmp(&right.kind()),
            },
        }
    }

    fn display(&self, value: &Value) -> String {
        value.as_string()
    }
}

/// The default registry: one [`StandardFactory`] per [`ValueKind`].
pub struct StandardTypeSystem {
    factories: HashMap<&'static str, Box<dyn TypeFactory>>,
}

impl Default for StandardTypeSystem {
    fn default() -> Self {
        let mut factories: HashMap<&'static str, Box<dyn TypeFactory>> = HashMap::new();
        for kind in ValueKind::ALL {
            factories.insert(kind.name(), Box::new(StandardFactory::new(kind)));
        }
        StandardTypeSystem { factories }
    }
}

impl StandardTypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for its type name.
    pub fn register(&mut self, factory: Box<dyn TypeFactory>) {
        self.factories.insert(factory.type_name(), factory);
    }
}

impl TypeSystem for StandardTypeSystem {
    fn factory(&self, type_name: &str) -> Option<&dyn TypeFactory> {
        let key = ValueKind::for_name(type_name)
            .map(ValueKind::name)
            .unwrap_or(type_name);
        self.factories
            .get(key)
            .or_else(|| {
                self.factories
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
                    .map(|(_, factory)| factory)
            })
            .map(|factory| &**factory)
    }

    fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Shared default registry used when no other type system is supplied.
pub fn standard() -> &'static StandardTypeSystem {
    static STANDARD: LazyLock<StandardTypeSystem> = LazyLock::new(StandardTypeSystem::default);
    &STANDARD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_text() {
        let types = StandardTypeSystem::new();
        assert_eq!(types.parse("long", " 42 ").unwrap(), Value::Long(42));
        assert_eq!(
            types.parse("DECIMAL", "1.50").unwrap(),
            Value::Decimal(Decimal::from_str("1.50").unwrap())
        );
        assert_eq!(
            types.parse("Path", "/a/b").unwrap(),
            Value::Path("/a/b".to_string())
        );
        assert!(matches!(
            types.parse("LONG", "x"),
            Err(TypeError::InvalidValue { type_name: "LONG", .. })
        ));
        assert!(matches!(types.parse("DATE", "x"), Err(TypeError::UnknownType(_))));
        assert!(types.parse("URI", "no scheme").is_err());
        assert!(types.parse("URI", "http://example.com").is_ok());
    }

    #[test]
    fn compares_across_kinds_by_converting_right_operand() {
        let types = StandardTypeSystem::new();
        assert_eq!(
            types.compare(&Value::Long(3), &Value::String("10".to_string())),
            Ordering::Less
        );
        assert_eq!(
            types.compare(&Value::Double(2.5), &Value::Long(2)),
            Ordering::Greater
        );
        // Boolean cannot absorb a long, so kinds decide.
        assert_eq!(
            types.compare(&Value::Boolean(true), &Value::Long(1)),
            ValueKind::Boolean.cmp(&ValueKind::Long)
        );
    }

    #[test]
    fn registered_factory_replaces_default() {
        struct Shouting;
        impl TypeFactory for Shouting {
            fn type_name(&self) -> &'static str {
                "STRING"
            }
            fn parse(&self, text: &str) -> Result<Value, TypeError> {
                Ok(Value::String(text.to_string()))
            }
            fn convert(&self, value: &Value) -> Result<Value, TypeError> {
                Ok(Value::String(value.as_string()))
            }
            fn compare(&self, left: &Value, right: &Value) -> Ordering {
                left.as_string().cmp(&right.as_string())
            }
            fn display(&self, value: &Value) -> String {
                value.as_string().to_uppercase()
            }
        }

        let mut types = StandardTypeSystem::new();
        types.register(Box::new(Shouting));
        assert_eq!(types.display(&Value::from("hi")), "HI");
        assert_eq!(types.display(&Value::Long(7)), "7");
    }
}
