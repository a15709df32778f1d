//! Conversion of payload values to and from GraphML `<data>` attributes.
use core::fmt;
use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::{Symbol, Value};

/// The `<data>` attributes of one GraphML element, keyed by attribute name.
pub type Properties = BTreeMap<String, Value>;

/// Attribute name used for scalar payloads.
pub const VALUE_KEY: &str = "value";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("expected attribute {0:?}, but it is missing")]
    Missing(&'static str),

    #[error("expected exactly one attribute, found {0}")]
    MultipleValues(usize),

    #[error("expected a {expected} value, found {found:?}")]
    Type { expected: &'static str, found: Value },
}

/// Types which can be attached to GraphML elements as `<data>`.
pub trait ToGraphML {
    fn to_graphml(&self) -> Properties;
}

/// Types which can be recovered from the `<data>` of a GraphML element.
pub trait FromGraphML: Sized {
    fn from_graphml(props: Properties) -> Result<Self, DecodeError>;
}

// Scalars live under a single `value` attribute.
fn scalar(value: Value) -> Properties {
    Properties::from([(VALUE_KEY.to_string(), value)])
}

fn single(mut props: Properties) -> Result<Value, DecodeError> {
    match props.len() {
        0 => Err(DecodeError::Missing(VALUE_KEY)),
        1 => props.remove(VALUE_KEY).ok_or(DecodeError::Missing(VALUE_KEY)),
        n => Err(DecodeError::MultipleValues(n)),
    }
}

impl ToGraphML for () {
    fn to_graphml(&self) -> Properties {
        Properties::new()
    }
}

impl FromGraphML for () {
    fn from_graphml(_props: Properties) -> Result<Self, DecodeError> {
        Ok(())
    }
}

impl ToGraphML for Properties {
    fn to_graphml(&self) -> Properties {
        self.clone()
    }
}

impl FromGraphML for Properties {
    fn from_graphml(props: Properties) -> Result<Self, DecodeError> {
        Ok(props)
    }
}

/// Marks a `Some` whose contents would otherwise encode to nothing, e.g. `Some(())`.
///
/// The value counts nested options, so `Some(None)` and `Some(Some(()))` stay distinct. The
/// attribute name is reserved in payloads of option type.
pub const PRESENT_KEY: &str = "present";

/// `None` is the empty map. `Some(x)` is the encoding of `x`, plus a [`PRESENT_KEY`] count when
/// that encoding is empty or already carries one.
impl<T: ToGraphML> ToGraphML for Option<T> {
    fn to_graphml(&self) -> Properties {
        let Some(x) = self else {
            return Properties::new();
        };
        let mut props = x.to_graphml();
        let depth = match props.get(PRESENT_KEY) {
            Some(Value::Int(n)) => Some(n + 1),
            Some(_) => None,
            None if props.is_empty() => Some(1),
            None => None,
        };
        if let Some(n) = depth {
            props.insert(PRESENT_KEY.to_string(), Value::Int(n));
        }
        props
    }
}

impl<T: FromGraphML> FromGraphML for Option<T> {
    fn from_graphml(mut props: Properties) -> Result<Self, DecodeError> {
        if props.is_empty() {
            return Ok(None);
        }
        match props.remove(PRESENT_KEY) {
            None => {}
            Some(Value::Int(n)) if n > 1 => {
                props.insert(PRESENT_KEY.to_string(), Value::Int(n - 1));
            }
            Some(Value::Int(1)) => {}
            Some(found) => {
                return Err(DecodeError::Type {
                    expected: "presence count",
                    found,
                })
            }
        }
        T::from_graphml(props).map(Some)
    }
}

impl ToGraphML for Value {
    fn to_graphml(&self) -> Properties {
        scalar(self.clone())
    }
}

/// Symbols come back as [`Value::String`]: GraphML has no symbol type.
impl FromGraphML for Value {
    fn from_graphml(props: Properties) -> Result<Self, DecodeError> {
        single(props)
    }
}

macro_rules! scalar_codec {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl ToGraphML for $ty {
            fn to_graphml(&self) -> Properties {
                scalar(Value::$variant(self.clone()))
            }
        }

        impl FromGraphML for $ty {
            fn from_graphml(props: Properties) -> Result<Self, DecodeError> {
                match single(props)? {
                    Value::$variant(x) => Ok(x),
                    found => Err(DecodeError::Type {
                        expected: $name,
                        found,
                    }),
                }
            }
        }
    };
}

scalar_codec!(bool, Bool, "boolean");
scalar_codec!(i64, Int, "integer");
scalar_codec!(f64, Float, "double");
scalar_codec!(String, String, "string");

impl ToGraphML for Symbol {
    fn to_graphml(&self) -> Properties {
        scalar(Value::Symbol(self.clone()))
    }
}

impl FromGraphML for Symbol {
    fn from_graphml(props: Properties) -> Result<Self, DecodeError> {
        match single(props)? {
            Value::String(s) => Ok(Symbol(s)),
            Value::Symbol(s) => Ok(s),
            found => Err(DecodeError::Type {
                expected: "symbol",
                found,
            }),
        }
    }
}

/// The `attr.type` of a GraphML key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl AttrType {
    /// The type a key is declared with when `value` is the first value seen for it.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => AttrType::Boolean,
            Value::Int(_) => AttrType::Long,
            Value::Float(_) => AttrType::Double,
            Value::String(_) | Value::Symbol(_) => AttrType::String,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(AttrType::Boolean),
            "int" => Some(AttrType::Int),
            "long" => Some(AttrType::Long),
            "float" => Some(AttrType::Float),
            "double" => Some(AttrType::Double),
            "string" => Some(AttrType::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::Boolean => "boolean",
            AttrType::Int => "int",
            AttrType::Long => "long",
            AttrType::Float => "float",
            AttrType::Double => "double",
            AttrType::String => "string",
        }
    }

    /// Whether values of this runtime type may be stored under a key of type `self`.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (AttrType::Boolean, Value::Bool(_))
                | (AttrType::Int | AttrType::Long, Value::Int(_))
                | (AttrType::Float | AttrType::Double, Value::Float(_))
                | (AttrType::String, Value::String(_) | Value::Symbol(_))
        )
    }

    /// Parse the text content of a `<data>` or `<default>` element.
    pub fn parse_value(&self, text: &str) -> Option<Value> {
        match self {
            AttrType::Boolean => match text.trim() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            AttrType::Int | AttrType::Long => text.trim().parse().ok().map(Value::Int),
            AttrType::Float | AttrType::Double => text.trim().parse().ok().map(Value::Float),
            AttrType::String => Some(Value::String(text.to_string())),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text content of a `<data>` element holding `value`.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(x) => x.to_string(),
        Value::String(s) => s.clone(),
        Value::Symbol(s) => s.0.clone(),
    }
}

/// The GraphML element kind a key applies to (its `for` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyScope {
    Graph,
    Node,
    Edge,
    Port,
    All,
}

impl KeyScope {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "graph" => Some(KeyScope::Graph),
            "node" => Some(KeyScope::Node),
            "edge" => Some(KeyScope::Edge),
            "port" => Some(KeyScope::Port),
            "all" => Some(KeyScope::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyScope::Graph => "graph",
            KeyScope::Node => "node",
            KeyScope::Edge => "edge",
            KeyScope::Port => "port",
            KeyScope::All => "all",
        }
    }

    /// Whether a key declared for `self` applies to elements of kind `other`.
    pub fn covers(&self, other: KeyScope) -> bool {
        *self == KeyScope::All || *self == other
    }
}

/// A `<key>` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub id: String,
    pub name: String,
    pub ty: AttrType,
    pub scope: KeyScope,
    pub default: Option<Value>,
}
