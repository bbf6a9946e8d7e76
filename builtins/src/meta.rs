use std::{borrow::Cow, convert::Infallible, fmt};

use indexmap::IndexMap;
use thiserror::Error;

use crate::{complex::FieldMeta, native::NativeValue, wire::WireValue, XmlNode};

/// Why a value was rejected.
///
/// Complex types nest the reasons of their fields, keyed by the XML name of the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    Message(String),
    Fields(IndexMap<String, Reason>),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Message(ref message) => write!(f, "{message}"),
            Self::Fields(ref fields) => {
                for (i, (name, reason)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{name}: {reason}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("validation failed: {reason}")]
pub struct ValidationError {
    pub reason: Reason,
}

impl ValidationError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            reason: Reason::Message(message.into()),
        }
    }

    /// Wraps `inner` as the reason for the field `name`.
    pub fn field(name: impl Into<String>, inner: ValidationError) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(name.into(), inner.reason);
        Self {
            reason: Reason::Fields(fields),
        }
    }

    /// The rule message, if this error was not raised for a field.
    pub fn rule_message(&self) -> Option<&str> {
        match self.reason {
            Reason::Message(ref message) => Some(message),
            Reason::Fields(_) => None,
        }
    }

    /// The nested reason of the field `name`.
    pub fn field_reason(&self, name: &str) -> Option<&Reason> {
        match self.reason {
            Reason::Fields(ref fields) => fields.get(name),
            Reason::Message(_) => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Whitespace {
    Preserve,
    Replace,
    Collapse,
}

pub fn normalized_value(value: &str, whitespace: Whitespace) -> Cow<str> {
    match whitespace {
        Whitespace::Preserve => Cow::Borrowed(value),
        Whitespace::Replace => {
            if value.contains(['\t', '\n', '\r']) {
                Cow::Owned(value.replace(['\t', '\n', '\r'], " "))
            } else {
                Cow::Borrowed(value)
            }
        }
        Whitespace::Collapse => {
            let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed == value {
                Cow::Borrowed(value)
            } else {
                Cow::Owned(collapsed)
            }
        }
    }
}

/// The `{name, targetNamespace}` block every binding carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeMeta {
    pub name: &'static str,
    pub target_namespace: &'static str,
}

impl TypeMeta {
    pub const fn new(name: &'static str, target_namespace: &'static str) -> Self {
        Self {
            name,
            target_namespace,
        }
    }

    pub fn identifier(&self) -> String {
        format!("{{{}}}{}", self.target_namespace, self.name)
    }

    /// Whether `node` is an element carrying this name.
    ///
    /// An empty target namespace matches elements in any namespace.
    pub fn matches(&self, node: XmlNode) -> bool {
        node.is_element()
            && node.tag_name().name() == self.name
            && (self.target_namespace.is_empty()
                || node.tag_name().namespace().unwrap_or_default() == self.target_namespace)
    }
}

pub trait AnyType: Sized + Clone + fmt::Debug {
    /// The primitive value this type can be built from directly.
    type Native: Clone + fmt::Debug;

    const META: TypeMeta;

    fn from_native(native: Self::Native) -> Result<Self, ValidationError>;

    fn from_node(node: XmlNode) -> Result<Self, ValidationError>;

    fn to_wire(&self) -> WireValue;
}

pub trait SimpleType: AnyType<Native: NativeValue> {
    const WHITESPACE: Whitespace = Whitespace::Preserve;

    /// Accepted raw values mapped to their display values, in declaration order.
    const ENUMERATION: Option<&'static [(&'static str, &'static str)]> = None;

    /// Checks `value` against the restrictions of the base type first, then against its own.
    ///
    /// `lexical` is the whitespace-processed literal `value` was parsed from, or its canonical
    /// form when the value was given directly. Patterns are matched against it.
    fn validate(value: &Self::Native, lexical: &str) -> Result<(), ValidationError>;

    /// Wraps a value that already passed [`SimpleType::validate`].
    fn from_validated(value: Self::Native) -> Self;

    fn value(&self) -> &Self::Native;

    fn new(value: Self::Native) -> Result<Self, ValidationError> {
        Self::validate(&value, &value.to_wire())?;
        Ok(Self::from_validated(value))
    }

    /// Parses a lexical value, accepting either a raw enumeration key or its display value.
    fn from_literal(literal: &str) -> Result<Self, ValidationError> {
        let literal = normalized_value(literal, Self::WHITESPACE);
        let raw = Self::ENUMERATION
            .and_then(|entries| entries.iter().find(|(_, display)| *display == literal))
            .map_or(&*literal, |(key, _)| *key);
        let value = <Self::Native as NativeValue>::parse_literal(raw)?;
        Self::validate(&value, raw)?;
        Ok(Self::from_validated(value))
    }

    /// The lexical value sent over the wire; enumerated values render as their display value.
    fn wire_value(&self) -> String {
        Self::ENUMERATION
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|(key, _)| enumeration_key_matches(key, self.value()))
            })
            .map_or_else(|| self.value().to_wire(), |(_, display)| display.to_string())
    }
}

/// Whether the enumeration key `key` denotes `value`. Keys are compared as values, so `1.0`
/// matches the decimal `1`.
pub fn enumeration_key_matches<T: NativeValue>(key: &str, value: &T) -> bool {
    T::parse_literal(key).is_ok_and(|parsed| parsed == *value)
}

pub trait ComplexType: AnyType<Native = Infallible> {
    /// Field metadata in content order.
    const FIELDS: &'static [FieldMeta];
}
