//! Parsed schema facts, before any code is generated.

use std::fmt;

use crate::{error::XsdError, restriction::RestrictionDeclaration, xstypes::Identifier};

/// Anything addressable by `{namespace}name`.
pub trait Named {
    fn name(&self) -> &str;
    fn target_namespace(&self) -> Option<&str>;

    fn identifier(&self) -> Identifier {
        Identifier::with_optional_namespace(self.target_namespace(), self.name())
    }
}

macro_rules! impl_named {
    ($($t:ty),*) => {
        $(
            impl Named for $t {
                fn name(&self) -> &str {
                    &self.name
                }

                fn target_namespace(&self) -> Option<&str> {
                    self.target_namespace.as_deref()
                }
            }
        )*
    };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MaxOccurs {
    Count(u32),
    Unbounded,
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimpleTypeDeclaration {
    pub name: String,
    pub target_namespace: Option<String>,
    pub restriction: RestrictionDeclaration,
}

/// A struct-like type; the order of `elements` is the serialization order.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexTypeDeclaration {
    pub name: String,
    pub target_namespace: Option<String>,
    pub elements: Vec<ElementDeclaration>,
}

/// A top-level element, or a field of a complex type.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDeclaration {
    pub name: String,
    pub target_namespace: Option<String>,
    pub type_: Option<Identifier>,
    pub default: Option<String>,
    pub min_occurs: u32,
    pub max_occurs: MaxOccurs,
    pub nillable: bool,
}

impl ElementDeclaration {
    pub fn new(
        name: impl Into<String>,
        target_namespace: Option<String>,
        type_: Option<Identifier>,
    ) -> Self {
        Self {
            name: name.into(),
            target_namespace,
            type_,
            default: None,
            min_occurs: 1,
            max_occurs: MaxOccurs::Count(1),
            nillable: false,
        }
    }

    /// Sets the occurrence bounds, rejecting a maximum below the minimum.
    pub fn with_occurs(mut self, min_occurs: u32, max_occurs: MaxOccurs) -> Result<Self, XsdError> {
        if let MaxOccurs::Count(max) = max_occurs {
            if max < min_occurs {
                return Err(XsdError::InvalidOccurs {
                    element: self.name,
                    min: min_occurs,
                    max,
                });
            }
        }
        self.min_occurs = min_occurs;
        self.max_occurs = max_occurs;
        Ok(self)
    }

    pub fn is_optional(&self) -> bool {
        self.min_occurs == 0
    }

    pub fn is_repeated(&self) -> bool {
        self.max_occurs != MaxOccurs::Count(1)
    }
}

impl_named!(SimpleTypeDeclaration, ComplexTypeDeclaration, ElementDeclaration);

/// A top-level declaration produced by the schema parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    SimpleType(SimpleTypeDeclaration),
    ComplexType(ComplexTypeDeclaration),
    Element(ElementDeclaration),
}

impl Declaration {
    pub fn is_type(&self) -> bool {
        !matches!(self, Self::Element(_))
    }
}

impl Named for Declaration {
    fn name(&self) -> &str {
        match self {
            Self::SimpleType(d) => d.name(),
            Self::ComplexType(d) => d.name(),
            Self::Element(d) => d.name(),
        }
    }

    fn target_namespace(&self) -> Option<&str> {
        match self {
            Self::SimpleType(d) => d.target_namespace(),
            Self::ComplexType(d) => d.target_namespace(),
            Self::Element(d) => d.target_namespace(),
        }
    }
}
