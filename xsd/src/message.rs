use roxmltree::Node;

use crate::{
    builtins::WSDL_NAMESPACE,
    declarations::Named,
    error::XsdError,
    values::attribute_value,
    xml::{self, required_attribute},
    xstypes::Identifier,
};

/// What a part refers to: a type, or an element of the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartReference {
    Type(Identifier),
    Element(Identifier),
}

impl PartReference {
    pub fn identifier(&self) -> &Identifier {
        match self {
            Self::Type(identifier) | Self::Element(identifier) => identifier,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartDeclaration {
    pub name: String,
    pub reference: PartReference,
}

impl PartDeclaration {
    /// `type_` and `element` are mutually exclusive, and one of them is required.
    pub fn new(
        name: impl Into<String>,
        type_: Option<Identifier>,
        element: Option<Identifier>,
    ) -> Result<Self, XsdError> {
        let name = name.into();
        let reference = match (type_, element) {
            (Some(_), Some(_)) => return Err(XsdError::ConflictingPart(name)),
            (Some(type_), None) => PartReference::Type(type_),
            (None, Some(element)) => PartReference::Element(element),
            (None, None) => return Err(XsdError::MissingPartType(name)),
        };
        Ok(Self { name, reference })
    }

    pub fn map_from_xml(part: Node) -> Result<Self, XsdError> {
        Self::new(
            required_attribute(part, "name")?,
            attribute_value(part, "type")?,
            attribute_value(part, "element")?,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDeclaration {
    pub name: String,
    pub target_namespace: Option<String>,
    pub parts: Vec<PartDeclaration>,
}

impl MessageDeclaration {
    pub const TAG_NAME: &'static str = "message";

    pub fn new(
        name: impl Into<String>,
        target_namespace: Option<String>,
        parts: Vec<PartDeclaration>,
    ) -> Result<Self, XsdError> {
        let name = name.into();
        if parts.is_empty() {
            return Err(XsdError::EmptyMessage(name));
        }
        Ok(Self {
            name,
            target_namespace,
            parts,
        })
    }

    pub fn map_from_xml(message: Node, target_namespace: Option<&str>) -> Result<Self, XsdError> {
        let parts = xml::findall(message, WSDL_NAMESPACE, "part")
            .map(PartDeclaration::map_from_xml)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(
            required_attribute(message, "name")?,
            target_namespace.map(str::to_string),
            parts,
        )
    }
}

impl Named for MessageDeclaration {
    fn name(&self) -> &str {
        &self.name
    }

    fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }
}
