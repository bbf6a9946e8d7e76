use crate::{declarations::MaxOccurs, error::XsdError, xstypes::Identifier};
use roxmltree::Node;

/// Converts an attribute's lexical value into its typed value.
pub trait ActualValue<'a>: Sized {
    fn convert(src: &'a str, parent: Node) -> Result<Self, XsdError>;
}

fn invalid(parent: Node, src: &str) -> XsdError {
    // The attribute name is not known here; report the element instead.
    XsdError::InvalidAttributeValue {
        attribute: parent.tag_name().name().to_string(),
        value: src.to_string(),
    }
}

impl<'a> ActualValue<'a> for &'a str {
    fn convert(src: &'a str, _parent: Node) -> Result<Self, XsdError> {
        Ok(src)
    }
}

impl ActualValue<'_> for String {
    fn convert(src: &'_ str, _parent: Node) -> Result<Self, XsdError> {
        Ok(src.to_string())
    }
}

impl ActualValue<'_> for Identifier {
    fn convert(src: &'_ str, parent: Node) -> Result<Self, XsdError> {
        Identifier::parse(src.trim(), parent)
    }
}

impl ActualValue<'_> for bool {
    fn convert(src: &str, parent: Node) -> Result<Self, XsdError> {
        match src.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid(parent, src)),
        }
    }
}

impl ActualValue<'_> for u32 {
    fn convert(src: &str, parent: Node) -> Result<Self, XsdError> {
        src.trim().parse().map_err(|_| invalid(parent, src))
    }
}

impl ActualValue<'_> for MaxOccurs {
    fn convert(src: &str, parent: Node) -> Result<Self, XsdError> {
        match src.trim() {
            "unbounded" => Ok(MaxOccurs::Unbounded),
            count => Ok(MaxOccurs::Count(u32::convert(count, parent)?)),
        }
    }
}

/// Reads the optional attribute `name` of `node` as `T`.
pub fn attribute_value<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    name: &str,
) -> Result<Option<T>, XsdError> {
    node.attribute(name)
        .map(|value| {
            T::convert(value, node).map_err(|e| match e {
                XsdError::InvalidAttributeValue { value, .. } => XsdError::InvalidAttributeValue {
                    attribute: name.to_string(),
                    value,
                },
                other => other,
            })
        })
        .transpose()
}
