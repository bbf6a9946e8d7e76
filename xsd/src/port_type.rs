use roxmltree::Node;

use crate::{
    builtins::WSDL_NAMESPACE,
    error::XsdError,
    values::attribute_value,
    xml::{self, required_attribute},
    xstypes::Identifier,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationDeclaration {
    pub name: String,
    /// The identifier of the input message.
    pub input: Identifier,
    pub output: Identifier,
    pub documentation: Option<String>,
}

impl OperationDeclaration {
    pub fn map_from_xml(operation: Node) -> Result<Self, XsdError> {
        let message = |tag: &str| -> Result<Identifier, XsdError> {
            let node = xml::find(operation, WSDL_NAMESPACE, tag)
                .ok_or_else(|| XsdError::missing_child(operation, tag))?;
            attribute_value(node, "message")?.ok_or_else(|| XsdError::missing_attribute(node, "message"))
        };
        let documentation = xml::find(operation, WSDL_NAMESPACE, "documentation")
            .and_then(|node| node.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: required_attribute(operation, "name")?.to_string(),
            input: message("input")?,
            output: message("output")?,
            documentation,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortTypeDeclaration {
    pub operations: Vec<OperationDeclaration>,
}

impl PortTypeDeclaration {
    pub const TAG_NAME: &'static str = "portType";

    pub fn map_from_xml(port_type: Node) -> Result<Self, XsdError> {
        Ok(Self {
            operations: xml::findall(port_type, WSDL_NAMESPACE, "operation")
                .map(OperationDeclaration::map_from_xml)
                .collect::<Result<_, _>>()?,
        })
    }
}
