use roxmltree::Node;

use crate::{error::XsdError, xml::required_attribute};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDeclaration {
    pub name: String,
}

impl ServiceDeclaration {
    pub const TAG_NAME: &'static str = "service";

    pub fn map_from_xml(service: Node) -> Result<Self, XsdError> {
        Ok(Self {
            name: required_attribute(service, "name")?.to_string(),
        })
    }
}
