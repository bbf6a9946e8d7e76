use thiserror::Error;

use crate::import::{FetchError, ImportError};

/// A fatal problem with a schema or WSDL document.
#[derive(Debug, Error)]
pub enum XsdError {
    #[error("Failed to resolve prefix {0:?} to a namespace URI")]
    NamePrefixNotResolved(String),
    #[error("Unsupported node <{0}>")]
    UnsupportedNode(String),
    #[error("<{element}> is missing the required attribute {attribute:?}")]
    MissingAttribute { element: String, attribute: String },
    #[error("<{element}> requires a <{child}> child")]
    MissingChild { element: String, child: String },
    #[error("Unsupported restriction: <{0}>")]
    MalformedRestriction(String),
    #[error("Invalid value {value:?} for attribute {attribute:?}")]
    InvalidAttributeValue { attribute: String, value: String },
    #[error("Element {element:?} has maxOccurs {max} lower than minOccurs {min}")]
    InvalidOccurs { element: String, min: u32, max: u32 },
    #[error("Message {0:?} has no parts")]
    EmptyMessage(String),
    #[error("Part {0:?}: attributes type and element are mutually exclusive")]
    ConflictingPart(String),
    #[error("Part {0:?} declares neither a type nor an element")]
    MissingPartType(String),
    #[error("Expected a <{expected}> document, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },
    #[error("schema import failed")]
    Import(#[from] ImportError),
    #[error("failed to load document")]
    Fetch(#[from] FetchError),
    #[error("document is not well-formed XML")]
    Xml(#[from] roxmltree::Error),
}

impl XsdError {
    pub(crate) fn missing_attribute(node: roxmltree::Node, attribute: &str) -> Self {
        Self::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn missing_child(node: roxmltree::Node, child: &str) -> Self {
        Self::MissingChild {
            element: node.tag_name().name().to_string(),
            child: child.to_string(),
        }
    }
}
