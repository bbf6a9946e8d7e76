//! Reading and writing XML for bindings.

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use thiserror::Error;

use crate::{
    meta::{AnyType, ValidationError},
    wire::WireValue,
    XmlNode,
};

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("failed to write XML")]
    Io(#[from] std::io::Error),
    #[error("failed to write XML")]
    Xml(#[from] quick_xml::Error),
    #[error("written XML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum UnmarshalError {
    #[error("failed to parse XML")]
    Xml(#[from] roxmltree::Error),
    #[error("root element <{found}> does not match {expected}")]
    UnexpectedRoot { expected: String, found: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The character data of an element, ignoring comments and processing instructions.
pub fn text_content(node: XmlNode) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

pub fn is_nil(node: XmlNode) -> bool {
    matches!(
        node.attribute((XSI_NAMESPACE, "nil")),
        Some("true") | Some("1")
    )
}

/// Writes `value` as an element named after its type metadata.
pub fn to_xml<T: AnyType>(value: &T) -> Result<String, MarshalError> {
    let mut writer = Writer::new(Vec::new());
    let meta = T::META;
    let mut start = BytesStart::new(meta.name);
    if !meta.target_namespace.is_empty() {
        start.push_attribute(("xmlns", meta.target_namespace));
    }
    write_content(&mut writer, start, meta.name, &value.to_wire())?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_content(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart,
    name: &str,
    value: &WireValue,
) -> Result<(), MarshalError> {
    match *value {
        WireValue::Null => {
            writer.write_event(Event::Empty(start))?;
        }
        WireValue::Text(ref text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        WireValue::List(ref items) => {
            // Only reachable for a bare list; fields expand their lists themselves.
            writer.write_event(Event::Start(start))?;
            for item in items {
                write_content(writer, BytesStart::new("item"), "item", item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        WireValue::Record(ref fields) => {
            writer.write_event(Event::Start(start))?;
            for (field, child) in fields {
                match *child {
                    WireValue::Null => {}
                    WireValue::List(ref items) => {
                        for item in items {
                            write_content(writer, BytesStart::new(field.as_str()), field, item)?;
                        }
                    }
                    _ => write_content(writer, BytesStart::new(field.as_str()), field, child)?,
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

/// Parses `xml` and builds `T` from its root element.
pub fn from_xml<T: AnyType>(xml: &str) -> Result<T, UnmarshalError> {
    let document = roxmltree::Document::parse(xml)?;
    let root = document.root_element();
    if !T::META.matches(root) {
        return Err(UnmarshalError::UnexpectedRoot {
            expected: T::META.identifier(),
            found: root.tag_name().name().to_string(),
        });
    }
    Ok(T::from_node(root)?)
}
