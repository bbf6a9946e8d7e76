use indexmap::IndexMap;

use crate::{
    complex::{FieldMeta, MaxOccurs},
    meta::AnyType,
    XmlNode,
};

/// The structured form of a binding handed to a dispatcher or written as XML.
#[derive(Clone, Debug, PartialEq)]
pub enum WireValue {
    Null,
    Text(String),
    List(Vec<WireValue>),
    /// Fields keyed by XML name, in content order.
    Record(IndexMap<String, WireValue>),
}

impl WireValue {
    pub fn collect<T: AnyType>(items: &[T]) -> Vec<WireValue> {
        items.iter().map(AnyType::to_wire).collect()
    }

    /// Builds a record, collapsing each single-occurrence field to a scalar (or
    /// [`WireValue::Null`] when absent) and keeping repeated fields as lists.
    pub fn record(fields: &[FieldMeta], values: Vec<Vec<WireValue>>) -> WireValue {
        let record = fields
            .iter()
            .zip(values)
            .map(|(field, mut values)| {
                let value = match field.max_occurs {
                    MaxOccurs::Bounded(1) => values.pop().unwrap_or(WireValue::Null),
                    _ => WireValue::List(values),
                };
                (field.name.to_string(), value)
            })
            .collect();
        WireValue::Record(record)
    }

    /// Captures an arbitrary element; repeated child names become lists.
    pub fn from_node(node: XmlNode) -> WireValue {
        let children = node.children().filter(|n| n.is_element()).collect::<Vec<_>>();
        if children.is_empty() {
            return WireValue::Text(crate::xml::text_content(node));
        }
        let mut record: IndexMap<String, WireValue> = IndexMap::new();
        for child in children {
            let value = WireValue::from_node(child);
            let name = child.tag_name().name().to_string();
            match record.get_mut(&name) {
                Some(WireValue::List(items)) => items.push(value),
                Some(existing) => {
                    let first = std::mem::replace(existing, WireValue::Null);
                    *existing = WireValue::List(vec![first, value]);
                }
                None => {
                    record.insert(name, value);
                }
            }
        }
        WireValue::Record(record)
    }

    pub fn as_text(&self) -> Option<&str> {
        match *self {
            Self::Text(ref text) => Some(text),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&WireValue> {
        match *self {
            Self::Record(ref record) => record.get(field),
            _ => None,
        }
    }
}
