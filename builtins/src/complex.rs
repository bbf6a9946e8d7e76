use std::fmt;

use crate::{
    meta::{AnyType, ValidationError},
    xml::is_nil,
    XmlNode,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl MaxOccurs {
    pub fn allows(&self, count: usize) -> bool {
        match *self {
            Self::Bounded(max) => count <= max as usize,
            Self::Unbounded => true,
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Bounded(max) => write!(f, "{max}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Describes one field of a complex type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldMeta {
    /// The XML name of the field.
    pub name: &'static str,
    pub min_occurs: u32,
    pub max_occurs: MaxOccurs,
    pub nillable: bool,
    pub default: Option<&'static str>,
}

impl FieldMeta {
    pub const fn new(name: &'static str, min_occurs: u32, max_occurs: MaxOccurs) -> Self {
        Self {
            name,
            min_occurs,
            max_occurs,
            nillable: false,
            default: None,
        }
    }

    pub const fn nillable(mut self) -> Self {
        self.nillable = true;
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

/// A value supplied for a field before coercion.
#[derive(Clone, Debug)]
pub enum Child<'a, 'input, T: AnyType> {
    Typed(T),
    Native(T::Native),
    Node(XmlNode<'a, 'input>),
}

/// The values supplied for one field of a complex type.
///
/// Absent fields are an empty list; a field is never stored as a single value.
#[derive(Clone, Debug)]
pub struct Children<'a, 'input, T: AnyType>(Vec<Child<'a, 'input, T>>);

impl<'a, 'input, T: AnyType> Children<'a, 'input, T> {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn native(values: impl IntoIterator<Item = T::Native>) -> Self {
        Self(values.into_iter().map(Child::Native).collect())
    }

    pub fn nodes(nodes: impl IntoIterator<Item = XmlNode<'a, 'input>>) -> Self {
        Self(nodes.into_iter().map(Child::Node).collect())
    }

    /// Collects the child elements of `parent` named like `field`.
    pub fn from_parent(parent: XmlNode<'a, 'input>, field: &FieldMeta) -> Self {
        Self::nodes(
            parent
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == field.name),
        )
    }

    pub fn push(&mut self, child: Child<'a, 'input, T>) {
        self.0.push(child);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts every value into `T`, reporting failures under the field's name.
    ///
    /// Nil elements are dropped. Only the upper occurrence bound is enforced; absent values
    /// are left to the caller.
    pub fn coerce(self, field: &FieldMeta) -> Result<Vec<T>, ValidationError> {
        let children = self
            .0
            .into_iter()
            .filter(|child| !matches!(*child, Child::Node(node) if is_nil(node)))
            .collect::<Vec<_>>();
        if !field.max_occurs.allows(children.len()) {
            let message = format!(
                "Expected at most {} values, got {}",
                field.max_occurs,
                children.len()
            );
            return Err(ValidationError::field(
                field.name,
                ValidationError::message(message),
            ));
        }
        children
            .into_iter()
            .map(|child| match child {
                Child::Typed(value) => Ok(value),
                Child::Native(native) => T::from_native(native),
                Child::Node(node) => T::from_node(node),
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ValidationError::field(field.name, e))
    }
}

impl<T: AnyType> From<T> for Children<'_, '_, T> {
    fn from(value: T) -> Self {
        Self(vec![Child::Typed(value)])
    }
}

impl<T: AnyType> From<Option<T>> for Children<'_, '_, T> {
    fn from(value: Option<T>) -> Self {
        Self(value.into_iter().map(Child::Typed).collect())
    }
}

impl<T: AnyType> From<Vec<T>> for Children<'_, '_, T> {
    fn from(values: Vec<T>) -> Self {
        Self(values.into_iter().map(Child::Typed).collect())
    }
}

impl<T: AnyType> Default for Children<'_, '_, T> {
    fn default() -> Self {
        Self::empty()
    }
}
