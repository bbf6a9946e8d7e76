//! Target-independent description of the code to generate.
//!
//! Definitions are stored in dependency order: a definition only refers to builtins and to
//! definitions before it.

use st_xsd::{MaxOccurs, RestrictionRule};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeHandle(pub(crate) usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A built-in type, by its local name in the XSD namespace.
    Builtin(&'static str),
    Generated(TypeHandle),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Name of the generated type.
    pub name: String,
    pub xml_name: String,
    pub target_namespace: Option<String>,
    pub kind: DefinitionKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DefinitionKind {
    Simple {
        base: TypeRef,
        rules: Vec<RestrictionRule>,
    },
    Complex {
        fields: Vec<FieldDef>,
    },
    /// An element wrapping a type under its own name.
    Element {
        type_: TypeRef,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub xml_name: String,
    pub type_: TypeRef,
    pub min_occurs: u32,
    pub max_occurs: MaxOccurs,
    pub nillable: bool,
    pub default: Option<String>,
}

impl FieldDef {
    pub fn is_single(&self) -> bool {
        self.max_occurs == MaxOccurs::Count(1)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    pub(crate) definitions: Vec<Definition>,
}

impl Bindings {
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn get(&self, handle: TypeHandle) -> &Definition {
        &self.definitions[handle.0]
    }

    pub fn find(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

/// How the value of a part is located in a response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartLookup {
    /// By the name and namespace of the part's type.
    TypeMeta,
    /// By the name of the part, in any namespace.
    PartName,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartDef {
    pub name: String,
    pub xml_name: String,
    pub type_: TypeRef,
    pub lookup: PartLookup,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageDef {
    pub name: String,
    pub xml_name: String,
    pub parts: Vec<PartDef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OperationDef {
    /// Name of the facade method.
    pub method: String,
    /// Name of the operation passed to the dispatcher.
    pub action: String,
    /// Index into [`ClientDef::messages`].
    pub input: usize,
    pub output: usize,
    pub documentation: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientDef {
    pub name: String,
    pub source_uri: String,
    pub messages: Vec<MessageDef>,
    pub operations: Vec<OperationDef>,
}
