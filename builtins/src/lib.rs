//! Runtime support for generated bindings: the built-in types, restriction checks, XML
//! marshalling and the client facade plumbing.

pub mod client;
pub mod complex;
pub mod duration;
pub mod meta;
pub mod native;
pub mod restriction;
pub mod wire;
pub mod xml;
pub mod xs;

pub use roxmltree;

pub type XmlNode<'a, 'input> = roxmltree::Node<'a, 'input>;

/// Everything generated code refers to.
pub mod prelude {
    pub use crate::client::{
        decode_part, message_arguments, ActionDispatcher, ClientError, Message, SoapClient,
    };
    pub use crate::complex::{Children, FieldMeta, MaxOccurs};
    pub use crate::meta::{AnyType, ComplexType, SimpleType, TypeMeta, ValidationError, Whitespace};
    pub use crate::native::NativeValue;
    pub use crate::restriction::{check_all, Rule};
    pub use crate::wire::WireValue;
    pub use crate::xml::text_content;
    pub use crate::xs;
    pub use crate::XmlNode;
}
