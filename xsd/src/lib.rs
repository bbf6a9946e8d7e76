//! Declaration model and parsers for XML Schema and WSDL documents.
//!
//! Only the subset of XSD needed for SOAP bindings is modelled: simple types restricted by
//! facets, complex types made of a sequence of elements, and top-level elements.

pub mod builtins;
pub mod declarations;
pub mod error;
pub mod import;
pub mod message;
pub mod port_type;
pub mod restriction;
pub mod schema;
pub mod service;
pub mod wsdl;
pub mod xstypes;

mod values;
mod xml;

pub use declarations::{
    ComplexTypeDeclaration, Declaration, ElementDeclaration, MaxOccurs, Named,
    SimpleTypeDeclaration,
};
pub use error::XsdError;
pub use import::{FetchError, ImportError, LoadOptions, MemoryFetcher, SchemaFetcher, UriFetcher};
pub use message::{MessageDeclaration, PartDeclaration, PartReference};
pub use port_type::{OperationDeclaration, PortTypeDeclaration};
pub use restriction::{RestrictionDeclaration, RestrictionRule};
pub use schema::{load_schema, SchemaParser};
pub use service::ServiceDeclaration;
pub use wsdl::{load_wsdl, WsdlDeclaration};
pub use xstypes::Identifier;
