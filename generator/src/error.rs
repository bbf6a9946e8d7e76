use std::{io, path::PathBuf};

use st_xsd::{Identifier, XsdError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Type {0} not found")]
    TypeNotFound(Identifier),
    #[error("Message {0} not found")]
    MessageNotFound(Identifier),
    #[error("Type {0} refers to itself, recursive types are not supported")]
    RecursiveType(Identifier),
    #[error("Simple type {identifier} is based on complex type {base}")]
    ComplexBase {
        identifier: Identifier,
        base: Identifier,
    },
    #[error("{0:?} cannot be turned into an identifier")]
    InvalidName(String),
    #[error(transparent)]
    Xsd(#[from] XsdError),
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
