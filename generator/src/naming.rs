//! Names of generated items, derived from XML names.

use std::collections::HashSet;

use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::error::GenerateError;

/// Methods every generated type or client already has.
const RESERVED_METHODS: &[&str] = &["new", "dispatcher"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    SimpleType,
    ComplexType,
    Element,
    Message,
}

impl TypeKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::SimpleType => "SimpleType",
            Self::ComplexType => "ComplexType",
            Self::Element => "Element",
            Self::Message => "Message",
        }
    }
}

/// Replaces everything but ASCII letters and digits by word separators.
fn words(name: &str) -> Result<String, GenerateError> {
    let cleaned = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    if cleaned.chars().all(|c| c == '_') {
        return Err(GenerateError::InvalidName(name.to_string()));
    }
    Ok(cleaned)
}

fn leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

pub fn type_name(name: &str, kind: TypeKind) -> Result<String, GenerateError> {
    let name = words(name)?.to_upper_camel_case();
    Ok(leading_digit(name + kind.suffix()))
}

pub fn field_name(name: &str) -> Result<String, GenerateError> {
    let name = leading_digit(words(name)?.to_snake_case());
    if RESERVED_METHODS.contains(&name.as_str()) {
        Ok(name + "_")
    } else {
        Ok(name)
    }
}

pub fn client_name(service: &str) -> Result<String, GenerateError> {
    Ok(leading_digit(words(service)?.to_upper_camel_case() + "Client"))
}

/// Hands out names, numbering repeated ones.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn claim(&mut self, name: String) -> String {
        if self.taken.insert(name.clone()) {
            return name;
        }
        let unique = (2..)
            .map(|n| format!("{name}{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or(name);
        self.taken.insert(unique.clone());
        unique
    }
}
