//! Projects a WSDL service onto message wrappers and a client facade.

use std::collections::HashMap;

use log::info;
use st_xsd::{Identifier, PartReference, WsdlDeclaration};

use crate::{
    error::GenerateError,
    ir::{Bindings, ClientDef, MessageDef, OperationDef, PartDef, PartLookup},
    naming::{self, TypeKind, UniqueNames},
    registry::TypeRegistry,
};

struct ClientBuilder<'w> {
    wsdl: &'w WsdlDeclaration,
    registry: TypeRegistry<'w>,
    messages: Vec<MessageDef>,
    message_indices: HashMap<Identifier, usize>,
    message_names: UniqueNames,
}

impl<'w> ClientBuilder<'w> {
    /// The index of the wrapper of `identifier`, generating the wrapper and its part types on
    /// first use.
    fn message(&mut self, identifier: &Identifier) -> Result<usize, GenerateError> {
        if let Some(index) = self.message_indices.get(identifier) {
            return Ok(*index);
        }
        let wsdl = self.wsdl;
        let message = wsdl
            .message(identifier)
            .ok_or_else(|| GenerateError::MessageNotFound(identifier.clone()))?;

        let mut part_names = UniqueNames::default();
        let mut parts = Vec::with_capacity(message.parts.len());
        for part in &message.parts {
            let (type_, lookup) = match part.reference {
                PartReference::Type(ref type_) => {
                    (self.registry.resolve(type_)?, PartLookup::PartName)
                }
                PartReference::Element(ref element) => {
                    (self.registry.resolve_element(element)?, PartLookup::TypeMeta)
                }
            };
            parts.push(PartDef {
                name: part_names.claim(naming::field_name(&part.name)?),
                xml_name: part.name.clone(),
                type_,
                lookup,
            });
        }

        let index = self.messages.len();
        self.messages.push(MessageDef {
            name: self
                .message_names
                .claim(naming::type_name(&message.name, TypeKind::Message)?),
            xml_name: message.name.clone(),
            parts,
        });
        self.message_indices.insert(identifier.clone(), index);
        Ok(index)
    }
}

/// Generates the types used by the operations of `wsdl`, a wrapper per message and the facade.
pub fn generate_client(wsdl: &WsdlDeclaration) -> Result<(Bindings, ClientDef), GenerateError> {
    let mut builder = ClientBuilder {
        wsdl,
        registry: TypeRegistry::new(&wsdl.types),
        messages: Vec::new(),
        message_indices: HashMap::new(),
        message_names: UniqueNames::default(),
    };

    let mut methods = UniqueNames::default();
    let mut operations = Vec::with_capacity(wsdl.port_type.operations.len());
    for operation in &wsdl.port_type.operations {
        operations.push(OperationDef {
            method: methods.claim(naming::field_name(&operation.name)?),
            action: operation.name.clone(),
            input: builder.message(&operation.input)?,
            output: builder.message(&operation.output)?,
            documentation: operation.documentation.clone(),
        });
    }

    let client = ClientDef {
        name: naming::client_name(&wsdl.service.name)?,
        source_uri: wsdl.source_uri.clone(),
        messages: builder.messages,
        operations,
    };
    let bindings = builder.registry.into_bindings();
    info!(
        "generated {} with {} operations and {} types",
        client.name,
        client.operations.len(),
        bindings.definitions().len()
    );
    Ok((bindings, client))
}
