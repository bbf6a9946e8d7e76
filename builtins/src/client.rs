//! Support for generated SOAP client facades.
//!
//! The SOAP envelope and transport are provided by an [`ActionDispatcher`]; this module only
//! hands it structured arguments and decodes the raw response.

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    meta::{AnyType, TypeMeta, ValidationError},
    wire::WireValue,
    XmlNode,
};

#[derive(Debug, Error)]
#[error("failed to dispatch action {action:?}")]
pub struct DispatchError {
    pub action: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl DispatchError {
    pub fn new(
        action: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            action: action.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("the response is not well-formed XML")]
    Xml(#[from] roxmltree::Error),
    #[error("the response has no part {0:?}")]
    MissingPart(String),
    #[error("the response failed validation")]
    Validation(#[from] ValidationError),
}

/// Invokes a named operation and returns the raw XML response.
pub trait ActionDispatcher {
    fn invoke(&self, action: &str, arguments: WireValue) -> Result<String, DispatchError>;
}

impl<D: ActionDispatcher + ?Sized> ActionDispatcher for &D {
    fn invoke(&self, action: &str, arguments: WireValue) -> Result<String, DispatchError> {
        (**self).invoke(action, arguments)
    }
}

/// A WSDL message wrapper.
pub trait Message: Sized {
    const NAME: &'static str;

    fn request_arguments(&self) -> WireValue;

    fn from_response(root: XmlNode) -> Result<Self, ClientError>;
}

pub struct SoapClient<D> {
    dispatcher: D,
}

impl<D: ActionDispatcher> SoapClient<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn execute_action<I: Message, O: Message>(
        &self,
        action: &str,
        input: &I,
    ) -> Result<O, ClientError> {
        log::debug!("executing {action} with message {}", I::NAME);
        let response = self.dispatcher.invoke(action, input.request_arguments())?;
        let document = roxmltree::Document::parse(&response)?;
        O::from_response(document.root_element())
    }
}

/// The arguments of a message: a single part is passed as-is, several as a record.
pub fn message_arguments(parts: Vec<(&'static str, WireValue)>) -> WireValue {
    if parts.len() == 1 {
        if let Some((_, value)) = parts.into_iter().next() {
            return value;
        }
        return WireValue::Null;
    }
    WireValue::Record(
        parts
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect::<IndexMap<_, _>>(),
    )
}

/// Finds the first element matching `part` anywhere in the response and decodes it.
pub fn decode_part<T: AnyType>(root: XmlNode, part: &TypeMeta) -> Result<T, ClientError> {
    let node = root
        .descendants()
        .find(|n| part.matches(*n))
        .ok_or_else(|| ClientError::MissingPart(part.name.to_string()))?;
    Ok(T::from_node(node)?)
}
