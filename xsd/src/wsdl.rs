//! The root aggregate of a WSDL document.

use roxmltree::Node;

use crate::{
    builtins::{WSDL_NAMESPACE, XS_NAMESPACE},
    declarations::{Declaration, Named},
    error::XsdError,
    import::{LoadOptions, SchemaFetcher},
    message::MessageDeclaration,
    port_type::PortTypeDeclaration,
    schema::{self, SchemaParser},
    service::ServiceDeclaration,
    xml,
    xstypes::Identifier,
};

pub const TAG_NAME: &str = "definitions";

#[derive(Clone, Debug, PartialEq)]
pub struct WsdlDeclaration {
    pub source_uri: String,
    pub target_namespace: Option<String>,
    pub types: Vec<Declaration>,
    pub port_type: PortTypeDeclaration,
    pub messages: Vec<MessageDeclaration>,
    pub service: ServiceDeclaration,
}

impl WsdlDeclaration {
    /// Builds the aggregate from a `wsdl:definitions` element. Schemas in `types` are parsed
    /// together; their imports go through `fetcher`.
    pub fn from_xml(
        definitions: Node,
        source_uri: impl Into<String>,
        fetcher: &dyn SchemaFetcher,
        options: LoadOptions,
    ) -> Result<Self, XsdError> {
        if !xml::is(definitions, WSDL_NAMESPACE, TAG_NAME) {
            return Err(XsdError::UnexpectedRoot {
                expected: TAG_NAME.to_string(),
                found: definitions.tag_name().name().to_string(),
            });
        }
        let target_namespace = definitions.attribute("targetNamespace");

        let messages = xml::findall(definitions, WSDL_NAMESPACE, MessageDeclaration::TAG_NAME)
            .map(|message| MessageDeclaration::map_from_xml(message, target_namespace))
            .collect::<Result<Vec<_>, _>>()?;

        let port_type = xml::find(definitions, WSDL_NAMESPACE, PortTypeDeclaration::TAG_NAME)
            .ok_or_else(|| XsdError::missing_child(definitions, PortTypeDeclaration::TAG_NAME))?;
        let port_type = PortTypeDeclaration::map_from_xml(port_type)?;

        let types = match xml::find(definitions, WSDL_NAMESPACE, "types") {
            Some(types) => SchemaParser::new(
                xml::findall(types, XS_NAMESPACE, schema::TAG_NAME),
                fetcher,
                options,
            )
            .declarations()?,
            None => Vec::new(),
        };

        let service = xml::find(definitions, WSDL_NAMESPACE, ServiceDeclaration::TAG_NAME)
            .ok_or_else(|| XsdError::missing_child(definitions, ServiceDeclaration::TAG_NAME))?;

        Ok(Self {
            source_uri: source_uri.into(),
            target_namespace: target_namespace.map(str::to_string),
            types,
            port_type,
            messages,
            service: ServiceDeclaration::map_from_xml(service)?,
        })
    }

    pub fn message(&self, identifier: &Identifier) -> Option<&MessageDeclaration> {
        self.messages
            .iter()
            .find(|message| &message.identifier() == identifier)
    }
}

/// Fetches the WSDL at `uri` and parses it along with the schemas it imports.
pub fn load_wsdl(
    uri: &str,
    fetcher: &dyn SchemaFetcher,
    options: LoadOptions,
) -> Result<WsdlDeclaration, XsdError> {
    log::info!("loading WSDL {uri}");
    let text = fetcher.fetch(uri)?;
    let document = options.parse(&text)?;
    WsdlDeclaration::from_xml(document.root_element(), uri, fetcher, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::MemoryFetcher;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const WSDL: &str = r#"<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
            xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:prices" targetNamespace="urn:prices">
        <wsdl:types>
            <xs:schema targetNamespace="urn:prices">
                <xs:import namespace="urn:common" schemaLocation="common.xsd"/>
                <xs:element name="GetPrice">
                    <xs:complexType><xs:sequence><xs:element name="sku" type="xs:string"/></xs:sequence></xs:complexType>
                </xs:element>
                <xs:element name="GetPriceResponse">
                    <xs:complexType><xs:sequence><xs:element name="price" type="xs:decimal"/></xs:sequence></xs:complexType>
                </xs:element>
            </xs:schema>
        </wsdl:types>
        <wsdl:message name="GetPriceIn"><wsdl:part name="parameters" element="tns:GetPrice"/></wsdl:message>
        <wsdl:message name="GetPriceOut"><wsdl:part name="parameters" element="tns:GetPriceResponse"/></wsdl:message>
        <wsdl:portType name="PricesSoap">
            <wsdl:operation name="GetPrice">
                <wsdl:input message="tns:GetPriceIn"/>
                <wsdl:output message="tns:GetPriceOut"/>
            </wsdl:operation>
        </wsdl:portType>
        <wsdl:service name="Prices"/>
    </wsdl:definitions>"#;

    const COMMON: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:common">
        <xs:simpleType name="Currency"><xs:restriction base="xs:string"/></xs:simpleType>
    </xs:schema>"#;

    #[test]
    fn loads_wsdl_with_imported_types() {
        let fetcher = MemoryFetcher::new()
            .with("prices.wsdl", WSDL)
            .with("common.xsd", COMMON);
        let wsdl = load_wsdl("prices.wsdl", &fetcher, LoadOptions::default()).unwrap();

        assert_eq!(wsdl.source_uri, "prices.wsdl");
        assert_eq!(wsdl.service.name, "Prices");
        assert_eq!(
            wsdl.types
                .iter()
                .map(|d| d.identifier().to_string())
                .collect::<Vec<_>>(),
            vec![
                "{urn:common}Currency",
                "{urn:prices}GetPrice",
                "{urn:prices}GetPriceResponse"
            ]
        );
        let operation = &wsdl.port_type.operations[0];
        let input = wsdl.message(&operation.input).unwrap();
        assert_eq!(input.name, "GetPriceIn");
        assert!(wsdl.message(&Identifier::with_namespace("urn:x", "GetPriceIn")).is_none());
    }

    #[test]
    fn rejects_other_documents() {
        let fetcher = MemoryFetcher::new().with("a.xsd", COMMON);
        assert_matches!(
            load_wsdl("a.xsd", &fetcher, LoadOptions::default()),
            Err(XsdError::UnexpectedRoot { found, .. }) if found == "schema"
        );
    }

    #[test]
    fn empty_message_fails_the_whole_document() {
        let wsdl = WSDL.replace(
            r#"<wsdl:part name="parameters" element="tns:GetPriceResponse"/>"#,
            "",
        );
        let fetcher = MemoryFetcher::new().with("common.xsd", COMMON);
        let document = roxmltree::Document::parse(&wsdl).unwrap();
        assert_matches!(
            WsdlDeclaration::from_xml(document.root_element(), "x", &fetcher, LoadOptions::default()),
            Err(XsdError::EmptyMessage(name)) if name == "GetPriceOut"
        );
    }
}
