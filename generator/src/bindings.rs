use log::{debug, info};
use st_xsd::{Declaration, Named};

use crate::{error::GenerateError, ir::Bindings, registry::TypeRegistry};

/// Whether an element declaration has the identifier of a type declaration, in which case the
/// type is generated and the element would only alias it.
fn is_shadowed(declaration: &Declaration, declarations: &[Declaration]) -> bool {
    !declaration.is_type()
        && declarations
            .iter()
            .any(|other| other.is_type() && other.identifier() == declaration.identifier())
}

/// Generates a definition for every declaration and whatever it refers to.
pub fn generate_bindings(declarations: &[Declaration]) -> Result<Bindings, GenerateError> {
    generate_selected(declarations, declarations.iter())
}

/// Generates the `selected` declarations, plus the declarations they depend on.
pub fn generate_selected<'a>(
    declarations: &'a [Declaration],
    selected: impl IntoIterator<Item = &'a Declaration>,
) -> Result<Bindings, GenerateError> {
    let mut registry = TypeRegistry::new(declarations);
    for declaration in selected {
        if is_shadowed(declaration, declarations) {
            debug!("skipping element {}, a type has the same name", declaration.identifier());
            continue;
        }
        registry.generate(declaration)?;
    }
    let bindings = registry.into_bindings();
    info!("generated {} definitions", bindings.definitions().len());
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::DefinitionKind;
    use pretty_assertions::assert_eq;
    use st_xsd::{LoadOptions, MemoryFetcher, SchemaParser};

    fn generate(schema: &str) -> Bindings {
        let document = roxmltree::Document::parse(schema).unwrap();
        let declarations =
            SchemaParser::new([document.root_element()], &MemoryFetcher::new(), LoadOptions::default())
                .declarations()
                .unwrap();
        generate_bindings(&declarations).unwrap()
    }

    #[test]
    fn elements_named_like_types_are_skipped() {
        let bindings = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
                <xs:complexType name="Order"><xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence></xs:complexType>
                <xs:element name="Order" type="t:Order"/>
                <xs:element name="Invoice" type="t:Order"/>
            </xs:schema>"#,
        );
        let names = bindings
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["OrderComplexType", "InvoiceElement"]);
        let invoice = bindings.find("InvoiceElement").unwrap();
        assert_eq!(invoice.target_namespace.as_deref(), Some("urn:t"));
        assert!(matches!(invoice.kind, DefinitionKind::Element { .. }));
    }

    #[test]
    fn dependencies_come_first() {
        let bindings = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
                <xs:simpleType name="Small"><xs:restriction base="t:Percent"><xs:maxInclusive value="10"/></xs:restriction></xs:simpleType>
                <xs:simpleType name="Percent"><xs:restriction base="xs:int"><xs:minInclusive value="0"/><xs:maxInclusive value="100"/></xs:restriction></xs:simpleType>
            </xs:schema>"#,
        );
        let names = bindings
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["PercentSimpleType", "SmallSimpleType"]);
    }

    #[test]
    fn selection_pulls_in_dependencies_only() {
        let document = roxmltree::Document::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
                <xs:simpleType name="Code"><xs:restriction base="xs:string"/></xs:simpleType>
                <xs:complexType name="Item"><xs:sequence><xs:element name="code" type="t:Code"/></xs:sequence></xs:complexType>
                <xs:complexType name="Other"><xs:sequence><xs:element name="x" type="xs:int"/></xs:sequence></xs:complexType>
            </xs:schema>"#,
        )
        .unwrap();
        let declarations =
            SchemaParser::new([document.root_element()], &MemoryFetcher::new(), LoadOptions::default())
                .declarations()
                .unwrap();
        let bindings = generate_selected(
            &declarations,
            declarations.iter().filter(|d| d.name() == "Item"),
        )
        .unwrap();
        let names = bindings
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["CodeSimpleType", "ItemComplexType"]);
    }
}
