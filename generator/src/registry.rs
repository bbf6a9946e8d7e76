//! Resolves identifiers to generated definitions, generating each declaration at most once.

use std::collections::{HashMap, HashSet};

use log::debug;
use st_xsd::{
    builtins::{builtin_identifiers, XS_ANY_TYPE_NAME, XS_BUILTIN_TYPES},
    ComplexTypeDeclaration, Declaration, ElementDeclaration, Identifier, Named,
    SimpleTypeDeclaration,
};

use crate::{
    error::GenerateError,
    ir::{Bindings, Definition, DefinitionKind, FieldDef, TypeHandle, TypeRef},
    naming::{self, TypeKind, UniqueNames},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Kind {
    Type,
    Element,
}

type Key = (Kind, Identifier);

pub struct TypeRegistry<'d> {
    declarations: &'d [Declaration],
    resolved: HashMap<Key, TypeRef>,
    in_progress: HashSet<Key>,
    names: UniqueNames,
    bindings: Bindings,
}

impl<'d> TypeRegistry<'d> {
    pub fn new(declarations: &'d [Declaration]) -> Self {
        let resolved = builtin_identifiers()
            .zip(XS_BUILTIN_TYPES.iter().copied())
            .map(|(identifier, name)| ((Kind::Type, identifier), TypeRef::Builtin(name)))
            .collect();
        Self {
            declarations,
            resolved,
            in_progress: HashSet::new(),
            names: UniqueNames::default(),
            bindings: Bindings::default(),
        }
    }

    /// Resolves a type identifier, generating its declaration on first use.
    pub fn resolve(&mut self, identifier: &Identifier) -> Result<TypeRef, GenerateError> {
        if let Some(found) = self.resolved.get(&(Kind::Type, identifier.clone())) {
            return Ok(*found);
        }
        let declarations = self.declarations;
        let declaration = declarations
            .iter()
            .find(|d| d.is_type() && &d.identifier() == identifier)
            .ok_or_else(|| GenerateError::TypeNotFound(identifier.clone()))?;
        self.generate(declaration)
    }

    /// Resolves an element identifier. A type with the same identifier takes precedence, and
    /// elements declared with an inline type are parsed as types, so both fall back to the types.
    pub fn resolve_element(&mut self, identifier: &Identifier) -> Result<TypeRef, GenerateError> {
        if let Some(found) = self.resolved.get(&(Kind::Element, identifier.clone())) {
            return Ok(*found);
        }
        let declarations = self.declarations;
        let has_type = declarations
            .iter()
            .any(|d| d.is_type() && &d.identifier() == identifier);
        match declarations
            .iter()
            .find(|d| !d.is_type() && &d.identifier() == identifier)
        {
            Some(declaration) if !has_type => self.generate(declaration),
            _ => self.resolve(identifier),
        }
    }

    /// Generates `declaration` and whatever it refers to, unless it was generated already.
    pub fn generate(&mut self, declaration: &Declaration) -> Result<TypeRef, GenerateError> {
        let identifier = declaration.identifier();
        let kind = if declaration.is_type() {
            Kind::Type
        } else {
            Kind::Element
        };
        let key = (kind, identifier.clone());
        if let Some(found) = self.resolved.get(&key) {
            debug!("{identifier} is already generated");
            return Ok(*found);
        }
        if !self.in_progress.insert(key.clone()) {
            return Err(GenerateError::RecursiveType(identifier));
        }

        let definition = match *declaration {
            Declaration::SimpleType(ref simple) => self.simple_type(simple)?,
            Declaration::ComplexType(ref complex) => self.complex_type(complex)?,
            Declaration::Element(ref element) => self.element(element)?,
        };
        debug!("generated {} for {identifier}", definition.name);

        self.in_progress.remove(&key);
        let handle = TypeHandle(self.bindings.definitions.len());
        self.bindings.definitions.push(definition);
        let type_ref = TypeRef::Generated(handle);
        self.resolved.insert(key, type_ref);
        Ok(type_ref)
    }

    fn simple_type(&mut self, simple: &SimpleTypeDeclaration) -> Result<Definition, GenerateError> {
        let restriction = &simple.restriction;
        let base = match self.resolve(&restriction.base)? {
            TypeRef::Builtin("anyType") => TypeRef::Builtin("anySimpleType"),
            TypeRef::Generated(handle)
                if !matches!(self.bindings.get(handle).kind, DefinitionKind::Simple { .. }) =>
            {
                return Err(GenerateError::ComplexBase {
                    identifier: simple.identifier(),
                    base: restriction.base.clone(),
                })
            }
            base => base,
        };
        Ok(Definition {
            name: self.names.claim(naming::type_name(&simple.name, TypeKind::SimpleType)?),
            xml_name: simple.name.clone(),
            target_namespace: simple.target_namespace.clone(),
            kind: DefinitionKind::Simple {
                base,
                rules: restriction.rules.clone(),
            },
        })
    }

    fn complex_type(
        &mut self,
        complex: &ComplexTypeDeclaration,
    ) -> Result<Definition, GenerateError> {
        let mut field_names = UniqueNames::default();
        let mut fields = Vec::with_capacity(complex.elements.len());
        for element in &complex.elements {
            let type_ = self.resolve(element.type_.as_ref().unwrap_or(&*XS_ANY_TYPE_NAME))?;
            fields.push(FieldDef {
                name: field_names.claim(naming::field_name(&element.name)?),
                xml_name: element.name.clone(),
                type_,
                min_occurs: element.min_occurs,
                max_occurs: element.max_occurs,
                nillable: element.nillable,
                default: element.default.clone(),
            });
        }
        Ok(Definition {
            name: self.names.claim(naming::type_name(&complex.name, TypeKind::ComplexType)?),
            xml_name: complex.name.clone(),
            target_namespace: complex.target_namespace.clone(),
            kind: DefinitionKind::Complex { fields },
        })
    }

    fn element(&mut self, element: &ElementDeclaration) -> Result<Definition, GenerateError> {
        let type_ = self.resolve(element.type_.as_ref().unwrap_or(&*XS_ANY_TYPE_NAME))?;
        Ok(Definition {
            name: self.names.claim(naming::type_name(&element.name, TypeKind::Element)?),
            xml_name: element.name.clone(),
            target_namespace: element.target_namespace.clone(),
            kind: DefinitionKind::Element { type_ },
        })
    }

    pub fn into_bindings(self) -> Bindings {
        self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use st_xsd::{builtins::XS_NAMESPACE, LoadOptions, MemoryFetcher, SchemaParser};

    fn declarations(schema: &str) -> Vec<Declaration> {
        let document = roxmltree::Document::parse(schema).unwrap();
        SchemaParser::new([document.root_element()], &MemoryFetcher::new(), LoadOptions::default())
            .declarations()
            .unwrap()
    }

    const DIAMOND: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
        <xs:complexType name="Left"><xs:sequence><xs:element name="code" type="t:Code"/></xs:sequence></xs:complexType>
        <xs:complexType name="Right"><xs:sequence><xs:element name="code" type="t:Code"/></xs:sequence></xs:complexType>
        <xs:simpleType name="Code"><xs:restriction base="xs:string"><xs:pattern value="[A-Z]{3}"/></xs:restriction></xs:simpleType>
    </xs:schema>"#;

    #[test]
    fn builtins_short_circuit() {
        let mut registry = TypeRegistry::new(&[]);
        let int = Identifier::with_namespace(XS_NAMESPACE, "int");
        assert_eq!(registry.resolve(&int).unwrap(), TypeRef::Builtin("int"));
        assert!(registry.into_bindings().definitions().is_empty());
    }

    #[test]
    fn diamond_references_generate_once() {
        let _ = env_logger::builder().is_test(true).try_init();
        let declarations = declarations(DIAMOND);
        let mut registry = TypeRegistry::new(&declarations);
        for declaration in &declarations {
            registry.generate(declaration).unwrap();
        }
        let bindings = registry.into_bindings();
        let names = bindings
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["CodeSimpleType", "LeftComplexType", "RightComplexType"]);

        let field_type = |name: &str| match bindings.find(name).map(|d| &d.kind) {
            Some(DefinitionKind::Complex { fields }) => fields[0].type_,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(field_type("LeftComplexType"), field_type("RightComplexType"));
        assert_eq!(field_type("LeftComplexType"), TypeRef::Generated(TypeHandle(0)));
    }

    #[test]
    fn unknown_types_are_reported() {
        let declarations = declarations(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
                <xs:element name="E" type="t:Missing"/>
            </xs:schema>"#,
        );
        let mut registry = TypeRegistry::new(&declarations);
        assert_matches!(
            registry.generate(&declarations[0]),
            Err(GenerateError::TypeNotFound(id)) if id == Identifier::with_namespace("urn:t", "Missing")
        );
    }

    #[test]
    fn recursive_types_are_rejected() {
        let declarations = declarations(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
                <xs:complexType name="Node"><xs:sequence>
                    <xs:element name="child" type="t:Node" minOccurs="0"/>
                </xs:sequence></xs:complexType>
            </xs:schema>"#,
        );
        let mut registry = TypeRegistry::new(&declarations);
        assert_matches!(
            registry.generate(&declarations[0]),
            Err(GenerateError::RecursiveType(id)) if id.local_name == "Node"
        );
    }

    #[test]
    fn colliding_names_are_numbered() {
        let declarations = declarations(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                <xs:complexType name="order"><xs:sequence>
                    <xs:element name="Id" type="xs:int"/>
                    <xs:element name="id" type="xs:string"/>
                </xs:sequence></xs:complexType>
                <xs:complexType name="Order"><xs:sequence/></xs:complexType>
            </xs:schema>"#,
        );
        let mut registry = TypeRegistry::new(&declarations);
        for declaration in &declarations {
            registry.generate(declaration).unwrap();
        }
        let bindings = registry.into_bindings();
        assert!(bindings.find("OrderComplexType").is_some());
        assert!(bindings.find("OrderComplexType2").is_some());
        let Some(DefinitionKind::Complex { fields }) =
            bindings.find("OrderComplexType").map(|d| &d.kind)
        else {
            panic!("missing OrderComplexType");
        };
        assert_eq!(
            fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "id2"]
        );
    }

    #[test]
    fn simple_types_need_simple_bases() {
        let declarations = declarations(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t" targetNamespace="urn:t">
                <xs:complexType name="C"><xs:sequence/></xs:complexType>
                <xs:simpleType name="S"><xs:restriction base="t:C"/></xs:simpleType>
            </xs:schema>"#,
        );
        let mut registry = TypeRegistry::new(&declarations);
        assert_matches!(
            registry.generate(&declarations[1]),
            Err(GenerateError::ComplexBase { .. })
        );
    }
}
