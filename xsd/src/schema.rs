//! Turns `xs:schema` trees into declarations, following imports and includes.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use roxmltree::Node;

use super::{
    builtins::{XS_ANY_TYPE_NAME, XS_NAMESPACE},
    declarations::{
        ComplexTypeDeclaration, Declaration, ElementDeclaration, MaxOccurs, Named,
        SimpleTypeDeclaration,
    },
    error::XsdError,
    import::{Import, ImportError, Include, LoadOptions, SchemaFetcher},
    restriction::RestrictionDeclaration,
    values::attribute_value,
    xml::{self, required_attribute},
    xstypes::Identifier,
};

pub const TAG_NAME: &str = "schema";

/// State of one parsing run.
#[derive(Debug, Default)]
struct ParseContext {
    /// Namespaces entered so far. A namespace is marked when parsing of it starts, so an import
    /// cycle ends at the first repeated namespace.
    resolved_namespaces: HashSet<Option<String>>,
    included_locations: HashSet<String>,
    declarations: Vec<Declaration>,
}

pub struct SchemaParser<'a, 'input, 'f> {
    schemas: IndexMap<Option<String>, Node<'a, 'input>>,
    fetcher: &'f dyn SchemaFetcher,
    options: LoadOptions,
}

impl<'a, 'input, 'f> SchemaParser<'a, 'input, 'f> {
    /// Creates a parser over already loaded schema roots. Imports of their namespaces are
    /// served from these roots instead of being fetched.
    pub fn new(
        schemas: impl IntoIterator<Item = Node<'a, 'input>>,
        fetcher: &'f dyn SchemaFetcher,
        options: LoadOptions,
    ) -> Self {
        let schemas = schemas
            .into_iter()
            .map(|schema| (schema.attribute("targetNamespace").map(str::to_string), schema))
            .collect();
        Self {
            schemas,
            fetcher,
            options,
        }
    }

    /// Parses every schema, returning the declarations in document order.
    pub fn declarations(&self) -> Result<Vec<Declaration>, XsdError> {
        let mut context = ParseContext::default();
        for schema in self.schemas.values() {
            self.parse_schema(&mut context, *schema, None)?;
        }
        Ok(context.declarations)
    }

    /// Parses one schema document. `including_namespace` is set for include passes; those are
    /// not subject to the namespace guard and inherit the namespace when they declare none.
    fn parse_schema(
        &self,
        context: &mut ParseContext,
        schema: Node,
        including_namespace: Option<&Option<String>>,
    ) -> Result<(), XsdError> {
        if !xml::is(schema, XS_NAMESPACE, TAG_NAME) {
            return Err(XsdError::UnexpectedRoot {
                expected: TAG_NAME.to_string(),
                found: schema.tag_name().name().to_string(),
            });
        }

        let namespace = match (schema.attribute("targetNamespace"), including_namespace) {
            (Some(namespace), _) => Some(namespace.to_string()),
            (None, Some(inherited)) => inherited.clone(),
            (None, None) => None,
        };
        if including_namespace.is_none() && !context.resolved_namespaces.insert(namespace.clone()) {
            debug!("namespace {namespace:?} is already resolved");
            return Ok(());
        }

        for node in xml::children(schema) {
            if node.tag_name().namespace() != Some(XS_NAMESPACE) {
                return Err(XsdError::UnsupportedNode(node.tag_name().name().to_string()));
            }
            match node.tag_name().name() {
                Import::TAG_NAME => self.import(context, Import::map_from_xml(node)?)?,
                Include::TAG_NAME => {
                    self.include(context, Include::map_from_xml(node)?, &namespace)?
                }
                "element" => {
                    let declaration = self.parse_element(context, node, &namespace)?;
                    context.declarations.push(declaration);
                }
                "simpleType" => {
                    let namespace = override_namespace(node, &namespace);
                    let name = required_attribute(node, "name")?;
                    let declaration = parse_simple_type(node, name, namespace)?;
                    context.declarations.push(Declaration::SimpleType(declaration));
                }
                "complexType" => {
                    let namespace = override_namespace(node, &namespace);
                    let name = required_attribute(node, "name")?;
                    let elements = self.parse_fields(context, node, name, &namespace)?;
                    context
                        .declarations
                        .push(Declaration::ComplexType(ComplexTypeDeclaration {
                            name: name.to_string(),
                            target_namespace: namespace,
                            elements,
                        }));
                }
                "attribute" => warn!("<xs:attribute> is not supported yet"),
                "annotation" => {}
                other => return Err(XsdError::UnsupportedNode(other.to_string())),
            }
        }
        Ok(())
    }

    fn import(&self, context: &mut ParseContext, import: Import) -> Result<(), XsdError> {
        if context.resolved_namespaces.contains(&import.namespace) {
            debug!("skipping import of resolved namespace {:?}", import.namespace);
            return Ok(());
        }
        if let Some(schema) = self.schemas.get(&import.namespace) {
            return self.parse_schema(context, *schema, None);
        }
        let location = import
            .schema_location
            .ok_or(ImportError::MissingLocation {
                namespace: import.namespace,
            })?;
        let text = self.fetch(&location)?;
        let document = self.parse_document(&location, &text)?;
        self.parse_schema(context, document.root_element(), None)
    }

    fn include(
        &self,
        context: &mut ParseContext,
        include: Include,
        namespace: &Option<String>,
    ) -> Result<(), XsdError> {
        let location = include.schema_location;
        if !context.included_locations.insert(location.clone()) {
            debug!("{location} is already included");
            return Ok(());
        }
        let text = self.fetch(&location)?;
        let document = self.parse_document(&location, &text)?;
        self.parse_schema(context, document.root_element(), Some(namespace))
    }

    fn fetch(&self, location: &str) -> Result<String, ImportError> {
        self.fetcher
            .fetch(location)
            .map_err(|source| ImportError::Fetch {
                location: location.to_string(),
                source,
            })
    }

    fn parse_document<'t>(
        &self,
        location: &str,
        text: &'t str,
    ) -> Result<roxmltree::Document<'t>, ImportError> {
        self.options.parse(text).map_err(|source| ImportError::Xml {
            location: location.to_string(),
            source,
        })
    }

    /// A top-level element: either a reference to a type or an inline struct.
    fn parse_element(
        &self,
        context: &mut ParseContext,
        node: Node,
        namespace: &Option<String>,
    ) -> Result<Declaration, XsdError> {
        let name = required_attribute(node, "name")?;
        let namespace = override_namespace(node, namespace);

        if let Some(type_) = attribute_value::<Identifier>(node, "type")? {
            let mut element = ElementDeclaration::new(name, namespace, Some(type_));
            element.default = attribute_value(node, "default")?;
            element.nillable = attribute_value(node, "nillable")?.unwrap_or(false);
            return Ok(Declaration::Element(element));
        }

        match xml::find(node, XS_NAMESPACE, "complexType") {
            Some(complex) if xml::find(complex, XS_NAMESPACE, "sequence").is_some() => {
                let elements = self.parse_fields(context, complex, name, &namespace)?;
                Ok(Declaration::ComplexType(ComplexTypeDeclaration {
                    name: name.to_string(),
                    target_namespace: namespace,
                    elements,
                }))
            }
            _ => Err(XsdError::missing_child(node, "complexType")),
        }
    }

    /// Reads the elements of the `sequence` of a complex type.
    fn parse_fields(
        &self,
        context: &mut ParseContext,
        complex: Node,
        type_name: &str,
        namespace: &Option<String>,
    ) -> Result<Vec<ElementDeclaration>, XsdError> {
        let mut fields = Vec::new();
        for child in xml::children(complex) {
            match child.tag_name().name() {
                "sequence" => {
                    for item in xml::children(child) {
                        match item.tag_name().name() {
                            "element" => {
                                fields.push(self.parse_field(context, item, type_name, namespace)?)
                            }
                            "annotation" => {}
                            other => warn!("<{other}> in the sequence of {type_name} is not supported"),
                        }
                    }
                }
                "annotation" => {}
                other => warn!("<{other}> in {type_name} is not supported"),
            }
        }
        Ok(fields)
    }

    fn parse_field(
        &self,
        context: &mut ParseContext,
        node: Node,
        type_name: &str,
        namespace: &Option<String>,
    ) -> Result<ElementDeclaration, XsdError> {
        let name = required_attribute(node, "name")?;
        let namespace = override_namespace(node, namespace);
        let type_ = match attribute_value::<Identifier>(node, "type")? {
            Some(type_) => type_,
            None => self
                .parse_anonymous_type(context, node, &format!("{type_name}.{name}"), &namespace)?
                .unwrap_or_else(|| XS_ANY_TYPE_NAME.clone()),
        };

        let mut element = ElementDeclaration::new(name, namespace, Some(type_));
        element.default = attribute_value(node, "default")?;
        element.nillable = attribute_value(node, "nillable")?.unwrap_or(false);
        let min_occurs = attribute_value(node, "minOccurs")?.unwrap_or(1);
        let max_occurs = attribute_value(node, "maxOccurs")?.unwrap_or(MaxOccurs::Count(1));
        element.with_occurs(min_occurs, max_occurs)
    }

    /// Hoists a type declared inline in a field to a declaration of its own.
    fn parse_anonymous_type(
        &self,
        context: &mut ParseContext,
        node: Node,
        name: &str,
        namespace: &Option<String>,
    ) -> Result<Option<Identifier>, XsdError> {
        let declaration = if let Some(complex) = xml::find(node, XS_NAMESPACE, "complexType") {
            let elements = self.parse_fields(context, complex, name, namespace)?;
            Declaration::ComplexType(ComplexTypeDeclaration {
                name: name.to_string(),
                target_namespace: namespace.clone(),
                elements,
            })
        } else if let Some(simple) = xml::find(node, XS_NAMESPACE, "simpleType") {
            Declaration::SimpleType(parse_simple_type(simple, name, namespace.clone())?)
        } else {
            return Ok(None);
        };
        let identifier = declaration.identifier();
        context.declarations.push(declaration);
        Ok(Some(identifier))
    }
}

fn override_namespace(node: Node, namespace: &Option<String>) -> Option<String> {
    node.attribute("targetNamespace")
        .map(str::to_string)
        .or_else(|| namespace.clone())
}

fn parse_simple_type(
    node: Node,
    name: &str,
    namespace: Option<String>,
) -> Result<SimpleTypeDeclaration, XsdError> {
    let restriction = xml::find(node, XS_NAMESPACE, RestrictionDeclaration::TAG_NAME)
        .ok_or_else(|| XsdError::missing_child(node, RestrictionDeclaration::TAG_NAME))?;
    Ok(SimpleTypeDeclaration {
        name: name.to_string(),
        target_namespace: namespace,
        restriction: RestrictionDeclaration::map_from_xml(restriction)?,
    })
}

/// Fetches the schema at `uri` and parses it with everything it imports.
pub fn load_schema(
    uri: &str,
    fetcher: &dyn SchemaFetcher,
    options: LoadOptions,
) -> Result<Vec<Declaration>, XsdError> {
    log::info!("loading schema {uri}");
    let text = fetcher.fetch(uri)?;
    let document = options.parse(&text)?;
    SchemaParser::new([document.root_element()], fetcher, options).declarations()
}
