use proc_macro2::{Literal, Span};
use syn::{parse_quote, Expr, Ident, ImplItemFn, Item, Type};

use st_xsd::{MaxOccurs, RestrictionRule};

use check_keyword::CheckKeyword;

use super::{RenderedModule, Renderer};
use crate::ir::{
    Bindings, ClientDef, Definition, DefinitionKind, FieldDef, MessageDef, OperationDef,
    PartLookup, TypeRef,
};

/// Renders bindings against the `st-builtins` runtime.
pub struct RustRenderer;

fn name_to_ident(name: &str) -> Ident {
    if ["crate", "self", "super", "Self"].contains(&name) {
        // These are keywords that are not allowed as raw identifiers
        Ident::new(&format!("{}_", name), Span::call_site())
    } else if name.is_keyword() {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// The runtime type implementing a built-in XSD type.
fn builtin_name(local_name: &str) -> &'static str {
    match local_name {
        "anySimpleType" => "AnySimpleType",
        "string" => "String",
        "normalizedString" => "NormalizedString",
        "token" => "Token",
        "language" => "Language",
        "Name" => "Name",
        "NCName" => "NcName",
        "ID" => "Id",
        "IDREF" => "IdRef",
        "ENTITY" => "Entity",
        "NMTOKEN" => "NmToken",
        "boolean" => "Boolean",
        "decimal" => "Decimal",
        "integer" => "Integer",
        "long" => "Long",
        "int" => "Int",
        "short" => "Short",
        "byte" => "Byte",
        "nonNegativeInteger" => "NonNegativeInteger",
        "positiveInteger" => "PositiveInteger",
        "unsignedLong" => "UnsignedLong",
        "unsignedInt" => "UnsignedInt",
        "unsignedShort" => "UnsignedShort",
        "unsignedByte" => "UnsignedByte",
        "nonPositiveInteger" => "NonPositiveInteger",
        "negativeInteger" => "NegativeInteger",
        "double" => "Double",
        "float" => "Float",
        "date" => "Date",
        "dateTime" => "DateTime",
        "dateTimeStamp" => "DateTimeStamp",
        "time" => "Time",
        "duration" => "Duration",
        "dayTimeDuration" => "DayTimeDuration",
        "yearMonthDuration" => "YearMonthDuration",
        "gDay" => "GDay",
        "gMonth" => "GMonth",
        "gMonthDay" => "GMonthDay",
        "gYear" => "GYear",
        "gYearMonth" => "GYearMonth",
        "hexBinary" => "HexBinary",
        "base64Binary" => "Base64Binary",
        "anyURI" => "AnyUri",
        "QName" => "QName",
        "NOTATION" => "Notation",
        _ => "AnyType",
    }
}

fn file(items: Vec<Item>) -> String {
    let doc_comment = concat!(
        " Generated by ",
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    );
    let file = syn::File {
        shebang: None,
        attrs: vec![
            parse_quote!(#![doc = #doc_comment]),
            parse_quote!(#![allow(dead_code, unused_imports, unused_variables)]),
        ],
        items,
    };
    prettyplease::unparse(&file)
}

fn doc_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| format!(" {}", line.trim())).collect()
}

struct RustContext<'b> {
    bindings: &'b Bindings,
}

impl<'b> RustContext<'b> {
    fn type_path(&self, type_: TypeRef) -> Type {
        match type_ {
            TypeRef::Builtin(local_name) => {
                let name = Ident::new(builtin_name(local_name), Span::call_site());
                parse_quote!(xs::#name)
            }
            TypeRef::Generated(handle) => {
                let name = name_to_ident(&self.bindings.get(handle).name);
                parse_quote!(#name)
            }
        }
    }

    fn definition_items(&self, definition: &Definition) -> Vec<Item> {
        match definition.kind {
            DefinitionKind::Simple { base, ref rules } => {
                self.simple_type_items(definition, base, rules)
            }
            DefinitionKind::Complex { ref fields } => self.complex_type_items(definition, fields),
            DefinitionKind::Element { type_ } => self.element_items(definition, type_),
        }
    }

    fn simple_type_items(
        &self,
        definition: &Definition,
        base: TypeRef,
        rules: &[RestrictionRule],
    ) -> Vec<Item> {
        let name = name_to_ident(&definition.name);
        let doc = type_doc(definition);
        let meta = type_meta(definition);
        let base = self.type_path(base);
        let checks = rules.iter().map(rule_expr).collect::<Vec<_>>();
        let enumeration: Expr = match rules.iter().find_map(|rule| match rule {
            RestrictionRule::Enumeration(values) => Some(values),
            _ => None,
        }) {
            Some(values) => {
                let entries = values.iter().map(|(value, display)| quote::quote!((#value, #display)));
                parse_quote!(Some(&[#(#entries),*]))
            }
            None => parse_quote!(<#base as SimpleType>::ENUMERATION),
        };

        vec![
            parse_quote! {
                #[doc = #doc]
                #[derive(Clone, Debug, PartialEq, PartialOrd)]
                pub struct #name(<#base as AnyType>::Native);
            },
            parse_quote! {
                impl AnyType for #name {
                    type Native = <#base as AnyType>::Native;
                    const META: TypeMeta = #meta;

                    fn from_native(native: Self::Native) -> Result<Self, ValidationError> {
                        Self::new(native)
                    }

                    fn from_node(node: XmlNode) -> Result<Self, ValidationError> {
                        Self::from_literal(&text_content(node))
                    }

                    fn to_wire(&self) -> WireValue {
                        WireValue::Text(self.wire_value())
                    }
                }
            },
            parse_quote! {
                impl SimpleType for #name {
                    const WHITESPACE: Whitespace = <#base as SimpleType>::WHITESPACE;
                    const ENUMERATION: Option<&'static [(&'static str, &'static str)]> = #enumeration;

                    fn validate(value: &Self::Native, lexical: &str) -> Result<(), ValidationError> {
                        <#base as SimpleType>::validate(value, lexical)?;
                        check_all(value, lexical, &[#(#checks),*])
                    }

                    fn from_validated(value: Self::Native) -> Self {
                        Self(value)
                    }

                    fn value(&self) -> &Self::Native {
                        &self.0
                    }
                }
            },
        ]
    }

    fn complex_type_items(&self, definition: &Definition, fields: &[FieldDef]) -> Vec<Item> {
        let name = name_to_ident(&definition.name);
        let doc = type_doc(definition);
        let meta = type_meta(definition);
        let idents = fields
            .iter()
            .map(|field| name_to_ident(&field.name))
            .collect::<Vec<_>>();
        let types = fields
            .iter()
            .map(|field| self.type_path(field.type_))
            .collect::<Vec<_>>();
        let indices = (0..fields.len())
            .map(Literal::usize_unsuffixed)
            .collect::<Vec<_>>();
        let field_metas = fields.iter().map(field_meta);
        let accessors = fields
            .iter()
            .zip(idents.iter().zip(&types))
            .map(|(field, (ident, type_))| -> ImplItemFn {
                if field.is_single() {
                    parse_quote! {
                        pub fn #ident(&self) -> Option<&#type_> {
                            self.#ident.first()
                        }
                    }
                } else {
                    parse_quote! {
                        pub fn #ident(&self) -> &[#type_] {
                            &self.#ident
                        }
                    }
                }
            });

        vec![
            parse_quote! {
                #[doc = #doc]
                #[derive(Clone, Debug, PartialEq)]
                pub struct #name {
                    #(#idents: Vec<#types>,)*
                }
            },
            parse_quote! {
                impl #name {
                    pub fn new<'a, 'input: 'a>(
                        #(#idents: impl Into<Children<'a, 'input, #types>>),*
                    ) -> Result<Self, ValidationError> {
                        Ok(Self {
                            #(#idents: #idents.into().coerce(&Self::FIELDS[#indices])?,)*
                        })
                    }

                    #(#accessors)*
                }
            },
            parse_quote! {
                impl AnyType for #name {
                    type Native = std::convert::Infallible;
                    const META: TypeMeta = #meta;

                    fn from_native(native: Self::Native) -> Result<Self, ValidationError> {
                        match native {}
                    }

                    fn from_node(node: XmlNode) -> Result<Self, ValidationError> {
                        Self::new(#(Children::from_parent(node, &Self::FIELDS[#indices])),*)
                    }

                    fn to_wire(&self) -> WireValue {
                        WireValue::record(Self::FIELDS, vec![#(WireValue::collect(&self.#idents)),*])
                    }
                }
            },
            parse_quote! {
                impl ComplexType for #name {
                    const FIELDS: &'static [FieldMeta] = &[#(#field_metas),*];
                }
            },
        ]
    }

    fn element_items(&self, definition: &Definition, type_: TypeRef) -> Vec<Item> {
        let name = name_to_ident(&definition.name);
        let doc = type_doc(definition);
        let meta = type_meta(definition);
        let inner = self.type_path(type_);

        vec![
            parse_quote! {
                #[doc = #doc]
                #[derive(Clone, Debug, PartialEq)]
                pub struct #name(pub #inner);
            },
            parse_quote! {
                impl AnyType for #name {
                    type Native = <#inner as AnyType>::Native;
                    const META: TypeMeta = #meta;

                    fn from_native(native: Self::Native) -> Result<Self, ValidationError> {
                        <#inner as AnyType>::from_native(native).map(Self)
                    }

                    fn from_node(node: XmlNode) -> Result<Self, ValidationError> {
                        <#inner as AnyType>::from_node(node).map(Self)
                    }

                    fn to_wire(&self) -> WireValue {
                        self.0.to_wire()
                    }
                }
            },
        ]
    }

    fn message_items(&self, message: &MessageDef) -> Vec<Item> {
        let name = name_to_ident(&message.name);
        let doc = format!(" The `{}` message.", message.xml_name);
        let xml_name = &message.xml_name;
        let idents = message
            .parts
            .iter()
            .map(|part| name_to_ident(&part.name))
            .collect::<Vec<_>>();
        let types = message
            .parts
            .iter()
            .map(|part| self.type_path(part.type_))
            .collect::<Vec<_>>();
        let part_names = message.parts.iter().map(|part| part.xml_name.as_str());
        let lookups = message
            .parts
            .iter()
            .zip(&types)
            .map(|(part, type_)| -> Expr {
                match part.lookup {
                    PartLookup::TypeMeta => parse_quote!(<#type_ as AnyType>::META),
                    PartLookup::PartName => {
                        let part_name = &part.xml_name;
                        parse_quote!(TypeMeta::new(#part_name, ""))
                    }
                }
            });

        vec![
            parse_quote! {
                #[doc = #doc]
                #[derive(Clone, Debug, PartialEq)]
                pub struct #name {
                    #(pub #idents: #types,)*
                }
            },
            parse_quote! {
                impl #name {
                    pub fn new(#(#idents: #types),*) -> Self {
                        Self { #(#idents),* }
                    }
                }
            },
            parse_quote! {
                impl Message for #name {
                    const NAME: &'static str = #xml_name;

                    fn request_arguments(&self) -> WireValue {
                        message_arguments(vec![#((#part_names, self.#idents.to_wire())),*])
                    }

                    fn from_response(root: XmlNode) -> Result<Self, ClientError> {
                        Ok(Self {
                            #(#idents: decode_part(root, &#lookups)?,)*
                        })
                    }
                }
            },
        ]
    }

    fn operation_method(&self, client: &ClientDef, operation: &OperationDef) -> ImplItemFn {
        let method = name_to_ident(&operation.method);
        let action = &operation.action;
        let input = name_to_ident(&client.messages[operation.input].name);
        let output = name_to_ident(&client.messages[operation.output].name);
        let docs = operation
            .documentation
            .as_deref()
            .map(doc_lines)
            .unwrap_or_default();

        parse_quote! {
            #(#[doc = #docs])*
            pub fn #method(&self, input: &#input) -> Result<#output, ClientError> {
                self.inner.execute_action(#action, input)
            }
        }
    }

    fn client_items(&self, client: &ClientDef) -> Vec<Item> {
        let name = name_to_ident(&client.name);
        let doc = format!(" Client of the service described by `{}`.", client.source_uri);
        let source_uri = &client.source_uri;
        let methods = client
            .operations
            .iter()
            .map(|operation| self.operation_method(client, operation));

        vec![
            parse_quote! {
                #[doc = #doc]
                pub struct #name<D> {
                    inner: SoapClient<D>,
                }
            },
            parse_quote! {
                impl<D: ActionDispatcher> #name<D> {
                    pub const WSDL_LOCATION: &'static str = #source_uri;

                    pub fn new(dispatcher: D) -> Self {
                        Self {
                            inner: SoapClient::new(dispatcher),
                        }
                    }

                    pub fn dispatcher(&self) -> &D {
                        self.inner.dispatcher()
                    }

                    #(#methods)*
                }
            },
        ]
    }
}

fn type_doc(definition: &Definition) -> String {
    match definition.target_namespace {
        Some(ref namespace) => format!(" `{{{}}}{}`", namespace, definition.xml_name),
        None => format!(" `{}`", definition.xml_name),
    }
}

fn type_meta(definition: &Definition) -> Expr {
    let xml_name = &definition.xml_name;
    let namespace = definition.target_namespace.as_deref().unwrap_or("");
    parse_quote!(TypeMeta::new(#xml_name, #namespace))
}

fn rule_expr(rule: &RestrictionRule) -> Expr {
    match *rule {
        RestrictionRule::MinInclusive(ref literal) => parse_quote! {
            Rule::MinInclusive(<Self::Native as NativeValue>::parse_literal(#literal)?)
        },
        RestrictionRule::MaxInclusive(ref literal) => parse_quote! {
            Rule::MaxInclusive(<Self::Native as NativeValue>::parse_literal(#literal)?)
        },
        RestrictionRule::Enumeration(ref values) => {
            let entries = values
                .iter()
                .map(|(value, display)| quote::quote!((#value, #display)));
            parse_quote!(Rule::Enumeration(&[#(#entries),*]))
        }
        RestrictionRule::Pattern(ref pattern) => parse_quote!(Rule::Pattern(#pattern)),
    }
}

fn field_meta(field: &FieldDef) -> Expr {
    let xml_name = &field.xml_name;
    let min = Literal::u32_unsuffixed(field.min_occurs);
    let max: Expr = match field.max_occurs {
        MaxOccurs::Count(count) => {
            let count = Literal::u32_unsuffixed(count);
            parse_quote!(MaxOccurs::Bounded(#count))
        }
        MaxOccurs::Unbounded => parse_quote!(MaxOccurs::Unbounded),
    };
    let mut meta: Expr = parse_quote!(FieldMeta::new(#xml_name, #min, #max));
    if field.nillable {
        meta = parse_quote!(#meta.nillable());
    }
    if let Some(ref default) = field.default {
        meta = parse_quote!(#meta.with_default(#default));
    }
    meta
}

impl RustRenderer {
    fn types_items(bindings: &Bindings) -> Vec<Item> {
        let context = RustContext { bindings };
        let mut items: Vec<Item> = vec![parse_quote!(
            use st_builtins::prelude::*;
        )];
        for definition in bindings.definitions() {
            items.extend(context.definition_items(definition));
        }
        items
    }
}

impl Renderer for RustRenderer {
    fn render_bindings(&self, bindings: &Bindings) -> String {
        file(Self::types_items(bindings))
    }

    fn render_client(&self, bindings: &Bindings, client: &ClientDef) -> Vec<RenderedModule> {
        let context = RustContext { bindings };

        let mut message_items: Vec<Item> = vec![
            parse_quote!(
                use st_builtins::prelude::*;
            ),
            parse_quote!(
                use super::types::*;
            ),
        ];
        for message in &client.messages {
            message_items.extend(context.message_items(message));
        }

        let mut client_items: Vec<Item> = vec![
            parse_quote!(
                use st_builtins::prelude::*;
            ),
            parse_quote!(
                use super::messages::*;
            ),
        ];
        client_items.extend(context.client_items(client));

        let client_name = name_to_ident(&client.name);
        let mod_items: Vec<Item> = vec![
            parse_quote!(
                pub mod client;
            ),
            parse_quote!(
                pub mod messages;
            ),
            parse_quote!(
                pub mod types;
            ),
            parse_quote!(
                pub use client::#client_name;
            ),
        ];

        vec![
            RenderedModule {
                file_name: "types.rs".to_string(),
                source: file(Self::types_items(bindings)),
            },
            RenderedModule {
                file_name: "messages.rs".to_string(),
                source: file(message_items),
            },
            RenderedModule {
                file_name: "client.rs".to_string(),
                source: file(client_items),
            },
            RenderedModule {
                file_name: "mod.rs".to_string(),
                source: file(mod_items),
            },
        ]
    }
}
