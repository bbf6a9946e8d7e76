use indexmap::IndexMap;
use roxmltree::Node;

use crate::{
    builtins::{MS_SERIALIZATION_NAMESPACE, XS_NAMESPACE},
    error::XsdError,
    values::attribute_value,
    xml::{self, required_attribute},
    xstypes::Identifier,
};

/// One facet of a restriction. Bounds keep their lexical form; they are typed by the base.
#[derive(Clone, Debug, PartialEq)]
pub enum RestrictionRule {
    MinInclusive(String),
    MaxInclusive(String),
    /// Raw values mapped to display values, in declaration order.
    Enumeration(IndexMap<String, String>),
    Pattern(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestrictionDeclaration {
    pub base: Identifier,
    pub rules: Vec<RestrictionRule>,
}

impl RestrictionDeclaration {
    pub const TAG_NAME: &'static str = "restriction";

    pub fn map_from_xml(restriction: Node) -> Result<Self, XsdError> {
        let base = attribute_value::<Identifier>(restriction, "base")?
            .ok_or_else(|| XsdError::missing_attribute(restriction, "base"))?;

        let mut rules = Vec::new();
        let mut enumeration = IndexMap::new();
        for facet in xml::children(restriction) {
            let name = facet.tag_name().name();
            if facet.tag_name().namespace() != Some(XS_NAMESPACE) {
                return Err(XsdError::MalformedRestriction(name.to_string()));
            }
            if name == "annotation" {
                continue;
            }
            let value = required_attribute(facet, "value")?.to_string();
            match name {
                "pattern" => rules.push(RestrictionRule::Pattern(value)),
                "minInclusive" => rules.push(RestrictionRule::MinInclusive(value)),
                "maxInclusive" => rules.push(RestrictionRule::MaxInclusive(value)),
                "enumeration" => {
                    let display = enumeration_display_value(facet).unwrap_or_else(|| value.clone());
                    enumeration.insert(value, display);
                }
                _ => return Err(XsdError::MalformedRestriction(name.to_string())),
            }
        }
        if !enumeration.is_empty() {
            rules.push(RestrictionRule::Enumeration(enumeration));
        }

        Ok(Self { base, rules })
    }
}

fn enumeration_display_value(facet: Node) -> Option<String> {
    xml::find_path(
        facet,
        &[
            (XS_NAMESPACE, "annotation"),
            (XS_NAMESPACE, "appinfo"),
            (MS_SERIALIZATION_NAMESPACE, "EnumerationValue"),
        ],
    )
    .and_then(|node| node.text())
    .map(|text| text.trim().to_string())
}
