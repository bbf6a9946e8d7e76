use super::error::XsdError;
use std::fmt;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace-qualified name, the key every declaration is referenced by.
///
/// Rendered as `{namespace}local_name`, or just `local_name` without a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = self.namespace.as_ref() {
            write!(f, "{{{}}}{}", namespace, self.local_name)
        } else {
            write!(f, "{}", self.local_name)
        }
    }
}

impl Identifier {
    pub fn with_namespace(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self::with_optional_namespace(Some(namespace), local_name)
    }

    pub fn with_optional_namespace(
        namespace: Option<impl Into<String>>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            local_name: local_name.into(),
        }
    }

    /// Resolves `prefix` against the namespaces in scope at `context`. `xml` is always bound.
    pub fn qualified(
        prefix: &str,
        local_name: impl Into<String>,
        context: roxmltree::Node,
    ) -> Result<Self, XsdError> {
        let namespace = match prefix {
            "xml" => XML_NAMESPACE,
            _ => context
                .lookup_namespace_uri(Some(prefix))
                .ok_or_else(|| XsdError::NamePrefixNotResolved(prefix.into()))?,
        };
        Ok(Self::with_namespace(namespace, local_name))
    }

    /// Takes the default namespace in scope, if any.
    pub fn unqualified(local_name: impl Into<String>, context: roxmltree::Node) -> Self {
        Self::with_optional_namespace(context.lookup_namespace_uri(None), local_name)
    }

    /// Resolves a `prefix:name` reference against the namespaces in scope at `context`.
    pub fn parse(source: &str, context: roxmltree::Node) -> Result<Self, XsdError> {
        if let Some((prefix, local)) = source.rsplit_once(':') {
            Self::qualified(prefix, local, context)
        } else {
            Ok(Self::unqualified(source, context))
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_prefixed_and_default_names() {
        let document = roxmltree::Document::parse(
            r#"<root xmlns="urn:default" xmlns:t="urn:t"><child/></root>"#,
        )
        .unwrap();
        let child = document.root_element().first_element_child().unwrap();

        let id = Identifier::parse("t:Order", child).unwrap();
        assert_eq!(id, Identifier::with_namespace("urn:t", "Order"));
        assert_eq!(id.to_string(), "{urn:t}Order");

        let id = Identifier::parse("Order", child).unwrap();
        assert_eq!(id.namespace(), Some("urn:default"));

        assert_eq!(
            Identifier::parse("xml:lang", child).unwrap().namespace(),
            Some(XML_NAMESPACE)
        );
        assert_matches!(
            Identifier::parse("missing:Order", child),
            Err(XsdError::NamePrefixNotResolved(prefix)) if prefix == "missing"
        );
    }

    #[test]
    fn displays_without_namespace() {
        let id = Identifier::with_optional_namespace(None::<String>, "plain");
        assert_eq!(id.to_string(), "plain");
    }
}
