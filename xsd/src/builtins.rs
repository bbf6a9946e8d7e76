use lazy_static::lazy_static;

use super::xstypes::Identifier;

// Namespaces of the documents this crate reads
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const WSDL_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/";
/// Carries display values of enumerations (`annotation/appinfo/EnumerationValue`).
pub const MS_SERIALIZATION_NAMESPACE: &str = "http://schemas.microsoft.com/2003/10/Serialization/";

/// Local names of the built-in types, in the `xs` namespace.
pub const XS_BUILTIN_TYPES: &[&str] = &[
    "anyType",
    "anySimpleType",
    "string",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "ENTITY",
    "NMTOKEN",
    "boolean",
    "decimal",
    "integer",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "nonPositiveInteger",
    "negativeInteger",
    "double",
    "float",
    "date",
    "dateTime",
    "dateTimeStamp",
    "time",
    "duration",
    "dayTimeDuration",
    "yearMonthDuration",
    "gDay",
    "gMonth",
    "gMonthDay",
    "gYear",
    "gYearMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "QName",
    "NOTATION",
];

lazy_static! {
    /// The `xs:anyType` qualified name
    pub static ref XS_ANY_TYPE_NAME: Identifier = Identifier::with_namespace(XS_NAMESPACE, "anyType");
    pub static ref XS_STRING_NAME: Identifier = Identifier::with_namespace(XS_NAMESPACE, "string");
}

/// The identifiers of every built-in type.
pub fn builtin_identifiers() -> impl Iterator<Item = Identifier> {
    XS_BUILTIN_TYPES
        .iter()
        .map(|name| Identifier::with_namespace(XS_NAMESPACE, *name))
}

pub fn is_builtin(identifier: &Identifier) -> bool {
    identifier.namespace() == Some(XS_NAMESPACE)
        && XS_BUILTIN_TYPES.contains(&identifier.local_name.as_str())
}
