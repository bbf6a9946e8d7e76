//! The built-in XSD types.
//!
//! Each type validates through its base before applying its own constraints, so for example
//! `byte` checks `short`, `int`, `long`, `integer` and `decimal` in turn.

use std::string::String as StdString;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::{prelude::FromPrimitive, Decimal as StdDecimal};

use crate::{
    meta::{self, SimpleType, TypeMeta, ValidationError, Whitespace},
    restriction::Rule,
    wire::WireValue,
    xml::text_content,
    XmlNode,
};

pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

macro_rules! builtin {
    (
        $(#[$attr:meta])*
        $name:ident($native:ty) = $xs_name:literal, $whitespace:ident,
        |$value:pat_param, $lexical:pat_param| $validate:block
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug, PartialEq, PartialOrd)]
        pub struct $name($native);

        impl meta::AnyType for $name {
            type Native = $native;
            const META: TypeMeta = TypeMeta::new($xs_name, XS_NAMESPACE);

            fn from_native(native: $native) -> Result<Self, ValidationError> {
                Self::new(native)
            }

            fn from_node(node: XmlNode) -> Result<Self, ValidationError> {
                Self::from_literal(&text_content(node))
            }

            fn to_wire(&self) -> WireValue {
                WireValue::Text(self.wire_value())
            }
        }

        impl SimpleType for $name {
            const WHITESPACE: Whitespace = Whitespace::$whitespace;

            fn validate($value: &$native, $lexical: &str) -> Result<(), ValidationError> $validate

            fn from_validated(value: $native) -> Self {
                Self(value)
            }

            fn value(&self) -> &$native {
                &self.0
            }
        }
    };
}

/// Types carried as text without further constraints.
macro_rules! text_builtins {
    ($($name:ident = $xs_name:literal),* $(,)?) => {
        $(
            builtin!($name(StdString) = $xs_name, Collapse, |value, lexical| {
                AnySimpleType::validate(value, lexical)
            });
        )*
    };
}

fn strict_sign(valid: bool, message: &str) -> Result<(), ValidationError> {
    if valid {
        Ok(())
    } else {
        Err(ValidationError::message(message))
    }
}

builtin!(AnySimpleType(StdString) = "anySimpleType", Preserve, |_, _| { Ok(()) });

builtin!(String(StdString) = "string", Preserve, |value, lexical| {
    AnySimpleType::validate(value, lexical)
});

builtin!(NormalizedString(StdString) = "normalizedString", Replace, |value, lexical| {
    String::validate(value, lexical)?;
    strict_sign(
        !value.contains(['\t', '\n', '\r']),
        "Only strings without tabs or line breaks are accepted",
    )
});

builtin!(Token(StdString) = "token", Collapse, |value, lexical| {
    NormalizedString::validate(value, lexical)?;
    strict_sign(
        !value.starts_with(' ') && !value.ends_with(' ') && !value.contains("  "),
        "Only strings with collapsed whitespace are accepted",
    )
});

builtin!(Language(StdString) = "language", Collapse, |value, lexical| {
    Token::validate(value, lexical)?;
    Rule::Pattern("[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*").check(value, lexical)
});

builtin!(NmToken(StdString) = "NMTOKEN", Collapse, |value, lexical| {
    Token::validate(value, lexical)?;
    Rule::Pattern(r"[-.:\w]+").check(value, lexical)
});

builtin!(Name(StdString) = "Name", Collapse, |value, lexical| {
    Token::validate(value, lexical)?;
    Rule::Pattern(r"[\p{L}_:][-.:\w]*").check(value, lexical)
});

builtin!(NcName(StdString) = "NCName", Collapse, |value, lexical| {
    Name::validate(value, lexical)?;
    Rule::Pattern(r"[\p{L}_][-.\w]*").check(value, lexical)
});

builtin!(Id(StdString) = "ID", Collapse, |value, lexical| {
    NcName::validate(value, lexical)
});
builtin!(IdRef(StdString) = "IDREF", Collapse, |value, lexical| {
    NcName::validate(value, lexical)
});
builtin!(Entity(StdString) = "ENTITY", Collapse, |value, lexical| {
    NcName::validate(value, lexical)
});

builtin!(Boolean(bool) = "boolean", Collapse, |_, _| { Ok(()) });

builtin!(Decimal(StdDecimal) = "decimal", Collapse, |_, _| { Ok(()) });

builtin!(Integer(i128) = "integer", Collapse, |value, lexical| {
    let decimal = StdDecimal::from_i128(*value)
        .ok_or_else(|| ValidationError::message(format!("Value {value} is not a decimal")))?;
    Decimal::validate(&decimal, lexical)
});

builtin!(Long(i64) = "long", Collapse, |value, lexical| {
    Integer::validate(&i128::from(*value), lexical)
});

builtin!(Int(i32) = "int", Collapse, |value, lexical| {
    Long::validate(&i64::from(*value), lexical)
});

builtin!(Short(i16) = "short", Collapse, |value, lexical| {
    Int::validate(&i32::from(*value), lexical)
});

builtin!(Byte(i8) = "byte", Collapse, |value, lexical| {
    Short::validate(&i16::from(*value), lexical)
});

builtin!(NonNegativeInteger(i128) = "nonNegativeInteger", Collapse, |value, lexical| {
    Integer::validate(value, lexical)?;
    Rule::MinInclusive(0).check(value, lexical)
});

builtin!(PositiveInteger(i128) = "positiveInteger", Collapse, |value, lexical| {
    NonNegativeInteger::validate(value, lexical)?;
    strict_sign(*value > 0, "Only positive integers are accepted")
});

builtin!(UnsignedLong(u64) = "unsignedLong", Collapse, |value, lexical| {
    NonNegativeInteger::validate(&i128::from(*value), lexical)
});

builtin!(UnsignedInt(u32) = "unsignedInt", Collapse, |value, lexical| {
    UnsignedLong::validate(&u64::from(*value), lexical)
});

builtin!(UnsignedShort(u16) = "unsignedShort", Collapse, |value, lexical| {
    UnsignedInt::validate(&u32::from(*value), lexical)
});

builtin!(UnsignedByte(u8) = "unsignedByte", Collapse, |value, lexical| {
    UnsignedShort::validate(&u16::from(*value), lexical)
});

builtin!(NonPositiveInteger(i128) = "nonPositiveInteger", Collapse, |value, lexical| {
    Integer::validate(value, lexical)?;
    Rule::MaxInclusive(0).check(value, lexical)
});

builtin!(NegativeInteger(i128) = "negativeInteger", Collapse, |value, lexical| {
    NonPositiveInteger::validate(value, lexical)?;
    strict_sign(*value < 0, "Only negative integers are accepted")
});

builtin!(Double(f64) = "double", Collapse, |_, _| { Ok(()) });
builtin!(Float(f32) = "float", Collapse, |_, _| { Ok(()) });

builtin!(Date(NaiveDate) = "date", Collapse, |_, _| { Ok(()) });
builtin!(DateTime(NaiveDateTime) = "dateTime", Collapse, |_, _| { Ok(()) });

builtin!(DateTimeStamp(chrono::DateTime<Utc>) = "dateTimeStamp", Collapse, |value, lexical| {
    DateTime::validate(&value.naive_utc(), lexical)
});

builtin!(Time(NaiveTime) = "time", Collapse, |_, _| { Ok(()) });

builtin!(Duration(crate::duration::Duration) = "duration", Collapse, |_, _| { Ok(()) });

builtin!(HexBinary(StdString) = "hexBinary", Collapse, |value, lexical| {
    Rule::Pattern("([0-9a-fA-F]{2})*").check(value, lexical)
});

builtin!(Base64Binary(StdString) = "base64Binary", Collapse, |value, lexical| {
    Rule::Pattern("[A-Za-z0-9+/]*={0,2}").check(value, lexical)
});

text_builtins! {
    AnyUri = "anyURI",
    QName = "QName",
    Notation = "NOTATION",
    GDay = "gDay",
    GMonth = "gMonth",
    GMonthDay = "gMonthDay",
    GYear = "gYear",
    GYearMonth = "gYearMonth",
    DayTimeDuration = "dayTimeDuration",
    YearMonthDuration = "yearMonthDuration",
}

/// `xs:anyType`, keeping whatever content it was given.
#[derive(Clone, Debug, PartialEq)]
pub struct AnyType(WireValue);

impl AnyType {
    pub fn content(&self) -> &WireValue {
        &self.0
    }
}

impl meta::AnyType for AnyType {
    type Native = WireValue;
    const META: TypeMeta = TypeMeta::new("anyType", XS_NAMESPACE);

    fn from_native(native: WireValue) -> Result<Self, ValidationError> {
        Ok(Self(native))
    }

    fn from_node(node: XmlNode) -> Result<Self, ValidationError> {
        Ok(Self(WireValue::from_node(node)))
    }

    fn to_wire(&self) -> WireValue {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::AnyType as _;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn message(error: ValidationError) -> StdString {
        error.rule_message().unwrap_or_default().to_string()
    }

    #[test]
    fn bounded_ladder_accepts_endpoints() {
        assert!(Byte::from_literal("-128").is_ok());
        assert!(Byte::from_literal("127").is_ok());
        assert!(Short::from_literal("32767").is_ok());
        assert!(Int::from_literal("-2147483648").is_ok());
        assert!(Int::from_literal("2147483647").is_ok());
        assert!(Long::from_literal("9223372036854775807").is_ok());
        assert!(UnsignedByte::from_literal("255").is_ok());
        assert!(UnsignedShort::from_literal("0").is_ok());
        assert!(UnsignedInt::from_literal("4294967295").is_ok());
        assert!(UnsignedLong::from_literal("18446744073709551615").is_ok());
    }

    #[test]
    fn bounded_ladder_rejects_one_past_the_bounds() {
        assert_eq!(
            message(Byte::from_literal("128").unwrap_err()),
            "Value 128 not in range [-128, 127]"
        );
        assert!(Byte::from_literal("-129").is_err());
        assert!(Short::from_literal("32768").is_err());
        assert!(Int::from_literal("-2147483649").is_err());
        assert!(Int::from_literal("2147483648").is_err());
        assert!(Long::from_literal("-9223372036854775809").is_err());
        assert!(UnsignedByte::from_literal("256").is_err());
        assert!(UnsignedInt::from_literal("-1").is_err());
        assert!(UnsignedLong::from_literal("18446744073709551616").is_err());
    }

    #[test]
    fn signed_integers_check_their_sign() {
        assert!(NonNegativeInteger::new(0).is_ok());
        assert_eq!(
            message(NonNegativeInteger::new(-1).unwrap_err()),
            "Value -1 is lower than 0"
        );
        assert!(PositiveInteger::new(1).is_ok());
        assert_eq!(
            message(PositiveInteger::new(0).unwrap_err()),
            "Only positive integers are accepted"
        );
        assert!(NonPositiveInteger::new(0).is_ok());
        assert!(NonPositiveInteger::new(1).is_err());
        assert!(NegativeInteger::new(-1).is_ok());
        assert_eq!(
            message(NegativeInteger::new(0).unwrap_err()),
            "Only negative integers are accepted"
        );
    }

    #[test]
    fn integer_must_fit_a_decimal() {
        assert!(Integer::new(i128::from(i64::MAX) * 1000).is_ok());
        assert!(Integer::new(i128::MAX).is_err());
    }

    #[test]
    fn booleans_and_dates_render_lexically() {
        let value = Boolean::from_literal(" 1 ").unwrap();
        assert_eq!(value.to_wire(), WireValue::Text("true".into()));
        let value = DateTime::from_literal("2020-01-02T03:04:05+01:00").unwrap();
        assert_eq!(value.wire_value(), "2020-01-02T02:04:05Z");
        let value = Duration::from_literal("P40D").unwrap();
        assert_eq!(value.wire_value(), "P1M10D");
    }

    #[test]
    fn string_family_normalizes_whitespace() {
        let value = NormalizedString::from_literal("a\tb\nc").unwrap();
        assert_eq!(value.value(), "a b c");
        let value = Token::from_literal("  a   b ").unwrap();
        assert_eq!(value.value(), "a b");
        assert!(Token::new(" a".into()).is_err());
        let value = String::from_literal("  kept  ").unwrap();
        assert_eq!(value.value(), "  kept  ");
    }

    #[test]
    fn name_types_follow_patterns() {
        assert!(Language::from_literal("en-US").is_ok());
        assert!(Language::from_literal("englishlanguage").is_err());
        assert!(NcName::from_literal("a:b").is_err());
        assert!(Name::from_literal("a:b").is_ok());
        assert!(Name::from_literal("1a").is_err());
        assert!(NcName::new("a b".into()).is_err());
        assert!(NormalizedString::new("a\tb".into()).is_err());
        assert!(Id::from_literal("1abc").is_err());
        assert!(HexBinary::from_literal("0fA1").is_ok());
        assert!(HexBinary::from_literal("0fA").is_err());
    }

    #[test]
    fn parses_from_nodes() {
        let document = roxmltree::Document::parse("<v> 42 </v>").unwrap();
        let value = Int::from_node(document.root_element()).unwrap();
        assert_eq!(*value.value(), 42);

        let document = roxmltree::Document::parse("<v><a>1</a><a>2</a><b>x</b></v>").unwrap();
        let value = AnyType::from_node(document.root_element()).unwrap();
        assert_matches!(value.content().get("a"), Some(WireValue::List(items)) if items.len() == 2);
        assert_eq!(
            value.content().get("b").and_then(WireValue::as_text),
            Some("x")
        );
    }
}
