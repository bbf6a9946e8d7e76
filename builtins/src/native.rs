use std::{fmt, str::FromStr};

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use rust_decimal::Decimal;

use crate::{duration::Duration, meta::ValidationError};

/// A value type simple types are built on.
pub trait NativeValue: Clone + fmt::Debug + PartialEq + PartialOrd {
    /// Parses the (already whitespace-normalized) lexical form.
    fn parse_literal(literal: &str) -> Result<Self, ValidationError>;

    /// The canonical lexical form.
    fn to_wire(&self) -> String;
}

fn invalid_literal(literal: &str, kind: &str) -> ValidationError {
    ValidationError::message(format!("Value {literal:?} is not a valid {kind}"))
}

impl NativeValue for String {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        Ok(literal.to_string())
    }

    fn to_wire(&self) -> String {
        self.clone()
    }
}

impl NativeValue for bool {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        match literal {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid_literal(literal, "boolean")),
        }
    }

    fn to_wire(&self) -> String {
        (if *self { "true" } else { "false" }).to_string()
    }
}

macro_rules! native_integer {
    ($($t:ty),*) => {
        $(
            impl NativeValue for $t {
                fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
                    let digits = literal.strip_prefix('+').unwrap_or(literal);
                    let wide: i128 = digits
                        .parse()
                        .map_err(|_| invalid_literal(literal, "integer"))?;
                    <$t>::try_from(wide).map_err(|_| {
                        ValidationError::message(format!(
                            "Value {} not in range [{}, {}]",
                            wide,
                            <$t>::MIN,
                            <$t>::MAX
                        ))
                    })
                }

                fn to_wire(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

native_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! native_float {
    ($($t:ty),*) => {
        $(
            impl NativeValue for $t {
                fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
                    match literal {
                        "INF" | "+INF" => Ok(<$t>::INFINITY),
                        "-INF" => Ok(<$t>::NEG_INFINITY),
                        "NaN" => Ok(<$t>::NAN),
                        _ => literal.parse().map_err(|_| invalid_literal(literal, "floating point number")),
                    }
                }

                fn to_wire(&self) -> String {
                    if self.is_nan() {
                        "NaN".to_string()
                    } else if self.is_infinite() {
                        (if self.is_sign_positive() { "INF" } else { "-INF" }).to_string()
                    } else {
                        self.to_string()
                    }
                }
            }
        )*
    };
}

native_float!(f32, f64);

impl NativeValue for Decimal {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        let digits = literal.strip_prefix('+').unwrap_or(literal);
        Decimal::from_str(digits).map_err(|_| invalid_literal(literal, "decimal"))
    }

    fn to_wire(&self) -> String {
        self.normalize().to_string()
    }
}

/// Splits a trailing `Z` or `±hh:mm` timezone off a date/time literal.
fn split_timezone(literal: &str) -> Result<(&str, Option<FixedOffset>), ValidationError> {
    if let Some(local) = literal.strip_suffix('Z') {
        return Ok((local, FixedOffset::east_opt(0)));
    }
    let Some(split) = literal.len().checked_sub(6) else {
        return Ok((literal, None));
    };
    if !literal.is_char_boundary(split) {
        return Ok((literal, None));
    }
    let (local, zone) = literal.split_at(split);
    let zone_bytes = zone.as_bytes();
    if !(zone_bytes[0] == b'+' || zone_bytes[0] == b'-') || zone_bytes[3] != b':' {
        return Ok((literal, None));
    }
    let hours: i32 = zone[1..3]
        .parse()
        .map_err(|_| invalid_literal(literal, "timezone"))?;
    let minutes: i32 = zone[4..6]
        .parse()
        .map_err(|_| invalid_literal(literal, "timezone"))?;
    let seconds = (hours * 60 + minutes) * 60;
    let offset = if zone_bytes[0] == b'-' {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    };
    match offset {
        Some(offset) => Ok((local, Some(offset))),
        None => Err(invalid_literal(literal, "timezone")),
    }
}

impl NativeValue for NaiveDate {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        let (local, _) = split_timezone(literal)?;
        NaiveDate::parse_from_str(local, "%Y-%m-%d").map_err(|_| invalid_literal(literal, "date"))
    }

    fn to_wire(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

/// Values carrying a timezone are shifted to UTC.
impl NativeValue for NaiveDateTime {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        let (local, offset) = split_timezone(literal)?;
        let value = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| invalid_literal(literal, "dateTime"))?;
        match offset {
            Some(offset) => offset
                .from_local_datetime(&value)
                .single()
                .map(|value| value.naive_utc())
                .ok_or_else(|| invalid_literal(literal, "dateTime")),
            None => Ok(value),
        }
    }

    fn to_wire(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.fZ").to_string()
    }
}

/// Requires an explicit timezone.
impl NativeValue for DateTime<Utc> {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(literal)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|_| invalid_literal(literal, "dateTimeStamp"))
    }

    fn to_wire(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl NativeValue for NaiveTime {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        let (local, _) = split_timezone(literal)?;
        NaiveTime::parse_from_str(local, "%H:%M:%S%.f").map_err(|_| invalid_literal(literal, "time"))
    }

    fn to_wire(&self) -> String {
        self.format("%H:%M:%S%.f").to_string()
    }
}

impl NativeValue for Duration {
    fn parse_literal(literal: &str) -> Result<Self, ValidationError> {
        literal.parse()
    }

    fn to_wire(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integers_report_their_range() {
        assert_eq!(i8::parse_literal("127"), Ok(127));
        assert_eq!(i8::parse_literal("-128"), Ok(-128));
        let error = i8::parse_literal("128").unwrap_err();
        assert_eq!(error.rule_message(), Some("Value 128 not in range [-128, 127]"));
        assert!(u8::parse_literal("-1").is_err());
        assert_eq!(u64::parse_literal("+18446744073709551615"), Ok(u64::MAX));
        assert!(i32::parse_literal("twelve").is_err());
    }

    #[test]
    fn booleans_render_as_tokens() {
        assert_eq!(bool::parse_literal("1"), Ok(true));
        assert_eq!(bool::parse_literal("false"), Ok(false));
        assert!(bool::parse_literal("yes").is_err());
        assert_eq!(true.to_wire(), "true");
        assert_eq!(false.to_wire(), "false");
    }

    #[test]
    fn floats_accept_special_values() {
        assert_eq!(f64::parse_literal("INF"), Ok(f64::INFINITY));
        assert_eq!(f32::parse_literal("-INF"), Ok(f32::NEG_INFINITY));
        assert!(f64::parse_literal("NaN").unwrap().is_nan());
        assert_eq!(f64::NEG_INFINITY.to_wire(), "-INF");
        assert_eq!(1.5f64.to_wire(), "1.5");
    }

    #[test]
    fn date_times_render_in_utc() {
        let value = NaiveDateTime::parse_literal("2024-03-01T10:15:30+02:00").unwrap();
        assert_eq!(value.to_wire(), "2024-03-01T08:15:30Z");
        let value = NaiveDateTime::parse_literal("2024-03-01T10:15:30.25").unwrap();
        assert_eq!(value.to_wire(), "2024-03-01T10:15:30.250Z");
        assert!(NaiveDateTime::parse_literal("2024-03-01").is_err());
    }

    #[test]
    fn date_time_stamps_need_a_timezone() {
        assert!(DateTime::<Utc>::parse_literal("2024-03-01T10:15:30").is_err());
        let value = DateTime::<Utc>::parse_literal("2024-03-01T10:15:30-01:00").unwrap();
        assert_eq!(value.to_wire(), "2024-03-01T11:15:30Z");
    }

    #[test]
    fn dates_ignore_timezone() {
        let date = NaiveDate::parse_literal("2024-02-29Z").unwrap();
        assert_eq!(date.to_wire(), "2024-02-29");
        assert_eq!(
            NaiveDate::parse_literal("2024-02-29+05:00").unwrap().to_wire(),
            "2024-02-29"
        );
        assert!(NaiveDate::parse_literal("2023-02-29").is_err());
    }

    #[test]
    fn decimals_drop_trailing_zeros() {
        assert_eq!(Decimal::parse_literal("+1.500").unwrap().to_wire(), "1.5");
        assert!(Decimal::parse_literal("1.2.3").is_err());
    }
}
