//! Normalized `xs:duration` values.
//!
//! Normalization carries seconds into minutes, minutes into hours and hours into days, then
//! re-splits the day total assuming a year of 365 days and a month of 30 days. This is an
//! approximation, not calendar arithmetic.

use std::{cmp::Ordering, fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::meta::ValidationError;

const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;
const HOURS_PER_DAY: u64 = 24;
const DAYS_PER_YEAR: u64 = 365;
const DAYS_PER_MONTH: u64 = 30;

lazy_static! {
    static ref DURATION: Regex = Regex::new(
        r"^(-)?P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)D)?(T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$"
    )
    .unwrap();
    static ref WEEKS: Regex = Regex::new(r"^-?P[^T]*\d+W").unwrap();
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    negative: bool,
    years: u64,
    months: u64,
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: Decimal,
}

fn overflow() -> ValidationError {
    ValidationError::message("Duration is too large")
}

fn add(a: u64, b: u64) -> Result<u64, ValidationError> {
    a.checked_add(b).ok_or_else(overflow)
}

fn mul(a: u64, b: u64) -> Result<u64, ValidationError> {
    a.checked_mul(b).ok_or_else(overflow)
}

impl Duration {
    /// Builds a normalized duration.
    pub fn new(
        negative: bool,
        years: u64,
        months: u64,
        days: u64,
        hours: u64,
        minutes: u64,
        seconds: Decimal,
    ) -> Result<Self, ValidationError> {
        if seconds.is_sign_negative() && !seconds.is_zero() {
            return Err(ValidationError::message(
                "Only positive values are accepted for seconds",
            ));
        }
        Self {
            negative,
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
        .normalized()
    }

    fn normalized(mut self) -> Result<Self, ValidationError> {
        let per_minute = Decimal::from(SECONDS_PER_MINUTE);
        let carry = (self.seconds / per_minute).trunc();
        self.seconds = (self.seconds - carry * per_minute).normalize();
        self.minutes = add(self.minutes, carry.to_u64().ok_or_else(overflow)?)?;

        self.hours = add(self.hours, self.minutes / MINUTES_PER_HOUR)?;
        self.minutes %= MINUTES_PER_HOUR;
        self.days = add(self.days, self.hours / HOURS_PER_DAY)?;
        self.hours %= HOURS_PER_DAY;

        let all_days = add(
            add(self.days, mul(self.months, DAYS_PER_MONTH)?)?,
            mul(self.years, DAYS_PER_YEAR)?,
        )?;
        self.years = all_days / DAYS_PER_YEAR;
        self.months = all_days % DAYS_PER_YEAR / DAYS_PER_MONTH;
        self.days = all_days % DAYS_PER_YEAR % DAYS_PER_MONTH;

        if self.is_zero() {
            self.negative = false;
        }
        Ok(self)
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn years(&self) -> u64 {
        self.years
    }

    pub fn months(&self) -> u64 {
        self.months
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn hours(&self) -> u64 {
        self.hours
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn seconds(&self) -> Decimal {
        self.seconds
    }

    fn magnitude(&self) -> (u64, u64, u64, u64, u64, Decimal) {
        (
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        )
    }
}

impl FromStr for Duration {
    type Err = ValidationError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        if WEEKS.is_match(literal) {
            return Err(ValidationError::message("Weeks are not supported"));
        }
        let invalid =
            || ValidationError::message(format!("{literal} is not valid ISO 8601 duration string"));
        let captures = DURATION.captures(literal).ok_or_else(invalid)?;

        let has_date = (2..=4).any(|i| captures.get(i).is_some());
        let has_time = (6..=8).any(|i| captures.get(i).is_some());
        // "P" and "PT" alone, or a "T" without any time component
        if (!has_date && !has_time) || (captures.get(5).is_some() && !has_time) {
            return Err(invalid());
        }

        let number = |i: usize| -> Result<u64, ValidationError> {
            captures
                .get(i)
                .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| overflow()))
        };
        let seconds = match captures.get(8) {
            Some(m) => Decimal::from_str(m.as_str()).map_err(|_| invalid())?,
            None => Decimal::ZERO,
        };
        Duration::new(
            captures.get(1).is_some(),
            number(2)?,
            number(3)?,
            number(4)?,
            number(6)?,
            number(7)?,
            seconds,
        )
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "PT0S");
        }
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        for (value, designator) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value > 0 {
                write!(f, "{value}{designator}")?;
            }
        }
        if self.hours > 0 || self.minutes > 0 || !self.seconds.is_zero() {
            write!(f, "T")?;
            for (value, designator) in [(self.hours, 'H'), (self.minutes, 'M')] {
                if value > 0 {
                    write!(f, "{value}{designator}")?;
                }
            }
            if !self.seconds.is_zero() {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

/// Orders by sign, then by the normalized fields from years down to seconds.
impl Ord for Duration {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (negative, _) => {
                let ordering = self.magnitude().cmp(&other.magnitude());
                if negative {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
        }
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn duration(literal: &str) -> Duration {
        literal.parse().unwrap()
    }

    #[test]
    fn parses_all_components() {
        let value = duration("P1Y2M10DT2H30M");
        assert_eq!(
            value.magnitude(),
            (1, 2, 10, 2, 30, Decimal::ZERO),
        );
        assert!(!value.is_negative());
    }

    #[test]
    fn days_split_into_months() {
        let value = duration("P40D");
        assert_eq!(value.magnitude(), (0, 1, 10, 0, 0, Decimal::ZERO));

        let value = duration("P400D");
        assert_eq!(value.magnitude(), (1, 1, 5, 0, 0, Decimal::ZERO));
    }

    #[test]
    fn time_carries_over() {
        let value = duration("PT90M");
        assert_eq!((value.hours(), value.minutes()), (1, 30));

        let value = duration("PT3725.5S");
        assert_eq!(
            value.magnitude(),
            (0, 0, 0, 1, 2, Decimal::from_str("5.5").unwrap()),
        );

        let value = duration("PT25H");
        assert_eq!((value.days(), value.hours()), (1, 1));
    }

    #[test]
    fn compares_sign_then_fields() {
        assert!(duration("P2Y") > duration("P1Y"));
        assert!(duration("P1M") > duration("P29D"));
        assert!(duration("-P1D") < duration("PT1S"));
        assert!(duration("-P2D") < duration("-P1D"));
        assert_eq!(duration("PT60M"), duration("PT1H"));
        assert_eq!(duration("P30D").cmp(&duration("P1M")), Ordering::Equal);
    }

    #[test]
    fn negative_zero_is_zero() {
        let value = duration("-P0D");
        assert!(!value.is_negative());
        assert_eq!(value, Duration::default());
    }

    #[test]
    fn rejects_invalid_literals() {
        for literal in ["", "P", "PT", "P1YT", "1Y", "P1.5Y", "PT1.S", "P-1D"] {
            assert!(literal.parse::<Duration>().is_err(), "{literal:?}");
        }
        let error = "P2W".parse::<Duration>().unwrap_err();
        assert_eq!(error.rule_message(), Some("Weeks are not supported"));
    }

    #[test]
    fn renders_canonical_form() {
        assert_eq!(duration("P1Y2M10DT2H30M").to_string(), "P1Y2M10DT2H30M");
        assert_eq!(duration("-PT1.50S").to_string(), "-PT1.5S");
        assert_eq!(duration("P0Y").to_string(), "PT0S");
        assert_eq!(duration("P13M").to_string(), "P1Y25D");
    }
}
