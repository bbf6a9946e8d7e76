use std::{collections::HashMap, sync::Mutex};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    meta::{enumeration_key_matches, ValidationError},
    native::NativeValue,
};

lazy_static! {
    static ref PATTERNS: Mutex<HashMap<&'static str, Regex>> = Mutex::new(HashMap::new());
}

/// A single facet of a restriction.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule<T> {
    MinInclusive(T),
    MaxInclusive(T),
    /// Accepted raw values mapped to their display values.
    Enumeration(&'static [(&'static str, &'static str)]),
    /// Must match the whole lexical value.
    Pattern(&'static str),
}

impl<T: NativeValue> Rule<T> {
    /// Checks `value`, parsed from `lexical`. Only patterns look at the lexical form.
    pub fn check(&self, value: &T, lexical: &str) -> Result<(), ValidationError> {
        match *self {
            Self::MinInclusive(ref min) => {
                if value < min {
                    return Err(ValidationError::message(format!(
                        "Value {} is lower than {}",
                        value.to_wire(),
                        min.to_wire()
                    )));
                }
            }
            Self::MaxInclusive(ref max) => {
                if value > max {
                    return Err(ValidationError::message(format!(
                        "Value {} is larger than {}",
                        value.to_wire(),
                        max.to_wire()
                    )));
                }
            }
            Self::Enumeration(entries) => {
                if !entries
                    .iter()
                    .any(|(key, _)| enumeration_key_matches(key, value))
                {
                    let keys = entries.iter().map(|(key, _)| *key).collect::<Vec<_>>();
                    return Err(ValidationError::message(format!(
                        "Value {lexical} not in [{}]",
                        keys.join(", ")
                    )));
                }
            }
            Self::Pattern(pattern) => {
                if !pattern_matches(pattern, lexical)? {
                    return Err(ValidationError::message(format!(
                        "Value {lexical} doesn't match pattern {pattern}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Checks every rule, stopping at the first violation.
pub fn check_all<T: NativeValue>(
    value: &T,
    lexical: &str,
    rules: &[Rule<T>],
) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.check(value, lexical))
}

fn pattern_matches(pattern: &'static str, literal: &str) -> Result<bool, ValidationError> {
    let mut patterns = PATTERNS
        .lock()
        .map_err(|_| ValidationError::message("pattern cache is poisoned"))?;
    if !patterns.contains_key(pattern) {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            ValidationError::message(format!("Invalid pattern {pattern}: {e}"))
        })?;
        patterns.insert(pattern, regex);
    }
    Ok(patterns
        .get(pattern)
        .is_some_and(|regex| regex.is_match(literal)))
}
