//! Tolerant parsing of operator-entered numeric fields.
//!
//! Numeric form fields keep two distinct "no value" shapes apart from zero:
//! an empty field stays empty while it is being edited, and it is submitted
//! as JSON `null`. A zero would be read by the service as "exactly zero"
//! rather than "unspecified".
//!
//! - [`coerce_numeric_input`]: clean an edit, rejecting unparseable text
//!   by keeping the previous value.
//! - [`to_optional_number`]: turn a field into the outgoing JSON number or
//!   `None` (serialized as `null`).

use serde_json::Number;
use std::fmt;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Clean one edit of a numeric field.
///
/// An empty `raw` clears the field. Anything else must parse to a finite
/// number, in which case its canonical text is returned (`"012"` → `"12"`).
/// Otherwise the edit is rejected silently and `previous` is returned.
pub fn coerce_numeric_input(raw: &str, previous: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match parse_finite(raw) {
        Some(n) => format_number(n),
        None => previous.to_string(),
    }
}

/// Convert a field value into the number submitted on the wire.
///
/// `None`, empty and whitespace-only values map to `None`, as does anything
/// that does not parse to a finite number. Integral values become JSON
/// integers.
pub fn to_optional_number(field: Option<&str>) -> Option<Number> {
    let raw = field?.trim();
    if raw.is_empty() {
        return None;
    }
    parse_finite(raw).and_then(json_number)
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn is_integral(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT
}

fn json_number(n: f64) -> Option<Number> {
    if is_integral(n) {
        Some(Number::from(n as i64))
    } else {
        Number::from_f64(n)
    }
}

/// Canonical display text for a finite number: integers without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if is_integral(n) {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// One numeric form field holding its clean text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericInput(String);

impl NumericInput {
    /// Build a field from initial text, coercing it like an edit of an
    /// empty field (so unparseable text yields an empty field).
    pub fn new(raw: &str) -> Self {
        Self(coerce_numeric_input(raw, ""))
    }

    /// Apply an operator edit. Returns `false` when the edit was rejected
    /// and the previous value kept.
    pub fn edit(&mut self, raw: &str) -> bool {
        let accepted = raw.is_empty() || parse_finite(raw).is_some();
        self.0 = coerce_numeric_input(raw, &self.0);
        accepted
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value as submitted on the wire.
    pub fn to_number(&self) -> Option<Number> {
        to_optional_number(Some(&self.0))
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
