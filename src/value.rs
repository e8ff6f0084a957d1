//! Tagged result type for [`Classifier::convert`](crate::Classifier::convert).

use std::fmt;

/// What a classified buffer converts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integral number, e.g. `"-123"` or `"(1,200)"`.
    Integer(i64),
    /// A fractional (or non-integral scaled) number, e.g. `"12.5"` or `"12%"`.
    Float(f64),
    /// A boolean literal, matched case-insensitively.
    Bool(bool),
    /// A null literal (`none`/`null`), matched case-insensitively.
    Null,
    /// Anything else: the fallback transform's output (plain text by default).
    Text(String),
}

impl Value {
    /// Builds `Integer` when the value is integral and in `i64` range,
    /// `Float` otherwise.
    pub(crate) fn from_f64(v: f64) -> Value {
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
            Value::Integer(v as i64)
        } else {
            Value::Float(v)
        }
    }

    /// The numeric value, widening integers to `f64`. `None` for
    /// booleans, nulls and text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The integer value, if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for the `Null` tag.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The text payload, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(Value::from_f64(-123.0), Value::Integer(-123));
        assert_eq!(Value::from_f64(0.0), Value::Integer(0));
        assert_eq!(Value::from_f64(12.5), Value::Float(12.5));
    }

    #[test]
    fn accessors_match_tags() {
        assert_eq!(Value::Integer(7).as_f64(), Some(7.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Text("x".into()).as_text(), Some("x"));
        assert_eq!(Value::Text("x".into()).as_f64(), None);
    }
}
