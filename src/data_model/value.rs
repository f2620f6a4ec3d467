//! Canonical parameter value representation used throughout the
//! configuration store, diff engine, and transforms.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl TrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TrValue::Bool(b) => Some(*b),
            TrValue::Str(s) => Some(s == "1" || s.eq_ignore_ascii_case("true")),
            TrValue::Int(i) => Some(*i != 0),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TrValue::Int(i) => Some(*i),
            TrValue::Str(s) => s.parse().ok(),
            TrValue::Bool(b) => Some(*b as i64),
        }
    }

    pub fn as_str(&self) -> Option<String> {
        match self {
            TrValue::Str(s) => Some(s.clone()),
            TrValue::Int(i) => Some(i.to_string()),
            TrValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl fmt::Display for TrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrValue::Bool(b) => write!(f, "{b}"),
            TrValue::Int(i) => write!(f, "{i}"),
            TrValue::Str(s) => write!(f, "{s}"),
        }
    }
}
