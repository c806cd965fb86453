//! Primitive Value Conversion
//!
//! Raw option values arrive as strings. Each bindable field declares one of a
//! small set of primitive kinds, and every kind has exactly one conversion
//! function. A failed conversion is a typed error, never a panic.

use std::fmt;
use thiserror::Error;

/// Primitive types a value-bearing option can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    String,
    Integer,
    Float,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw value that could not be converted to the declared kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert '{raw}' to {expected}")]
pub struct ConversionError {
    pub raw: String,
    pub expected: PrimitiveKind,
}

impl ConversionError {
    fn new(raw: &str, expected: PrimitiveKind) -> Self {
        Self { raw: raw.to_string(), expected }
    }
}

/// Accepts `true` / `false` in any letter case.
pub fn to_bool(raw: &str) -> Result<bool, ConversionError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConversionError::new(raw, PrimitiveKind::Bool))
    }
}

pub fn to_string(raw: &str) -> Result<String, ConversionError> {
    Ok(raw.to_string())
}

pub fn to_integer(raw: &str) -> Result<i64, ConversionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ConversionError::new(raw, PrimitiveKind::Integer))
}

pub fn to_float(raw: &str) -> Result<f64, ConversionError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::new(raw, PrimitiveKind::Float))
}

/// Typed setter for one field of a parameter record.
///
/// The variant fixes both the field kind and the conversion applied to the
/// raw token, so a setter can never receive a value of the wrong type.
pub enum Setter<R> {
    /// Boolean flag: present means `true`, consumes no value.
    Flag(fn(&mut R)),
    Bool(fn(&mut R, bool)),
    String(fn(&mut R, String)),
    Integer(fn(&mut R, i64)),
    Float(fn(&mut R, f64)),
}

impl<R> Setter<R> {
    /// The primitive kind of the value this setter consumes, `None` for flags.
    pub fn value_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Setter::Flag(_) => None,
            Setter::Bool(_) => Some(PrimitiveKind::Bool),
            Setter::String(_) => Some(PrimitiveKind::String),
            Setter::Integer(_) => Some(PrimitiveKind::Integer),
            Setter::Float(_) => Some(PrimitiveKind::Float),
        }
    }

    pub fn is_value_bearing(&self) -> bool {
        !matches!(self, Setter::Flag(_))
    }

    /// Convert `raw` and store it. Flags ignore `raw` and are set to true.
    pub fn apply(&self, record: &mut R, raw: &str) -> Result<(), ConversionError> {
        match self {
            Setter::Flag(set) => set(record),
            Setter::Bool(set) => set(record, to_bool(raw)?),
            Setter::String(set) => set(record, to_string(raw)?),
            Setter::Integer(set) => set(record, to_integer(raw)?),
            Setter::Float(set) => set(record, to_float(raw)?),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_is_case_insensitive() {
        assert_eq!(to_bool("TRUE"), Ok(true));
        assert_eq!(to_bool("False"), Ok(false));
        assert_eq!(
            to_bool("yes"),
            Err(ConversionError { raw: "yes".to_string(), expected: PrimitiveKind::Bool })
        );
    }

    #[test]
    fn test_integer_and_float() {
        assert_eq!(to_integer("42"), Ok(42));
        assert_eq!(to_integer("-7"), Ok(-7));
        assert!(to_integer("4.2").is_err());
        assert_eq!(to_float("0.5"), Ok(0.5));
        assert!(to_float("half").is_err());
    }

    #[test]
    fn test_string_keeps_case() {
        assert_eq!(to_string("MixedCase"), Ok("MixedCase".to_string()));
    }

    #[test]
    fn test_setter_apply() {
        #[derive(Default)]
        struct Rec {
            n: i64,
            on: bool,
        }

        let mut rec = Rec::default();
        let count: Setter<Rec> = Setter::Integer(|r, v| r.n = v);
        let flag: Setter<Rec> = Setter::Flag(|r| r.on = true);

        count.apply(&mut rec, "12").unwrap();
        flag.apply(&mut rec, "ignored").unwrap();
        assert_eq!(rec.n, 12);
        assert!(rec.on);

        let err = count.apply(&mut rec, "x").unwrap_err();
        assert_eq!(err.expected, PrimitiveKind::Integer);
        assert_eq!(rec.n, 12);
        assert!(!flag.is_value_bearing());
        assert_eq!(count.value_kind(), Some(PrimitiveKind::Integer));
    }
}
