//! Parameter Binder
//!
//! Scans a command's argument tokens left to right and populates a fresh
//! parameter record through its schema.
//!
//! Rules, per token:
//! - a value-bearing option with a following token consumes that token as
//!   its value
//! - a boolean flag is set to true
//! - anything else is skipped
//!
//! Any token starting with `--`, recognized or not, switches `verbose` on for
//! the rest of the bind.

use thiserror::Error;

use super::schema::ParameterSchema;
use super::value::PrimitiveKind;
use super::Parameters;

/// A token sequence that could not be bound to a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("invalid value '{value}' for option '{token}': expected {expected}")]
    InvalidValue {
        token: String,
        value: String,
        expected: PrimitiveKind,
    },
}

/// Bind `tokens` into a new `R`.
pub fn bind<R, S>(schema: &ParameterSchema<R>, tokens: &[S]) -> Result<R, BindError>
where
    R: Parameters,
    S: AsRef<str>,
{
    let mut record = R::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_ref();
        let is_long = token.starts_with("--");

        match schema.lookup(token) {
            Some(field) if field.setter().is_value_bearing() && i + 1 < tokens.len() => {
                let raw = tokens[i + 1].as_ref();
                field
                    .setter()
                    .apply(&mut record, raw)
                    .map_err(|e| BindError::InvalidValue {
                        token: token.to_string(),
                        value: raw.to_string(),
                        expected: e.expected,
                    })?;
                i += 2;
            }
            Some(field) if !field.setter().is_value_bearing() => {
                field
                    .setter()
                    .apply(&mut record, token)
                    .map_err(|e| BindError::InvalidValue {
                        token: token.to_string(),
                        value: token.to_string(),
                        expected: e.expected,
                    })?;
                i += 1;
            }
            _ => i += 1,
        }

        let verbose = record.verbose() || is_long;
        record.set_verbose(verbose);
    }

    Ok(record)
}

impl<R: Parameters> ParameterSchema<R> {
    pub fn bind<S: AsRef<str>>(&self, tokens: &[S]) -> Result<R, BindError> {
        bind(self, tokens)
    }
}
