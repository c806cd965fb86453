//! Parameter Schema
//!
//! Per record type, a table mapping flag tokens (`-f`, `--flag`) to the field
//! they set. Records declare their fields through a [`SchemaBuilder`]; the
//! finished [`ParameterSchema`] rejects two fields claiming the same token.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use regex_lite::Regex;
use thiserror::Error;

use super::value::Setter;
use super::Parameters;

lazy_static::lazy_static! {
    /// Long option names after lowercasing, before hyphen stripping.
    static ref LONG_NAME: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid long-name pattern");
}

/// Errors raised while building a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("token '{token}' is claimed by both '{first}' and '{second}'")]
    DuplicateToken {
        token: String,
        first: String,
        second: String,
    },

    #[error("invalid option name '{name}'")]
    InvalidName { name: String },
}

/// Names and help text of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    short: char,
    long: &'static str,
    help: Option<&'static str>,
}

impl Arg {
    pub fn new(short: char, long: &'static str) -> Self {
        Self { short, long, help: None }
    }

    pub fn help(mut self, text: &'static str) -> Self {
        self.help = Some(text);
        self
    }
}

/// One bindable field of a record.
pub struct Field<R> {
    arg: Arg,
    setter: Setter<R>,
}

impl<R> Field<R> {
    /// Field identifier, the long name as declared.
    pub fn id(&self) -> &'static str {
        self.arg.long
    }

    pub fn short(&self) -> char {
        self.arg.short
    }

    pub fn long(&self) -> &'static str {
        self.arg.long
    }

    pub fn help(&self) -> Option<&'static str> {
        self.arg.help
    }

    pub fn setter(&self) -> &Setter<R> {
        &self.setter
    }

    pub fn short_token(&self) -> String {
        format!("-{}", self.arg.short.to_ascii_lowercase())
    }

    pub fn long_token(&self) -> String {
        normalize_token(&format!("--{}", self.arg.long))
    }
}

/// Collects field declarations for a record type.
pub struct SchemaBuilder<R> {
    fields: Vec<Field<R>>,
}

impl<R> SchemaBuilder<R> {
    fn new() -> Self {
        Self { fields: Vec::new() }
    }

    fn push(&mut self, arg: Arg, setter: Setter<R>) -> &mut Self {
        self.fields.push(Field { arg, setter });
        self
    }

    /// Boolean flag, set to true when present.
    pub fn flag(&mut self, arg: Arg, set: fn(&mut R)) -> &mut Self {
        self.push(arg, Setter::Flag(set))
    }

    /// Value-bearing option converted with the bool conversion.
    pub fn boolean(&mut self, arg: Arg, set: fn(&mut R, bool)) -> &mut Self {
        self.push(arg, Setter::Bool(set))
    }

    pub fn string(&mut self, arg: Arg, set: fn(&mut R, String)) -> &mut Self {
        self.push(arg, Setter::String(set))
    }

    pub fn integer(&mut self, arg: Arg, set: fn(&mut R, i64)) -> &mut Self {
        self.push(arg, Setter::Integer(set))
    }

    pub fn float(&mut self, arg: Arg, set: fn(&mut R, f64)) -> &mut Self {
        self.push(arg, Setter::Float(set))
    }
}

/// Token table for one parameter record type.
pub struct ParameterSchema<R> {
    fields: Vec<Field<R>>,
    tokens: HashMap<String, usize>,
}

impl<R: Parameters> ParameterSchema<R> {
    /// Build the schema from the record's own declaration.
    pub fn build() -> Result<Self, SchemaError> {
        let mut builder = SchemaBuilder::new();
        R::declare(&mut builder);
        Self::from_fields(builder.fields)
    }
}

impl<R> ParameterSchema<R> {
    fn from_fields(fields: Vec<Field<R>>) -> Result<Self, SchemaError> {
        let mut tokens: HashMap<String, usize> = HashMap::new();

        for (index, field) in fields.iter().enumerate() {
            if !field.arg.short.is_ascii_alphanumeric() {
                return Err(SchemaError::InvalidName { name: field.arg.short.to_string() });
            }
            if !LONG_NAME.is_match(&field.arg.long.to_ascii_lowercase()) {
                return Err(SchemaError::InvalidName { name: field.arg.long.to_string() });
            }

            for token in [field.short_token(), field.long_token()] {
                if let Some(&existing) = tokens.get(&token) {
                    return Err(SchemaError::DuplicateToken {
                        token,
                        first: fields[existing].id().to_string(),
                        second: field.id().to_string(),
                    });
                }
                tokens.insert(token, index);
            }
        }

        Ok(Self { fields, tokens })
    }

    /// Find the field a raw token refers to, if any.
    pub fn lookup(&self, token: &str) -> Option<&Field<R>> {
        self.tokens
            .get(&normalize_token(token))
            .map(|&index| &self.fields[index])
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// One readable line per declared field.
    pub fn help_lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| {
                format!(
                    "-{:<3} --{:<8} : {}",
                    field.short(),
                    field.long(),
                    field.help().unwrap_or("no description")
                )
            })
            .collect()
    }
}

/// Lowercase a token; long tokens also lose their internal hyphens.
pub fn normalize_token(token: &str) -> String {
    let lower = token.to_lowercase();
    match lower.strip_prefix("--") {
        Some(rest) => format!("--{}", rest.replace('-', "")),
        None => lower,
    }
}

/// Schemas already built, keyed by record type.
#[derive(Default)]
pub struct SchemaCache {
    schemas: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schema for `R`, building it on first use.
    pub fn get_or_build<R: Parameters>(&mut self) -> Result<Arc<ParameterSchema<R>>, SchemaError> {
        let key = TypeId::of::<R>();
        if let Some(cached) = self.schemas.get(&key) {
            if let Ok(schema) = Arc::clone(cached).downcast::<ParameterSchema<R>>() {
                return Ok(schema);
            }
        }

        let schema = Arc::new(ParameterSchema::<R>::build()?);
        let erased: Arc<dyn Any + Send + Sync> = schema.clone();
        self.schemas.insert(key, erased);
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
