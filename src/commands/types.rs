// src/commands/types.rs
use std::fmt;
use thiserror::Error;

use super::spec::CommandSpec;
use crate::params::SchemaError;

/// Result type returned by command handlers.
pub type HandlerResult<T> = Result<T, CommandError>;

/// Tri-state result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Succeeded,
    Failed,
    CommandNotFound,
}

impl Outcome {
    pub fn from_success(success: bool) -> Self {
        if success {
            Outcome::Succeeded
        } else {
            Outcome::Failed
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Succeeded => "succeeded",
            Outcome::Failed => "failed",
            Outcome::CommandNotFound => "command not found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure raised by a handler.
///
/// `Exit` is control flow rather than a fault: it asks whoever drives the
/// dispatcher to stop and terminate with `code`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("exit requested with code {code}")]
    Exit { code: i32 },

    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    pub fn failed(message: impl Into<String>) -> Self {
        CommandError::Failed(message.into())
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Exit { code } => Some(*code),
            CommandError::Failed(_) => None,
        }
    }
}

/// The four supported handler shapes.
///
/// `Check*` handlers report success with their return value; `Run*` handlers
/// succeed whenever they return `Ok`. No-argument shapes never bind tokens.
pub enum Handler<R> {
    Check(Box<dyn Fn() -> HandlerResult<bool> + Send + Sync>),
    Run(Box<dyn Fn() -> HandlerResult<()> + Send + Sync>),
    CheckWith(Box<dyn Fn(&R) -> HandlerResult<bool> + Send + Sync>),
    RunWith(Box<dyn Fn(&R) -> HandlerResult<()> + Send + Sync>),
}

impl<R> Handler<R> {
    pub fn takes_parameters(&self) -> bool {
        matches!(self, Handler::CheckWith(_) | Handler::RunWith(_))
    }

    pub fn returns_bool(&self) -> bool {
        matches!(self, Handler::Check(_) | Handler::CheckWith(_))
    }
}

impl<R> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Handler::Check(_) => "Check",
            Handler::Run(_) => "Run",
            Handler::CheckWith(_) => "CheckWith",
            Handler::RunWith(_) => "RunWith",
        };
        f.write_str(shape)
    }
}

/// What happened to one registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    Replaced,
    /// The name was taken and overwrite was not requested.
    Ignored,
}

/// Registration failures. These abort the entry being registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("invalid command name '{name}'")]
    InvalidName { name: String },

    #[error("command '{command}' has an invalid parameter schema: {source}")]
    Schema { command: String, source: SchemaError },
}

/// A group of related commands registered together.
pub trait CommandBundle {
    /// Label used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Enumerate the bundle's command declarations.
    fn commands(&self) -> Vec<CommandSpec>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NoArgs;

    #[test]
    fn test_outcome_from_success() {
        assert_eq!(Outcome::from_success(true), Outcome::Succeeded);
        assert_eq!(Outcome::from_success(false), Outcome::Failed);
        assert!(!Outcome::CommandNotFound.is_success());
        assert_eq!(Outcome::CommandNotFound.to_string(), "command not found");
    }

    #[test]
    fn test_handler_shapes() {
        let check: Handler<NoArgs> = Handler::Check(Box::new(|| Ok(true)));
        let run_with: Handler<NoArgs> = Handler::RunWith(Box::new(|_| Ok(())));
        assert!(!check.takes_parameters());
        assert!(check.returns_bool());
        assert!(run_with.takes_parameters());
        assert!(!run_with.returns_bool());
        assert_eq!(format!("{:?}", run_with), "RunWith");
    }

    #[test]
    fn test_command_error_exit_code() {
        assert_eq!(CommandError::Exit { code: 3 }.exit_code(), Some(3));
        assert_eq!(CommandError::failed("boom").exit_code(), None);
        assert_eq!(CommandError::failed("boom").to_string(), "boom");
    }
}
