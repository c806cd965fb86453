//! Command Declarations and Descriptors
//!
//! A [`CommandSpec`] is an unbound declaration produced by a bundle, holding
//! a handler typed over its parameter record. Registration
//! turns it into a [`CommandDescriptor`], which owns the record's schema and
//! a type-erased invoker the dispatcher can call with raw tokens.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::types::{CommandError, Handler, HandlerResult};
use crate::params::{BindError, ParameterSchema, Parameters, SchemaCache, SchemaError};

/// Identifies the parameter record type a command binds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterKind {
    name: &'static str,
    id: TypeId,
}

impl ParameterKind {
    pub fn of<R: 'static>() -> Self {
        Self {
            name: std::any::type_name::<R>(),
            id: TypeId::of::<R>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }
}

/// Why an invocation did not produce a success flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InvokeError {
    Binding(BindError),
    Handler(CommandError),
}

trait Invoke: Send + Sync {
    fn invoke(&self, args: &[String]) -> Result<bool, InvokeError>;
}

struct BoundHandler<R> {
    schema: Arc<ParameterSchema<R>>,
    handler: Handler<R>,
}

impl<R: Parameters> Invoke for BoundHandler<R> {
    fn invoke(&self, args: &[String]) -> Result<bool, InvokeError> {
        match &self.handler {
            Handler::Check(f) => f().map_err(InvokeError::Handler),
            Handler::Run(f) => f().map(|()| true).map_err(InvokeError::Handler),
            Handler::CheckWith(f) => {
                let params = self.schema.bind(args).map_err(InvokeError::Binding)?;
                f(&params).map_err(InvokeError::Handler)
            }
            Handler::RunWith(f) => {
                let params = self.schema.bind(args).map_err(InvokeError::Binding)?;
                f(&params).map(|()| true).map_err(InvokeError::Handler)
            }
        }
    }
}

trait Declare: Send {
    fn kind(&self) -> ParameterKind;
    fn bind(self: Box<Self>, schemas: &mut SchemaCache) -> Result<Bound, SchemaError>;
}

struct Declared<R> {
    handler: Handler<R>,
}

struct Bound {
    takes_parameters: bool,
    options: Vec<String>,
    invoker: Box<dyn Invoke>,
}

impl<R: Parameters> Declare for Declared<R> {
    fn kind(&self) -> ParameterKind {
        ParameterKind::of::<R>()
    }

    fn bind(self: Box<Self>, schemas: &mut SchemaCache) -> Result<Bound, SchemaError> {
        let schema = schemas.get_or_build::<R>()?;
        Ok(Bound {
            takes_parameters: self.handler.takes_parameters(),
            options: schema.help_lines(),
            invoker: Box::new(BoundHandler { schema, handler: self.handler }),
        })
    }
}

/// An unbound command declaration.
pub struct CommandSpec {
    name: String,
    description: Option<String>,
    declared: Box<dyn Declare>,
}

impl CommandSpec {
    /// Start declaring a command whose parameters bind into `R`.
    pub fn new<R: Parameters>(name: impl Into<String>) -> CommandBuilder<R> {
        CommandBuilder {
            name: name.into(),
            description: None,
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameter_kind(&self) -> ParameterKind {
        self.declared.kind()
    }

    /// Build the descriptor under `name`, resolving the schema through `schemas`.
    pub(crate) fn into_descriptor(
        self,
        name: String,
        schemas: &mut SchemaCache,
    ) -> Result<CommandDescriptor, SchemaError> {
        let kind = self.declared.kind();
        let bound = self.declared.bind(schemas)?;
        Ok(CommandDescriptor {
            name,
            description: self.description,
            kind,
            takes_parameters: bound.takes_parameters,
            options: bound.options,
            invoker: bound.invoker,
        })
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("kind", &self.declared.kind().name())
            .finish()
    }
}

/// Builder returned by [`CommandSpec::new`]; pick a handler shape to finish.
pub struct CommandBuilder<R> {
    name: String,
    description: Option<String>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Parameters> CommandBuilder<R> {
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// No arguments, success is the returned flag.
    pub fn check<F>(self, f: F) -> CommandSpec
    where
        F: Fn() -> HandlerResult<bool> + Send + Sync + 'static,
    {
        self.finish(Handler::Check(Box::new(f)))
    }

    /// No arguments, success whenever it returns `Ok`.
    pub fn run<F>(self, f: F) -> CommandSpec
    where
        F: Fn() -> HandlerResult<()> + Send + Sync + 'static,
    {
        self.finish(Handler::Run(Box::new(f)))
    }

    pub fn check_with<F>(self, f: F) -> CommandSpec
    where
        F: Fn(&R) -> HandlerResult<bool> + Send + Sync + 'static,
    {
        self.finish(Handler::CheckWith(Box::new(f)))
    }

    pub fn run_with<F>(self, f: F) -> CommandSpec
    where
        F: Fn(&R) -> HandlerResult<()> + Send + Sync + 'static,
    {
        self.finish(Handler::RunWith(Box::new(f)))
    }

    /// Finish with an already constructed handler.
    pub fn handler(self, handler: Handler<R>) -> CommandSpec {
        self.finish(handler)
    }

    fn finish(self, handler: Handler<R>) -> CommandSpec {
        CommandSpec {
            name: self.name,
            description: self.description,
            declared: Box::new(Declared { handler }),
        }
    }
}

/// A registered command.
pub struct CommandDescriptor {
    name: String,
    description: Option<String>,
    kind: ParameterKind,
    takes_parameters: bool,
    options: Vec<String>,
    invoker: Box<dyn Invoke>,
}

impl CommandDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameter_kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn takes_parameters(&self) -> bool {
        self.takes_parameters
    }

    /// Help lines for the record's options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub(crate) fn invoke(&self, args: &[String]) -> Result<bool, InvokeError> {
        self.invoker.invoke(args)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("kind", &self.kind.name())
            .field("takes_parameters", &self.takes_parameters)
            .finish()
    }
}
