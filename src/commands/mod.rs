// src/commands/mod.rs
pub mod defaults;
pub mod exit_cmd;
pub mod help_cmd;
pub mod registry;
pub mod spec;
pub mod types;

pub use defaults::{DefaultCommands, Output};
pub use registry::{CommandRegistry, CommandSummary, Descriptions};
pub use spec::{CommandBuilder, CommandDescriptor, CommandSpec, ParameterKind};
pub use types::{CommandBundle, CommandError, Handler, HandlerResult, Outcome, Registration, RegistrationError};
