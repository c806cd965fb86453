//! cli-dispatch - a command registry and dispatcher for line-oriented CLIs
//!
//! Commands are declared in bundles, registered by name, and dispatched from
//! token groups. Each command's options bind into a typed parameter record.
//! Several commands can be chained on one line with `&&`, and an interactive
//! driver runs the read-eval loop.

pub mod commands;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod driver;
pub mod params;
pub mod plugin;

pub use commands::{
    CommandBundle, CommandError, CommandRegistry, CommandSpec, DefaultCommands, HandlerResult, Outcome,
    Registration, RegistrationError,
};
pub use config::{ConfigError, DriverConfig};
pub use dispatch::{split, DispatchError, Dispatcher};
pub use driver::{DriverState, InteractiveDriver, Termination};
pub use params::{Arg, BindError, ForceArgs, NoArgs, ParameterSchema, Parameters, SchemaBuilder};
pub use plugin::{expand_locations, BundleLoader, PluginError};
