// src/params/mod.rs
pub mod binder;
pub mod schema;
pub mod value;

pub use binder::{bind, BindError};
pub use schema::{normalize_token, Arg, Field, ParameterSchema, SchemaBuilder, SchemaCache, SchemaError};
pub use value::{ConversionError, PrimitiveKind, Setter};

/// A typed record populated from command-line tokens for one dispatch.
///
/// Every record carries a `verbose` switch in addition to its own fields.
/// `verbose` is never declared in the schema; the binder sets it whenever a
/// `--` token is seen.
pub trait Parameters: Default + Send + Sync + 'static {
    /// Declare the bindable fields. Records without options keep the default.
    fn declare(_schema: &mut SchemaBuilder<Self>) {}

    fn verbose(&self) -> bool;

    fn set_verbose(&mut self, verbose: bool);
}

/// Record for commands that take no options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoArgs {
    pub verbose: bool,
}

impl Parameters for NoArgs {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }
}

/// Record with a single `-f/--force` flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForceArgs {
    pub verbose: bool,
    pub force: bool,
}

impl Parameters for ForceArgs {
    fn declare(schema: &mut SchemaBuilder<Self>) {
        schema.flag(Arg::new('f', "force").help("Force the action"), |r| r.force = true);
    }

    fn verbose(&self) -> bool {
        self.verbose
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }
}
