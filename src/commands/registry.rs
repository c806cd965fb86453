// src/commands/registry.rs
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use log::{debug, warn};
use regex_lite::Regex;

use super::defaults::DefaultCommands;
use super::spec::{CommandDescriptor, CommandSpec};
use super::types::{CommandBundle, Registration, RegistrationError};
use crate::params::SchemaCache;
use crate::plugin::{BundleLoader, PluginError};

lazy_static::lazy_static! {
    static ref COMMAND_NAME: Regex = Regex::new(r"^[a-z0-9_][a-z0-9_.:-]*$").expect("valid command-name pattern");
}

/// Listing entry kept next to every registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub description: Option<String>,
    pub options: Vec<String>,
}

/// Shared, read-mostly view of the registered names and descriptions.
///
/// Only the owning registry writes to it; clones handed to commands such as
/// `help` always see the current set.
#[derive(Debug, Clone, Default)]
pub struct Descriptions {
    inner: Arc<RwLock<IndexMap<String, CommandSummary>>>,
}

impl Descriptions {
    /// `(name, description)` pairs in registration order.
    pub fn list(&self) -> Vec<(String, Option<String>)> {
        self.read()
            .iter()
            .map(|(name, summary)| (name.clone(), summary.description.clone()))
            .collect()
    }

    pub fn entries(&self) -> Vec<(String, CommandSummary)> {
        self.read()
            .iter()
            .map(|(name, summary)| (name.clone(), summary.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, CommandSummary>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, name: String, summary: CommandSummary) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name, summary);
    }
}

pub struct CommandRegistry {
    commands: IndexMap<String, CommandDescriptor>,
    descriptions: Descriptions,
    schemas: SchemaCache,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: IndexMap::new(),
            descriptions: Descriptions::default(),
            schemas: SchemaCache::new(),
        }
    }

    /// Registry preloaded with the default `help` and `exit` commands.
    pub fn with_defaults() -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        registry.register_defaults()?;
        Ok(registry)
    }

    pub fn register_defaults(&mut self) -> Result<(), RegistrationError> {
        let defaults = DefaultCommands::new(self.descriptions());
        self.register_bundle(&defaults, false)?;
        Ok(())
    }

    /// Register one command under its lowercased name.
    ///
    /// A taken name is replaced when `overwrite` is set and otherwise left
    /// alone, reported as [`Registration::Ignored`]. Invalid names and broken
    /// parameter schemas are errors whether or not the name is taken.
    pub fn register(&mut self, spec: CommandSpec, overwrite: bool) -> Result<Registration, RegistrationError> {
        let name = spec.name().to_lowercase();
        if !COMMAND_NAME.is_match(&name) {
            return Err(RegistrationError::InvalidName { name: spec.name().to_string() });
        }

        let descriptor = spec
            .into_descriptor(name.clone(), &mut self.schemas)
            .map_err(|source| RegistrationError::Schema { command: name.clone(), source })?;

        let taken = self.commands.contains_key(&name);
        if taken && !overwrite {
            warn!("ignoring command '{}': name is already registered", name);
            return Ok(Registration::Ignored);
        }

        let summary = CommandSummary {
            description: descriptor.description().map(String::from),
            options: descriptor.options().to_vec(),
        };
        debug!(
            "registering command '{}' ({})",
            name,
            descriptor.parameter_kind().name()
        );
        self.commands.insert(name.clone(), descriptor);
        self.descriptions.insert(name, summary);

        Ok(if taken { Registration::Replaced } else { Registration::Added })
    }

    /// Register everything a bundle declares. Stops at the first error.
    pub fn register_bundle(
        &mut self,
        bundle: &dyn CommandBundle,
        overwrite: bool,
    ) -> Result<Vec<(String, Registration)>, RegistrationError> {
        debug!("registering bundle {}", bundle.name());
        let mut results = Vec::new();
        for spec in bundle.commands() {
            let name = spec.name().to_lowercase();
            let registration = self.register(spec, overwrite)?;
            results.push((name, registration));
        }
        Ok(results)
    }

    pub fn register_bundles<'a, I>(
        &mut self,
        bundles: I,
        overwrite: bool,
    ) -> Result<Vec<(String, Registration)>, RegistrationError>
    where
        I: IntoIterator<Item = &'a dyn CommandBundle>,
    {
        let mut results = Vec::new();
        for bundle in bundles {
            results.extend(self.register_bundle(bundle, overwrite)?);
        }
        Ok(results)
    }

    /// Register every bundle `loader` discovers at `locations`.
    ///
    /// Returns the number of bundles registered.
    pub fn register_from_modules(
        &mut self,
        locations: &[PathBuf],
        loader: &dyn BundleLoader,
        overwrite: bool,
    ) -> Result<usize, PluginError> {
        let mut count = 0;
        for location in locations {
            let bundles = loader.load(location)?;
            debug!("{} bundle(s) found in {}", bundles.len(), location.display());
            for bundle in bundles {
                self.register_bundle(bundle.as_ref(), overwrite)?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(|s| s.as_str()).collect()
    }

    /// `(name, description)` pairs in registration order.
    pub fn list_descriptions(&self) -> Vec<(String, Option<String>)> {
        self.descriptions.list()
    }

    /// Handle to the description table, shared with commands that list it.
    pub fn descriptions(&self) -> Descriptions {
        self.descriptions.clone()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
