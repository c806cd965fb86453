//! Plugin Modules
//!
//! Command bundles can come from external modules. Loading a module is the
//! job of a [`BundleLoader`] supplied by the host; this crate only expands
//! module location patterns and registers whatever the loader discovers
//! (see [`CommandRegistry::register_from_modules`]).
//!
//! [`CommandRegistry::register_from_modules`]: crate::commands::CommandRegistry::register_from_modules

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::commands::{CommandBundle, RegistrationError};

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("invalid module pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("cannot read module location: {0}")]
    Location(#[from] glob::GlobError),

    #[error("cannot load bundles from '{path}': {message}")]
    Load { path: PathBuf, message: String },

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Discovers the command bundles a module provides.
pub trait BundleLoader {
    fn load(&self, location: &Path) -> Result<Vec<Box<dyn CommandBundle>>, PluginError>;
}

/// Expand glob patterns (e.g. `plugins/*.so`) into module paths.
///
/// Paths are returned per pattern in the order `glob` yields them.
pub fn expand_locations<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, PluginError> {
    let mut locations = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = glob::glob(pattern).map_err(|source| PluginError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        for path in paths {
            locations.push(path?);
        }
    }
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandRegistry, CommandSpec};
    use crate::params::NoArgs;
    use std::fs;

    struct Named(String);

    impl CommandBundle for Named {
        fn commands(&self) -> Vec<CommandSpec> {
            vec![CommandSpec::new::<NoArgs>(self.0.clone())
                .description("loaded from a module")
                .run(|| Ok(()))]
        }
    }

    /// Each module yields one bundle named after the file stem.
    struct StemLoader;

    impl BundleLoader for StemLoader {
        fn load(&self, location: &Path) -> Result<Vec<Box<dyn CommandBundle>>, PluginError> {
            let stem = location
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| PluginError::Load {
                    path: location.to_path_buf(),
                    message: "no file stem".to_string(),
                })?;
            if stem == "broken" {
                return Err(PluginError::Load {
                    path: location.to_path_buf(),
                    message: "not a module".to_string(),
                });
            }
            Ok(vec![Box::new(Named(stem.to_string()))])
        }
    }

    fn module_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_expand_locations() {
        let dir = module_dir(&["alpha.mod", "beta.mod", "notes.txt"]);
        let pattern = format!("{}/*.mod", dir.path().display());
        let mut found = expand_locations(&[pattern]).unwrap();
        found.sort();
        assert_eq!(found, vec![dir.path().join("alpha.mod"), dir.path().join("beta.mod")]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = expand_locations(&["[unclosed"]).unwrap_err();
        assert!(matches!(err, PluginError::Pattern { .. }));
    }

    #[test]
    fn test_register_from_modules() {
        let dir = module_dir(&["alpha.mod", "beta.mod"]);
        let locations = expand_locations(&[format!("{}/*.mod", dir.path().display())]).unwrap();

        let mut registry = CommandRegistry::new();
        let count = registry.register_from_modules(&locations, &StemLoader, false).unwrap();
        assert_eq!(count, 2);
        assert!(registry.contains("alpha"));
        assert_eq!(
            registry.resolve("beta").unwrap().description(),
            Some("loaded from a module")
        );
    }

    #[test]
    fn test_loader_failure_propagates() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register_from_modules(&[PathBuf::from("broken.mod")], &StemLoader, false)
            .unwrap_err();
        assert!(matches!(err, PluginError::Load { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_command_from_module() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register_from_modules(&[PathBuf::from("has space.mod")], &StemLoader, false)
            .unwrap_err();
        assert!(matches!(err, PluginError::Registration(RegistrationError::InvalidName { .. })));
    }
}
