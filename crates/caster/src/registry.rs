//! Named caster registry
//!
//! A [`Registry`] maps names to schema factories so schemas can be defined
//! once and looked up where they are needed. The process-wide registry is
//! explicit: it must be created with [`init`] and can be dropped with
//! [`teardown`]; using it in between is an error.
//!
//! ```rust,ignore
//! use nebula_caster::{prelude::*, registry};
//!
//! registry::init();
//! registry::register("email", || string() & matches(email_regex()))?;
//! let email = registry::lookup("email")?;
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::foundation::{Schema, SchemaError};

type Factory = Arc<dyn Fn() -> Schema + Send + Sync>;

/// Name to schema-factory map.
#[derive(Clone, Default)]
pub struct Registry {
    factories: IndexMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateCaster`] if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Schema + Send + Sync + 'static,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(SchemaError::DuplicateCaster { name });
        }
        tracing::debug!(%name, "registering caster");
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Registers an already built schema under `name`.
    pub fn register_schema(&mut self, name: impl Into<String>, schema: Schema) -> Result<(), SchemaError> {
        self.register(name, move || schema.clone())
    }

    /// Builds the schema registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Schema, SchemaError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SchemaError::UnknownCaster {
                name: name.to_owned(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// GLOBAL REGISTRY
// ============================================================================

static GLOBAL: RwLock<Option<Registry>> = parking_lot::const_rwlock(None);

/// Creates the process-wide registry. Calling it again keeps the existing one.
pub fn init() {
    let mut global = GLOBAL.write();
    if global.is_none() {
        tracing::debug!("initializing caster registry");
        *global = Some(Registry::new());
    }
}

/// Drops the process-wide registry and everything registered in it.
pub fn teardown() {
    if let Some(registry) = GLOBAL.write().take() {
        tracing::debug!(casters = registry.len(), "tearing down caster registry");
    }
}

/// True between [`init`] and [`teardown`].
pub fn is_initialized() -> bool {
    GLOBAL.read().is_some()
}

/// Registers a factory in the process-wide registry.
pub fn register(
    name: impl Into<String>,
    factory: impl Fn() -> Schema + Send + Sync + 'static,
) -> Result<(), SchemaError> {
    GLOBAL
        .write()
        .as_mut()
        .ok_or(SchemaError::RegistryNotInitialized)?
        .register(name, factory)
}

/// Builds a schema from the process-wide registry.
pub fn lookup(name: &str) -> Result<Schema, SchemaError> {
    // the factory runs outside the lock so it may itself look up casters
    let factory = GLOBAL
        .read()
        .as_ref()
        .ok_or(SchemaError::RegistryNotInitialized)?
        .factories
        .get(name)
        .cloned()
        .ok_or_else(|| SchemaError::UnknownCaster {
            name: name.to_owned(),
        })?;
    Ok(factory())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casters::{integer, string};

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry.register("age", integer).unwrap();
        registry.register_schema("name", string()).unwrap();

        assert!(registry.lookup("age").unwrap().call(3).unwrap().is_valid());
        assert!(registry.lookup("name").unwrap().call(3).unwrap().is_invalid());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["age", "name"]);
    }

    #[test]
    fn test_duplicate_and_unknown_names() {
        let mut registry = Registry::new();
        registry.register("age", integer).unwrap();
        assert!(matches!(
            registry.register("age", integer),
            Err(SchemaError::DuplicateCaster { .. })
        ));
        assert!(matches!(
            registry.lookup("missing"),
            Err(SchemaError::UnknownCaster { .. })
        ));
    }
}
