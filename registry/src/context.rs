//! Build context for generated types.
//!
//! The context owns everything mutable during a registry build: the type map,
//! the name index and the set of keys already registered. It is passed by
//! reference through the build and consumed into an immutable
//! [`Registry`](crate::Registry) at the end.

use crate::{GeneratedType, SchemaBuildError, SchemaResult};
use std::collections::{HashMap, HashSet};

/// Mutable state of one registry build.
#[derive(Debug, Default)]
pub struct BuildContext {
    /// Finished types by key.
    types: HashMap<String, GeneratedType>,
    /// Type name to key.
    names: HashMap<String, String>,
    /// Keys whose builder has started (finished, failed or in progress).
    registered: HashSet<String>,
    /// Keys whose builder is currently running.
    building: HashSet<String>,
    /// Builder invocations, one per registered key.
    builds: usize,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the type registered under `key`, building it on first use.
    ///
    /// `builder` runs at most once per key for the lifetime of the context.
    /// Re-entering a key whose builder is still running is a
    /// [`SchemaBuildError::Cycle`]; a failed builder leaves the key registered,
    /// so later calls report the type as missing instead of retrying.
    pub fn ensure_type<F>(&mut self, key: &str, builder: F) -> SchemaResult<&GeneratedType>
    where
        F: FnOnce(&mut BuildContext) -> SchemaResult<GeneratedType>,
    {
        if self.types.contains_key(key) {
            return self
                .types
                .get(key)
                .ok_or_else(|| SchemaBuildError::missing_type(key));
        }

        if self.building.contains(key) {
            return Err(SchemaBuildError::Cycle {
                key: key.to_string(),
            });
        }
        if !self.registered.insert(key.to_string()) {
            return Err(SchemaBuildError::missing_type(key));
        }

        self.builds += 1;
        self.building.insert(key.to_string());
        let result = builder(self);
        self.building.remove(key);

        let mut generated = result?;
        generated.key = key.to_string();

        if let Some(existing) = self.names.get(&generated.name) {
            return Err(SchemaBuildError::NameCollision {
                name: generated.name.clone(),
                existing: existing.clone(),
                key: key.to_string(),
            });
        }

        self.names.insert(generated.name.clone(), key.to_string());
        Ok(self.types.entry(key.to_string()).or_insert(generated))
    }

    /// Look up a finished type by name.
    pub fn lookup(&self, name: &str) -> SchemaResult<&GeneratedType> {
        self.names
            .get(name)
            .and_then(|key| self.types.get(key))
            .ok_or_else(|| SchemaBuildError::missing_type(name))
    }

    /// Mutable access to a finished type, used when pruning dangling fields.
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut GeneratedType> {
        let key = self.names.get(name)?;
        self.types.get_mut(key)
    }

    /// Whether a builder has ever been started for `key`.
    pub fn is_registered(&self, key: &str) -> bool {
        self.registered.contains(key)
    }

    /// Number of builder invocations so far.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    /// Names of every finished type.
    pub(crate) fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Consume the context into a name-indexed type map.
    pub(crate) fn into_types(self) -> HashMap<String, GeneratedType> {
        self.types
            .into_values()
            .map(|t| (t.name.clone(), t))
            .collect()
    }
}
