//! Append-only service registry.
//!
//! Services are named singleton values that live for the rest of the
//! process once registered. The registry exposes no update or delete
//! operation: a duplicate registration is an early, loud failure instead of
//! a silent overwrite, which keeps injected dependencies stable and makes
//! configuration mistakes visible at bootstrap.

use crate::core::{validate_name, GantryError, GantryResult};
use crate::inject::Injection;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// A registered service value, stored type-erased behind `Arc`.
pub type ServiceValue = Arc<dyn Any + Send + Sync>;

/// A registered service: either a plain value, or a factory invoked at
/// resolution time.
///
/// The factory variant replaces the idea of a "callable service" flag: a
/// factory's own parameters are resolved from the registry each time the
/// name is resolved, and the produced value is injected instead of the
/// factory itself.
#[derive(Clone)]
pub enum Service {
    /// A concrete value handed out as-is.
    Value(ServiceValue),
    /// A deferred computation, recursively resolved on lookup.
    Factory(Arc<Injection>),
}

impl Service {
    /// Wrap a plain value.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Service::Value(Arc::new(value))
    }

    /// Wrap a factory injection.
    pub fn factory(injection: Injection) -> Self {
        Service::Factory(Arc::new(injection))
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Value(_) => f.write_str("Service::Value"),
            Service::Factory(injection) => f
                .debug_tuple("Service::Factory")
                .field(injection.context())
                .finish(),
        }
    }
}

struct Entry {
    service: Service,
    doc: Option<String>,
}

/// Name -> service store with strict no-overwrite insertion.
///
/// All writes happen during the single-threaded bootstrap phase; afterwards
/// the registry is read-only from the perspective of application code, so a
/// plain `RwLock` is sufficient.
pub struct ServiceRegistry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a service under `name`.
    ///
    /// Fails with [`GantryError::DuplicateService`] if the name is taken;
    /// the existing entry is left untouched.
    pub fn register(&self, name: &str, service: Service) -> GantryResult<()> {
        self.register_with_doc(name, service, None)
    }

    /// Register a service along with a human-readable description, surfaced
    /// later through [`ServiceRegistry::doc`] for introspection tooling.
    pub fn register_with_doc(
        &self,
        name: &str,
        service: Service,
        doc: Option<String>,
    ) -> GantryResult<()> {
        validate_name(name)?;
        let mut entries = self.entries.write().map_err(|_| GantryError::Lock {
            resource: "service registry".to_string(),
        })?;
        if entries.contains_key(name) {
            return Err(GantryError::DuplicateService {
                name: name.to_string(),
            });
        }
        entries.insert(name.to_string(), Entry { service, doc });
        Ok(())
    }

    /// Convenience: register a plain value.
    pub fn register_value<T: Send + Sync + 'static>(&self, name: &str, value: T) -> GantryResult<()> {
        self.register(name, Service::value(value))
    }

    /// Convenience: register an already-shared value without re-wrapping it.
    pub fn register_arc<T: Send + Sync + 'static>(
        &self,
        name: &str,
        value: Arc<T>,
    ) -> GantryResult<()> {
        self.register(name, Service::Value(value))
    }

    /// Convenience: register a factory invoked at resolution time.
    pub fn register_factory(&self, name: &str, injection: Injection) -> GantryResult<()> {
        self.register(name, Service::factory(injection))
    }

    /// Pure existence check.
    pub fn has(&self, name: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(name))
            .unwrap_or(false)
    }

    /// Look up a service, `None` if absent.
    pub fn lookup(&self, name: &str) -> GantryResult<Option<Service>> {
        let entries = self.entries.read().map_err(|_| GantryError::Lock {
            resource: "service registry".to_string(),
        })?;
        Ok(entries.get(name).map(|entry| entry.service.clone()))
    }

    /// Look up a service, failing with [`GantryError::MissingService`] if
    /// absent.
    pub fn get(&self, name: &str) -> GantryResult<Service> {
        self.lookup(name)?.ok_or_else(|| GantryError::MissingService {
            name: name.to_string(),
            context: "registry".to_string(),
        })
    }

    /// The documentation string recorded at registration, if any.
    pub fn doc(&self, name: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(name).and_then(|entry| entry.doc.clone()))
    }

    /// All registered names, sorted for deterministic listings.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// True if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
