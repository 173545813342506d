//! Application bootstrap orchestration.
//!
//! The application owns the service registry, the event bus, the settings
//! bag and the provider graph, and drives the three-phase bootstrap:
//! construct every provider, register in dependency order, boot in the
//! order register completed. One application value is constructed per
//! process entry point and threaded explicitly; there is no process-wide
//! singleton, and tests build isolated instances.

use crate::config::Config;
use crate::core::{GantryError, GantryResult};
use crate::events::EventBus;
use crate::graph::ProviderGraph;
use crate::inject::{ArgumentResolver, CallContext, Invoker, Target};
use crate::provider::{Context, Environment, Provider, ProviderSetup};
use crate::registry::{Service, ServiceRegistry, ServiceValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

/// The root object of a bootstrapped process.
///
/// Constructed through [`Application::builder`], handed around as
/// `Arc<Application>`, and registered under the `app` service name so any
/// injection target can declare it as a dependency.
pub struct Application {
    environment: Environment,
    context: Context,
    config: Config,
    services: ServiceRegistry,
    events: EventBus,
    pending: Mutex<Vec<ProviderSetup>>,
    graph: RwLock<Option<ProviderGraph>>,
    booted: AtomicBool,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("environment", &self.environment)
            .field("context", &self.context)
            .field("services", &self.services.len())
            .field("booted", &self.booted.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Run the three-phase bootstrap.
    ///
    /// Idempotent: after the first successful completion, further calls are
    /// no-ops returning the same handle without re-running any hook. A
    /// failure anywhere aborts with an error naming the offending provider
    /// or service; no partial-success state is exposed.
    pub async fn bootstrap(self: &Arc<Self>) -> GantryResult<Arc<Self>> {
        if self.booted.load(Ordering::Acquire) {
            return Ok(Arc::clone(self));
        }

        info!(
            environment = %self.environment,
            context = %self.context,
            "bootstrapping application"
        );

        // Construct every provider up front; a failing constructor names
        // its provider before any lifecycle hook has run.
        let setups = {
            let mut pending = self.pending.lock().map_err(|_| GantryError::Lock {
                resource: "pending providers".to_string(),
            })?;
            std::mem::take(&mut *pending)
        };
        let mut providers: Vec<Box<dyn Provider>> = Vec::with_capacity(setups.len());
        for setup in setups {
            providers.push(setup.construct(self)?);
        }

        // Core services are in place before any provider runs, so providers
        // may depend on `app`, `config` and `events` unconditionally.
        self.services.register_with_doc(
            "app",
            Service::Value(Arc::clone(self) as ServiceValue),
            Some("the application handle".to_string()),
        )?;
        self.services.register_with_doc(
            "config",
            Service::value(self.config.clone()),
            Some("application settings bag".to_string()),
        )?;
        self.services.register_with_doc(
            "events",
            Service::value(self.events.clone()),
            Some("lifecycle event bus".to_string()),
        )?;

        let mut graph = ProviderGraph::new(providers, self.environment, self.context)?;
        graph.register(self).await?;
        graph.boot(self).await?;

        {
            let mut slot = self.graph.write().map_err(|_| GantryError::Lock {
                resource: "provider graph".to_string(),
            })?;
            *slot = Some(graph);
        }
        self.booted.store(true, Ordering::Release);
        info!("application booted");
        Ok(Arc::clone(self))
    }

    /// Resolve one service by name, downcast to `T`.
    ///
    /// Factory services are invoked; the produced value is downcast.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> GantryResult<Arc<T>> {
        let context = CallContext::method("Application", "get");
        let value = ArgumentResolver::new(&self.services).resolve_name(&context, name)?;
        value
            .downcast::<T>()
            .map_err(|_| GantryError::ServiceType {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// Resolve several services at once, preserving input order.
    pub fn get_all(&self, names: &[&str]) -> GantryResult<Vec<ServiceValue>> {
        let context = CallContext::method("Application", "get");
        let resolver = ArgumentResolver::new(&self.services);
        names
            .iter()
            .map(|name| resolver.resolve_name(&context, name))
            .collect()
    }

    /// Resolve one service by name without downcasting.
    pub fn get_raw(&self, name: &str) -> GantryResult<ServiceValue> {
        let context = CallContext::method("Application", "get");
        ArgumentResolver::new(&self.services).resolve_name(&context, name)
    }

    /// Invoke an injection target with registry-resolved arguments.
    pub fn call(&self, target: &Target, overrides: &[ServiceValue]) -> GantryResult<ServiceValue> {
        Invoker::new(&self.services).call(target, overrides)
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn context(&self) -> Context {
        self.context
    }

    /// True after the first successful bootstrap.
    pub fn is_booted(&self) -> bool {
        self.booted.load(Ordering::Acquire)
    }

    /// Provider names in the order their `register` completed; empty before
    /// bootstrap.
    pub fn boot_order(&self) -> Vec<String> {
        self.graph
            .read()
            .ok()
            .and_then(|graph| graph.as_ref().map(|graph| graph.boot_order()))
            .unwrap_or_default()
    }

    /// All indexed provider names (loadable or not) in discovery order;
    /// empty before bootstrap.
    pub fn provider_names(&self) -> Vec<String> {
        self.graph
            .read()
            .ok()
            .and_then(|graph| graph.as_ref().map(|graph| graph.provider_names()))
            .unwrap_or_default()
    }
}

/// Builder for [`Application`].
pub struct ApplicationBuilder {
    environment: Environment,
    context: Context,
    config: Config,
    event_capacity: usize,
    setups: Vec<ProviderSetup>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            environment: Environment::default(),
            context: Context::default(),
            config: Config::default(),
            event_capacity: 64,
            setups: Vec::new(),
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Settings bag supplied by the (external) config loader.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Capacity of the lifecycle event broadcast channel.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Queue an already-constructed provider. Discovery order is the order
    /// of these calls and breaks ties between equal `order` values.
    pub fn provider(mut self, provider: impl Provider + 'static) -> Self {
        self.setups.push(ProviderSetup::instance(provider));
        self
    }

    /// Queue a deferred provider constructor.
    pub fn provider_setup(mut self, setup: ProviderSetup) -> Self {
        self.setups.push(setup);
        self
    }

    pub fn build(self) -> Arc<Application> {
        Arc::new(Application {
            environment: self.environment,
            context: self.context,
            config: self.config,
            services: ServiceRegistry::new(),
            events: EventBus::new(self.event_capacity),
            pending: Mutex::new(self.setups),
            graph: RwLock::new(None),
            booted: AtomicBool::new(false),
        })
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
