//! Provider lifecycle contract.
//!
//! A provider is a self-contained unit of optional application
//! functionality with a two-phase lifecycle:
//!
//! ```text
//! CONSTRUCTED --register()--> REGISTERED --boot()--> BOOTED
//! ```
//!
//! `register` declares services; `boot` does cross-provider wiring and only
//! runs after every loadable provider has finished `register`. The split
//! exists because one provider's `register` may declare a service another
//! provider's `boot` consumes, and register-order races between unrelated
//! providers must not matter.

pub mod gate;

pub use gate::{Context, Environment, Gate};

use crate::app::Application;
use crate::core::{GantryError, GantryResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Default provider order. Mid-range, so providers that must run early or
/// late can slot on either side without renumbering everything.
pub const DEFAULT_ORDER: i32 = 50;

/// A unit of optional application functionality.
///
/// Both hooks default to no-ops, so a provider implements only the phases
/// it needs; every provider still satisfies the full lifecycle contract
/// statically. Hooks are async: a hook that kicks off long-running setup
/// (opening a database connection, say) should spawn that work and signal
/// completion through an [`Event::Custom`](crate::events::Event)
/// notification rather than holding up the remaining providers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique provider name, used as the dependency key.
    fn name(&self) -> &str;

    /// Numeric load order; lower runs earlier. Ties keep discovery order.
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }

    /// Names of providers that must register before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Deployment environments this provider applies to.
    fn environments(&self) -> Gate<Environment> {
        Gate::All
    }

    /// Run contexts this provider applies to.
    fn contexts(&self) -> Gate<Context> {
        Gate::All
    }

    /// Pure predicate: true iff both gates admit the application's
    /// environment and context. Providers failing this are skipped entirely
    /// (no register, no boot) but still occupy a slot in the provider index.
    fn is_loadable(&self, environment: &Environment, context: &Context) -> bool {
        self.environments().admits(environment) && self.contexts().admits(context)
    }

    /// Declare services. Called exactly once, dependencies first.
    async fn register(&self, app: &Arc<Application>) -> GantryResult<()> {
        let _ = app;
        Ok(())
    }

    /// Cross-provider wiring. Called exactly once, strictly after every
    /// loadable provider has completed `register`.
    async fn boot(&self, app: &Arc<Application>) -> GantryResult<()> {
        let _ = app;
        Ok(())
    }
}

type ConstructFn =
    Box<dyn FnOnce(&Arc<Application>) -> GantryResult<Box<dyn Provider>> + Send + 'static>;

/// A named, deferred provider constructor.
///
/// Construction is deferred to bootstrap so a failing constructor can be
/// reported with the provider's name before any lifecycle hook has run.
pub struct ProviderSetup {
    name: String,
    construct: ConstructFn,
}

impl ProviderSetup {
    /// A setup that constructs the provider at bootstrap time.
    pub fn new(
        name: impl Into<String>,
        construct: impl FnOnce(&Arc<Application>) -> GantryResult<Box<dyn Provider>> + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            construct: Box::new(construct),
        }
    }

    /// A setup wrapping an already-constructed provider.
    pub fn instance(provider: impl Provider + 'static) -> Self {
        let name = provider.name().to_string();
        Self::new(name, move |_| Ok(Box::new(provider)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the constructor; failure names the offending provider.
    pub(crate) fn construct(self, app: &Arc<Application>) -> GantryResult<Box<dyn Provider>> {
        let name = self.name;
        (self.construct)(app).map_err(|err| GantryError::Construct {
            provider: name,
            source: Box::new(err),
        })
    }
}
