//! Gantry: service container and provider bootstrap for modular applications.
//!
//! The crate implements a name-based service registry, an argument-injection
//! call mechanism, and a three-phase provider lifecycle (construct ->
//! register -> boot) with dependency-ordered loading and environment/context
//! gating.
//!
//! # Example
//!
//! ```
//! use gantry::{Application, Context, Environment, GantryResult, Provider};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct LogProvider;
//!
//! #[async_trait]
//! impl Provider for LogProvider {
//!     fn name(&self) -> &str {
//!         "log"
//!     }
//!
//!     async fn register(&self, app: &Arc<Application>) -> GantryResult<()> {
//!         app.services().register_value("log.level", "info".to_string())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> GantryResult<()> {
//! let app = Application::builder()
//!     .environment(Environment::Development)
//!     .context(Context::Web)
//!     .provider(LogProvider)
//!     .build();
//!
//! app.bootstrap().await?;
//! let level: Arc<String> = app.get("log.level")?;
//! assert_eq!(level.as_str(), "info");
//! # Ok(())
//! # }
//! ```

pub use gantry_core::{root_cause, DependencyFailure, GantryError, GantryResult};

/// Core module re-exported for backward compatibility.
pub mod core {
    pub use gantry_core::core::*;
    pub use gantry_core::*;
}

/// Application settings bag.
pub mod config;

/// Lifecycle event notifications.
pub mod events;

/// Provider load ordering and lifecycle orchestration.
pub mod graph;

/// Name-based argument resolution and invocation.
pub mod inject;

/// Provider lifecycle contract and gating.
pub mod provider;

/// Append-only service registry.
pub mod registry;

/// Application bootstrap orchestration.
pub mod app;

pub use app::{Application, ApplicationBuilder};
pub use config::Config;
pub use events::{Event, EventBus, EventSink};
pub use graph::ProviderGraph;
pub use inject::{
    ArgumentResolver, Args, CallContext, Injection, Invoker, MethodSet, Methods, Target,
};
pub use provider::{Context, Environment, Gate, Provider, ProviderSetup, DEFAULT_ORDER};
pub use registry::{Service, ServiceRegistry, ServiceValue};
