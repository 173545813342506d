//! Shared fixtures for integration tests.

use async_trait::async_trait;
use gantry::{Application, Context, Environment, GantryResult, Gate, Provider};
use std::sync::{Arc, Mutex};

/// Install a tracing subscriber for the test binary, honoring `RUST_LOG`,
/// so the container's lifecycle traces are visible in failing test output.
/// Safe to call from every test; only the first installation wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Chronological record of lifecycle hook invocations, shared between the
/// test body and its providers.
pub type HookLog = Arc<Mutex<Vec<String>>>;

pub fn hook_log() -> HookLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &HookLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A provider that records its hook invocations.
pub struct Recording {
    pub name: &'static str,
    pub order: i32,
    pub deps: Vec<&'static str>,
    pub environments: Gate<Environment>,
    pub contexts: Gate<Context>,
    pub log: HookLog,
}

impl Recording {
    pub fn new(name: &'static str, order: i32, deps: &[&'static str], log: &HookLog) -> Self {
        Self {
            name,
            order,
            deps: deps.to_vec(),
            environments: Gate::All,
            contexts: Gate::All,
            log: Arc::clone(log),
        }
    }

    pub fn with_environments(mut self, gate: Gate<Environment>) -> Self {
        self.environments = gate;
        self
    }

    pub fn with_contexts(mut self, gate: Gate<Context>) -> Self {
        self.contexts = gate;
        self
    }
}

#[async_trait]
impl Provider for Recording {
    fn name(&self) -> &str {
        self.name
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn dependencies(&self) -> Vec<String> {
        self.deps.iter().map(|dep| dep.to_string()).collect()
    }

    fn environments(&self) -> Gate<Environment> {
        self.environments.clone()
    }

    fn contexts(&self) -> Gate<Context> {
        self.contexts.clone()
    }

    async fn register(&self, _app: &Arc<Application>) -> GantryResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("register:{}", self.name));
        Ok(())
    }

    async fn boot(&self, _app: &Arc<Application>) -> GantryResult<()> {
        self.log.lock().unwrap().push(format!("boot:{}", self.name));
        Ok(())
    }
}
