//! Provider load ordering and lifecycle orchestration.
//!
//! Given the full set of constructed providers and the application's
//! environment/context, the graph filters out unloadable providers, orders
//! the survivors (ascending numeric order, stable on discovery order), and
//! walks dependencies depth-first to produce a register order in which
//! every provider follows all of its transitive dependencies. Register and
//! boot hooks run one at a time in that order; nothing interleaves.

use crate::app::Application;
use crate::core::{DependencyFailure, GantryError, GantryResult};
use crate::events::Event;
use crate::provider::{Context, Environment, Provider};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// One constructed provider plus its lifecycle flags.
pub struct ProviderEntry {
    provider: Box<dyn Provider>,
    loaded: bool,
    booted: bool,
}

impl ProviderEntry {
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// True once `register` has completed.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// True once `boot` has completed.
    pub fn booted(&self) -> bool {
        self.booted
    }
}

/// Computes and drives the register/boot order for a set of constructed
/// providers.
pub struct ProviderGraph {
    /// All providers in discovery order, loadable or not.
    entries: Vec<ProviderEntry>,
    index: HashMap<String, usize>,
    environment: Environment,
    context: Context,
    /// Indices in the order `register` completed.
    boot_order: Vec<usize>,
}

impl ProviderGraph {
    /// Index the constructed providers. Two providers under the same name
    /// fail immediately.
    pub fn new(
        providers: Vec<Box<dyn Provider>>,
        environment: Environment,
        context: Context,
    ) -> GantryResult<Self> {
        let mut entries = Vec::with_capacity(providers.len());
        let mut index = HashMap::with_capacity(providers.len());
        for provider in providers {
            let name = provider.name().to_string();
            if index.insert(name.clone(), entries.len()).is_some() {
                return Err(GantryError::DuplicateProvider { name });
            }
            entries.push(ProviderEntry {
                provider,
                loaded: false,
                booted: false,
            });
        }
        Ok(Self {
            entries,
            index,
            environment,
            context,
            boot_order: Vec::new(),
        })
    }

    fn is_loadable(&self, idx: usize) -> bool {
        self.entries[idx]
            .provider
            .is_loadable(&self.environment, &self.context)
    }

    /// Loadable providers, ascending by declared order. The sort is stable,
    /// so equal orders keep discovery order and boot sequences stay
    /// reproducible across runs with identical provider lists.
    fn load_sequence(&self) -> Vec<usize> {
        let mut sequence: Vec<usize> = (0..self.entries.len())
            .filter(|&idx| self.is_loadable(idx))
            .collect();
        sequence.sort_by_key(|&idx| self.entries[idx].provider.order());
        sequence
    }

    /// Resolve the dependency-respecting register order without running any
    /// hook, so a bad dependency aborts before the first side effect.
    fn resolve_order(&self) -> GantryResult<Vec<usize>> {
        let mut order = Vec::new();
        let mut placed = HashSet::new();
        let mut visiting = Vec::new();
        for idx in self.load_sequence() {
            self.visit(idx, &mut order, &mut placed, &mut visiting)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        idx: usize,
        order: &mut Vec<usize>,
        placed: &mut HashSet<usize>,
        visiting: &mut Vec<String>,
    ) -> GantryResult<()> {
        // Multiple dependents may request the same dependency: a provider
        // already placed is a silent no-op, not an error.
        if placed.contains(&idx) {
            return Ok(());
        }
        let name = self.entries[idx].provider.name().to_string();
        if visiting.iter().any(|pending| pending == &name) {
            let chain = visiting
                .iter()
                .skip_while(|pending| *pending != &name)
                .cloned()
                .chain(std::iter::once(name.clone()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(GantryError::CyclicDependency { chain });
        }
        visiting.push(name.clone());

        for dependency in self.entries[idx].provider.dependencies() {
            match self.index.get(&dependency) {
                None => {
                    return Err(GantryError::MissingDependency {
                        provider: name,
                        dependency,
                        reason: DependencyFailure::NotRegistered,
                    });
                }
                Some(&dep_idx) => {
                    if !self.is_loadable(dep_idx) {
                        return Err(GantryError::MissingDependency {
                            provider: name,
                            dependency,
                            reason: DependencyFailure::Inactive {
                                environment: self.environment.to_string(),
                                context: self.context.to_string(),
                            },
                        });
                    }
                    self.visit(dep_idx, order, placed, visiting)?;
                }
            }
        }

        visiting.pop();
        placed.insert(idx);
        order.push(idx);
        Ok(())
    }

    /// Register phase: call every loadable provider's `register`, one at a
    /// time, dependencies first. The order in which `register` completes
    /// becomes the boot order.
    pub async fn register(&mut self, app: &Arc<Application>) -> GantryResult<()> {
        let order = self.resolve_order()?;
        for idx in order {
            let name = self.entries[idx].provider.name().to_string();
            app.events().emit(Event::ProviderLoading {
                provider: name.clone(),
            });
            debug!(provider = %name, "registering provider");
            self.entries[idx].provider.register(app).await?;
            self.entries[idx].loaded = true;
            self.boot_order.push(idx);
            app.events().emit(Event::ProviderLoaded { provider: name });
        }
        app.events().emit(Event::ProvidersRegistered {
            count: self.boot_order.len(),
        });
        Ok(())
    }

    /// Boot phase: call `boot` exactly once per loaded provider, in the
    /// order `register` completed.
    pub async fn boot(&mut self, app: &Arc<Application>) -> GantryResult<()> {
        let order = self.boot_order.clone();
        for idx in order {
            if self.entries[idx].booted {
                continue;
            }
            let name = self.entries[idx].provider.name().to_string();
            debug!(provider = %name, "booting provider");
            self.entries[idx].provider.boot(app).await?;
            self.entries[idx].booted = true;
            app.events().emit(Event::ProviderBooted { provider: name });
        }
        Ok(())
    }

    /// Provider names in the order their `register` completed.
    pub fn boot_order(&self) -> Vec<String> {
        self.boot_order
            .iter()
            .map(|&idx| self.entries[idx].provider.name().to_string())
            .collect()
    }

    /// All indexed provider names, in discovery order.
    pub fn provider_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.provider.name().to_string())
            .collect()
    }

    /// Lifecycle flags for one provider, `None` if unknown.
    pub fn entry(&self, name: &str) -> Option<&ProviderEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }
}
