//! Positional resolution of parameter manifests against the registry.

use super::injection::{Args, CallContext};
use crate::core::{GantryError, GantryResult};
use crate::registry::{Service, ServiceRegistry, ServiceValue};

/// Resolves an injection target's declared parameter names to service
/// values.
///
/// Resolution has no side effects beyond service lookup (and factory
/// invocation for factory services), so the same target can be resolved any
/// number of times with different override sets.
pub struct ArgumentResolver<'a> {
    registry: &'a ServiceRegistry,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(registry: &'a ServiceRegistry) -> Self {
        Self { registry }
    }

    /// Resolve each declared parameter, position by position.
    ///
    /// An override value at position `i` wins over the registry; otherwise
    /// the parameter name itself is the lookup key. The first unresolvable
    /// name fails with [`GantryError::MissingService`] annotated with the
    /// calling context.
    pub fn resolve(
        &self,
        context: &CallContext,
        params: &[String],
        overrides: &[ServiceValue],
    ) -> GantryResult<Args> {
        let mut visiting = Vec::new();
        self.resolve_with(context, params, overrides, &mut visiting)
    }

    /// Resolve a single service name.
    ///
    /// A factory service is invoked here, with its own parameters resolved
    /// recursively (and no overrides); the produced value is returned in
    /// place of the factory. A factory whose manifest reaches itself fails
    /// with [`GantryError::CyclicService`] naming the chain.
    pub fn resolve_name(&self, context: &CallContext, name: &str) -> GantryResult<ServiceValue> {
        let mut visiting = Vec::new();
        self.resolve_name_with(context, name, &mut visiting)
    }

    fn resolve_with(
        &self,
        context: &CallContext,
        params: &[String],
        overrides: &[ServiceValue],
        visiting: &mut Vec<String>,
    ) -> GantryResult<Args> {
        let mut values = Vec::with_capacity(params.len());
        for (position, param) in params.iter().enumerate() {
            let value = match overrides.get(position) {
                Some(value) => value.clone(),
                None => self.resolve_name_with(context, param, visiting)?,
            };
            values.push(value);
        }
        Ok(Args::new(values))
    }

    // `visiting` holds the factory names currently being resolved, outermost
    // first, so a re-entry is a cycle and the chain can name it.
    fn resolve_name_with(
        &self,
        context: &CallContext,
        name: &str,
        visiting: &mut Vec<String>,
    ) -> GantryResult<ServiceValue> {
        let service =
            self.registry
                .lookup(name)?
                .ok_or_else(|| GantryError::MissingService {
                    name: name.to_string(),
                    context: context.to_string(),
                })?;

        match service {
            Service::Value(value) => Ok(value),
            Service::Factory(injection) => {
                if visiting.iter().any(|entry| entry == name) {
                    let mut chain = visiting.clone();
                    chain.push(name.to_string());
                    return Err(GantryError::CyclicService {
                        chain: chain.join(" -> "),
                    });
                }
                visiting.push(name.to_string());
                let resolved =
                    self.resolve_with(injection.context(), injection.params(), &[], visiting);
                visiting.pop();
                injection.invoke(resolved?)
            }
        }
    }
}
