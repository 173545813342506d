//! Normalized execution of injection targets.

use super::injection::{Injection, MethodSet};
use super::resolver::ArgumentResolver;
use crate::core::{GantryError, GantryResult};
use crate::registry::{ServiceRegistry, ServiceValue};
use std::sync::Arc;

/// A normalized call target.
///
/// Plain functions and constructors both take the `Function` shape (a
/// constructor is a function whose body returns the new instance); object
/// method dispatch goes through a [`MethodSet`].
#[derive(Clone)]
pub enum Target {
    /// A function or constructor with a declared parameter manifest.
    Function(Arc<Injection>),
    /// A named method on an object exposing a method set.
    Method {
        receiver: Arc<dyn MethodSet>,
        method: String,
    },
}

impl Target {
    pub fn function(injection: Injection) -> Self {
        Target::Function(Arc::new(injection))
    }

    pub fn method(receiver: Arc<dyn MethodSet>, method: impl Into<String>) -> Self {
        Target::Method {
            receiver,
            method: method.into(),
        }
    }
}

/// Executes injection targets with registry-resolved arguments.
pub struct Invoker<'a> {
    registry: &'a ServiceRegistry,
}

impl<'a> Invoker<'a> {
    pub fn new(registry: &'a ServiceRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the target's arguments and run its body.
    ///
    /// Argument resolution completes fully before the body runs, so a
    /// resolution failure leaves no partial side effects from the call. A
    /// method name the receiver does not expose fails with
    /// [`GantryError::InvalidCallTarget`].
    pub fn call(&self, target: &Target, overrides: &[ServiceValue]) -> GantryResult<ServiceValue> {
        let injection = match target {
            Target::Function(injection) => Arc::clone(injection),
            Target::Method { receiver, method } => receiver.method(method).ok_or_else(|| {
                GantryError::InvalidCallTarget {
                    context: format!("{}.{}", receiver.target_name(), method),
                    reason: "no such method".to_string(),
                }
            })?,
        };

        let args = ArgumentResolver::new(self.registry).resolve(
            injection.context(),
            injection.params(),
            overrides,
        )?;
        injection.invoke(args)
    }
}
