//! Injection targets: declared parameter manifests plus a body.

use crate::core::{GantryError, GantryResult};
use crate::registry::ServiceValue;
use anyhow::anyhow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifies the target of an injected call, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Target name: a function name, type name, or object name.
    pub target: String,
    /// Method name when the target is an object method or constructor.
    pub method: Option<String>,
}

impl CallContext {
    /// Context for a plain function.
    pub fn function(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: None,
        }
    }

    /// Context for a method on a named object.
    pub fn method(target: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: Some(method.into()),
        }
    }
}

impl fmt::Display for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{}.{}", self.target, method),
            None => write!(f, "{}", self.target),
        }
    }
}

/// Resolved arguments handed to an injection body, positionally aligned
/// with the declared parameter manifest.
pub struct Args {
    values: Vec<ServiceValue>,
}

impl Args {
    pub fn new(values: Vec<ServiceValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw type-erased value at `index`.
    pub fn value(&self, index: usize) -> anyhow::Result<&ServiceValue> {
        self.values
            .get(index)
            .ok_or_else(|| anyhow!("no argument at position {}", index))
    }

    /// Downcast the argument at `index` to a clone of `T`.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, index: usize) -> anyhow::Result<T> {
        self.value(index)?
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "argument at position {} is not a {}",
                    index,
                    std::any::type_name::<T>()
                )
            })
    }

    /// Downcast the argument at `index` to a shared `Arc<T>` without cloning
    /// the underlying value.
    pub fn arc<T: Send + Sync + 'static>(&self, index: usize) -> anyhow::Result<Arc<T>> {
        Arc::clone(self.value(index)?)
            .downcast::<T>()
            .map_err(|_| {
                anyhow!(
                    "argument at position {} is not a {}",
                    index,
                    std::any::type_name::<T>()
                )
            })
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("len", &self.values.len())
            .finish_non_exhaustive()
    }
}

type Body = Box<dyn Fn(&Args) -> anyhow::Result<ServiceValue> + Send + Sync>;

/// A callable unit: a calling context, an ordered list of service names (the
/// parameter manifest), and a body run with the resolved arguments.
///
/// The manifest is the statically-declared replacement for reflecting over a
/// function's parameter names: each entry is treated as a service lookup key
/// unless a positional override is supplied at call time.
pub struct Injection {
    context: CallContext,
    params: Vec<String>,
    body: Body,
}

impl Injection {
    fn new(
        context: CallContext,
        params: impl IntoIterator<Item = impl Into<String>>,
        body: impl Fn(&Args) -> anyhow::Result<ServiceValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            context,
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        }
    }

    /// A plain function target.
    pub fn function(
        name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
        body: impl Fn(&Args) -> anyhow::Result<ServiceValue> + Send + Sync + 'static,
    ) -> Self {
        Self::new(CallContext::function(name), params, body)
    }

    /// A constructor target: the body produces a new instance.
    pub fn constructor(
        type_name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
        body: impl Fn(&Args) -> anyhow::Result<ServiceValue> + Send + Sync + 'static,
    ) -> Self {
        Self::new(CallContext::method(type_name, "new"), params, body)
    }

    /// A method target bound to a named object.
    pub fn bound_method(
        target: impl Into<String>,
        method: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
        body: impl Fn(&Args) -> anyhow::Result<ServiceValue> + Send + Sync + 'static,
    ) -> Self {
        Self::new(CallContext::method(target, method), params, body)
    }

    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Declared service names, in positional order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Run the body with already-resolved arguments.
    ///
    /// Any failure inside the body is wrapped as [`GantryError::Call`]
    /// carrying this injection's context; the original error stays reachable
    /// through the source chain.
    pub fn invoke(&self, args: Args) -> GantryResult<ServiceValue> {
        (self.body)(&args).map_err(|err| GantryError::Call {
            context: self.context.to_string(),
            source: err.into(),
        })
    }
}

impl fmt::Debug for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injection")
            .field("context", &self.context)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A named object exposing injectable methods by name.
///
/// This is the explicit form of "object plus method name" dispatch: instead
/// of probing an arbitrary object for a function-typed property, an object
/// publishes a method set and lookups of unknown names fail loudly.
pub trait MethodSet: Send + Sync {
    /// Name of the object, used in diagnostics.
    fn target_name(&self) -> &str;

    /// Look up a method by name.
    fn method(&self, name: &str) -> Option<Arc<Injection>>;
}

/// A map-backed [`MethodSet`] for objects assembled at runtime.
pub struct Methods {
    name: String,
    methods: HashMap<String, Arc<Injection>>,
}

impl Methods {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    /// Builder-style method registration.
    pub fn with_method(mut self, name: impl Into<String>, injection: Injection) -> Self {
        self.methods.insert(name.into(), Arc::new(injection));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, injection: Injection) {
        self.methods.insert(name.into(), Arc::new(injection));
    }
}

impl MethodSet for Methods {
    fn target_name(&self) -> &str {
        &self.name
    }

    fn method(&self, name: &str) -> Option<Arc<Injection>> {
        self.methods.get(name).cloned()
    }
}
