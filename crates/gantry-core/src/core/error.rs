use std::fmt;
use thiserror::Error;

pub type GantryResult<T> = Result<T, GantryError>;

/// Why a declared provider dependency could not be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyFailure {
    /// The name does not appear in the provider index at all.
    NotRegistered,
    /// The provider exists but its environment/context gates exclude the
    /// application's current environment or context.
    Inactive { environment: String, context: String },
}

impl fmt::Display for DependencyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyFailure::NotRegistered => write!(f, "is not registered"),
            DependencyFailure::Inactive {
                environment,
                context,
            } => write!(
                f,
                "is inactive in environment '{}' / context '{}'",
                environment, context
            ),
        }
    }
}

/// Error taxonomy for the container and bootstrap lifecycle.
///
/// Every variant is unrecoverable at the container layer: resolution and
/// load failures indicate configuration defects, not transient conditions.
/// Messages always name the offending service, provider or parameter so a
/// failed bootstrap with many providers stays diagnosable.
#[derive(Error, Debug)]
pub enum GantryError {
    /// A service name was registered twice. The first registration wins and
    /// stays in place; the second call site gets this error.
    #[error("service '{name}' is already registered")]
    DuplicateService { name: String },

    /// Argument resolution could not satisfy a parameter name.
    #[error("no service named '{name}' (required by {context})")]
    MissingService { name: String, context: String },

    /// A declared provider dependency is absent or gated out. Fatal to the
    /// entire bootstrap.
    #[error("provider '{provider}' depends on '{dependency}', which {reason}")]
    MissingDependency {
        provider: String,
        dependency: String,
        reason: DependencyFailure,
    },

    /// Provider dependencies form a cycle.
    #[error("cyclic provider dependency: {chain}")]
    CyclicDependency { chain: String },

    /// Factory services form a resolution cycle.
    #[error("cyclic service resolution: {chain}")]
    CyclicService { chain: String },

    /// Two providers were constructed under the same name.
    #[error("provider '{name}' is already indexed")]
    DuplicateProvider { name: String },

    /// `Invoker::call` received a target it cannot dispatch.
    #[error("invalid call target {context}: {reason}")]
    InvalidCallTarget { context: String, reason: String },

    /// An injected target's body failed. Wraps the original error so the
    /// root cause survives arbitrarily nested call layers.
    #[error("call to {context} failed")]
    Call {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A provider constructor failed before the lifecycle even started.
    #[error("provider '{provider}' failed to construct")]
    Construct {
        provider: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A service was resolved but holds a different type than requested.
    #[error("service '{name}' is not a {expected}")]
    ServiceType { name: String, expected: String },

    /// A shared lock was poisoned by a panicking writer.
    #[error("lock poisoned: {resource}")]
    Lock { resource: String },

    #[error("Invalid name: {0}")]
    Name(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GantryError {
    /// Wrap an arbitrary error as a call failure for the given context.
    pub fn call(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        GantryError::Call {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Walk the source chain to the innermost error.
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        root_cause(self)
    }
}

/// Walk an error's source chain to its innermost cause.
///
/// Call wrappers can nest (an injected target may itself invoke another
/// injected target); this recovers the original failure for logging and
/// display.
pub fn root_cause<'a>(
    err: &'a (dyn std::error::Error + 'static),
) -> &'a (dyn std::error::Error + 'static) {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}
