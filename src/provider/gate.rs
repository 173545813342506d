//! Environment and run-context gating for providers.

use crate::core::{GantryError, GantryResult};
use std::fmt;
use std::str::FromStr;

/// Deployment environment the application runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Local,
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl Environment {
    /// Parse an environment from a string
    pub fn parse(s: &str) -> GantryResult<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(GantryError::Config(format!(
                "Invalid environment '{}'. Must be 'local', 'development', 'staging', 'production' or 'test'",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = GantryError;

    fn from_str(s: &str) -> GantryResult<Self> {
        Environment::parse(s)
    }
}

/// Run mode of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Context {
    #[default]
    Web,
    Cli,
    Test,
}

impl Context {
    /// Parse a run context from a string
    pub fn parse(s: &str) -> GantryResult<Self> {
        match s.to_lowercase().as_str() {
            "web" => Ok(Context::Web),
            "cli" => Ok(Context::Cli),
            "test" => Ok(Context::Test),
            _ => Err(GantryError::Config(format!(
                "Invalid context '{}'. Must be 'web', 'cli' or 'test'",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Web => "web",
            Context::Cli => "cli",
            Context::Test => "test",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = GantryError;

    fn from_str(s: &str) -> GantryResult<Self> {
        Context::parse(s)
    }
}

/// Applicability gate: admit every value, or only an explicit allow-list.
#[derive(Debug, Clone, Default)]
pub enum Gate<T> {
    /// Admit everything (the default for providers).
    #[default]
    All,
    /// Admit only the listed values.
    Only(Vec<T>),
}

impl<T: PartialEq> Gate<T> {
    /// Gate restricted to the given values.
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Gate::Only(values.into_iter().collect())
    }

    /// True iff the gate admits `value`.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Gate::All => true,
            Gate::Only(values) => values.contains(value),
        }
    }
}
