//! Application settings bag.
//!
//! The config *loader* is a collaborator outside this crate: something else
//! decides where settings come from and hands the application an opaque
//! bag. This module is that bag — a YAML value with dotted-path access,
//! registered as the `config` service during bootstrap.

use crate::core::GantryResult;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Opaque application settings, backed by a YAML value.
#[derive(Debug, Clone, Default)]
pub struct Config {
    root: Value,
}

impl Config {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed YAML value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(s: &str) -> GantryResult<Self> {
        Ok(Self {
            root: serde_yaml::from_str(s)?,
        })
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: &Path) -> GantryResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Dotted-path lookup ("server.port").
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// True if the path resolves to any value.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Dotted-path lookup deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> GantryResult<Option<T>> {
        match self.get(path) {
            None => Ok(None),
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
        }
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path)?.as_i64()
    }
}
