#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde_json::Value as Json;

use crate::value::Value;

/// A container of named attributes, one per notebook variable.
pub trait Namespace {
    /// True if the namespace binds `name`.
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the value bound to `name`.
    fn get(&self, name: &str) -> Option<&Value>;
}

/// A namespace backed by a string-keyed map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapNamespace {
    /// Variable bindings.
    vars: BTreeMap<String, Value>,
}

impl MapNamespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    /// Returns the namespace with `name` bound.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Builds a namespace from a JSON object mapping variable names to
    /// values.
    pub fn from_json(json: &Json) -> Result<Self> {
        let Json::Object(map) = json else {
            bail!("A namespace must be a JSON object, got: {json}");
        };

        let mut namespace = Self::new();
        for (name, raw) in map {
            let value = Value::from_json(raw)
                .with_context(|| format!("Could not decode variable `{name}`"))?;
            namespace.insert(name.clone(), value);
        }
        Ok(namespace)
    }

    /// Parses a JSON document into a namespace.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: Json = serde_json::from_str(text).context("Namespace is not valid JSON")?;
        Self::from_json(&json)
    }
}

impl Namespace for MapNamespace {
    fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapNamespace {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
