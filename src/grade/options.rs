#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Per-variable comparison options and the expected-variable map.

use std::{collections::BTreeMap, fmt};

use anyhow::{Context, Result};
use bon::Builder;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};

use super::frame::TabularOptions;

/// Comparison options for one expected variable. Unset fields fall back to
/// the checker defaults, then to the comparator defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default, deny_unknown_fields)]
pub struct CompareOptions {
    /// Relative tolerance for float answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    rel:         Option<f64>,
    /// Absolute tolerance for float answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    abs:         Option<f64>,
    /// Treat `nan` as equal to `nan` for float answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    nan_ok:      Option<bool>,
    /// Tabular: compare dtypes.
    #[serde(skip_serializing_if = "Option::is_none")]
    check_dtype: Option<bool>,
    /// Tabular: compare series names.
    #[serde(skip_serializing_if = "Option::is_none")]
    check_names: Option<bool>,
    /// Tabular: compare row labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    check_index: Option<bool>,
    /// Tabular: compare float values exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    check_exact: Option<bool>,
    /// Tabular: relative tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    rtol:        Option<f64>,
    /// Tabular: absolute tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    atol:        Option<f64>,
    /// Tabular: ignore column order.
    #[serde(skip_serializing_if = "Option::is_none")]
    check_like:  Option<bool>,
}

impl CompareOptions {
    /// Returns these options with every unset field taken from `defaults`.
    pub fn merged_over(&self, defaults: &CompareOptions) -> CompareOptions {
        CompareOptions {
            rel:         self.rel.or(defaults.rel),
            abs:         self.abs.or(defaults.abs),
            nan_ok:      self.nan_ok.or(defaults.nan_ok),
            check_dtype: self.check_dtype.or(defaults.check_dtype),
            check_names: self.check_names.or(defaults.check_names),
            check_index: self.check_index.or(defaults.check_index),
            check_exact: self.check_exact.or(defaults.check_exact),
            rtol:        self.rtol.or(defaults.rtol),
            atol:        self.atol.or(defaults.atol),
            check_like:  self.check_like.or(defaults.check_like),
        }
    }

    /// The tolerance used for float answers.
    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            rel:    self.rel,
            abs:    self.abs,
            nan_ok: self.nan_ok.unwrap_or(false),
        }
    }

    /// The options forwarded to the tabular comparator.
    pub fn tabular(&self) -> TabularOptions {
        let defaults = TabularOptions::default();
        TabularOptions {
            check_dtype: self.check_dtype.unwrap_or(defaults.check_dtype),
            check_names: self.check_names.unwrap_or(defaults.check_names),
            check_index: self.check_index.unwrap_or(defaults.check_index),
            check_exact: self.check_exact.unwrap_or(defaults.check_exact),
            rtol:        self.rtol.unwrap_or(defaults.rtol),
            atol:        self.atol.unwrap_or(defaults.atol),
            check_like:  self.check_like.unwrap_or(defaults.check_like),
        }
    }
}

/// Tolerance for comparing a float answer against the expected float.
///
/// The allowed difference is `max(rel * |expected|, abs)`; with neither
/// bound set the comparison is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tolerance {
    /// Relative bound.
    rel:    Option<f64>,
    /// Absolute bound.
    abs:    Option<f64>,
    /// Whether `nan` equals `nan`.
    nan_ok: bool,
}

impl Tolerance {
    /// Exact comparison.
    pub fn exact() -> Self {
        Self::default()
    }

    /// True if `actual` is within tolerance of `expected`.
    pub fn matches(&self, actual: f64, expected: f64) -> bool {
        if actual.is_nan() || expected.is_nan() {
            return self.nan_ok && actual.is_nan() && expected.is_nan();
        }
        if actual == expected {
            return true;
        }
        if actual.is_infinite() || expected.is_infinite() {
            return false;
        }
        if self.rel.is_none() && self.abs.is_none() {
            return false;
        }

        let allowed = (self.rel.unwrap_or(0.0) * expected.abs()).max(self.abs.unwrap_or(0.0));
        (actual - expected).abs() <= allowed
    }
}

/// The variables a submission must define, each with its comparison
/// options. Names are unique; order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpectedVars(BTreeMap<String, CompareOptions>);

impl ExpectedVars {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects `names`, each with default options.
    pub fn from_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        names
            .into_iter()
            .map(|n| (n.into(), CompareOptions::default()))
            .collect()
    }

    /// Returns the map with `name` expected under `options`.
    pub fn with(mut self, name: impl Into<String>, options: CompareOptions) -> Self {
        self.0.insert(name.into(), options);
        self
    }

    /// Parses the map from a JSON object of `name -> options`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Could not parse the expected variables")
    }

    /// The expected names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over `(name, options)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompareOptions)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the options for `name`.
    pub fn get(&self, name: &str) -> Option<&CompareOptions> {
        self.0.get(name)
    }

    /// Number of expected variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is expected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CompareOptions)> for ExpectedVars {
    fn from_iter<T: IntoIterator<Item = (K, CompareOptions)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for ExpectedVars {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Map visitor that rejects repeated variable names.
        struct UniqueKeys;

        impl<'de> Visitor<'de> for UniqueKeys {
            type Value = ExpectedVars;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from variable names to comparison options")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut vars = BTreeMap::new();
                while let Some((name, options)) = access.next_entry::<String, CompareOptions>()? {
                    if vars.contains_key(&name) {
                        return Err(de::Error::custom(format!(
                            "variable `{name}` is listed more than once"
                        )));
                    }
                    vars.insert(name, options);
                }
                Ok(ExpectedVars(vars))
            }
        }

        deserializer.deserialize_map(UniqueKeys)
    }
}
