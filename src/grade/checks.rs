#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Presence, type and value checks for a single expected variable.

use std::{fmt, sync::Arc};

use anyhow::Result;

use super::{
    error::CheckFailure,
    frame::{PandasStyleComparator, TabularComparator},
    options::CompareOptions,
    sequence::assert_list_equality,
};
use crate::{
    config::{self, CheckerConfig},
    notebook::Namespace,
    value::Value,
};

/// Returns the value bound to `name`, or a missing-variable failure.
pub fn assert_present<'a>(
    namespace: &'a dyn Namespace,
    name: &str,
) -> Result<&'a Value, CheckFailure> {
    namespace
        .get(name)
        .ok_or_else(|| CheckFailure::MissingVariable {
            name: name.to_string(),
        })
}

/// Returns a missing-variable failure for every name `namespace` lacks, in
/// the order given.
pub fn missing_variables<'a>(
    namespace: &dyn Namespace,
    names: impl IntoIterator<Item = &'a str>,
) -> Vec<CheckFailure> {
    names
        .into_iter()
        .filter(|name| !namespace.has(name))
        .map(|name| CheckFailure::MissingVariable {
            name: name.to_string(),
        })
        .collect()
}

/// True if `found` passes the type check against `expected`.
///
/// The check is skipped entirely when either side is a numeric-library
/// scalar, even if the other side is not a number at all.
pub fn types_conform(found: &Value, expected: &Value) -> bool {
    found.is_numeric_scalar() || expected.is_numeric_scalar() || found.is_instance_of(expected)
}

/// Fails if `found` does not have the type of `expected`.
pub fn assert_type(name: &str, found: &Value, expected: &Value) -> Result<(), CheckFailure> {
    if types_conform(found, expected) {
        return Ok(());
    }
    Err(CheckFailure::TypeMismatch {
        name:     name.to_string(),
        found:    found.qualified_type_name().to_string(),
        expected: expected.qualified_type_name().to_string(),
    })
}

/// Builds the generic value-mismatch failure.
fn value_mismatch(name: &str, found: &Value, expected: &Value) -> CheckFailure {
    CheckFailure::ValueMismatch {
        name:       name.to_string(),
        found:      found.to_string(),
        expected:   expected.to_string(),
        found_type: found.type_name().to_string(),
    }
}

/// Compares submitted answers against the reference solution.
#[derive(Clone)]
pub struct AnswerChecker {
    /// Thresholds and default options.
    config:     Arc<CheckerConfig>,
    /// Equality for series and frames.
    comparator: Arc<dyn TabularComparator>,
}

impl Default for AnswerChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnswerChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerChecker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnswerChecker {
    /// A checker with the built-in defaults and the bundled tabular
    /// comparator.
    pub fn new() -> Self {
        Self {
            config:     Arc::new(CheckerConfig::default()),
            comparator: Arc::new(PandasStyleComparator),
        }
    }

    /// A checker using the process-wide configuration read from the
    /// environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            config: config::ensure_initialized()?,
            ..Self::new()
        })
    }

    /// Returns the checker with a custom configuration.
    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Returns the checker with a custom tabular comparator.
    pub fn with_comparator(mut self, comparator: impl TabularComparator + 'static) -> Self {
        self.comparator = Arc::new(comparator);
        self
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Compares `found` against `expected`, dispatching on the kind of the
    /// expected value.
    pub fn assert_value(
        &self,
        name: &str,
        found: &Value,
        expected: &Value,
        options: &CompareOptions,
    ) -> Result<(), CheckFailure> {
        let options = options.merged_over(self.config.default_options());

        match (expected, found) {
            (Value::Series(expected), Value::Series(found)) => Ok(self
                .comparator
                .assert_series_equal(found, expected, name, &options.tabular())?),
            (Value::Frame(expected), Value::Frame(found)) => Ok(self
                .comparator
                .assert_frame_equal(found, expected, name, &options.tabular())?),
            (Value::List(expected), Value::List(found)) => {
                assert_list_equality(found, expected, name, self.config.sequence_threshold())
            }
            (Value::Series(_) | Value::Frame(_) | Value::List(_), _) => {
                Err(value_mismatch(name, found, expected))
            }
            (expected, found) if expected.is_float() => {
                let within = match (found.as_number(), expected.as_number()) {
                    (Some(f), Some(e)) => options.tolerance().matches(f.as_f64(), e.as_f64()),
                    _ => false,
                };
                if within {
                    Ok(())
                } else {
                    Err(value_mismatch(name, found, expected))
                }
            }
            (expected, found) => {
                if found == expected {
                    Ok(())
                } else {
                    Err(value_mismatch(name, found, expected))
                }
            }
        }
    }

    /// Full check of one variable: present in the submission, of the right
    /// type, and equal to the solution's value.
    pub fn check_answer(
        &self,
        student: &dyn Namespace,
        solution: &dyn Namespace,
        name: &str,
        options: &CompareOptions,
    ) -> Result<(), CheckFailure> {
        let found = assert_present(student, name)?;
        let expected = solution
            .get(name)
            .ok_or_else(|| CheckFailure::MissingSolution {
                name: name.to_string(),
            })?;

        assert_type(name, found, expected)?;
        self.assert_value(name, found, expected, options)
    }
}
