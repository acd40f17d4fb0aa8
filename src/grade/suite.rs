#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Generation of one independent case per expected variable, and a small
//! in-process harness to run them.

use std::{fmt, sync::Arc};

use super::{
    checks::{AnswerChecker, assert_present},
    error::CheckFailure,
    options::ExpectedVars,
    results::{CaseResult, CheckOutcome, SuiteReport},
};
use crate::notebook::{LoadedNotebook, Namespace};

/// A namespace shared between generated cases.
pub type SharedNamespace = Arc<dyn Namespace + Send + Sync>;

/// The body of a generated case.
type CheckFn = Arc<dyn Fn() -> Result<(), CheckFailure> + Send + Sync>;

/// A named, independently runnable check.
#[derive(Clone)]
pub struct TestCase {
    /// Case identifier, e.g. `test_variable_name[total]`.
    name:     String,
    /// Variable the case checks; empty for notebook-wide cases.
    variable: String,
    /// The check itself.
    check:    CheckFn,
}

impl TestCase {
    /// Creates a case from a check closure.
    pub fn new<F>(name: impl Into<String>, variable: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> Result<(), CheckFailure> + Send + Sync + 'static,
    {
        Self {
            name:     name.into(),
            variable: variable.into(),
            check:    Arc::new(check),
        }
    }

    /// Case identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable the case checks.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Runs the check.
    pub fn check(&self) -> Result<(), CheckFailure> {
        (self.check)()
    }

    /// Runs the check and records its outcome.
    pub fn run(&self) -> CheckOutcome {
        self.check().into()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("variable", &self.variable)
            .finish_non_exhaustive()
    }
}

/// Formats a parametrized case identifier.
fn case_name(family: &str, variable: &str) -> String {
    format!("{family}[{variable}]")
}

/// One `test_variable_name[<name>]` case per expected variable, checking
/// only that the submission defines it.
pub fn make_variable_names_test(hw: SharedNamespace, expected: &ExpectedVars) -> Vec<TestCase> {
    expected
        .names()
        .map(|name| {
            let hw = Arc::clone(&hw);
            let var = name.to_string();
            TestCase::new(case_name("test_variable_name", name), name, move || {
                assert_present(hw.as_ref(), &var).map(|_| ())
            })
        })
        .collect()
}

/// One `test_answer_equality[<name>]` case per expected variable, checking
/// presence, type and value against the solution.
pub fn make_answer_equality_test(
    hw: SharedNamespace,
    soln: SharedNamespace,
    expected: &ExpectedVars,
    checker: &AnswerChecker,
) -> Vec<TestCase> {
    expected
        .iter()
        .map(|(name, options)| {
            let hw = Arc::clone(&hw);
            let soln = Arc::clone(&soln);
            let checker = checker.clone();
            let options = options.clone();
            let var = name.to_string();
            TestCase::new(case_name("test_answer_equality", name), name, move || {
                checker.check_answer(hw.as_ref(), soln.as_ref(), &var, &options)
            })
        })
        .collect()
}

/// A `test_all_code_cells` case that fails when any notebook cell raised
/// while the submission was loaded.
pub fn make_code_cells_test(notebook: &LoadedNotebook) -> TestCase {
    let report = notebook.error_cells_report();
    TestCase::new("test_all_code_cells", "", move || match &report {
        Some(report) => Err(CheckFailure::CellErrors {
            report: report.clone(),
        }),
        None => Ok(()),
    })
}

/// An ordered collection of registered cases.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    /// Registered cases, in registration order.
    cases: Vec<TestCase>,
}

impl Suite {
    /// Creates an empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a case.
    pub fn register(&mut self, case: TestCase) -> &mut Self {
        self.cases.push(case);
        self
    }

    /// Registers several cases.
    pub fn register_all(&mut self, cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        self.cases.extend(cases);
        self
    }

    /// Registered cases, in registration order.
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True if no case is registered.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Runs every case. A failing case never stops the others.
    pub fn run(&self) -> SuiteReport {
        let results = self
            .cases
            .iter()
            .map(|case| {
                let outcome = case.run();
                if outcome.passed() {
                    tracing::debug!("{} passed", case.name);
                } else {
                    tracing::warn!("{} failed", case.name);
                }
                CaseResult::new(&case.name, &case.variable, outcome)
            })
            .collect();

        let report = SuiteReport::new(results);
        tracing::info!(
            "{}/{} answer checks passed",
            report.passed_count(),
            report.results().len()
        );
        report
    }
}
