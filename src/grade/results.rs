#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Outcomes of generated cases and the report of a suite run.

use std::fmt::{self, Display};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::error::CheckFailure;

/// Pass or fail, plus the diagnostic for a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the check passed.
    passed:  bool,
    /// Diagnostic text for a failed check.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckOutcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self {
            passed:  true,
            message: None,
        }
    }

    /// A failing outcome with a diagnostic.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed:  false,
            message: Some(message.into()),
        }
    }

    /// Whether the check passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Diagnostic text, if the check failed.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<Result<(), CheckFailure>> for CheckOutcome {
    fn from(result: Result<(), CheckFailure>) -> Self {
        match result {
            Ok(()) => CheckOutcome::pass(),
            Err(failure) => CheckOutcome::fail(failure.to_string()),
        }
    }
}

/// Status column of the report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// The case passed.
    Passed,
    /// The case failed.
    Failed,
}

impl Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStatus::Passed => write!(f, "PASSED"),
            CaseStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// The result of running one generated case.
#[derive(Tabled, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case identifier, e.g. `test_answer_equality[total]`.
    #[tabled(rename = "Case")]
    name:     String,
    /// Variable the case checks.
    #[tabled(rename = "Variable")]
    variable: String,
    /// Pass or fail.
    #[tabled(rename = "Status")]
    status:   CaseStatus,
    /// Diagnostic text; empty for passing cases.
    #[tabled(rename = "Message")]
    message:  String,
}

impl CaseResult {
    /// Records the outcome of case `name` checking `variable`.
    pub fn new(name: impl Into<String>, variable: impl Into<String>, outcome: CheckOutcome) -> Self {
        let status = if outcome.passed {
            CaseStatus::Passed
        } else {
            CaseStatus::Failed
        };
        Self {
            name: name.into(),
            variable: variable.into(),
            status,
            message: outcome.message.unwrap_or_default(),
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

    /// Pass or fail.
    pub fn status(&self) -> CaseStatus {
        self.status
    }

    /// True if the case passed.
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }

    /// Diagnostic text; empty for passing cases.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Results of every case in a suite, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Per-case results.
    results: Vec<CaseResult>,
}

impl SuiteReport {
    /// Creates a report from per-case results.
    pub fn new(results: Vec<CaseResult>) -> Self {
        Self { results }
    }

    /// Per-case results in registration order.
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Looks up the result of case `name`.
    pub fn get(&self, name: &str) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Number of passing cases.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Number of failing cases.
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// True if every case passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(CaseResult::passed)
    }

    /// The failing cases.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Serializes the report to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize the answer check report")
    }

    /// Renders the report as a table.
    pub fn table(&self) -> String {
        Table::new(&self.results)
            .with(Panel::header("Answer Checks"))
            .with(Panel::footer(format!(
                "{}/{} checks passed",
                self.passed_count(),
                self.results.len()
            )))
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
            .with(
                Modify::new(Rows::first())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
            .to_string()
    }
}

impl Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table())
    }
}
