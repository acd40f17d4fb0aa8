#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Failures of a single answer check. `Display` is the text shown to the
//! student.

use thiserror::Error;

use super::frame::TabularMismatch;

/// Why a check failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckFailure {
    /// The submission does not define an expected variable.
    #[error(
        "ISSUE FOUND: The required variable name \"{name}\" is missing from your submission.\n"
    )]
    MissingVariable {
        /// The variable name.
        name: String,
    },
    /// The reference solution does not define an expected variable.
    #[error(
        "ISSUE FOUND: The reference solution does not define the variable \"{name}\"; this check \
         cannot run.\n"
    )]
    MissingSolution {
        /// The variable name.
        name: String,
    },
    /// The submitted value has the wrong type.
    #[error(
        "ISSUE FOUND: Your variable {name} has type <class '{found}'> but should have type \
         <class '{expected}'>.\n"
    )]
    TypeMismatch {
        /// The variable name.
        name:     String,
        /// Qualified type of the submitted value.
        found:    String,
        /// Qualified type of the expected value.
        expected: String,
    },
    /// The submitted sequence has the wrong length.
    #[error(
        "ISSUE FOUND: Your list variable {name} has a length of {found} but should have a length \
         of {expected}.\n"
    )]
    LengthMismatch {
        /// The variable name.
        name:     String,
        /// Submitted length.
        found:    usize,
        /// Expected length.
        expected: usize,
    },
    /// A scalar or composite value differs.
    #[error(
        "ISSUE FOUND: The value of your variable {name} does not match the expected \
         value,\n\n\nYours:     {found}\nExpected:     {expected}\n\nIn case it helps, your \
         variable {name} has type {found_type}.\n"
    )]
    ValueMismatch {
        /// The variable name.
        name:       String,
        /// Submitted value, rendered.
        found:      String,
        /// Expected value, rendered.
        expected:   String,
        /// Short type name of the submitted value.
        found_type: String,
    },
    /// A short sequence differs; both sequences are shown in full.
    #[error(
        "ISSUE FOUND: The value of your list variable {name} does not match the expected \
         value.\n\nYours:\n\n     {found}\n\nExpected:\n\n     {expected}\n"
    )]
    ListMismatch {
        /// The variable name.
        name:     String,
        /// Submitted sequence, rendered.
        found:    String,
        /// Expected sequence, rendered.
        expected: String,
    },
    /// A long sequence differs; only the first differing element is shown.
    #[error(
        "ISSUE FOUND: The value of your list variable {name} is not equal to what we expect.\nThe \
         first incorrect value in your list occurred at index {index}, that is, at \
         {name}[{index}].\n\nYours:\n\n     {found}\n\nExpected:\n\n     {expected}\n"
    )]
    ElementMismatch {
        /// The variable name.
        name:     String,
        /// Lowest differing index.
        index:    usize,
        /// Submitted element, rendered.
        found:    String,
        /// Expected element, rendered.
        expected: String,
    },
    /// The tabular comparator rejected the value.
    #[error("{0}")]
    Tabular(#[from] TabularMismatch),
    /// Some notebook cells raised while loading the submission.
    #[error("{report}")]
    CellErrors {
        /// The student-facing report listing the failing cells.
        report: String,
    },
}

impl CheckFailure {
    /// The variable the failure is about, if any.
    pub fn variable(&self) -> Option<&str> {
        match self {
            CheckFailure::MissingVariable { name }
            | CheckFailure::MissingSolution { name }
            | CheckFailure::TypeMismatch { name, .. }
            | CheckFailure::LengthMismatch { name, .. }
            | CheckFailure::ValueMismatch { name, .. }
            | CheckFailure::ListMismatch { name, .. }
            | CheckFailure::ElementMismatch { name, .. } => Some(name),
            CheckFailure::Tabular(mismatch) => Some(mismatch.obj()),
            CheckFailure::CellErrors { .. } => None,
        }
    }

    /// A short label for the failure kind, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckFailure::MissingVariable { .. } => "missing variable",
            CheckFailure::MissingSolution { .. } => "missing solution",
            CheckFailure::TypeMismatch { .. } => "type mismatch",
            CheckFailure::LengthMismatch { .. } => "length mismatch",
            CheckFailure::ValueMismatch { .. }
            | CheckFailure::ListMismatch { .. }
            | CheckFailure::ElementMismatch { .. } => "value mismatch",
            CheckFailure::Tabular(_) => "tabular mismatch",
            CheckFailure::CellErrors { .. } => "cell errors",
        }
    }
}
